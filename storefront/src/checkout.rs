//! The checkout transactor: converts a cart into an immutable order while
//! decrementing stock, atomically.
//!
//! # Contract
//!
//! `checkout(user)` either returns a completed [`Order`] — with one line
//! per distinct product that was in the cart, each line capturing the unit
//! price at purchase time, every stock decrement applied, and the cart
//! emptied — or fails with a [`CheckoutError`] and changes nothing at all.
//! No partial stock decrement or orphan order is ever observable.
//!
//! # How atomicity is achieved
//!
//! The transactor reads a [`CheckoutSnapshot`] (cart, items, products, and
//! the record versions of all of them), validates stock against that one
//! consistent view, and submits a [`CheckoutPlan`] naming the versions it
//! read. The store applies the plan only if every named version is still
//! current; otherwise the whole commit is rejected and the transactor
//! retries from a fresh snapshot, bounded by [`RetryConfig`]. Version
//! conflicts are the only retried failure — business failures surface
//! immediately and a human must re-submit.
//!
//! Two concurrent checkouts of the *same* cart cannot both spend it: the
//! loser's cart version is stale, and its retry finds the emptied cart and
//! fails with [`CheckoutError::EmptyCart`]. Two users competing for the
//! last units of a product serialize the same way through the product's
//! version, so the sum of decrements never drives stock negative.

use crate::errors::{CheckoutError, CheckoutResult, StoreError};
use crate::model::{Order, OrderLine};
use crate::store::{CheckoutPlan, CheckoutSnapshot, StockDecrement, StorefrontStore};
use crate::types::UserId;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for checkout retry behavior on version conflicts.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Base delay between attempts.
    pub base_delay: Duration,
    /// Upper bound on the backoff delay.
    pub max_delay: Duration,
    /// Multiplier for exponential backoff.
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Backoff delay before the given retry (1-based attempt that just
    /// failed).
    fn delay_before_retry(&self, failed_attempt: u32) -> Duration {
        let exponent = i32::try_from(failed_attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let factor = self.backoff_multiplier.powi(exponent);
        // Clamp in float seconds so a huge exponent saturates at the cap
        // instead of overflowing Duration arithmetic.
        let seconds = (self.base_delay.as_secs_f64() * factor)
            .clamp(0.0, self.max_delay.as_secs_f64());
        Duration::from_secs_f64(seconds)
    }
}

/// Executes checkouts against a storage port.
#[derive(Debug, Clone)]
pub struct CheckoutProcessor<S> {
    store: S,
    retry: RetryConfig,
}

impl<S> CheckoutProcessor<S>
where
    S: StorefrontStore,
{
    /// Creates a processor with the default retry configuration.
    pub fn new(store: S) -> Self {
        Self {
            store,
            retry: RetryConfig::default(),
        }
    }

    /// Creates a processor with a custom retry configuration.
    pub const fn with_retry(store: S, retry: RetryConfig) -> Self {
        Self { store, retry }
    }

    /// Converts the user's cart into an order.
    ///
    /// See the module documentation for the full contract.
    pub async fn checkout(&self, user: UserId) -> CheckoutResult<Order> {
        let mut attempt = 1;
        loop {
            match self.try_checkout(user).await {
                Err(CheckoutError::Store(StoreError::VersionConflict {
                    record,
                    expected,
                    current,
                })) if attempt < self.retry.max_attempts => {
                    let delay = self.retry.delay_before_retry(attempt);
                    warn!(
                        %record,
                        %expected,
                        %current,
                        attempt,
                        ?delay,
                        "checkout commit conflicted, retrying from a fresh snapshot"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }

    /// One snapshot-validate-commit pass.
    async fn try_checkout(&self, user: UserId) -> CheckoutResult<Order> {
        let Some(snapshot) = self.store.checkout_snapshot(user).await? else {
            debug!(%user, "checkout refused: user has no cart");
            return Err(CheckoutError::EmptyCart);
        };
        if snapshot.is_empty() {
            debug!(%user, cart = %snapshot.cart.id, "checkout refused: cart is empty");
            return Err(CheckoutError::EmptyCart);
        }

        let order = Order::new(user);
        let plan = plan_order(&order, &snapshot)?;
        let line_count = plan.lines.len();
        self.store.commit_checkout(plan).await?;

        info!(
            order = %order.id,
            %user,
            lines = line_count,
            "checkout committed"
        );
        Ok(order)
    }
}

/// Validates stock and builds the atomic write set for `order`.
///
/// Items are walked in ascending item id so shortage reporting is
/// reproducible; the first shortage aborts, leaving later items
/// unexamined.
fn plan_order(order: &Order, snapshot: &CheckoutSnapshot) -> CheckoutResult<CheckoutPlan> {
    let mut items = snapshot.items.clone();
    items.sort_by_key(|item| item.id);

    let mut lines = Vec::with_capacity(items.len());
    let mut decrements = Vec::with_capacity(items.len());
    for item in &items {
        let entry = snapshot.product(item.product).ok_or_else(|| {
            // The snapshot promises a product record per item; a gap is
            // an adapter fault, not a business outcome.
            StoreError::Internal(format!(
                "checkout snapshot is missing product {}",
                item.product
            ))
        })?;

        let available = entry.product.stock;
        if !available.covers(item.quantity) {
            debug!(
                product = %item.product,
                requested = %item.quantity,
                %available,
                "checkout aborted on first shortage"
            );
            return Err(CheckoutError::InsufficientStock {
                product: item.product,
                requested: item.quantity,
                available,
            });
        }

        lines.push(OrderLine::new(
            order.id,
            item.product,
            item.quantity,
            entry.product.price,
        ));
        decrements.push(StockDecrement {
            product: item.product,
            quantity: item.quantity,
            expected_version: entry.version,
        });
    }

    Ok(CheckoutPlan {
        order: order.clone(),
        lines,
        decrements,
        cart: snapshot.cart.id,
        expected_cart_version: snapshot.cart_version,
    })
}
