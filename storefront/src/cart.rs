//! Cart mutation and viewing.
//!
//! A cart is created lazily on the first add. Adding a product that is
//! already in the cart accumulates into the existing item — the store's
//! atomic upsert guarantees one row per (cart, product) even under
//! concurrent adds. Quantity edits are bounded by the product's current
//! stock; removals are unconditional. Both require the item to belong to
//! the requesting user's cart.

use crate::access::require_owner;
use crate::errors::CartError;
use crate::model::{Cart, CartItem, Product};
use crate::store::StorefrontStore;
use crate::types::{CartItemId, Money, ProductId, Quantity, UserId};
use tracing::debug;

/// One cart item joined with its product, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartEntry {
    /// The cart item
    pub item: CartItem,
    /// The product it refers to
    pub product: Product,
}

impl CartEntry {
    /// Current price of this entry: unit price times desired quantity.
    pub fn line_total(&self) -> Result<Money, crate::types::DomainError> {
        self.product.price.multiply_by_quantity(self.item.quantity)
    }
}

/// A cart rendered for display: entries plus the running total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    /// The entries, ordered by item id
    pub entries: Vec<CartEntry>,
    /// Sum of all line totals at current catalog prices
    pub total: Money,
}

/// Cart operations for authenticated users.
#[derive(Debug, Clone)]
pub struct CartService<S> {
    store: S,
}

impl<S> CartService<S>
where
    S: StorefrontStore,
{
    /// Creates the service over a storage port.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Adds `quantity` of a product to the user's cart, creating the cart
    /// if needed and accumulating onto an existing item for the same
    /// product.
    ///
    /// Stock is not checked here; shortages surface at checkout.
    pub async fn add(
        &self,
        user: UserId,
        product: ProductId,
        quantity: Quantity,
    ) -> Result<CartItem, CartError> {
        // Reject unknown products before touching the cart.
        let product = self.store.product(product).await?;
        let cart = self.store.open_cart(user).await?;
        let item = self
            .store
            .upsert_cart_item(cart.id, product.id, quantity)
            .await?;
        debug!(%user, cart = %cart.id, product = %product.id, quantity = %item.quantity, "cart add");
        Ok(item)
    }

    /// Overwrites an item's quantity.
    ///
    /// Succeeds only when the new quantity is within the product's current
    /// stock; otherwise nothing is mutated. The item must belong to the
    /// requesting user's cart.
    pub async fn set_quantity(
        &self,
        user: UserId,
        item: CartItemId,
        quantity: Quantity,
    ) -> Result<CartItem, CartError> {
        let item = self.owned_item(user, item).await?;
        let product = self.store.product(item.product).await?;
        if !product.stock.covers(quantity) {
            return Err(CartError::InvalidQuantity {
                requested: quantity,
                available: product.stock,
            });
        }
        let updated = self.store.set_cart_item_quantity(item.id, quantity).await?;
        debug!(%user, item = %updated.id, quantity = %updated.quantity, "cart quantity set");
        Ok(updated)
    }

    /// Removes an item from the user's cart unconditionally.
    pub async fn remove(&self, user: UserId, item: CartItemId) -> Result<(), CartError> {
        let item = self.owned_item(user, item).await?;
        self.store.remove_cart_item(item.id).await?;
        debug!(%user, item = %item.id, product = %item.product, "cart item removed");
        Ok(())
    }

    /// Renders the user's cart: items joined with products, plus the
    /// total at current catalog prices.
    pub async fn view(&self, user: UserId) -> Result<CartView, CartError> {
        let cart = self.store.open_cart(user).await?;
        let items = self.store.cart_items(cart.id).await?;

        let mut entries = Vec::with_capacity(items.len());
        let mut total = Money::default();
        for item in items {
            let product = self.store.product(item.product).await?;
            let entry = CartEntry { item, product };
            total = total.checked_add(entry.line_total()?)?;
            entries.push(entry);
        }
        Ok(CartView { entries, total })
    }

    /// Loads an item and checks it belongs to the requesting user's cart.
    async fn owned_item(&self, user: UserId, id: CartItemId) -> Result<CartItem, CartError> {
        let item = self.store.cart_item(id).await?;
        let cart: Cart = self.store.cart(item.cart).await?;
        require_owner(user, cart.user)?;
        Ok(item)
    }
}
