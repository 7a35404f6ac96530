//! Order history reads.
//!
//! Orders are written only by the checkout transactor and never change
//! afterwards; this module is the read side, scoped to the owning user.

use crate::access::require_owner;
use crate::errors::OrderError;
use crate::model::{Order, OrderLine};
use crate::store::StorefrontStore;
use crate::types::{OrderId, UserId};

/// Read access to a user's completed orders.
#[derive(Debug, Clone)]
pub struct OrderHistory<S> {
    store: S,
}

impl<S> OrderHistory<S>
where
    S: StorefrontStore,
{
    /// Creates the history reader over a storage port.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The user's orders, newest first.
    pub async fn orders_for(&self, user: UserId) -> Result<Vec<Order>, OrderError> {
        Ok(self.store.orders_for_user(user).await?)
    }

    /// One order, only if it belongs to the requesting user.
    pub async fn order(&self, user: UserId, id: OrderId) -> Result<Order, OrderError> {
        let order = self.store.order(id).await?;
        require_owner(user, order.user)?;
        Ok(order)
    }

    /// The lines of an order the requesting user owns.
    pub async fn lines(&self, user: UserId, id: OrderId) -> Result<Vec<OrderLine>, OrderError> {
        let order = self.order(user, id).await?;
        Ok(self.store.order_lines(order.id).await?)
    }
}
