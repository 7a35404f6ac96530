//! Error types for the storefront.
//!
//! Two layers, converted one way only:
//!
//! - [`StoreError`] — persistence-layer failures (missing records, version
//!   conflicts, adapter faults).
//! - Service errors ([`CheckoutError`], [`CartError`], [`OrderError`],
//!   [`CommentError`], [`ContactError`]) — business outcomes the caller is
//!   expected to branch on, with store failures passed through.
//!
//! Every error is scoped to the single request that produced it; none is
//! fatal to the process, and none triggers an automatic business-level
//! retry (only version conflicts are retried, inside the checkout
//! transactor).

use crate::types::{
    CartId, CartItemId, CommentId, DomainError, OrderId, ProductId, Quantity, RecordVersion,
    StockLevel, UserId,
};
use thiserror::Error;

/// Result alias for storage-port operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the storage port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The referenced product does not exist.
    #[error("Product {0} not found")]
    ProductNotFound(ProductId),

    /// The referenced cart does not exist.
    #[error("Cart {0} not found")]
    CartNotFound(CartId),

    /// The referenced cart item does not exist.
    #[error("Cart item {0} not found")]
    CartItemNotFound(CartItemId),

    /// The referenced order does not exist.
    #[error("Order {0} not found")]
    OrderNotFound(OrderId),

    /// The referenced comment does not exist.
    #[error("Comment {0} not found")]
    CommentNotFound(CommentId),

    /// Optimistic concurrency control rejected a commit: a record the
    /// caller read has since been mutated. The whole commit was discarded.
    #[error("Version conflict on {record}: expected {expected}, but current is {current}")]
    VersionConflict {
        /// Human-readable description of the record that moved
        record: String,
        /// The version the commit expected
        expected: RecordVersion,
        /// The version actually found
        current: RecordVersion,
    },

    /// An unexpected adapter failure.
    #[error("Internal storage error: {0}")]
    Internal(String),
}

/// Ownership violation: the requester is not the owner of the resource.
///
/// Produced by the shared capability guard in [`crate::access`]; the
/// guarded resource is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Permission denied: resource is owned by {owner}, not {requester}")]
pub struct PermissionDenied {
    /// The user who attempted the operation
    pub requester: UserId,
    /// The user who owns the resource
    pub owner: UserId,
}

/// Result alias for checkout.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Failures of the checkout transactor. Any of these means the unit of
/// work was rolled back in full: no order, no stock change, cart intact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// The user has no cart, or the cart holds no items.
    #[error("Cart is empty, there is nothing to check out")]
    EmptyCart,

    /// A cart item asked for more units than the product has on hand.
    /// Reported for the first shortage found; later items go unexamined.
    #[error("Insufficient stock for product {product}: requested {requested}, available {available}")]
    InsufficientStock {
        /// The product that ran short
        product: ProductId,
        /// Units the cart asked for
        requested: Quantity,
        /// Units actually on hand
        available: StockLevel,
    },

    /// The storage layer failed (including conflict retries running out).
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures of cart mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The requested quantity exceeds the product's available stock.
    #[error("Quantity {requested} exceeds the available stock of {available}")]
    InvalidQuantity {
        /// Units the caller asked for
        requested: Quantity,
        /// Units actually on hand
        available: StockLevel,
    },

    /// The item belongs to another user's cart.
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),

    /// A domain value could not be produced (e.g. a cart total overflowed).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The storage layer failed or a referenced record was missing.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures of order-history reads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// The order belongs to another user.
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),

    /// The storage layer failed or the order was missing.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures of comment operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommentError {
    /// Only the author may edit or delete a comment.
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),

    /// The storage layer failed or a referenced record was missing.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures of supplier-contact operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    /// The user has no linked supplier account.
    #[error("User {0} is not a registered supplier")]
    NotASupplier(UserId),

    /// The storage layer failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
