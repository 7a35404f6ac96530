//! `storefront` - e-commerce domain library with an atomic checkout
//!
//! This crate models a small storefront: catalog browsing, per-user
//! shopping carts, product comments, supplier contact submissions, and —
//! the one piece with a real correctness contract — a checkout that
//! converts a cart into an immutable order while decrementing stock as a
//! single all-or-nothing unit of work.
//!
//! Persistence is behind the [`store::StorefrontStore`] port; the
//! `storefront-memory` crate provides an in-memory adapter for tests and
//! development. The system boundary is in-process function calls — HTTP
//! routing, templates, authentication, and payment belong to external
//! collaborators.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront::{CartService, CheckoutProcessor, types::{Quantity, UserId}};
//! use storefront_memory::InMemoryStorefrontStore;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryStorefrontStore::new();
//! let carts = CartService::new(store.clone());
//! let checkout = CheckoutProcessor::new(store.clone());
//!
//! let user = UserId::generate();
//! carts.add(user, product_id, Quantity::new(2)?).await?;
//! let order = checkout.checkout(user).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod access;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod comments;
pub mod config;
pub mod contact;
pub mod errors;
pub mod model;
pub mod orders;
pub mod store;
pub mod types;

pub use cart::{CartEntry, CartService, CartView};
pub use catalog::Catalog;
pub use checkout::{CheckoutProcessor, RetryConfig};
pub use comments::CommentService;
pub use config::SiteConfig;
pub use contact::ContactService;
pub use errors::{
    CartError, CheckoutError, CheckoutResult, CommentError, ContactError, OrderError,
    PermissionDenied, StoreError, StoreResult,
};
pub use model::{Cart, CartItem, Comment, Order, OrderLine, Product, Supplier, SupplierContact};
pub use orders::OrderHistory;
pub use store::{CheckoutPlan, CheckoutSnapshot, StockDecrement, StorefrontStore, VersionedProduct};
