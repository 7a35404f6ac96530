//! Storage port for the storefront.
//!
//! This module defines the [`StorefrontStore`] trait that serves as the port
//! interface for persistence adapters. The trait is backend-independent:
//! create/read/update/delete per entity keyed by id, filtered reads, and two
//! operations with stronger contracts — the atomic cart-item upsert and the
//! checkout unit of work.
//!
//! # Concurrency model
//!
//! Mutable records (products and carts) carry a [`RecordVersion`] that bumps
//! on every mutation; for a cart, mutations of its item set count. Checkout
//! reads a [`CheckoutSnapshot`] carrying those versions, validates against
//! it, and submits a [`CheckoutPlan`] that names the versions it observed.
//! The adapter must verify every named version and apply the whole plan
//! atomically — or reject it with [`StoreError::VersionConflict`]
//! (see `crate::errors::StoreError`) and apply nothing. A successful commit
//! therefore proves the stock figures the transactor validated were still
//! current at commit time, which is what keeps competing decrements of the
//! same product from ever driving stock negative.

use crate::errors::StoreResult;
use crate::model::{Cart, CartItem, Comment, Order, OrderLine, Product, Supplier, SupplierContact};
use crate::types::{
    CartId, CartItemId, Category, CommentId, CommentText, Money, OrderId, ProductId, Quantity,
    RecordVersion, SupplierId, UserId,
};
use async_trait::async_trait;
use std::collections::HashMap;

/// A product together with the version at which it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedProduct {
    /// The product record
    pub product: Product,
    /// The record version observed at read time
    pub version: RecordVersion,
}

/// Everything checkout needs to read, captured in one consistent view:
/// the user's cart, its items, and every referenced product, each with the
/// version it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSnapshot {
    /// The user's cart
    pub cart: Cart,
    /// Version of the cart (bumped by any item mutation)
    pub cart_version: RecordVersion,
    /// The cart's items
    pub items: Vec<CartItem>,
    /// Referenced products keyed by id
    pub products: HashMap<ProductId, VersionedProduct>,
}

impl CheckoutSnapshot {
    /// Whether the cart holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up a referenced product.
    pub fn product(&self, id: ProductId) -> Option<&VersionedProduct> {
        self.products.get(&id)
    }
}

/// One planned stock decrement within a checkout commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockDecrement {
    /// The product to decrement
    pub product: ProductId,
    /// Units to subtract
    pub quantity: Quantity,
    /// The product version the plan was validated against
    pub expected_version: RecordVersion,
}

/// The full write set of one checkout, applied atomically or not at all:
/// insert the order and its lines, decrement each product's stock, and
/// delete every item of the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPlan {
    /// The order to create
    pub order: Order,
    /// The order's lines, prices already captured
    pub lines: Vec<OrderLine>,
    /// Stock decrements, one per line
    pub decrements: Vec<StockDecrement>,
    /// The cart to empty
    pub cart: CartId,
    /// The cart version the plan was built from
    pub expected_cart_version: RecordVersion,
}

/// Port interface to the persistent store.
///
/// Adapters are cheap-to-clone handles onto shared state; every method
/// that mutates a single record is individually atomic. `commit_checkout`
/// and `upsert_cart_item` carry multi-record atomicity contracts described
/// on the methods.
#[async_trait]
pub trait StorefrontStore: Send + Sync {
    // ------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------

    /// Adds a product to the catalog at version 0.
    async fn insert_product(&self, product: Product) -> StoreResult<()>;

    /// Reads one product by id.
    async fn product(&self, id: ProductId) -> StoreResult<Product>;

    /// Reads the whole catalog, ordered by product id.
    async fn all_products(&self) -> StoreResult<Vec<Product>>;

    /// Reads the products of one category, ordered by product id.
    async fn products_in_category(&self, category: Category) -> StoreResult<Vec<Product>>;

    /// Replaces a product's unit price, bumping its version.
    ///
    /// Order lines written earlier are untouched: they carry their own
    /// captured price.
    async fn update_product_price(&self, id: ProductId, price: Money) -> StoreResult<Product>;

    // ------------------------------------------------------------------
    // Suppliers and contact submissions
    // ------------------------------------------------------------------

    /// Registers a supplier account.
    async fn insert_supplier(&self, supplier: Supplier) -> StoreResult<()>;

    /// Finds the supplier linked to a user identity, if any.
    async fn supplier_for_user(&self, user: UserId) -> StoreResult<Option<Supplier>>;

    /// Records a contact submission.
    async fn insert_contact(&self, contact: SupplierContact) -> StoreResult<()>;

    /// Reads a supplier's submissions, newest first.
    async fn contacts_for_supplier(&self, supplier: SupplierId)
        -> StoreResult<Vec<SupplierContact>>;

    // ------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------

    /// Stores a new comment.
    async fn insert_comment(&self, comment: Comment) -> StoreResult<()>;

    /// Reads one comment by id.
    async fn comment(&self, id: CommentId) -> StoreResult<Comment>;

    /// Reads a product's comments, newest first.
    async fn comments_for_product(&self, product: ProductId) -> StoreResult<Vec<Comment>>;

    /// Replaces a comment's text, returning the updated record.
    async fn update_comment_text(&self, id: CommentId, text: CommentText) -> StoreResult<Comment>;

    /// Deletes a comment.
    async fn delete_comment(&self, id: CommentId) -> StoreResult<()>;

    // ------------------------------------------------------------------
    // Carts
    // ------------------------------------------------------------------

    /// Returns the user's cart, creating an empty one if none exists.
    async fn open_cart(&self, user: UserId) -> StoreResult<Cart>;

    /// Finds the user's cart without creating one.
    async fn cart_for_user(&self, user: UserId) -> StoreResult<Option<Cart>>;

    /// Reads one cart by id.
    async fn cart(&self, id: CartId) -> StoreResult<Cart>;

    /// Reads a cart's items, ordered by item id.
    async fn cart_items(&self, cart: CartId) -> StoreResult<Vec<CartItem>>;

    /// Reads one cart item by id.
    async fn cart_item(&self, id: CartItemId) -> StoreResult<CartItem>;

    /// Upsert-with-merge on the (cart, product) natural key: inserts a new
    /// item with the given quantity, or adds the quantity to the existing
    /// item. One atomic operation — concurrent adds of the same product by
    /// the same user must both land, never racing a read-then-write.
    async fn upsert_cart_item(
        &self,
        cart: CartId,
        product: ProductId,
        quantity: Quantity,
    ) -> StoreResult<CartItem>;

    /// Overwrites an item's quantity. Bounds are the caller's business
    /// rule; the store only requires the item to exist.
    async fn set_cart_item_quantity(
        &self,
        id: CartItemId,
        quantity: Quantity,
    ) -> StoreResult<CartItem>;

    /// Deletes a cart item unconditionally.
    async fn remove_cart_item(&self, id: CartItemId) -> StoreResult<()>;

    // ------------------------------------------------------------------
    // Orders
    // ------------------------------------------------------------------

    /// Reads one order by id.
    async fn order(&self, id: OrderId) -> StoreResult<Order>;

    /// Reads a user's orders, newest first.
    async fn orders_for_user(&self, user: UserId) -> StoreResult<Vec<Order>>;

    /// Reads an order's lines, ordered by line id.
    async fn order_lines(&self, order: OrderId) -> StoreResult<Vec<OrderLine>>;

    // ------------------------------------------------------------------
    // Checkout unit of work
    // ------------------------------------------------------------------

    /// Captures the checkout read set for a user: cart, items, referenced
    /// products, and the versions of all of them. Returns `None` when the
    /// user has no cart.
    async fn checkout_snapshot(&self, user: UserId) -> StoreResult<Option<CheckoutSnapshot>>;

    /// Applies a checkout plan atomically.
    ///
    /// The adapter must first verify the expected cart version and every
    /// expected product version, then — only if all match — insert the
    /// order and lines, apply the stock decrements, and delete the cart's
    /// items, all as one unit of work. On any mismatch the commit fails
    /// with [`StoreError::VersionConflict`](crate::errors::StoreError) and
    /// no write is applied. No intermediate state may ever be observable
    /// by a concurrent reader.
    async fn commit_checkout(&self, plan: CheckoutPlan) -> StoreResult<()>;
}
