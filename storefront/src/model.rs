//! Entity records persisted by the storefront.
//!
//! Records are plain data with validated field types; constructors stamp
//! fresh time-ordered ids and creation timestamps. Orders and their lines
//! are immutable once written: the storage port exposes no update operation
//! for them, and each line carries the unit price captured at purchase time
//! so later catalog price changes never rewrite history.

use crate::types::{
    CartId, CartItemId, Category, CommentId, CommentText, CompanyName, ContactId, ContactMessage,
    DomainError, FileRef, ImageRef, Money, OrderId, OrderLineId, ProductId, ProductName, Quantity,
    StockLevel, SupplierId, Timestamp, UserId,
};
use serde::{Deserialize, Serialize};

/// A product in the catalog.
///
/// Stock and price are owned here; stock is only ever decremented through
/// the checkout unit of work, price only through catalog management.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier
    pub id: ProductId,
    /// Display name
    pub name: ProductName,
    /// Catalog category
    pub category: Category,
    /// Current unit price
    pub price: Money,
    /// Units on hand
    pub stock: StockLevel,
    /// Long-form description
    pub description: String,
    /// Blob-store reference to the product image
    pub image: ImageRef,
    /// Owning supplier, when the product is supplier-sourced
    pub supplier: Option<SupplierId>,
}

impl Product {
    /// Creates a new product with a fresh id.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: ProductName,
        category: Category,
        price: Money,
        stock: StockLevel,
        description: String,
        image: ImageRef,
        supplier: Option<SupplierId>,
    ) -> Self {
        Self {
            id: ProductId::generate(),
            name,
            category,
            price,
            stock,
            description,
            image,
            supplier,
        }
    }
}

/// A supplier account, linked one-to-one with a user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    /// Unique supplier identifier
    pub id: SupplierId,
    /// The user identity this supplier acts as
    pub user: UserId,
    /// Registered company name
    pub company_name: CompanyName,
    /// Free-form company description
    pub description: String,
}

impl Supplier {
    /// Creates a new supplier with a fresh id.
    pub fn new(user: UserId, company_name: CompanyName, description: String) -> Self {
        Self {
            id: SupplierId::generate(),
            user,
            company_name,
            description,
        }
    }
}

/// A contact submission from a supplier, with an uploaded-file reference.
///
/// Immutable once created; the file content lives in the external blob
/// store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierContact {
    /// Unique contact identifier
    pub id: ContactId,
    /// The submitting supplier
    pub supplier: SupplierId,
    /// What the supplier wrote
    pub message: ContactMessage,
    /// Blob-store reference to the uploaded file
    pub file: FileRef,
    /// When the submission was received
    pub submitted_at: Timestamp,
}

impl SupplierContact {
    /// Creates a new contact submission stamped with the current time.
    pub fn new(supplier: SupplierId, message: ContactMessage, file: FileRef) -> Self {
        Self {
            id: ContactId::generate(),
            supplier,
            message,
            file,
            submitted_at: Timestamp::now(),
        }
    }
}

/// A free-text comment attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique comment identifier
    pub id: CommentId,
    /// The product commented on
    pub product: ProductId,
    /// The authoring user; only the author may edit or delete
    pub author: UserId,
    /// Comment body
    pub text: CommentText,
    /// When the comment was posted
    pub posted_at: Timestamp,
}

impl Comment {
    /// Creates a new comment stamped with the current time.
    pub fn new(product: ProductId, author: UserId, text: CommentText) -> Self {
        Self {
            id: CommentId::generate(),
            product,
            author,
            text,
            posted_at: Timestamp::now(),
        }
    }
}

/// A shopping cart, one per user. May persist with zero items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Unique cart identifier
    pub id: CartId,
    /// Owning user
    pub user: UserId,
}

impl Cart {
    /// Creates a new empty cart for the user.
    pub fn new(user: UserId) -> Self {
        Self {
            id: CartId::generate(),
            user,
        }
    }
}

/// A line in a cart: one product and the desired quantity.
///
/// Unique per (cart, product) — adding the same product again accumulates
/// into the existing item rather than creating a second row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Unique cart item identifier
    pub id: CartItemId,
    /// The cart this item belongs to
    pub cart: CartId,
    /// The desired product
    pub product: ProductId,
    /// Desired quantity, always at least 1
    pub quantity: Quantity,
}

impl CartItem {
    /// Creates a new cart item with a fresh id.
    pub fn new(cart: CartId, product: ProductId, quantity: Quantity) -> Self {
        Self {
            id: CartItemId::generate(),
            cart,
            product,
            quantity,
        }
    }
}

/// A completed order. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier
    pub id: OrderId,
    /// The purchasing user
    pub user: UserId,
    /// When the order was placed
    pub placed_at: Timestamp,
}

impl Order {
    /// Creates a new order stamped with the current time.
    pub fn new(user: UserId) -> Self {
        Self {
            id: OrderId::generate(),
            user,
            placed_at: Timestamp::now(),
        }
    }
}

/// One product line within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Unique order line identifier
    pub id: OrderLineId,
    /// The order this line belongs to
    pub order: OrderId,
    /// The purchased product
    pub product: ProductId,
    /// Purchased quantity
    pub quantity: Quantity,
    /// Unit price captured at purchase time, decoupled from later catalog
    /// price changes
    pub unit_price: Money,
}

impl OrderLine {
    /// Creates a new order line with a fresh id.
    pub fn new(order: OrderId, product: ProductId, quantity: Quantity, unit_price: Money) -> Self {
        Self {
            id: OrderLineId::generate(),
            order,
            product,
            quantity,
            unit_price,
        }
    }

    /// Total for this line: unit price times quantity.
    pub fn line_total(&self) -> Result<Money, DomainError> {
        self.unit_price.multiply_by_quantity(self.quantity)
    }
}
