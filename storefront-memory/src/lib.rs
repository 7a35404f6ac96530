//! In-memory adapter for the storefront storage port.
//!
//! This crate provides an in-memory implementation of the
//! `StorefrontStore` trait from the storefront crate, useful for testing
//! and development scenarios where persistence is not required.
//!
//! The adapter keeps one table per entity behind a single `RwLock`, plus a
//! version per mutable record (products, and carts including their item
//! set). `commit_checkout` verifies every expected version before applying
//! any write, so a commit is observably all-or-nothing and a stale plan is
//! rejected without side effects.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::significant_drop_tightening)]

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use storefront::errors::{StoreError, StoreResult};
use storefront::model::{
    Cart, CartItem, Comment, Order, OrderLine, Product, Supplier, SupplierContact,
};
use storefront::store::{CheckoutPlan, CheckoutSnapshot, StorefrontStore, VersionedProduct};
use storefront::types::{
    CartId, CartItemId, Category, CommentId, CommentText, ContactId, Money, OrderId, OrderLineId,
    ProductId, Quantity, RecordVersion, StockLevel, SupplierId, UserId,
};

#[derive(Debug, Default)]
struct Tables {
    products: HashMap<ProductId, Product>,
    product_versions: HashMap<ProductId, RecordVersion>,
    suppliers: HashMap<SupplierId, Supplier>,
    contacts: HashMap<ContactId, SupplierContact>,
    comments: HashMap<CommentId, Comment>,
    carts: HashMap<CartId, Cart>,
    cart_versions: HashMap<CartId, RecordVersion>,
    cart_items: HashMap<CartItemId, CartItem>,
    orders: HashMap<OrderId, Order>,
    order_lines: HashMap<OrderLineId, OrderLine>,
}

impl Tables {
    fn bump_cart_version(&mut self, cart: CartId) {
        let version = self
            .cart_versions
            .get(&cart)
            .copied()
            .unwrap_or_else(RecordVersion::initial);
        self.cart_versions.insert(cart, version.next());
    }

    fn bump_product_version(&mut self, product: ProductId) {
        let version = self
            .product_versions
            .get(&product)
            .copied()
            .unwrap_or_else(RecordVersion::initial);
        self.product_versions.insert(product, version.next());
    }
}

/// Thread-safe in-memory storefront store for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorefrontStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStorefrontStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
        }
    }
}

fn newest_first<T, K: Ord>(records: &mut [T], key: impl Fn(&T) -> K) {
    records.sort_by_key(|record| std::cmp::Reverse(key(record)));
}

#[async_trait]
impl StorefrontStore for InMemoryStorefrontStore {
    async fn insert_product(&self, product: Product) -> StoreResult<()> {
        let mut tables = self.tables.write().expect("RwLock poisoned");
        tables
            .product_versions
            .insert(product.id, RecordVersion::initial());
        tables.products.insert(product.id, product);
        Ok(())
    }

    async fn product(&self, id: ProductId) -> StoreResult<Product> {
        let tables = self.tables.read().expect("RwLock poisoned");
        tables
            .products
            .get(&id)
            .cloned()
            .ok_or(StoreError::ProductNotFound(id))
    }

    async fn all_products(&self) -> StoreResult<Vec<Product>> {
        let tables = self.tables.read().expect("RwLock poisoned");
        let mut products: Vec<Product> = tables.products.values().cloned().collect();
        products.sort_by_key(|product| product.id);
        Ok(products)
    }

    async fn products_in_category(&self, category: Category) -> StoreResult<Vec<Product>> {
        let tables = self.tables.read().expect("RwLock poisoned");
        let mut products: Vec<Product> = tables
            .products
            .values()
            .filter(|product| product.category == category)
            .cloned()
            .collect();
        products.sort_by_key(|product| product.id);
        Ok(products)
    }

    async fn update_product_price(&self, id: ProductId, price: Money) -> StoreResult<Product> {
        let mut tables = self.tables.write().expect("RwLock poisoned");
        let product = tables
            .products
            .get_mut(&id)
            .ok_or(StoreError::ProductNotFound(id))?;
        product.price = price;
        let updated = product.clone();
        tables.bump_product_version(id);
        Ok(updated)
    }

    async fn insert_supplier(&self, supplier: Supplier) -> StoreResult<()> {
        let mut tables = self.tables.write().expect("RwLock poisoned");
        tables.suppliers.insert(supplier.id, supplier);
        Ok(())
    }

    async fn supplier_for_user(&self, user: UserId) -> StoreResult<Option<Supplier>> {
        let tables = self.tables.read().expect("RwLock poisoned");
        Ok(tables
            .suppliers
            .values()
            .find(|supplier| supplier.user == user)
            .cloned())
    }

    async fn insert_contact(&self, contact: SupplierContact) -> StoreResult<()> {
        let mut tables = self.tables.write().expect("RwLock poisoned");
        tables.contacts.insert(contact.id, contact);
        Ok(())
    }

    async fn contacts_for_supplier(
        &self,
        supplier: SupplierId,
    ) -> StoreResult<Vec<SupplierContact>> {
        let tables = self.tables.read().expect("RwLock poisoned");
        let mut contacts: Vec<SupplierContact> = tables
            .contacts
            .values()
            .filter(|contact| contact.supplier == supplier)
            .cloned()
            .collect();
        newest_first(&mut contacts, |contact| (contact.submitted_at, contact.id));
        Ok(contacts)
    }

    async fn insert_comment(&self, comment: Comment) -> StoreResult<()> {
        let mut tables = self.tables.write().expect("RwLock poisoned");
        tables.comments.insert(comment.id, comment);
        Ok(())
    }

    async fn comment(&self, id: CommentId) -> StoreResult<Comment> {
        let tables = self.tables.read().expect("RwLock poisoned");
        tables
            .comments
            .get(&id)
            .cloned()
            .ok_or(StoreError::CommentNotFound(id))
    }

    async fn comments_for_product(&self, product: ProductId) -> StoreResult<Vec<Comment>> {
        let tables = self.tables.read().expect("RwLock poisoned");
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|comment| comment.product == product)
            .cloned()
            .collect();
        newest_first(&mut comments, |comment| (comment.posted_at, comment.id));
        Ok(comments)
    }

    async fn update_comment_text(&self, id: CommentId, text: CommentText) -> StoreResult<Comment> {
        let mut tables = self.tables.write().expect("RwLock poisoned");
        let comment = tables
            .comments
            .get_mut(&id)
            .ok_or(StoreError::CommentNotFound(id))?;
        comment.text = text;
        Ok(comment.clone())
    }

    async fn delete_comment(&self, id: CommentId) -> StoreResult<()> {
        let mut tables = self.tables.write().expect("RwLock poisoned");
        tables
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::CommentNotFound(id))
    }

    async fn open_cart(&self, user: UserId) -> StoreResult<Cart> {
        let mut tables = self.tables.write().expect("RwLock poisoned");
        if let Some(cart) = tables.carts.values().find(|cart| cart.user == user) {
            return Ok(cart.clone());
        }
        let cart = Cart::new(user);
        tables.cart_versions.insert(cart.id, RecordVersion::initial());
        tables.carts.insert(cart.id, cart.clone());
        Ok(cart)
    }

    async fn cart_for_user(&self, user: UserId) -> StoreResult<Option<Cart>> {
        let tables = self.tables.read().expect("RwLock poisoned");
        Ok(tables.carts.values().find(|cart| cart.user == user).cloned())
    }

    async fn cart(&self, id: CartId) -> StoreResult<Cart> {
        let tables = self.tables.read().expect("RwLock poisoned");
        tables
            .carts
            .get(&id)
            .cloned()
            .ok_or(StoreError::CartNotFound(id))
    }

    async fn cart_items(&self, cart: CartId) -> StoreResult<Vec<CartItem>> {
        let tables = self.tables.read().expect("RwLock poisoned");
        let mut items: Vec<CartItem> = tables
            .cart_items
            .values()
            .filter(|item| item.cart == cart)
            .cloned()
            .collect();
        items.sort_by_key(|item| item.id);
        Ok(items)
    }

    async fn cart_item(&self, id: CartItemId) -> StoreResult<CartItem> {
        let tables = self.tables.read().expect("RwLock poisoned");
        tables
            .cart_items
            .get(&id)
            .cloned()
            .ok_or(StoreError::CartItemNotFound(id))
    }

    async fn upsert_cart_item(
        &self,
        cart: CartId,
        product: ProductId,
        quantity: Quantity,
    ) -> StoreResult<CartItem> {
        let mut tables = self.tables.write().expect("RwLock poisoned");
        if !tables.carts.contains_key(&cart) {
            return Err(StoreError::CartNotFound(cart));
        }

        let existing = tables
            .cart_items
            .values()
            .find(|item| item.cart == cart && item.product == product)
            .map(|item| item.id);

        let item = if let Some(id) = existing {
            let item = tables
                .cart_items
                .get_mut(&id)
                .ok_or(StoreError::CartItemNotFound(id))?;
            item.quantity = item
                .quantity
                .checked_add(quantity)
                .map_err(|err| StoreError::Internal(err.to_string()))?;
            item.clone()
        } else {
            let item = CartItem::new(cart, product, quantity);
            tables.cart_items.insert(item.id, item.clone());
            item
        };

        tables.bump_cart_version(cart);
        Ok(item)
    }

    async fn set_cart_item_quantity(
        &self,
        id: CartItemId,
        quantity: Quantity,
    ) -> StoreResult<CartItem> {
        let mut tables = self.tables.write().expect("RwLock poisoned");
        let item = tables
            .cart_items
            .get_mut(&id)
            .ok_or(StoreError::CartItemNotFound(id))?;
        item.quantity = quantity;
        let updated = item.clone();
        tables.bump_cart_version(updated.cart);
        Ok(updated)
    }

    async fn remove_cart_item(&self, id: CartItemId) -> StoreResult<()> {
        let mut tables = self.tables.write().expect("RwLock poisoned");
        let item = tables
            .cart_items
            .remove(&id)
            .ok_or(StoreError::CartItemNotFound(id))?;
        tables.bump_cart_version(item.cart);
        Ok(())
    }

    async fn order(&self, id: OrderId) -> StoreResult<Order> {
        let tables = self.tables.read().expect("RwLock poisoned");
        tables
            .orders
            .get(&id)
            .cloned()
            .ok_or(StoreError::OrderNotFound(id))
    }

    async fn orders_for_user(&self, user: UserId) -> StoreResult<Vec<Order>> {
        let tables = self.tables.read().expect("RwLock poisoned");
        let mut orders: Vec<Order> = tables
            .orders
            .values()
            .filter(|order| order.user == user)
            .cloned()
            .collect();
        newest_first(&mut orders, |order| (order.placed_at, order.id));
        Ok(orders)
    }

    async fn order_lines(&self, order: OrderId) -> StoreResult<Vec<OrderLine>> {
        let tables = self.tables.read().expect("RwLock poisoned");
        let mut lines: Vec<OrderLine> = tables
            .order_lines
            .values()
            .filter(|line| line.order == order)
            .cloned()
            .collect();
        lines.sort_by_key(|line| line.id);
        Ok(lines)
    }

    async fn checkout_snapshot(&self, user: UserId) -> StoreResult<Option<CheckoutSnapshot>> {
        let tables = self.tables.read().expect("RwLock poisoned");
        let Some(cart) = tables.carts.values().find(|cart| cart.user == user).cloned() else {
            return Ok(None);
        };
        let cart_version = tables
            .cart_versions
            .get(&cart.id)
            .copied()
            .unwrap_or_else(RecordVersion::initial);

        let mut items: Vec<CartItem> = tables
            .cart_items
            .values()
            .filter(|item| item.cart == cart.id)
            .cloned()
            .collect();
        items.sort_by_key(|item| item.id);

        let mut products = HashMap::new();
        for item in &items {
            let product = tables.products.get(&item.product).cloned().ok_or_else(|| {
                StoreError::Internal(format!(
                    "cart item {} references missing product {}",
                    item.id, item.product
                ))
            })?;
            let version = tables
                .product_versions
                .get(&item.product)
                .copied()
                .unwrap_or_else(RecordVersion::initial);
            products.insert(item.product, VersionedProduct { product, version });
        }

        Ok(Some(CheckoutSnapshot {
            cart,
            cart_version,
            items,
            products,
        }))
    }

    async fn commit_checkout(&self, plan: CheckoutPlan) -> StoreResult<()> {
        let mut tables = self.tables.write().expect("RwLock poisoned");

        // Verify every expected version before touching anything, so a
        // stale plan is rejected with zero side effects.
        let current_cart_version = tables
            .cart_versions
            .get(&plan.cart)
            .copied()
            .ok_or(StoreError::CartNotFound(plan.cart))?;
        if current_cart_version != plan.expected_cart_version {
            return Err(StoreError::VersionConflict {
                record: format!("cart {}", plan.cart),
                expected: plan.expected_cart_version,
                current: current_cart_version,
            });
        }

        let mut new_stock: Vec<(ProductId, StockLevel)> = Vec::with_capacity(plan.decrements.len());
        for decrement in &plan.decrements {
            let product = tables
                .products
                .get(&decrement.product)
                .ok_or(StoreError::ProductNotFound(decrement.product))?;
            let current_version = tables
                .product_versions
                .get(&decrement.product)
                .copied()
                .unwrap_or_else(RecordVersion::initial);
            if current_version != decrement.expected_version {
                return Err(StoreError::VersionConflict {
                    record: format!("product {}", decrement.product),
                    expected: decrement.expected_version,
                    current: current_version,
                });
            }
            let remaining = product.stock.minus(decrement.quantity).ok_or_else(|| {
                StoreError::Internal(format!(
                    "stock underflow on product {}: plan was not validated",
                    decrement.product
                ))
            })?;
            new_stock.push((decrement.product, remaining));
        }

        // All versions match and every decrement is covered; apply the
        // whole write set.
        for (product_id, remaining) in new_stock {
            if let Some(product) = tables.products.get_mut(&product_id) {
                product.stock = remaining;
            }
            tables.bump_product_version(product_id);
        }

        tables.orders.insert(plan.order.id, plan.order);
        for line in plan.lines {
            tables.order_lines.insert(line.id, line);
        }

        tables.cart_items.retain(|_, item| item.cart != plan.cart);
        tables.bump_cart_version(plan.cart);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use storefront::model::Order;
    use storefront::store::StockDecrement;
    use storefront::types::{ImageRef, ProductName};

    fn product(stock: u32, price_cents: u64) -> Product {
        Product::new(
            ProductName::try_new("Test Product").unwrap(),
            Category::Other,
            Money::from_cents(price_cents).unwrap(),
            StockLevel::new(stock),
            "A product used by the store tests".to_string(),
            ImageRef::try_new("products/test.png").unwrap(),
            None,
        )
    }

    fn qty(value: u32) -> Quantity {
        Quantity::new(value).unwrap()
    }

    #[tokio::test]
    async fn test_new_store_is_empty() {
        let store = InMemoryStorefrontStore::new();
        assert!(store.all_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clone_shares_storage() {
        let store1 = InMemoryStorefrontStore::new();
        let store2 = store1.clone();
        assert!(Arc::ptr_eq(&store1.tables, &store2.tables));

        store1.insert_product(product(3, 999)).await.unwrap();
        assert_eq!(store2.all_products().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_open_cart_is_get_or_create() {
        let store = InMemoryStorefrontStore::new();
        let user = UserId::generate();

        let first = store.open_cart(user).await.unwrap();
        let second = store.open_cart(user).await.unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_upsert_accumulates_into_one_item() {
        let store = InMemoryStorefrontStore::new();
        let item = product(10, 500);
        let product_id = item.id;
        store.insert_product(item).await.unwrap();

        let user = UserId::generate();
        let cart = store.open_cart(user).await.unwrap();

        store
            .upsert_cart_item(cart.id, product_id, qty(2))
            .await
            .unwrap();
        let merged = store
            .upsert_cart_item(cart.id, product_id, qty(3))
            .await
            .unwrap();

        assert_eq!(merged.quantity, qty(5));
        let items = store.cart_items(cart.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, qty(5));
    }

    #[tokio::test]
    async fn test_category_filter_only_returns_matches() {
        let store = InMemoryStorefrontStore::new();
        let mut console_stand = product(3, 2500);
        console_stand.category = Category::PlayStation;
        store.insert_product(console_stand).await.unwrap();
        store.insert_product(product(3, 1500)).await.unwrap();

        let matches = store
            .products_in_category(Category::PlayStation)
            .await
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].category, Category::PlayStation);
    }

    #[tokio::test]
    async fn test_commit_applies_the_whole_write_set() {
        let store = InMemoryStorefrontStore::new();
        let stocked = product(5, 1000);
        let product_id = stocked.id;
        store.insert_product(stocked).await.unwrap();

        let user = UserId::generate();
        let cart = store.open_cart(user).await.unwrap();
        store
            .upsert_cart_item(cart.id, product_id, qty(3))
            .await
            .unwrap();

        let snapshot = store.checkout_snapshot(user).await.unwrap().unwrap();
        let order = Order::new(user);
        let entry = snapshot.product(product_id).unwrap().clone();
        let plan = CheckoutPlan {
            order: order.clone(),
            lines: vec![OrderLine::new(
                order.id,
                product_id,
                qty(3),
                entry.product.price,
            )],
            decrements: vec![StockDecrement {
                product: product_id,
                quantity: qty(3),
                expected_version: entry.version,
            }],
            cart: cart.id,
            expected_cart_version: snapshot.cart_version,
        };

        store.commit_checkout(plan).await.unwrap();

        assert_eq!(
            store.product(product_id).await.unwrap().stock,
            StockLevel::new(2)
        );
        assert_eq!(store.order(order.id).await.unwrap().user, user);
        assert_eq!(store.order_lines(order.id).await.unwrap().len(), 1);
        assert!(store.cart_items(cart.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_rejects_stale_product_version_without_side_effects() {
        let store = InMemoryStorefrontStore::new();
        let stocked = product(5, 1000);
        let product_id = stocked.id;
        store.insert_product(stocked).await.unwrap();

        let user = UserId::generate();
        let cart = store.open_cart(user).await.unwrap();
        store
            .upsert_cart_item(cart.id, product_id, qty(2))
            .await
            .unwrap();

        let snapshot = store.checkout_snapshot(user).await.unwrap().unwrap();

        // The product moves after the snapshot was taken.
        store
            .update_product_price(product_id, Money::new(dec!(42.00)).unwrap())
            .await
            .unwrap();

        let order = Order::new(user);
        let entry = snapshot.product(product_id).unwrap().clone();
        let plan = CheckoutPlan {
            order: order.clone(),
            lines: vec![OrderLine::new(
                order.id,
                product_id,
                qty(2),
                entry.product.price,
            )],
            decrements: vec![StockDecrement {
                product: product_id,
                quantity: qty(2),
                expected_version: entry.version,
            }],
            cart: cart.id,
            expected_cart_version: snapshot.cart_version,
        };

        let result = store.commit_checkout(plan).await;
        assert!(matches!(
            result,
            Err(StoreError::VersionConflict { .. })
        ));

        // Nothing was applied.
        assert_eq!(
            store.product(product_id).await.unwrap().stock,
            StockLevel::new(5)
        );
        assert!(matches!(
            store.order(order.id).await,
            Err(StoreError::OrderNotFound(_))
        ));
        assert_eq!(store.cart_items(cart.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_commit_rejects_stale_cart_version() {
        let store = InMemoryStorefrontStore::new();
        let stocked = product(5, 1000);
        let product_id = stocked.id;
        store.insert_product(stocked).await.unwrap();

        let user = UserId::generate();
        let cart = store.open_cart(user).await.unwrap();
        store
            .upsert_cart_item(cart.id, product_id, qty(2))
            .await
            .unwrap();

        let snapshot = store.checkout_snapshot(user).await.unwrap().unwrap();

        // A second add moves the cart after the snapshot.
        store
            .upsert_cart_item(cart.id, product_id, qty(1))
            .await
            .unwrap();

        let order = Order::new(user);
        let entry = snapshot.product(product_id).unwrap().clone();
        let plan = CheckoutPlan {
            order,
            lines: vec![],
            decrements: vec![StockDecrement {
                product: product_id,
                quantity: qty(2),
                expected_version: entry.version,
            }],
            cart: cart.id,
            expected_cart_version: snapshot.cart_version,
        };

        assert!(matches!(
            store.commit_checkout(plan).await,
            Err(StoreError::VersionConflict { .. })
        ));
    }

    #[tokio::test]
    async fn test_set_and_remove_cart_item() {
        let store = InMemoryStorefrontStore::new();
        let stocked = product(9, 750);
        let product_id = stocked.id;
        store.insert_product(stocked).await.unwrap();

        let user = UserId::generate();
        let cart = store.open_cart(user).await.unwrap();
        let item = store
            .upsert_cart_item(cart.id, product_id, qty(1))
            .await
            .unwrap();

        let updated = store.set_cart_item_quantity(item.id, qty(4)).await.unwrap();
        assert_eq!(updated.quantity, qty(4));

        store.remove_cart_item(item.id).await.unwrap();
        assert!(matches!(
            store.cart_item(item.id).await,
            Err(StoreError::CartItemNotFound(_))
        ));
        assert!(matches!(
            store.remove_cart_item(item.id).await,
            Err(StoreError::CartItemNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_comments_read_newest_first() {
        let store = InMemoryStorefrontStore::new();
        let stocked = product(1, 100);
        let product_id = stocked.id;
        store.insert_product(stocked).await.unwrap();

        let author = UserId::generate();
        for text in ["first", "second", "third"] {
            let comment = Comment::new(
                product_id,
                author,
                storefront::types::CommentText::try_new(text).unwrap(),
            );
            store.insert_comment(comment).await.unwrap();
        }

        let comments = store.comments_for_product(product_id).await.unwrap();
        assert_eq!(comments.len(), 3);
        assert!(comments
            .windows(2)
            .all(|pair| (pair[0].posted_at, pair[0].id) >= (pair[1].posted_at, pair[1].id)));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_comment_fail() {
        let store = InMemoryStorefrontStore::new();
        let ghost = CommentId::generate();
        assert!(matches!(
            store
                .update_comment_text(ghost, CommentText::try_new("x").unwrap())
                .await,
            Err(StoreError::CommentNotFound(_))
        ));
        assert!(matches!(
            store.delete_comment(ghost).await,
            Err(StoreError::CommentNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_snapshot_returns_none_without_a_cart() {
        let store = InMemoryStorefrontStore::new();
        assert!(store
            .checkout_snapshot(UserId::generate())
            .await
            .unwrap()
            .is_none());
    }
}
