//! Read-only catalog browsing.

use crate::errors::StoreResult;
use crate::model::Product;
use crate::store::StorefrontStore;
use crate::types::{Category, ProductId};

/// Catalog lookups. Stock and price live on the product records; nothing
/// here mutates them.
#[derive(Debug, Clone)]
pub struct Catalog<S> {
    store: S,
}

impl<S> Catalog<S>
where
    S: StorefrontStore,
{
    /// Creates the catalog over a storage port.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Looks up one product.
    pub async fn product(&self, id: ProductId) -> StoreResult<Product> {
        self.store.product(id).await
    }

    /// The full catalog, ordered by product id.
    pub async fn all_products(&self) -> StoreResult<Vec<Product>> {
        self.store.all_products().await
    }

    /// The products of one category, ordered by product id.
    pub async fn products_in_category(&self, category: Category) -> StoreResult<Vec<Product>> {
        self.store.products_in_category(category).await
    }

    /// The first `limit` products, for the landing page.
    pub async fn featured(&self, limit: usize) -> StoreResult<Vec<Product>> {
        let mut products = self.store.all_products().await?;
        products.truncate(limit);
        Ok(products)
    }
}
