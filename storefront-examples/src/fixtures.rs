//! Shared catalog fixtures for examples and tests.

use storefront::model::{Product, Supplier};
use storefront::store::StorefrontStore;
use storefront::types::{
    Category, CompanyName, ImageRef, Money, ProductName, StockLevel, UserId,
};
use storefront_memory::InMemoryStorefrontStore;

/// Builds a product record with the given shelf data.
pub fn gaming_product(name: &str, category: Category, price_cents: u64, stock: u32) -> Product {
    Product::new(
        ProductName::try_new(name).expect("fixture product names are valid"),
        category,
        Money::from_cents(price_cents).expect("fixture prices are valid"),
        StockLevel::new(stock),
        format!("{name} for serious players"),
        ImageRef::try_new(format!(
            "products/{}.png",
            name.to_lowercase().replace(' ', "-")
        ))
        .expect("fixture image refs are valid"),
        None,
    )
}

/// A seeded store plus the products it was seeded with.
#[derive(Debug, Clone)]
pub struct DemoCatalog {
    /// The in-memory store, sharable by cloning
    pub store: InMemoryStorefrontStore,
    /// Wireless headset, PlayStation, $59.99, 5 in stock
    pub headset: Product,
    /// Racing chair, PC, $189.50, 2 in stock
    pub racing_chair: Product,
    /// Charging dock, Nintendo, $24.00, 10 in stock
    pub dock: Product,
}

/// Seeds an in-memory store with the demo catalog.
pub async fn seed() -> DemoCatalog {
    let store = InMemoryStorefrontStore::new();

    let headset = gaming_product("Wireless Headset", Category::PlayStation, 5999, 5);
    let racing_chair = gaming_product("Racing Chair", Category::Pc, 18950, 2);
    let dock = gaming_product("Charging Dock", Category::Nintendo, 2400, 10);

    for product in [&headset, &racing_chair, &dock] {
        store
            .insert_product(product.clone())
            .await
            .expect("seeding an empty store cannot fail");
    }

    DemoCatalog {
        store,
        headset,
        racing_chair,
        dock,
    }
}

/// Registers a supplier account for `user` and returns it.
pub async fn register_supplier(store: &InMemoryStorefrontStore, user: UserId) -> Supplier {
    let supplier = Supplier::new(
        user,
        CompanyName::try_new("Peripherals SA").expect("fixture company name is valid"),
        "Wholesale gaming peripherals".to_string(),
    );
    store
        .insert_supplier(supplier.clone())
        .await
        .expect("seeding an empty store cannot fail");
    supplier
}
