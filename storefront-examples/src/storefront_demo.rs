//! Storefront demo
//!
//! Walks the whole storefront flow against the in-memory store:
//! browse the catalog, fill a cart, check out, and read the order back,
//! with a comment and a supplier contact on the side.

use anyhow::Result;
use storefront::types::{Category, CommentText, ContactMessage, FileRef, Quantity, UserId};
use storefront::{
    CartService, Catalog, CheckoutProcessor, CommentService, ContactService, OrderHistory,
    SiteConfig,
};
use storefront_examples::fixtures;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = SiteConfig::new(
        "Game Center",
        "A store specialized in accessories and furniture for gamers.",
    );
    info!(site = config.site_name(), "starting storefront demo");

    let catalog_seed = fixtures::seed().await;
    let store = catalog_seed.store.clone();

    let catalog = Catalog::new(store.clone());
    let carts = CartService::new(store.clone());
    let checkout = CheckoutProcessor::new(store.clone());
    let history = OrderHistory::new(store.clone());
    let comments = CommentService::new(store.clone());
    let contact = ContactService::new(store.clone());

    // Browse the landing page and one category.
    for product in catalog.featured(6).await? {
        info!(name = %product.name, price = %product.price, "featured product");
    }
    let playstation = catalog
        .products_in_category(Category::PlayStation)
        .await?;
    info!(count = playstation.len(), "PlayStation category");

    // A customer fills their cart; adding the headset twice accumulates.
    let customer = UserId::generate();
    carts
        .add(customer, catalog_seed.headset.id, Quantity::new(1)?)
        .await?;
    carts
        .add(customer, catalog_seed.headset.id, Quantity::new(1)?)
        .await?;
    carts
        .add(customer, catalog_seed.dock.id, Quantity::new(3)?)
        .await?;

    let view = carts.view(customer).await?;
    info!(items = view.entries.len(), total = %view.total, "cart ready");

    // Checkout converts the cart into an order atomically.
    let order = checkout.checkout(customer).await?;
    for line in history.lines(customer, order.id).await? {
        info!(
            product = %line.product,
            quantity = %line.quantity,
            unit_price = %line.unit_price,
            "order line"
        );
    }

    let headset_after = catalog.product(catalog_seed.headset.id).await?;
    info!(stock = %headset_after.stock, "headset stock after checkout");

    // The customer leaves a comment.
    comments
        .post(
            customer,
            catalog_seed.headset.id,
            CommentText::try_new("Comfortable even after long sessions.")?,
        )
        .await?;

    // A supplier sends a price list.
    let supplier_user = UserId::generate();
    fixtures::register_supplier(&store, supplier_user).await;
    contact
        .submit(
            supplier_user,
            ContactMessage::try_new("Updated wholesale price list attached.")?,
            FileRef::try_new("contacts/price-list-2024.pdf")?,
        )
        .await?;

    info!("storefront demo finished");
    Ok(())
}
