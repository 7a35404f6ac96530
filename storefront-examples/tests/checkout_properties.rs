//! Property tests for the checkout transactor.
//!
//! For randomized shelves and cart contents, a checkout either applies
//! completely — conservation holds for every product, prices are captured,
//! the cart empties — or fails on the first shortage in item order and
//! changes nothing at all.

use proptest::prelude::*;
use storefront::errors::CheckoutError;
use storefront::store::StorefrontStore;
use storefront::types::{Category, Quantity, UserId};
use storefront::{CartService, CheckoutProcessor};
use storefront_examples::fixtures;
use storefront_memory::InMemoryStorefrontStore;

fn qty(value: u32) -> Quantity {
    Quantity::new(value).expect("property quantities are positive")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn checkout_applies_completely_or_not_at_all(
        shelf in proptest::collection::vec((0u32..20, 1u32..25), 1..6)
    ) {
        tokio_test::block_on(async move {
            let store = InMemoryStorefrontStore::new();
            let carts = CartService::new(store.clone());
            let checkout = CheckoutProcessor::new(store.clone());
            let user = UserId::generate();

            let mut entries = Vec::new();
            for (index, (stock, requested)) in shelf.iter().enumerate() {
                let product = fixtures::gaming_product(
                    &format!("Shelf Item {index}"),
                    Category::Other,
                    999,
                    *stock,
                );
                store.insert_product(product.clone()).await.unwrap();
                let item = carts.add(user, product.id, qty(*requested)).await.unwrap();
                entries.push((product, *requested, item.id));
            }

            let all_covered = entries
                .iter()
                .all(|(product, requested, _)| product.stock.value() >= *requested);

            match checkout.checkout(user).await {
                Ok(order) => {
                    assert!(all_covered, "checkout succeeded despite a shortage");

                    // Conservation and price capture, per product.
                    let lines = store.order_lines(order.id).await.unwrap();
                    assert_eq!(lines.len(), entries.len());
                    for (product, requested, _) in &entries {
                        let after = store.product(product.id).await.unwrap();
                        assert_eq!(after.stock.value() + requested, product.stock.value());

                        let line = lines
                            .iter()
                            .find(|line| line.product == product.id)
                            .expect("one line per distinct product");
                        assert_eq!(line.quantity.value(), *requested);
                        assert_eq!(line.unit_price, product.price);
                    }

                    // The cart emptied.
                    let cart = store.cart_for_user(user).await.unwrap().unwrap();
                    assert!(store.cart_items(cart.id).await.unwrap().is_empty());
                }
                Err(CheckoutError::InsufficientStock { product, requested, available }) => {
                    assert!(!all_covered, "shortage reported from a fully covered cart");

                    // The reported shortage is the first uncovered entry in
                    // ascending item-id order.
                    let mut ordered = entries.clone();
                    ordered.sort_by_key(|(_, _, item_id)| *item_id);
                    let (expected_product, expected_requested, _) = ordered
                        .iter()
                        .find(|(product, requested, _)| product.stock.value() < *requested)
                        .expect("an uncovered entry exists");
                    assert_eq!(product, expected_product.id);
                    assert_eq!(requested.value(), *expected_requested);
                    assert_eq!(available, expected_product.stock);

                    // Nothing moved: stocks, cart, order log.
                    for (product, _, _) in &entries {
                        let after = store.product(product.id).await.unwrap();
                        assert_eq!(after.stock, product.stock);
                    }
                    let cart = store.cart_for_user(user).await.unwrap().unwrap();
                    assert_eq!(
                        store.cart_items(cart.id).await.unwrap().len(),
                        entries.len()
                    );
                    assert!(store.orders_for_user(user).await.unwrap().is_empty());
                }
                Err(other) => panic!("unexpected checkout failure: {other}"),
            }
        });
    }

    #[test]
    fn repeated_adds_accumulate_into_one_item(
        quantities in proptest::collection::vec(1u32..50, 1..8)
    ) {
        tokio_test::block_on(async move {
            let store = InMemoryStorefrontStore::new();
            let carts = CartService::new(store.clone());
            let user = UserId::generate();

            let product = fixtures::gaming_product("Accumulator", Category::Other, 1299, 1);
            store.insert_product(product.clone()).await.unwrap();

            for quantity in &quantities {
                carts.add(user, product.id, qty(*quantity)).await.unwrap();
            }

            let view = carts.view(user).await.unwrap();
            assert_eq!(view.entries.len(), 1);
            assert_eq!(
                view.entries[0].item.quantity.value(),
                quantities.iter().sum::<u32>()
            );
        });
    }
}
