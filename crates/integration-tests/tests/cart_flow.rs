//! Cart flow against an in-memory session store.
//!
//! Exercises the persist / rehydrate cycle the storefront handlers run on
//! every cart request, including the corrupt-data fallback.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use rust_decimal::Decimal;
use tower_sessions::{MemoryStore, Session};

use ruche_integration_tests::fixture_product;
use ruche_storefront::cart::{self, CART_SESSION_KEY, Cart, CartNotice};

fn session() -> Session {
    Session::new(None, Arc::new(MemoryStore::default()), None)
}

#[tokio::test]
async fn cart_survives_a_session_round_trip() {
    let session = session();

    let chemise = fixture_product("Chemise Ankara", "mode", 30, None, true);
    let sac = fixture_product("Sac", "accessoires", 50, Some(40), true);

    let mut cart = cart::load(&session).await;
    assert!(cart.items().is_empty());

    cart.add(chemise.clone(), 2);
    cart.add(sac.clone(), 1);
    cart::save(&session, &cart).await.unwrap();

    // A later request sees the same cart.
    let mut reloaded = cart::load(&session).await;
    assert_eq!(reloaded, cart);
    assert_eq!(reloaded.total_items(), 3);
    // 2 x 30 + 1 x 40 (discounted)
    assert_eq!(reloaded.total_price(), Decimal::new(100, 0));

    // Mutate, persist, reload again.
    reloaded.update_quantity(chemise.id, 1);
    reloaded.remove(sac.id);
    cart::save(&session, &reloaded).await.unwrap();

    let final_cart = cart::load(&session).await;
    assert_eq!(final_cart.total_items(), 1);
    assert_eq!(final_cart.total_price(), Decimal::new(30, 0));
}

#[tokio::test]
async fn adding_same_product_twice_merges_lines() {
    let session = session();
    let chemise = fixture_product("Chemise Ankara", "mode", 30, None, true);

    let mut cart = cart::load(&session).await;
    assert!(matches!(
        cart.add(chemise.clone(), 1),
        CartNotice::ItemAdded { .. }
    ));
    assert!(matches!(
        cart.add(chemise, 2),
        CartNotice::QuantityUpdated { .. }
    ));
    cart::save(&session, &cart).await.unwrap();

    let reloaded = cart::load(&session).await;
    assert_eq!(reloaded.items().len(), 1);
    assert_eq!(reloaded.total_items(), 3);
}

#[tokio::test]
async fn corrupt_session_data_degrades_to_empty_cart() {
    let session = session();
    session
        .insert(CART_SESSION_KEY, "{definitely not json".to_string())
        .await
        .unwrap();

    let cart = cart::load(&session).await;
    assert!(cart.items().is_empty());

    // And the session is usable again after the next save.
    let mut cart = cart;
    cart.add(fixture_product("Pagne wax", "tissus", 35, None, true), 1);
    cart::save(&session, &cart).await.unwrap();
    assert_eq!(cart::load(&session).await.total_items(), 1);
}

#[tokio::test]
async fn clearing_after_checkout_persists() {
    let session = session();

    let mut cart = Cart::new();
    cart.add(fixture_product("Boubou", "mode", 120, None, true), 1);
    cart::save(&session, &cart).await.unwrap();

    cart.clear();
    cart::save(&session, &cart).await.unwrap();

    let reloaded = cart::load(&session).await;
    assert!(reloaded.items().is_empty());
    assert_eq!(reloaded.total_price(), Decimal::ZERO);
}
