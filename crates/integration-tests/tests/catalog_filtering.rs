//! Catalog filtering over a realistic fixture catalog.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use rust_decimal::Decimal;

use ruche_core::Product;
use ruche_integration_tests::fixture_product;
use ruche_storefront::catalog::{ProductFilter, related_products};

fn catalog() -> Vec<Product> {
    vec![
        fixture_product("Chemise Ankara", "mode", 30, None, true),
        fixture_product("Sac", "mode", 50, Some(40), false),
        fixture_product("Robe wax", "mode", 90, Some(75), true),
        fixture_product("Pagne wax 6 yards", "tissus", 35, Some(30), true),
        fixture_product("Kente tisse main", "tissus", 68, None, true),
        fixture_product("Collier de perles", "accessoires", 19, None, true),
        fixture_product("Bracelet cauris", "accessoires", 13, None, false),
    ]
}

fn names(products: &[&Product]) -> Vec<String> {
    products.iter().map(|p| p.name.clone()).collect()
}

#[test]
fn no_criteria_passes_everything() {
    let products = catalog();
    let filter = ProductFilter::default();
    assert_eq!(filter.apply(&products).len(), products.len());
}

#[test]
fn combined_criteria_are_conjunctive() {
    let products = catalog();

    // "wax" products in mode or tissus, effective price at most 40, in stock.
    let filter = ProductFilter {
        search: "wax".to_string(),
        categories: HashSet::from(["mode".to_string(), "tissus".to_string()]),
        min_price: None,
        max_price: Some(Decimal::new(40, 0)),
        in_stock_only: true,
    };

    let visible = filter.apply(&products);
    assert_eq!(names(&visible), vec!["Pagne wax 6 yards".to_string()]);
}

#[test]
fn price_bounds_use_the_effective_price() {
    let products = catalog();

    // The Sac costs 50 but is discounted to 40: a max of 40 keeps it.
    let filter = ProductFilter {
        max_price: Some(Decimal::new(40, 0)),
        ..ProductFilter::default()
    };
    let visible = filter.apply(&products);
    assert!(visible.iter().any(|p| p.name == "Sac"));

    // A min of 45 drops it even though its list price is 50.
    let filter = ProductFilter {
        min_price: Some(Decimal::new(45, 0)),
        ..ProductFilter::default()
    };
    let visible = filter.apply(&products);
    assert!(!visible.iter().any(|p| p.name == "Sac"));
}

#[test]
fn stock_filter_drops_unavailable_products() {
    let products = catalog();
    let filter = ProductFilter {
        in_stock_only: true,
        ..ProductFilter::default()
    };
    let visible = filter.apply(&products);
    assert_eq!(visible.len(), products.len() - 2);
    assert!(visible.iter().all(|p| p.in_stock));
}

#[test]
fn unknown_category_tag_matches_nothing() {
    let products = catalog();
    let filter = ProductFilter {
        categories: HashSet::from(["bijoux".to_string()]),
        ..ProductFilter::default()
    };
    assert!(filter.apply(&products).is_empty());
}

#[test]
fn related_products_share_a_category_and_exclude_self() {
    let products = catalog();
    let robe = products
        .iter()
        .find(|p| p.name == "Robe wax")
        .unwrap()
        .clone();

    let related = related_products(&products, &robe, 4);
    assert_eq!(related.len(), 2);
    assert!(related.iter().all(|p| p.category == "mode"));
    assert!(related.iter().all(|p| p.id != robe.id));

    // The cap is honored.
    let related = related_products(&products, &robe, 1);
    assert_eq!(related.len(), 1);
}
