//! Integration tests for La Ruche d'Or.
//!
//! These tests exercise cross-crate flows without the hosted services:
//! session-backed carts against an in-memory session store, catalog
//! filtering over fixture data, and the editor auto-save loop against a
//! recording writer.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ruche-integration-tests
//! ```

use rust_decimal::Decimal;

use ruche_core::{Product, ProductId};

/// Build a fixture product.
#[must_use]
pub fn fixture_product(
    name: &str,
    category: &str,
    price: i64,
    discount: Option<i64>,
    in_stock: bool,
) -> Product {
    Product {
        id: ProductId::generate(),
        name: name.to_string(),
        category: category.to_string(),
        price: Decimal::new(price, 0),
        discount_price: discount.map(|d| Decimal::new(d, 0)),
        image: String::new(),
        description: String::new(),
        rating: 4.0,
        in_stock,
        featured: false,
    }
}
