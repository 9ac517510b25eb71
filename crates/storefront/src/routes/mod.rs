//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Featured products + approved testimonials
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (pings the table store)
//!
//! # Products
//! GET  /products               - Product listing with filter query params
//! GET  /products/{id}          - Product detail with related products
//!
//! # Cart
//! GET  /cart                   - Cart contents and totals
//! POST /cart/add               - Add a product (merges by product id)
//! POST /cart/update            - Set a line item quantity (<= 0 removes)
//! POST /cart/remove            - Remove a line item
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Item count badge
//!
//! # Checkout
//! POST /checkout               - Simulated payment, confirmation relay,
//!                                cart clear
//!
//! # Forms
//! POST /contact                - Relay a contact message
//! POST /newsletter             - Relay a newsletter sign-up
//! ```

pub mod cart;
pub mod checkout;
pub mod contact;
pub mod home;
pub mod newsletter;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the complete route tree.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::submit))
        .route("/contact", post(contact::submit))
        .route("/newsletter", post(newsletter::subscribe))
}
