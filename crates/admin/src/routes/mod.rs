//! Back-office route handlers.
//!
//! Route tree (everything except login requires an authenticated session):
//!
//! ```text
//! POST   /auth/login                       password check, marks session
//! POST   /auth/logout                      clears session
//!
//! GET    /dashboard                        counts and revenue
//!
//! GET    /products                         full catalog, optional ?search=
//! DELETE /products/{id}                    delete row + stored image
//! POST   /products/editor                  open an editor session
//! GET    /products/editor/{token}          current draft
//! PATCH  /products/editor/{token}          apply edits (arms auto-save)
//! POST   /products/editor/{token}/image    multipart image upload
//! POST   /products/editor/{token}/save     manual save
//! POST   /products/editor/{token}/close    close, ?force to discard
//!
//! GET    /orders                           optional ?status= filter
//! GET    /orders/{id}/items                order lines
//! PUT    /orders/{id}/status               move through the pipeline
//!
//! GET    /testimonials                     all statuses
//! POST   /testimonials                     manual entry, starts pending
//! PUT    /testimonials/{id}/status         approve / reject
//! DELETE /testimonials/{id}
//!
//! GET    /promocodes                       list with computed activity
//! POST   /promocodes
//! PUT    /promocodes/{id}
//! DELETE /promocodes/{id}
//! ```

use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod promocodes;
pub mod testimonials;

/// Build the full back-office router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(products::router())
        .merge(orders::router())
        .merge(testimonials::router())
        .merge(promocodes::router())
}
