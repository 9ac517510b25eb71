//! Table-storage gateway, write side.
//!
//! The back-office talks to the same hosted table-storage service as the
//! storefront, but with the service key: full CRUD on products, orders,
//! testimonials and promo codes, plus the aggregate queries behind the
//! dashboard.

use thiserror::Error;

mod client;
pub mod rows;

pub use client::AdminTableStoreClient;

/// Errors from the table-storage gateway.
#[derive(Debug, Error)]
pub enum TableStoreError {
    /// HTTP transport failure (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service replied with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// No row matched the query.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Client-side configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),
}
