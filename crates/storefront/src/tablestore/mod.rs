//! Hosted table-storage gateway (read side).
//!
//! The storefront is a thin client over a hosted table-storage service with
//! a PostgREST-style REST surface: `GET {base}/rest/v1/{table}` with query
//! parameters for filters and ordering. The storefront only reads; all
//! mutations live in the admin binary.
//!
//! # Example
//!
//! ```rust,ignore
//! use ruche_storefront::tablestore::TableStoreClient;
//!
//! let client = TableStoreClient::new(&config.tablestore)?;
//! let products = client.list_products().await?;
//! let product = client.get_product(id).await?;
//! ```

mod client;
pub mod rows;

pub use client::TableStoreClient;

use thiserror::Error;

/// Errors that can occur when talking to the table-storage service.
#[derive(Debug, Error)]
pub enum TableStoreError {
    /// HTTP request failed (connection, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Row not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Client-side configuration problem (bad base URL, bad key format).
    #[error("Invalid configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TableStoreError::NotFound("product 42".to_string());
        assert_eq!(err.to_string(), "Not found: product 42");

        let err = TableStoreError::Api {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 503 - unavailable");
    }
}
