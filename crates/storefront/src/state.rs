//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::services::relay::FormRelayClient;
use crate::tablestore::{TableStoreClient, TableStoreError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// table-storage gateway, the form-relay client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    tablestore: TableStoreClient,
    relay: FormRelayClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the table-storage client cannot be constructed.
    pub fn new(config: StorefrontConfig) -> Result<Self, TableStoreError> {
        let tablestore = TableStoreClient::new(&config.tablestore)?;
        let relay = FormRelayClient::new(&config.relay);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                tablestore,
                relay,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the table-storage gateway.
    #[must_use]
    pub fn tablestore(&self) -> &TableStoreClient {
        &self.inner.tablestore
    }

    /// Get a reference to the form-relay client.
    #[must_use]
    pub fn relay(&self) -> &FormRelayClient {
        &self.inner.relay
    }
}
