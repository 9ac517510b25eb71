//! Shared application state for the back-office.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::AdminConfig;
use crate::editor::EditorSession;
use crate::error::AdminError;
use crate::storage::ObjectStoreClient;
use crate::tablestore::AdminTableStoreClient;

/// Editor sessions are keyed by an opaque token handed to the client on open.
pub type EditorId = Uuid;

/// Shared application state, cheaply cloneable.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    tablestore: Arc<AdminTableStoreClient>,
    storage: ObjectStoreClient,
    /// Open editor dialogs. Entries are removed on close and on create-save.
    editors: Mutex<HashMap<EditorId, EditorSession<AdminTableStoreClient>>>,
}

impl AppState {
    /// Build the application state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when a service client cannot be constructed.
    pub fn new(config: AdminConfig) -> Result<Self, AdminError> {
        let tablestore = Arc::new(AdminTableStoreClient::new(&config.tablestore)?);
        let storage = ObjectStoreClient::new(&config.object_store)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                tablestore,
                storage,
                editors: Mutex::new(HashMap::new()),
            }),
        })
    }

    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    pub fn tablestore(&self) -> &AdminTableStoreClient {
        &self.inner.tablestore
    }

    /// Table-store client handle for seeding editor sessions.
    pub fn tablestore_arc(&self) -> Arc<AdminTableStoreClient> {
        Arc::clone(&self.inner.tablestore)
    }

    pub fn storage(&self) -> &ObjectStoreClient {
        &self.inner.storage
    }

    /// Register a freshly opened editor session and mint its token.
    pub async fn register_editor(
        &self,
        session: EditorSession<AdminTableStoreClient>,
    ) -> EditorId {
        let id = Uuid::new_v4();
        self.inner.editors.lock().await.insert(id, session);
        id
    }

    /// Look up an open editor session.
    pub async fn editor(&self, id: EditorId) -> Option<EditorSession<AdminTableStoreClient>> {
        self.inner.editors.lock().await.get(&id).cloned()
    }

    /// Drop a closed editor session.
    pub async fn remove_editor(&self, id: EditorId) {
        self.inner.editors.lock().await.remove(&id);
    }
}
