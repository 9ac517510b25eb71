//! Product editor sessions.
//!
//! One [`EditorSession`] backs one open editor dialog. It owns the working
//! copy of the product (the [`ProductDraft`]), tracks whether that copy has
//! diverged from the stored row, and drives the debounced auto-save: each
//! edit re-arms a timer, and when the dialog goes quiet the draft is written
//! out in the background.
//!
//! The working copy is never silently lost. Failed saves keep the draft and
//! the unsaved flag; closing a dialog with unsaved changes requires an
//! explicit discard.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::AbortHandle;

use ruche_core::{Product, ProductId};

use crate::tablestore::TableStoreError;

/// Quiet period before an auto-save fires.
pub const AUTOSAVE_DEBOUNCE: Duration = Duration::from_secs(2);

/// Where edited drafts are persisted.
///
/// The production implementation is the table-storage client; tests plug in
/// a recording writer.
pub trait ProductWriter: Send + Sync + 'static {
    /// Insert a new product from a draft.
    fn create(
        &self,
        draft: ProductDraft,
    ) -> impl Future<Output = Result<Product, TableStoreError>> + Send;

    /// Replace the editable columns of an existing product.
    fn update(
        &self,
        id: ProductId,
        draft: ProductDraft,
    ) -> impl Future<Output = Result<Product, TableStoreError>> + Send;
}

/// Why a draft cannot be saved.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Product name must not be empty")]
    EmptyName,

    #[error("Price must not be negative")]
    NegativePrice,

    #[error("Discount price must not be negative")]
    NegativeDiscount,

    #[error("Discount price must not exceed the regular price")]
    DiscountExceedsPrice,

    #[error("Rating must be between 0 and 5")]
    RatingOutOfRange,
}

/// The working copy of a product being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub image: String,
    pub description: String,
    pub rating: f32,
    pub in_stock: bool,
    pub featured: bool,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: "mode".to_string(),
            price: Decimal::ZERO,
            discount_price: None,
            image: String::new(),
            description: String::new(),
            rating: 4.0,
            in_stock: true,
            featured: false,
        }
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price,
            discount_price: product.discount_price,
            image: product.image.clone(),
            description: product.description.clone(),
            rating: product.rating,
            in_stock: product.in_stock,
            featured: product.featured,
        }
    }
}

impl ProductDraft {
    /// Check the draft is storable.
    ///
    /// # Errors
    ///
    /// Empty names, negative prices, a discount above the regular price and
    /// out-of-range ratings are rejected.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.price < Decimal::ZERO {
            return Err(ValidationError::NegativePrice);
        }
        if let Some(discount) = self.discount_price {
            if discount < Decimal::ZERO {
                return Err(ValidationError::NegativeDiscount);
            }
            if discount > self.price {
                return Err(ValidationError::DiscountExceedsPrice);
            }
        }
        if !(0.0..=5.0).contains(&self.rating) {
            return Err(ValidationError::RatingOutOfRange);
        }
        Ok(())
    }
}

/// Whether the session creates a new product or edits a stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(ProductId),
}

/// Result of a successful manual save.
#[derive(Debug, Clone)]
pub enum SaveOutcome {
    /// A new product was inserted; the session is now closed.
    Created(Product),
    /// The stored row was replaced; the session stays open.
    Updated(Product),
}

/// Result of a close request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    /// Unsaved changes present; caller must retry with `force` to discard.
    ConfirmDiscard,
}

/// Errors from editor operations.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The session was already closed.
    #[error("Editor session is closed")]
    Closed,

    /// The draft failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The writer rejected the save. The draft is kept.
    #[error("Save failed: {0}")]
    Save(#[from] TableStoreError),
}

struct EditorInner {
    mode: EditorMode,
    draft: ProductDraft,
    autosave: bool,
    unsaved: bool,
    open: bool,
    /// Bumped on every edit; a finished save only clears `unsaved` when no
    /// edit landed while it was in flight.
    revision: u64,
    timer: Option<AbortHandle>,
}

/// One open editor dialog.
///
/// Cheaply cloneable; clones share the same dialog state.
pub struct EditorSession<W> {
    writer: Arc<W>,
    debounce: Duration,
    inner: Arc<Mutex<EditorInner>>,
}

impl<W> Clone for EditorSession<W> {
    fn clone(&self) -> Self {
        Self {
            writer: Arc::clone(&self.writer),
            debounce: self.debounce,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W: ProductWriter> EditorSession<W> {
    /// Open a session for a new product with an empty draft.
    #[must_use]
    pub fn create(writer: Arc<W>, autosave: bool) -> Self {
        Self::open(writer, EditorMode::Create, ProductDraft::default(), autosave)
    }

    /// Open a session editing a stored product.
    #[must_use]
    pub fn edit(writer: Arc<W>, product: &Product, autosave: bool) -> Self {
        Self::open(
            writer,
            EditorMode::Edit(product.id),
            ProductDraft::from(product),
            autosave,
        )
    }

    fn open(writer: Arc<W>, mode: EditorMode, draft: ProductDraft, autosave: bool) -> Self {
        Self {
            writer,
            debounce: AUTOSAVE_DEBOUNCE,
            inner: Arc::new(Mutex::new(EditorInner {
                mode,
                draft,
                autosave,
                unsaved: false,
                open: true,
                revision: 0,
                timer: None,
            })),
        }
    }

    /// Override the auto-save quiet period.
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Apply an edit to the draft.
    ///
    /// Marks the draft unsaved and, when auto-save is on and the session
    /// edits a stored product, (re)arms the debounce timer. Creates are only
    /// persisted by an explicit save.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::Closed` on a closed session.
    pub async fn apply<F>(&self, edit: F) -> Result<ProductDraft, EditorError>
    where
        F: FnOnce(&mut ProductDraft),
    {
        let mut guard = self.inner.lock().await;
        if !guard.open {
            return Err(EditorError::Closed);
        }

        edit(&mut guard.draft);
        guard.unsaved = true;
        guard.revision += 1;

        if guard.autosave && matches!(guard.mode, EditorMode::Edit(_)) {
            self.arm_timer(&mut guard);
        }

        Ok(guard.draft.clone())
    }

    /// Record the public URL of a freshly uploaded image on the draft.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::Closed` on a closed session.
    pub async fn set_image(&self, url: String) -> Result<ProductDraft, EditorError> {
        self.apply(|draft| draft.image = url).await
    }

    /// Toggle auto-save. Disabling cancels any pending timer.
    pub async fn set_autosave(&self, enabled: bool) {
        let mut guard = self.inner.lock().await;
        guard.autosave = enabled;
        if !enabled {
            if let Some(timer) = guard.timer.take() {
                timer.abort();
            }
        }
    }

    /// Save the draft now.
    ///
    /// A successful create closes the session; a successful update leaves it
    /// open with a clean draft.
    ///
    /// # Errors
    ///
    /// Validation and writer errors are returned to the caller; in both
    /// cases the draft and its unsaved flag are untouched.
    pub async fn save(&self) -> Result<SaveOutcome, EditorError> {
        let (mode, draft, revision) = {
            let guard = self.inner.lock().await;
            if !guard.open {
                return Err(EditorError::Closed);
            }
            guard.draft.validate()?;
            (guard.mode, guard.draft.clone(), guard.revision)
        };

        match mode {
            EditorMode::Create => {
                let product = self.writer.create(draft).await?;
                let mut guard = self.inner.lock().await;
                guard.unsaved = false;
                guard.open = false;
                if let Some(timer) = guard.timer.take() {
                    timer.abort();
                }
                tracing::info!(product_id = %product.id, "product created");
                Ok(SaveOutcome::Created(product))
            }
            EditorMode::Edit(id) => {
                let product = self.writer.update(id, draft).await?;
                let mut guard = self.inner.lock().await;
                if guard.revision == revision {
                    guard.unsaved = false;
                }
                tracing::info!(product_id = %id, "product saved");
                Ok(SaveOutcome::Updated(product))
            }
        }
    }

    /// Close the dialog.
    ///
    /// With unsaved changes and `force` false, the session stays open and
    /// the caller gets [`CloseOutcome::ConfirmDiscard`]. Closing cancels any
    /// pending auto-save; an auto-save already in flight still completes but
    /// the session is gone either way.
    pub async fn close(&self, force: bool) -> CloseOutcome {
        let mut guard = self.inner.lock().await;
        if !guard.open {
            return CloseOutcome::Closed;
        }
        if guard.unsaved && !force {
            return CloseOutcome::ConfirmDiscard;
        }
        guard.open = false;
        if let Some(timer) = guard.timer.take() {
            timer.abort();
        }
        CloseOutcome::Closed
    }

    /// Current draft snapshot.
    pub async fn draft(&self) -> ProductDraft {
        self.inner.lock().await.draft.clone()
    }

    /// Whether the draft has diverged from the stored row.
    pub async fn has_unsaved_changes(&self) -> bool {
        self.inner.lock().await.unsaved
    }

    /// Whether the dialog is still open.
    pub async fn is_open(&self) -> bool {
        self.inner.lock().await.open
    }

    /// Create/edit mode of this session.
    pub async fn mode(&self) -> EditorMode {
        self.inner.lock().await.mode
    }

    /// Re-arm the debounce timer. Caller holds the lock.
    fn arm_timer(&self, guard: &mut EditorInner) {
        if let Some(timer) = guard.timer.take() {
            timer.abort();
        }

        let inner = Arc::clone(&self.inner);
        let writer = Arc::clone(&self.writer);
        let debounce = self.debounce;
        let task = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            Self::autosave_tick(inner, writer).await;
        });
        guard.timer = Some(task.abort_handle());
    }

    /// One debounce expiry: save the draft if it is still worth saving.
    async fn autosave_tick(inner: Arc<Mutex<EditorInner>>, writer: Arc<W>) {
        let (id, draft, revision) = {
            let guard = inner.lock().await;
            if !guard.open || !guard.autosave || !guard.unsaved {
                return;
            }
            let EditorMode::Edit(id) = guard.mode else {
                return;
            };
            if guard.draft.validate().is_err() {
                // Invalid drafts wait for the next edit; nothing is written.
                return;
            }
            (id, guard.draft.clone(), guard.revision)
        };

        match writer.update(id, draft).await {
            Ok(_) => {
                let mut guard = inner.lock().await;
                if guard.revision == revision {
                    guard.unsaved = false;
                }
                tracing::debug!(product_id = %id, "auto-save completed");
            }
            Err(e) => {
                tracing::warn!(product_id = %id, error = %e, "auto-save failed, draft kept");
            }
        }
    }
}
