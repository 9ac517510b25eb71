//! Products manager and the editor dialog lifecycle.
//!
//! Mutations go through an [`EditorSession`]: open, patch fields (which arms
//! the debounced auto-save), optionally upload an image, save, close. After
//! every committed mutation the handlers refetch the catalog and return the
//! fresh list, so the client never works from a stale table.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use ruche_core::{Product, ProductId};

use crate::editor::{CloseOutcome, EditorSession, ProductDraft, SaveOutcome};
use crate::error::{AdminError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::{AppState, EditorId};
use crate::upload::validate_image;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(index))
        .route("/products/{id}", delete(remove))
        .route("/products/editor", post(open_editor))
        .route(
            "/products/editor/{token}",
            get(editor_draft).patch(patch_draft),
        )
        .route("/products/editor/{token}/image", post(upload_image))
        .route("/products/editor/{token}/save", post(save))
        .route("/products/editor/{token}/close", post(close))
}

#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    /// Case-insensitive substring match on name and category.
    pub search: Option<String>,
}

/// GET /products
#[instrument(skip(state))]
async fn index(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<Vec<Product>>> {
    let mut products = state.tablestore().list_products().await?;

    if let Some(search) = query.search.filter(|s| !s.trim().is_empty()) {
        let needle = search.trim().to_lowercase();
        products.retain(|p| {
            p.name.to_lowercase().contains(&needle) || p.category.to_lowercase().contains(&needle)
        });
    }

    Ok(Json(products))
}

/// DELETE /products/{id}
///
/// Removes the stored image first, then the row, then refetches the catalog.
/// A failed image removal only logs: the row must go either way, and orphan
/// objects are harmless.
#[instrument(skip(state))]
async fn remove(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Product>>> {
    let id = ProductId::new(id);
    let product = state.tablestore().get_product(id).await?;

    if let Some(key) = state.storage().object_key_from_url(&product.image) {
        if let Err(e) = state.storage().remove(&key).await {
            tracing::warn!(product_id = %id, key, error = %e, "image removal failed");
        }
    }

    state.tablestore().delete_product(id).await?;
    tracing::info!(product_id = %id, "product deleted");

    let products = state.tablestore().list_products().await?;
    Ok(Json(products))
}

// ============================================================================
// Editor lifecycle
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OpenEditorForm {
    /// Edit this product; omitted opens a blank create dialog.
    pub product_id: Option<Uuid>,
    /// Auto-save on by default, as in the dialog UI.
    #[serde(default = "default_autosave")]
    pub autosave: bool,
}

const fn default_autosave() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct EditorView {
    pub token: EditorId,
    pub mode: &'static str,
    pub draft: ProductDraft,
    pub unsaved_changes: bool,
}

/// POST /products/editor
#[instrument(skip(state))]
async fn open_editor(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Json(form): Json<OpenEditorForm>,
) -> Result<Json<EditorView>> {
    let writer = state.tablestore_arc();

    let (session, mode) = match form.product_id {
        Some(id) => {
            let product = state.tablestore().get_product(ProductId::new(id)).await?;
            (EditorSession::edit(writer, &product, form.autosave), "edit")
        }
        None => (EditorSession::create(writer, form.autosave), "create"),
    };

    let draft = session.draft().await;
    let token = state.register_editor(session).await;
    tracing::info!(%token, mode, "editor opened");

    Ok(Json(EditorView {
        token,
        mode,
        draft,
        unsaved_changes: false,
    }))
}

async fn lookup_editor(
    state: &AppState,
    token: EditorId,
) -> Result<EditorSession<crate::tablestore::AdminTableStoreClient>> {
    state
        .editor(token)
        .await
        .ok_or_else(|| AdminError::NotFound(format!("editor session {token}")))
}

/// GET /products/editor/{token}
async fn editor_draft(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(token): Path<EditorId>,
) -> Result<Json<DraftView>> {
    let session = lookup_editor(&state, token).await?;
    Ok(Json(DraftView {
        draft: session.draft().await,
        unsaved_changes: session.has_unsaved_changes().await,
    }))
}

#[derive(Debug, Serialize)]
pub struct DraftView {
    pub draft: ProductDraft,
    pub unsaved_changes: bool,
}

/// Field-level patch of the working copy. Absent fields stay as they are.
#[derive(Debug, Default, Deserialize)]
pub struct DraftPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<rust_decimal::Decimal>,
    pub discount_price: Option<rust_decimal::Decimal>,
    /// Set true to drop an existing promotion.
    #[serde(default)]
    pub clear_discount_price: bool,
    /// Set true to remove the image from the working copy. The stored
    /// object is not touched.
    #[serde(default)]
    pub clear_image: bool,
    pub description: Option<String>,
    pub rating: Option<f32>,
    pub in_stock: Option<bool>,
    pub featured: Option<bool>,
    /// Toggle auto-save for the rest of the dialog.
    pub autosave: Option<bool>,
}

impl DraftPatch {
    /// Fold the patch into a draft. Absent fields are left alone.
    fn apply_to(self, draft: &mut ProductDraft) {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
        if let Some(price) = self.price {
            draft.price = price;
        }
        if self.clear_discount_price {
            draft.discount_price = None;
        } else if let Some(discount) = self.discount_price {
            draft.discount_price = Some(discount);
        }
        if self.clear_image {
            draft.image.clear();
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(rating) = self.rating {
            draft.rating = rating;
        }
        if let Some(in_stock) = self.in_stock {
            draft.in_stock = in_stock;
        }
        if let Some(featured) = self.featured {
            draft.featured = featured;
        }
    }
}

/// PATCH /products/editor/{token}
#[instrument(skip(state, patch))]
async fn patch_draft(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(token): Path<EditorId>,
    Json(patch): Json<DraftPatch>,
) -> Result<Json<DraftView>> {
    let session = lookup_editor(&state, token).await?;

    if let Some(autosave) = patch.autosave {
        session.set_autosave(autosave).await;
    }

    let draft = session.apply(move |draft| patch.apply_to(draft)).await?;

    Ok(Json(DraftView {
        draft,
        unsaved_changes: true,
    }))
}

#[derive(Debug, Serialize)]
pub struct UploadReceipt {
    pub image_url: String,
    pub draft: ProductDraft,
}

/// POST /products/editor/{token}/image
///
/// Multipart upload. The file is validated before a byte leaves the process;
/// on success the draft points at the new public URL. The previously stored
/// object is left in place: image changes are local to the working copy, and
/// stored objects are only deleted together with their product. A discarded
/// dialog or a failed save must never leave the committed row pointing at a
/// destroyed object.
#[instrument(skip(state, multipart))]
async fn upload_image(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(token): Path<EditorId>,
    mut multipart: Multipart,
) -> Result<Json<UploadReceipt>> {
    let session = lookup_editor(&state, token).await?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| AdminError::BadRequest(format!("malformed multipart body: {e}")))?
        .ok_or_else(|| AdminError::BadRequest("no file in request".to_string()))?;

    let filename = field
        .file_name()
        .ok_or_else(|| AdminError::BadRequest("file has no name".to_string()))?
        .to_string();
    let content_type = field
        .content_type()
        .ok_or_else(|| AdminError::BadRequest("file has no content type".to_string()))?
        .to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AdminError::BadRequest(format!("failed to read file: {e}")))?;

    let validated = validate_image(&filename, &content_type, bytes.len())?;

    let image_url = state
        .storage()
        .upload(&validated.key, &validated.content_type, bytes.to_vec())
        .await?;

    let draft = session.set_image(image_url.clone()).await?;
    Ok(Json(UploadReceipt { image_url, draft }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase", tag = "outcome")]
pub enum SaveView {
    Created {
        product: Product,
        products: Vec<Product>,
    },
    Updated {
        product: Product,
        products: Vec<Product>,
    },
}

/// POST /products/editor/{token}/save
#[instrument(skip(state))]
async fn save(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(token): Path<EditorId>,
) -> Result<Json<SaveView>> {
    let session = lookup_editor(&state, token).await?;
    let outcome = session.save().await?;

    // Explicit refetch so the client renders the committed state.
    let products = state.tablestore().list_products().await?;

    let view = match outcome {
        SaveOutcome::Created(product) => {
            state.remove_editor(token).await;
            SaveView::Created { product, products }
        }
        SaveOutcome::Updated(product) => SaveView::Updated { product, products },
    };
    Ok(Json(view))
}

#[derive(Debug, Deserialize, Default)]
pub struct CloseForm {
    /// Discard unsaved changes.
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct CloseView {
    pub closed: bool,
    pub confirm_discard: bool,
}

/// POST /products/editor/{token}/close
#[instrument(skip(state))]
async fn close(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(token): Path<EditorId>,
    Json(form): Json<CloseForm>,
) -> Result<Json<CloseView>> {
    let session = lookup_editor(&state, token).await?;

    match session.close(form.force).await {
        CloseOutcome::Closed => {
            state.remove_editor(token).await;
            Ok(Json(CloseView {
                closed: true,
                confirm_discard: false,
            }))
        }
        CloseOutcome::ConfirmDiscard => Ok(Json(CloseView {
            closed: false,
            confirm_discard: true,
        })),
    }
}
