//! Testimonials moderation.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, put},
};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use ruche_core::{Testimonial, TestimonialId, TestimonialStatus};

use crate::error::{AdminError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;
use crate::tablestore::rows::NewTestimonialRow;

/// Build the testimonials router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/testimonials", get(index).post(create))
        .route("/testimonials/{id}/status", put(update_status))
        .route("/testimonials/{id}", delete(remove))
}

/// GET /testimonials
#[instrument(skip(state))]
async fn index(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Testimonial>>> {
    let testimonials = state.tablestore().list_testimonials().await?;
    Ok(Json(testimonials))
}

#[derive(Debug, Deserialize)]
pub struct TestimonialForm {
    pub customer_name: String,
    pub content: String,
    pub rating: f32,
}

/// POST /testimonials
///
/// Manual entry (phone or in-store feedback). Starts in moderation.
#[instrument(skip(state, form), fields(customer = %form.customer_name))]
async fn create(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Json(form): Json<TestimonialForm>,
) -> Result<Json<Testimonial>> {
    if form.customer_name.trim().is_empty() {
        return Err(AdminError::BadRequest(
            "customer name is required".to_string(),
        ));
    }
    if !(0.0..=5.0).contains(&form.rating) {
        return Err(AdminError::BadRequest(
            "rating must be between 0 and 5".to_string(),
        ));
    }

    let row = NewTestimonialRow {
        customer_name: form.customer_name.trim().to_string(),
        content: form.content,
        rating: form.rating,
        status: TestimonialStatus::Pending,
    };
    let testimonial = state.tablestore().create_testimonial(&row).await?;
    Ok(Json(testimonial))
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: TestimonialStatus,
}

/// PUT /testimonials/{id}/status
#[instrument(skip(state))]
async fn update_status(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<StatusForm>,
) -> Result<Json<Testimonial>> {
    let testimonial = state
        .tablestore()
        .set_testimonial_status(TestimonialId::new(id), form.status)
        .await?;
    tracing::info!(testimonial_id = %testimonial.id, status = ?testimonial.status, "testimonial moderated");
    Ok(Json(testimonial))
}

/// DELETE /testimonials/{id}
#[instrument(skip(state))]
async fn remove(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<()> {
    state
        .tablestore()
        .delete_testimonial(TestimonialId::new(id))
        .await?;
    Ok(())
}
