//! Home page data: featured products and approved testimonials.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use ruche_core::{Product, Testimonial};

use crate::error::Result;
use crate::state::AppState;

/// Home page payload.
#[derive(Debug, Serialize)]
pub struct HomeView {
    pub featured: Vec<Product>,
    pub testimonials: Vec<Testimonial>,
}

/// Home page handler.
///
/// Testimonial failures degrade to an empty list; the catalog must still
/// render when the testimonials table is unhappy.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<HomeView>> {
    let products = state.tablestore().list_products().await?;
    let featured = products
        .iter()
        .filter(|p| p.featured)
        .cloned()
        .collect::<Vec<_>>();

    let testimonials = match state.tablestore().list_approved_testimonials().await {
        Ok(testimonials) => testimonials,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load testimonials");
            Vec::new()
        }
    };

    Ok(Json(HomeView {
        featured,
        testimonials,
    }))
}
