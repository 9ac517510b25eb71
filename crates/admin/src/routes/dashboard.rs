//! Dashboard metrics.

use axum::{Json, Router, extract::State, routing::get};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(metrics))
}

/// The four cards on the dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub orders: u64,
    pub products: u64,
    pub testimonials: u64,
    /// Sum of order totals, all statuses.
    pub revenue: Decimal,
}

/// GET /dashboard
#[instrument(skip_all)]
async fn metrics(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<DashboardMetrics>> {
    let store = state.tablestore();
    let (orders, products, testimonials, revenue) = tokio::try_join!(
        store.count_orders(),
        store.count_products(),
        store.count_testimonials(),
        store.total_revenue(),
    )?;

    Ok(Json(DashboardMetrics {
        orders,
        products,
        testimonials,
        revenue,
    }))
}
