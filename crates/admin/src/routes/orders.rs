//! Orders manager.
//!
//! Orders are created outside this binary; here they are listed, inspected
//! line by line, and moved through the fulfillment pipeline.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use ruche_core::{Order, OrderId, OrderItem, OrderStatus};

use crate::error::{AdminError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(index))
        .route("/orders/{id}/items", get(items))
        .route("/orders/{id}/status", put(update_status))
}

#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    /// One of the pipeline statuses; omitted means all.
    pub status: Option<String>,
}

/// GET /orders
#[instrument(skip(state))]
async fn index(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<Vec<Order>>> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<OrderStatus>)
        .transpose()
        .map_err(|e| AdminError::BadRequest(e.to_string()))?;

    let orders = state.tablestore().list_orders(status).await?;
    Ok(Json(orders))
}

/// GET /orders/{id}/items
#[instrument(skip(state))]
async fn items(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<OrderItem>>> {
    let items = state
        .tablestore()
        .list_order_items(OrderId::new(id))
        .await?;
    Ok(Json(items))
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: OrderStatus,
}

/// PUT /orders/{id}/status
#[instrument(skip(state))]
async fn update_status(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<StatusForm>,
) -> Result<Json<Order>> {
    let order = state
        .tablestore()
        .update_order_status(OrderId::new(id), form.status)
        .await?;
    tracing::info!(order_id = %order.id, status = %order.status, "order status updated");
    Ok(Json(order))
}
