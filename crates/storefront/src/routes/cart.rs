//! Cart route handlers.
//!
//! The cart lives in the session (see [`crate::cart`]); every mutation
//! persists the full item list back to the session before responding.

use axum::{
    Json,
    extract::State,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use ruche_core::ProductId;

use crate::cart::{self, Cart, CartItem, CartNotice};
use crate::error::Result;
use crate::state::AppState;

/// Cart payload returned by every cart endpoint.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total_items: u32,
    pub total_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<CartNotice>,
}

impl CartView {
    fn render(cart: &Cart, notice: Option<CartNotice>) -> Self {
        Self {
            items: cart.items().to_vec(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
            notice,
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Cart count badge payload.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u32,
}

/// Display the cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Json<CartView> {
    let cart = cart::load(&session).await;
    Json(CartView::render(&cart, None))
}

/// Add an item to the cart.
///
/// Looks the product up in the table store so the cart always carries the
/// current price, then merges by product id.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<AddToCartForm>,
) -> Result<Json<CartView>> {
    let product = state.tablestore().get_product(form.product_id).await?;

    let mut cart = cart::load(&session).await;
    let notice = cart.add(product, form.quantity.unwrap_or(1));
    cart::save(&session, &cart).await?;

    Ok(Json(CartView::render(&cart, Some(notice))))
}

/// Set a line item's quantity; zero or negative removes it.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Json(form): Json<UpdateCartForm>,
) -> Result<Json<CartView>> {
    let mut cart = cart::load(&session).await;
    let notice = cart.update_quantity(form.product_id, form.quantity);
    cart::save(&session, &cart).await?;

    Ok(Json(CartView::render(&cart, notice)))
}

/// Remove a line item.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(form): Json<RemoveFromCartForm>,
) -> Result<Json<CartView>> {
    let mut cart = cart::load(&session).await;
    let notice = cart.remove(form.product_id);
    cart::save(&session, &cart).await?;

    Ok(Json(CartView::render(&cart, notice)))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartView>> {
    let mut cart = cart::load(&session).await;
    let notice = cart.clear();
    cart::save(&session, &cart).await?;

    Ok(Json(CartView::render(&cart, Some(notice))))
}

/// Cart count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Json<CartCount> {
    let cart = cart::load(&session).await;
    Json(CartCount {
        count: cart.total_items(),
    })
}
