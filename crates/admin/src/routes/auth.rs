//! Operator login and logout.
//!
//! A single shared password gates the back-office; the session records that
//! the check passed.

use axum::{
    Json, Router,
    extract::State,
    routing::post,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AdminError, Result};
use crate::middleware::{clear_admin_session, mark_admin_session};
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginReceipt {
    pub authenticated: bool,
}

/// Check the operator password and mark the session.
#[instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> Result<Json<LoginReceipt>> {
    if !state.config().verify_password(&form.password) {
        tracing::warn!("failed back-office login attempt");
        return Err(AdminError::Unauthorized);
    }

    mark_admin_session(&session).await?;
    tracing::info!("operator logged in");
    Ok(Json(LoginReceipt {
        authenticated: true,
    }))
}

/// Clear the session.
#[instrument(skip_all)]
async fn logout(session: Session) -> Result<Json<LoginReceipt>> {
    clear_admin_session(&session).await?;
    Ok(Json(LoginReceipt {
        authenticated: false,
    }))
}
