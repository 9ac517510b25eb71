//! Newsletter sign-up handler.
//!
//! Sign-ups are relayed to an external form endpoint; nothing is stored
//! locally.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Newsletter sign-up form data.
#[derive(Debug, Deserialize)]
pub struct SubscribeForm {
    pub email: String,
}

/// Sign-up acknowledgement.
#[derive(Debug, Serialize)]
pub struct SubscribeReceipt {
    pub email: String,
    pub subscribed: bool,
}

/// Subscribe to the newsletter.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn subscribe(
    State(state): State<AppState>,
    Json(form): Json<SubscribeForm>,
) -> Result<Json<SubscribeReceipt>> {
    let email = form.email.trim().to_lowercase();

    if !is_valid_email(&email) {
        return Err(AppError::BadRequest(
            "please enter a valid email address".to_string(),
        ));
    }

    state.relay().send_newsletter_signup(&email).await?;
    tracing::info!("newsletter sign-up relayed");

    Ok(Json(SubscribeReceipt {
        email,
        subscribed: true,
    }))
}

/// Basic email validation.
pub(crate) fn is_valid_email(email: &str) -> bool {
    // Simple validation: contains @, has content before and after @
    let mut parts = email.splitn(2, '@');
    let Some(local) = parts.next() else {
        return false;
    };
    let Some(domain) = parts.next() else {
        return false;
    };
    !local.is_empty() && !domain.is_empty() && domain.contains('.')
}
