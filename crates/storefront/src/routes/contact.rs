//! Contact form handler.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::services::relay::ContactMessage;
use crate::state::AppState;

use super::newsletter::is_valid_email;

/// Contact form data.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub phone: Option<String>,
}

/// Contact acknowledgement.
#[derive(Debug, Serialize)]
pub struct ContactReceipt {
    pub sent: bool,
}

/// Relay a contact message.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<Json<ContactReceipt>> {
    if form.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    if !is_valid_email(form.email.trim()) {
        return Err(AppError::BadRequest("a valid email is required".to_string()));
    }
    if form.message.trim().is_empty() {
        return Err(AppError::BadRequest("message is required".to_string()));
    }

    let message = ContactMessage {
        name: form.name,
        email: form.email,
        subject: form.subject,
        message: form.message,
        phone: form.phone,
    };

    state.relay().send_contact_message(&message).await?;
    tracing::info!("contact message relayed");

    Ok(Json(ContactReceipt { sent: true }))
}
