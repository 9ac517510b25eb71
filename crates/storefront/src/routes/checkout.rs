//! Checkout handler.
//!
//! There is no real payment integration: submission validates the shipping
//! form and a non-empty cart, "processes" the payment (always succeeds),
//! relays an order confirmation best-effort, and clears the cart. Orders
//! themselves are created outside this codebase.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use crate::cart;
use crate::error::{AppError, Result};
use crate::services::relay::CustomerInfo;
use crate::state::AppState;

use super::newsletter::is_valid_email;

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub payment_method: String,
}

/// Checkout result payload.
#[derive(Debug, Serialize)]
pub struct CheckoutReceipt {
    /// Reference handed to the customer; not an order id (orders are
    /// created externally).
    pub reference: Uuid,
    pub total_price: Decimal,
    pub confirmation_sent: bool,
}

/// Submit the checkout.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<CheckoutForm>,
) -> Result<Json<CheckoutReceipt>> {
    validate(&form)?;

    let mut cart = cart::load(&session).await;
    if cart.items().is_empty() {
        return Err(AppError::BadRequest("cart is empty".to_string()));
    }

    let total_price = cart.total_price();

    // Payment is simulated; it always succeeds.
    tracing::info!(total = %total_price, method = %form.payment_method, "payment simulated");

    let customer = CustomerInfo {
        full_name: form.full_name,
        email: form.email,
        phone: form.phone,
        address: form.address,
        city: form.city,
        country: form.country,
    };

    // Confirmation email is best-effort: a relay failure never blocks the
    // order, the customer is told to reach out directly instead.
    let confirmation_sent = match state
        .relay()
        .send_order_confirmation(&customer, cart.items(), total_price, &form.payment_method)
        .await
    {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "order confirmation relay failed");
            false
        }
    };

    cart.clear();
    cart::save(&session, &cart).await?;

    Ok(Json(CheckoutReceipt {
        reference: Uuid::new_v4(),
        total_price,
        confirmation_sent,
    }))
}

fn validate(form: &CheckoutForm) -> Result<()> {
    if form.full_name.trim().is_empty() {
        return Err(AppError::BadRequest("full name is required".to_string()));
    }
    if !is_valid_email(form.email.trim()) {
        return Err(AppError::BadRequest("a valid email is required".to_string()));
    }
    for (value, label) in [
        (&form.address, "address"),
        (&form.city, "city"),
        (&form.country, "country"),
        (&form.payment_method, "payment method"),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::BadRequest(format!("{label} is required")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> CheckoutForm {
        CheckoutForm {
            full_name: "Awa Diop".to_string(),
            email: "awa@example.com".to_string(),
            phone: "+221 77 000 00 00".to_string(),
            address: "12 rue des Tisserands".to_string(),
            city: "Dakar".to_string(),
            country: "Senegal".to_string(),
            payment_method: "mobile_money".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_complete_form() {
        assert!(validate(&form()).is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let mut f = form();
        f.full_name = "   ".to_string();
        assert!(validate(&f).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let mut f = form();
        f.email = "not-an-email".to_string();
        assert!(validate(&f).is_err());
    }

    #[test]
    fn test_validate_rejects_missing_payment_method() {
        let mut f = form();
        f.payment_method = String::new();
        assert!(validate(&f).is_err());
    }
}
