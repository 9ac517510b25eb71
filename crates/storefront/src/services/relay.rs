//! Form-relay client for outbound email notifications.
//!
//! The shop does not run a mail server; contact messages, order
//! confirmations and newsletter sign-ups are plain JSON POSTs to fixed
//! per-purpose relay endpoints. Success is inferred from the HTTP status
//! alone - the relay's response body is never consumed. Nothing is retried.

use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use thiserror::Error;

use crate::cart::CartItem;
use crate::config::RelayConfig;

/// EUR -> FCFA conversion applied to amounts shown in emails.
const FCFA_RATE: Decimal = Decimal::from_parts(655_957, 0, 0, false, 3);

/// Errors that can occur when posting to a relay endpoint.
#[derive(Debug, Error)]
pub enum RelayError {
    /// HTTP request failed (connection, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Relay replied with a non-success status.
    #[error("Relay rejected the submission: {0}")]
    Api(StatusCode),
}

/// A contact-form message.
#[derive(Debug, Clone, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub phone: Option<String>,
}

/// Shipping details collected at checkout.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub country: String,
}

/// Payload POSTed for an order confirmation.
#[derive(Debug, Serialize)]
struct OrderPayload {
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    customer_address: String,
    order_items: String,
    total_price: String,
    payment_method: String,
    order_date: String,
}

/// Client for the form-relay endpoints.
#[derive(Clone)]
pub struct FormRelayClient {
    client: reqwest::Client,
    config: RelayConfig,
}

impl FormRelayClient {
    /// Create a new relay client.
    #[must_use]
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config: config.clone(),
        }
    }

    async fn post<T: Serialize + Sync>(&self, url: &str, body: &T) -> Result<(), RelayError> {
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(RelayError::Api(status))
        }
    }

    /// Relay a contact-form message.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint is unreachable or replies with a
    /// non-success status.
    #[instrument(skip(self, message), fields(email = %message.email))]
    pub async fn send_contact_message(&self, message: &ContactMessage) -> Result<(), RelayError> {
        self.post(&self.config.contact_url, message).await
    }

    /// Relay an order confirmation.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint is unreachable or replies with a
    /// non-success status.
    #[instrument(skip(self, customer, items), fields(email = %customer.email))]
    pub async fn send_order_confirmation(
        &self,
        customer: &CustomerInfo,
        items: &[CartItem],
        total_price: Decimal,
        payment_method: &str,
    ) -> Result<(), RelayError> {
        let payload = OrderPayload {
            customer_name: customer.full_name.clone(),
            customer_email: customer.email.clone(),
            customer_phone: customer.phone.clone(),
            customer_address: format!(
                "{}, {}, {}",
                customer.address, customer.city, customer.country
            ),
            order_items: format_order_items(items),
            total_price: format_fcfa(total_price),
            payment_method: payment_method.to_string(),
            order_date: chrono::Utc::now().format("%d/%m/%Y").to_string(),
        };
        self.post(&self.config.order_url, &payload).await
    }

    /// Relay a newsletter sign-up.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint is unreachable or replies with a
    /// non-success status.
    #[instrument(skip(self))]
    pub async fn send_newsletter_signup(&self, email: &str) -> Result<(), RelayError> {
        #[derive(Serialize)]
        struct NewsletterPayload<'a> {
            email: &'a str,
        }
        self.post(&self.config.newsletter_url, &NewsletterPayload { email })
            .await
    }
}

/// One line per item: "name xN - amount FCFA", at the effective price.
fn format_order_items(items: &[CartItem]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "{} x{} - {}",
                item.product.name,
                item.quantity,
                format_fcfa(item.line_total())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a EUR amount as whole FCFA.
fn format_fcfa(amount: Decimal) -> String {
    format!("{} FCFA", (amount * FCFA_RATE).round_dp(0))
}
