//! Orders as seen by the back-office.
//!
//! Orders are created outside this codebase (the storefront checkout only
//! simulates payment); the admin panel reads them and moves them through the
//! status pipeline.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{OrderId, OrderItemId};

/// Order fulfillment pipeline status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A string that names none of the pipeline statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid order status: {0}")]
pub struct ParseOrderStatusError(pub String);

impl std::str::FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseOrderStatusError(s.to_string())),
        }
    }
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_email: String,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    /// Free-form address fields (street, city, country, ...).
    pub shipping_address: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
}

/// A line of an order, read-only joined by order id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips() {
        for s in ["pending", "processing", "shipped", "delivered", "cancelled"] {
            let status: OrderStatus = s.parse().unwrap();
            assert_eq!(status.to_string(), s);
        }
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = "refunded".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err, ParseOrderStatusError("refunded".to_string()));
        assert_eq!(err.to_string(), "Invalid order status: refunded");
    }

    #[test]
    fn test_status_serde_uses_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Shipped).unwrap();
        assert_eq!(json, "\"shipped\"");
    }
}
