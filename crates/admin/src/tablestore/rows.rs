//! Row shapes for the table-storage service, read and write side.
//!
//! Read rows mirror the storefront defaults (missing rating reads as 4,
//! `in_stock` true unless explicitly false). Write shapes serialize every
//! column so an update replaces the full editable row.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ruche_core::{
    Discount, Order, OrderId, OrderItem, OrderItemId, OrderStatus, Product, ProductId, Promocode,
    PromocodeId, Testimonial, TestimonialId, TestimonialStatus,
};

use super::TableStoreError;
use crate::editor::ProductDraft;

// ============================================================================
// Products
// ============================================================================

/// A row of the `products` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub in_stock: Option<bool>,
    pub featured: Option<bool>,
    pub rating: Option<f32>,
    #[allow(dead_code)]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            category: row.category.unwrap_or_default(),
            price: row.price,
            discount_price: row.discount_price,
            image: row.image_url.unwrap_or_default(),
            description: row.description.unwrap_or_default(),
            rating: row.rating.unwrap_or(4.0),
            in_stock: row.in_stock.unwrap_or(true),
            featured: row.featured.unwrap_or(false),
        }
    }
}

/// The editable columns of a product, serialized for insert and update.
///
/// `discount_price` serializes as an explicit `null` when absent so an
/// update can clear a previously set promotion.
#[derive(Debug, Clone, Serialize)]
pub struct ProductChangeset {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub description: String,
    pub image_url: String,
    pub rating: f32,
    pub in_stock: bool,
    pub featured: bool,
}

impl From<&ProductDraft> for ProductChangeset {
    fn from(draft: &ProductDraft) -> Self {
        Self {
            name: draft.name.trim().to_string(),
            category: draft.category.clone(),
            price: draft.price,
            discount_price: draft.discount_price,
            description: draft.description.clone(),
            image_url: draft.image.clone(),
            rating: draft.rating,
            in_stock: draft.in_stock,
            featured: draft.featured,
        }
    }
}

// ============================================================================
// Orders
// ============================================================================

/// A row of the `orders` table.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRow {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub shipping_address: Option<BTreeMap<String, String>>,
    pub created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            customer_name: row.customer_name,
            customer_email: row.customer_email.unwrap_or_default(),
            total_amount: row.total_amount,
            status: row.status,
            shipping_address: row.shipping_address.unwrap_or_default(),
            created_at: row.created_at,
        }
    }
}

/// A row of the `order_items` table.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

/// Projection used by the revenue aggregate.
#[derive(Debug, Deserialize)]
pub struct OrderTotalRow {
    pub total_amount: Decimal,
}

// ============================================================================
// Testimonials
// ============================================================================

/// A row of the `testimonials` table.
#[derive(Debug, Clone, Deserialize)]
pub struct TestimonialRow {
    pub id: Uuid,
    pub customer_name: String,
    pub content: Option<String>,
    pub rating: Option<f32>,
    pub status: TestimonialStatus,
    pub created_at: DateTime<Utc>,
}

impl From<TestimonialRow> for Testimonial {
    fn from(row: TestimonialRow) -> Self {
        Self {
            id: TestimonialId::new(row.id),
            customer_name: row.customer_name,
            content: row.content.unwrap_or_default(),
            rating: row.rating.unwrap_or(4.0),
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// Insert shape for a testimonial. New entries start in moderation.
#[derive(Debug, Clone, Serialize)]
pub struct NewTestimonialRow {
    pub customer_name: String,
    pub content: String,
    pub rating: f32,
    pub status: TestimonialStatus,
}

// ============================================================================
// Promo codes
// ============================================================================

/// A row of the `promocodes` table.
///
/// The table stores the discount in two nullable columns. Exactly one is
/// expected to be set; rows with neither are rejected on read.
#[derive(Debug, Clone, Deserialize)]
pub struct PromocodeRow {
    pub id: Uuid,
    pub code: String,
    pub discount_percent: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: Option<DateTime<Utc>>,
    pub usage_limit: Option<u32>,
    pub usage_count: Option<u32>,
}

impl TryFrom<PromocodeRow> for Promocode {
    type Error = TableStoreError;

    fn try_from(row: PromocodeRow) -> Result<Self, Self::Error> {
        let discount = match (row.discount_percent, row.discount_amount) {
            (Some(percent), _) => Discount::Percent(percent),
            (None, Some(amount)) => Discount::Amount(amount),
            (None, None) => {
                return Err(TableStoreError::Parse(format!(
                    "promocode {} has neither discount_percent nor discount_amount",
                    row.code
                )));
            }
        };

        Ok(Self {
            id: PromocodeId::new(row.id),
            code: row.code,
            discount,
            valid_from: row.valid_from,
            valid_until: row.valid_until,
            usage_limit: row.usage_limit,
            usage_count: row.usage_count.unwrap_or(0),
        })
    }
}

/// Write shape for a promo code.
///
/// Maps the single [`Discount`] value back onto the two storage columns,
/// explicitly nulling the unused one.
#[derive(Debug, Clone, Serialize)]
pub struct PromocodeChangeset {
    pub code: String,
    pub discount_percent: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: Option<DateTime<Utc>>,
    pub usage_limit: Option<u32>,
}

impl PromocodeChangeset {
    #[must_use]
    pub fn new(
        code: String,
        discount: Discount,
        valid_from: DateTime<Utc>,
        valid_until: Option<DateTime<Utc>>,
        usage_limit: Option<u32>,
    ) -> Self {
        let (discount_percent, discount_amount) = match discount {
            Discount::Percent(p) => (Some(p), None),
            Discount::Amount(a) => (None, Some(a)),
        };
        Self {
            code: code.trim().to_uppercase(),
            discount_percent,
            discount_amount,
            valid_from,
            valid_until,
            usage_limit,
        }
    }
}
