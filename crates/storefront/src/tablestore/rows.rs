//! Raw row shapes returned by the table-storage service.
//!
//! Column names are snake_case as stored; conversion into the domain types
//! applies the defaults the application has always used: a missing rating
//! reads as 4, `in_stock` is true unless explicitly false, `featured`
//! defaults to false.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use ruche_core::{Product, ProductId, Testimonial, TestimonialId, TestimonialStatus};

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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_row_defaults() {
        let json = r#"{
            "id": "4b6b7b2e-7f66-4a8f-9a43-0d4a4b8a2f11",
            "name": "Sac a main en pagne",
            "price": 49.99
        }"#;
        let row: ProductRow = serde_json::from_str(json).unwrap();
        let product = Product::from(row);

        assert_eq!(product.name, "Sac a main en pagne");
        assert!(product.in_stock);
        assert!(!product.featured);
        assert!((product.rating - 4.0).abs() < f32::EPSILON);
        assert!(product.discount_price.is_none());
        assert!(product.image.is_empty());
    }

    #[test]
    fn test_product_row_explicit_out_of_stock() {
        let json = r#"{
            "id": "4b6b7b2e-7f66-4a8f-9a43-0d4a4b8a2f11",
            "name": "Ensemble Kente femme",
            "category": "mode",
            "price": 89.99,
            "discount_price": 79.99,
            "in_stock": false,
            "featured": true,
            "rating": 4.8
        }"#;
        let row: ProductRow = serde_json::from_str(json).unwrap();
        let product = Product::from(row);

        assert!(!product.in_stock);
        assert!(product.featured);
        assert_eq!(product.category, "mode");
        assert_eq!(product.discount_price, Some(Decimal::new(7999, 2)));
        assert_eq!(product.effective_price(), Decimal::new(7999, 2));
    }

    #[test]
    fn test_testimonial_row_status_parse() {
        let json = r#"{
            "id": "4b6b7b2e-7f66-4a8f-9a43-0d4a4b8a2f11",
            "customer_name": "Awa",
            "content": "Superbe qualite",
            "rating": 5,
            "status": "approved",
            "created_at": "2025-11-03T10:00:00Z"
        }"#;
        let row: TestimonialRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.status, TestimonialStatus::Approved);
    }
}
