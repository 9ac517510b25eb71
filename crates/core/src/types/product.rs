//! Product entity and the fixed category tag set.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductId;

/// The category tags the shop actually uses.
///
/// Categories are stored as plain strings in the table store. Filtering
/// compares tags literally, so a product carrying an unknown tag simply
/// never matches a category filter.
pub const CATEGORIES: &[&str] = &["mode", "tissus", "accessoires"];

/// A catalog product.
///
/// Created and mutated only through the admin editor; read everywhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// One of [`CATEGORIES`] in practice, but not enforced on read.
    pub category: String,
    pub price: Decimal,
    /// Promotional price, at most `price` when present.
    pub discount_price: Option<Decimal>,
    /// Public URL of the product image.
    pub image: String,
    pub description: String,
    /// Customer rating, 0 to 5.
    pub rating: f32,
    pub in_stock: bool,
    pub featured: bool,
}

impl Product {
    /// The price a buyer actually pays: the discount price when present,
    /// otherwise the regular price.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.discount_price.unwrap_or(self.price)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(price: Decimal, discount: Option<Decimal>) -> Product {
        Product {
            id: ProductId::generate(),
            name: "Chemise en pagne Ankara".to_string(),
            category: "mode".to_string(),
            price,
            discount_price: discount,
            image: String::new(),
            description: String::new(),
            rating: 4.5,
            in_stock: true,
            featured: false,
        }
    }

    #[test]
    fn test_effective_price_without_discount() {
        let p = product(Decimal::new(2999, 2), None);
        assert_eq!(p.effective_price(), Decimal::new(2999, 2));
    }

    #[test]
    fn test_effective_price_prefers_discount() {
        let p = product(Decimal::new(2999, 2), Some(Decimal::new(2499, 2)));
        assert_eq!(p.effective_price(), Decimal::new(2499, 2));
    }
}
