//! Client-side catalog filtering.
//!
//! Filtering is a pure computation over an already-fetched product list:
//! it never mutates the source and is recomputed whenever a criterion or
//! the list changes. A product passes when every active criterion matches;
//! the price criterion uses the effective price (discount price when
//! present).

use std::collections::HashSet;

use rust_decimal::Decimal;

use ruche_core::Product;

/// Active filter criteria for the catalog views.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring match on the product name.
    pub search: String,
    /// Selected category tags; empty means "all categories".
    pub categories: HashSet<String>,
    /// Inclusive lower bound on the effective price.
    pub min_price: Option<Decimal>,
    /// Inclusive upper bound on the effective price.
    pub max_price: Option<Decimal>,
    /// When set, only in-stock products pass.
    pub in_stock_only: bool,
}

impl ProductFilter {
    /// Does `product` pass every active criterion?
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            if !product.name.to_lowercase().contains(&needle) {
                return false;
            }
        }

        if !self.categories.is_empty() && !self.categories.contains(&product.category) {
            return false;
        }

        let price = product.effective_price();
        if self.min_price.is_some_and(|min| price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| price > max) {
            return false;
        }

        if self.in_stock_only && !product.in_stock {
            return false;
        }

        true
    }

    /// Compute the visible subset of `products`.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Products related to `product`: same category, excluding itself, capped.
#[must_use]
pub fn related_products<'a>(
    products: &'a [Product],
    product: &Product,
    limit: usize,
) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| p.category == product.category && p.id != product.id)
        .take(limit)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ruche_core::ProductId;

    fn product(
        name: &str,
        category: &str,
        price: i64,
        discount: Option<i64>,
        in_stock: bool,
    ) -> Product {
        Product {
            id: ProductId::generate(),
            name: name.to_string(),
            category: category.to_string(),
            price: Decimal::new(price, 0),
            discount_price: discount.map(|d| Decimal::new(d, 0)),
            image: String::new(),
            description: String::new(),
            rating: 4.0,
            in_stock,
            featured: false,
        }
    }

    fn fixtures() -> Vec<Product> {
        vec![
            product("Chemise Ankara", "mode", 30, None, true),
            product("Sac", "mode", 50, Some(40), false),
        ]
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let products = fixtures();
        let filter = ProductFilter {
            search: "chemise".to_string(),
            ..ProductFilter::default()
        };

        let visible = filter.apply(&products);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible.first().unwrap().name, "Chemise Ankara");
    }

    #[test]
    fn test_price_range_uses_effective_price() {
        let products = fixtures();
        let filter = ProductFilter {
            categories: HashSet::from(["mode".to_string()]),
            min_price: Some(Decimal::new(35, 0)),
            max_price: Some(Decimal::new(60, 0)),
            ..ProductFilter::default()
        };

        // The Sac lists at 50 but its effective price is 40, inside [35, 60];
        // the Chemise's 30 is below the range.
        let visible = filter.apply(&products);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible.first().unwrap().name, "Sac");
    }

    #[test]
    fn test_in_stock_only_excludes_regardless_of_other_criteria() {
        let products = fixtures();
        let filter = ProductFilter {
            categories: HashSet::from(["mode".to_string()]),
            min_price: Some(Decimal::new(35, 0)),
            max_price: Some(Decimal::new(60, 0)),
            in_stock_only: true,
            ..ProductFilter::default()
        };

        assert!(filter.apply(&products).is_empty());
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let products = fixtures();
        let filter = ProductFilter {
            min_price: Some(Decimal::new(30, 0)),
            max_price: Some(Decimal::new(30, 0)),
            ..ProductFilter::default()
        };

        let visible = filter.apply(&products);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible.first().unwrap().name, "Chemise Ankara");
    }

    #[test]
    fn test_unknown_category_matches_nothing() {
        let products = fixtures();
        let filter = ProductFilter {
            categories: HashSet::from(["electronique".to_string()]),
            ..ProductFilter::default()
        };

        assert!(filter.apply(&products).is_empty());
    }

    #[test]
    fn test_empty_filter_passes_everything() {
        let products = fixtures();
        assert_eq!(ProductFilter::default().apply(&products).len(), 2);
    }

    #[test]
    fn test_related_products_same_category_excluding_self() {
        let products = vec![
            product("Chemise Ankara", "mode", 30, None, true),
            product("Sac", "mode", 50, None, true),
            product("Pagne Wax", "tissus", 70, None, true),
        ];
        let subject = products.first().unwrap().clone();

        let related = related_products(&products, &subject, 4);
        assert_eq!(related.len(), 1);
        assert_eq!(related.first().unwrap().name, "Sac");
    }
}
