//! Product listing and detail handlers.

use std::collections::HashSet;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use ruche_core::{Product, ProductId};

use crate::catalog::{ProductFilter, related_products};
use crate::error::Result;
use crate::state::AppState;

/// How many related products a detail page shows.
const RELATED_LIMIT: usize = 4;

/// Filter query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    /// Free-text name search.
    pub search: Option<String>,
    /// Comma-separated category tags.
    pub categories: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub in_stock_only: Option<bool>,
}

impl From<CatalogQuery> for ProductFilter {
    fn from(query: CatalogQuery) -> Self {
        let categories: HashSet<String> = query
            .categories
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect();

        Self {
            search: query.search.unwrap_or_default(),
            categories,
            min_price: query.min_price,
            max_price: query.max_price,
            in_stock_only: query.in_stock_only.unwrap_or(false),
        }
    }
}

/// Product detail payload.
#[derive(Debug, Serialize)]
pub struct ProductDetailView {
    pub product: Product,
    pub related: Vec<Product>,
}

/// Product listing handler: fetch, filter, render.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = state.tablestore().list_products().await?;
    let filter = ProductFilter::from(query);
    let visible = filter
        .apply(&products)
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();
    Ok(Json(visible))
}

/// Product detail handler.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductDetailView>> {
    let product = state.tablestore().get_product(id).await?;

    // Related products come from the cached list; a failure here only
    // costs the suggestions.
    let related = match state.tablestore().list_products().await {
        Ok(products) => related_products(&products, &product, RELATED_LIMIT)
            .into_iter()
            .cloned()
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to load related products");
            Vec::new()
        }
    };

    Ok(Json(ProductDetailView { product, related }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_query_parses_category_list() {
        let query = CatalogQuery {
            search: Some("sac".to_string()),
            categories: Some("mode, tissus,,".to_string()),
            min_price: None,
            max_price: Some(Decimal::new(60, 0)),
            in_stock_only: None,
        };
        let filter = ProductFilter::from(query);

        assert_eq!(filter.search, "sac");
        assert_eq!(filter.categories.len(), 2);
        assert!(filter.categories.contains("mode"));
        assert!(filter.categories.contains("tissus"));
        assert!(!filter.in_stock_only);
    }

    #[test]
    fn test_catalog_query_empty_categories_means_all() {
        let query = CatalogQuery {
            search: None,
            categories: None,
            min_price: None,
            max_price: None,
            in_stock_only: Some(true),
        };
        let filter = ProductFilter::from(query);

        assert!(filter.categories.is_empty());
        assert!(filter.in_stock_only);
    }
}
