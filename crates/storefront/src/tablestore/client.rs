//! Table-storage REST client implementation.
//!
//! Uses `reqwest` for HTTP and caches the product list with `moka`
//! (60 second TTL) so catalog pages do not hammer the hosted service.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use ruche_core::{Product, ProductId, Testimonial};

use super::rows::{ProductRow, TestimonialRow};
use super::TableStoreError;
use crate::config::TablestoreConfig;

/// Cache key for the full product list.
const PRODUCTS_CACHE_KEY: &str = "products";

/// Client for the hosted table-storage service (read side).
///
/// Cheaply cloneable; the product list is cached for 60 seconds.
#[derive(Clone)]
pub struct TableStoreClient {
    inner: Arc<TableStoreClientInner>,
}

struct TableStoreClientInner {
    client: reqwest::Client,
    base_url: String,
    products: Cache<&'static str, Arc<Vec<Product>>>,
}

impl TableStoreClient {
    /// Create a new table-storage client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key cannot be encoded as a header value.
    pub fn new(config: &TablestoreConfig) -> Result<Self, TableStoreError> {
        let mut headers = HeaderMap::new();

        let key = config.api_key.expose_secret();
        let api_key = HeaderValue::from_str(key)
            .map_err(|e| TableStoreError::Config(format!("invalid API key format: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|e| TableStoreError::Config(format!("invalid API key format: {e}")))?;
        headers.insert("apikey", api_key);
        headers.insert("Authorization", bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let products = Cache::builder()
            .max_capacity(8)
            .time_to_live(Duration::from_secs(60))
            .build();

        Ok(Self {
            inner: Arc::new(TableStoreClientInner {
                client,
                base_url: config.url.trim_end_matches('/').to_string(),
                products,
            }),
        })
    }

    /// Fetch rows from a table with the given query parameters.
    async fn get_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, TableStoreError> {
        let url = format!("{}/rest/v1/{table}", self.inner.base_url);

        let response = self
            .inner
            .client
            .get(&url)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TableStoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| TableStoreError::Parse(e.to_string()))
    }

    /// List all products, newest first.
    ///
    /// Served from the in-memory cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or replies with a
    /// non-success status.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Arc<Vec<Product>>, TableStoreError> {
        if let Some(cached) = self.inner.products.get(PRODUCTS_CACHE_KEY).await {
            debug!("product list served from cache");
            return Ok(cached);
        }

        let rows: Vec<ProductRow> = self
            .get_rows(
                "products",
                &[("select", "*"), ("order", "created_at.desc")],
            )
            .await?;

        let products = Arc::new(rows.into_iter().map(Product::from).collect::<Vec<_>>());
        self.inner
            .products
            .insert(PRODUCTS_CACHE_KEY, Arc::clone(&products))
            .await;
        Ok(products)
    }

    /// Fetch a single product by id.
    ///
    /// # Errors
    ///
    /// Returns `TableStoreError::NotFound` when no row matches.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, TableStoreError> {
        let id_filter = format!("eq.{id}");
        let rows: Vec<ProductRow> = self
            .get_rows("products", &[("select", "*"), ("id", &id_filter)])
            .await?;

        rows.into_iter()
            .next()
            .map(Product::from)
            .ok_or_else(|| TableStoreError::NotFound(format!("product {id}")))
    }

    /// List testimonials approved for public display, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or replies with a
    /// non-success status.
    #[instrument(skip(self))]
    pub async fn list_approved_testimonials(&self) -> Result<Vec<Testimonial>, TableStoreError> {
        let rows: Vec<TestimonialRow> = self
            .get_rows(
                "testimonials",
                &[
                    ("select", "*"),
                    ("status", "eq.approved"),
                    ("order", "created_at.desc"),
                ],
            )
            .await?;

        Ok(rows.into_iter().map(Testimonial::from).collect())
    }

    /// Lightweight readiness probe: one row from the products table.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable.
    pub async fn ping(&self) -> Result<(), TableStoreError> {
        let _: Vec<ProductRow> = self
            .get_rows("products", &[("select", "*"), ("limit", "1")])
            .await?;
        Ok(())
    }
}
