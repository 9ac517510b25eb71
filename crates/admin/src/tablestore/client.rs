//! Table-storage REST client, service-key side.
//!
//! Same wire protocol as the storefront read client, plus inserts
//! (`POST` + `Prefer: return=representation`), partial row updates
//! (`PATCH` on an id filter), deletes, and exact row counts
//! (`Prefer: count=exact` + `Content-Range`).

use std::future::Future;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use ruche_core::{
    Order, OrderId, OrderItem, OrderStatus, Product, ProductId, Promocode, PromocodeId,
    Testimonial, TestimonialId, TestimonialStatus,
};

use super::TableStoreError;
use super::rows::{
    NewTestimonialRow, OrderItemRow, OrderRow, OrderTotalRow, ProductChangeset, ProductRow,
    PromocodeChangeset, PromocodeRow, TestimonialRow,
};
use crate::config::TablestoreConfig;
use crate::editor::{ProductDraft, ProductWriter};

/// Client for the hosted table-storage service (service key, full CRUD).
///
/// Cheaply cloneable. No caching: the back-office always reads fresh rows.
#[derive(Clone)]
pub struct AdminTableStoreClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl AdminTableStoreClient {
    /// Create a new client from the service credentials.
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

        Ok(Self {
            inner: Arc::new(ClientInner {
                client,
                base_url: config.url.trim_end_matches('/').to_string(),
            }),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.inner.base_url)
    }

    async fn decode_rows<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Vec<T>, TableStoreError> {
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

    /// Fetch rows from a table with the given query parameters.
    async fn get_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, TableStoreError> {
        let response = self
            .inner
            .client
            .get(self.table_url(table))
            .query(query)
            .send()
            .await?;

        Self::decode_rows(response).await
    }

    /// Insert a row and return the stored representation.
    async fn insert_row<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<T, TableStoreError> {
        let response = self
            .inner
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;

        let mut rows: Vec<T> = Self::decode_rows(response).await?;
        if rows.is_empty() {
            return Err(TableStoreError::Parse(format!(
                "insert into {table} returned no representation"
            )));
        }
        Ok(rows.remove(0))
    }

    /// Patch rows matching an id filter and return the updated row.
    async fn patch_row<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
        body: &B,
    ) -> Result<T, TableStoreError> {
        let id_filter = format!("eq.{id}");
        let response = self
            .inner
            .client
            .patch(self.table_url(table))
            .query(&[("id", id_filter.as_str())])
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;

        let mut rows: Vec<T> = Self::decode_rows(response).await?;
        if rows.is_empty() {
            return Err(TableStoreError::NotFound(format!("{table} row {id}")));
        }
        Ok(rows.remove(0))
    }

    /// Delete rows matching an id filter.
    async fn delete_row(&self, table: &str, id: &str) -> Result<(), TableStoreError> {
        let id_filter = format!("eq.{id}");
        let response = self
            .inner
            .client
            .delete(self.table_url(table))
            .query(&[("id", id_filter.as_str())])
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
        Ok(())
    }

    /// Exact row count for a table, without fetching the rows.
    async fn count_rows(&self, table: &str) -> Result<u64, TableStoreError> {
        let response = self
            .inner
            .client
            .get(self.table_url(table))
            .query(&[("select", "id"), ("limit", "1")])
            .header("Prefer", "count=exact")
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

        let header = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                TableStoreError::Parse(format!("count for {table}: missing Content-Range"))
            })?;

        parse_content_range_total(header).ok_or_else(|| {
            TableStoreError::Parse(format!("count for {table}: bad Content-Range `{header}`"))
        })
    }

    // ========================================================================
    // Products
    // ========================================================================

    /// List all products, newest first.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, TableStoreError> {
        let rows: Vec<ProductRow> = self
            .get_rows("products", &[("select", "*"), ("order", "created_at.desc")])
            .await?;
        Ok(rows.into_iter().map(Product::from).collect())
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

    /// Insert a new product.
    #[instrument(skip(self, changeset), fields(name = %changeset.name))]
    pub async fn create_product(
        &self,
        changeset: &ProductChangeset,
    ) -> Result<Product, TableStoreError> {
        let row: ProductRow = self.insert_row("products", changeset).await?;
        Ok(Product::from(row))
    }

    /// Replace the editable columns of a product.
    #[instrument(skip(self, changeset))]
    pub async fn update_product(
        &self,
        id: ProductId,
        changeset: &ProductChangeset,
    ) -> Result<Product, TableStoreError> {
        let row: ProductRow = self
            .patch_row("products", &id.to_string(), changeset)
            .await?;
        Ok(Product::from(row))
    }

    /// Delete a product row. The caller is responsible for removing the
    /// product image from object storage first.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), TableStoreError> {
        self.delete_row("products", &id.to_string()).await
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// List orders, newest first, optionally restricted to one status.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, TableStoreError> {
        let mut query = vec![
            ("select".to_string(), "*".to_string()),
            ("order".to_string(), "created_at.desc".to_string()),
        ];
        if let Some(status) = status {
            query.push(("status".to_string(), format!("eq.{status}")));
        }
        let query: Vec<(&str, &str)> = query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        let rows: Vec<OrderRow> = self.get_rows("orders", &query).await?;
        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Move an order to a new pipeline status.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, TableStoreError> {
        #[derive(Serialize)]
        struct StatusPatch {
            status: OrderStatus,
        }

        let row: OrderRow = self
            .patch_row("orders", &id.to_string(), &StatusPatch { status })
            .await?;
        Ok(Order::from(row))
    }

    /// Lines of one order.
    #[instrument(skip(self))]
    pub async fn list_order_items(&self, id: OrderId) -> Result<Vec<OrderItem>, TableStoreError> {
        let order_filter = format!("eq.{id}");
        let rows: Vec<OrderItemRow> = self
            .get_rows("order_items", &[("select", "*"), ("order_id", &order_filter)])
            .await?;
        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    // ========================================================================
    // Testimonials
    // ========================================================================

    /// List all testimonials (every moderation status), newest first.
    #[instrument(skip(self))]
    pub async fn list_testimonials(&self) -> Result<Vec<Testimonial>, TableStoreError> {
        let rows: Vec<TestimonialRow> = self
            .get_rows(
                "testimonials",
                &[("select", "*"), ("order", "created_at.desc")],
            )
            .await?;
        Ok(rows.into_iter().map(Testimonial::from).collect())
    }

    /// Insert a testimonial.
    #[instrument(skip(self, row), fields(customer = %row.customer_name))]
    pub async fn create_testimonial(
        &self,
        row: &NewTestimonialRow,
    ) -> Result<Testimonial, TableStoreError> {
        let stored: TestimonialRow = self.insert_row("testimonials", row).await?;
        Ok(Testimonial::from(stored))
    }

    /// Move a testimonial through moderation.
    #[instrument(skip(self))]
    pub async fn set_testimonial_status(
        &self,
        id: TestimonialId,
        status: TestimonialStatus,
    ) -> Result<Testimonial, TableStoreError> {
        #[derive(Serialize)]
        struct StatusPatch {
            status: TestimonialStatus,
        }

        let row: TestimonialRow = self
            .patch_row("testimonials", &id.to_string(), &StatusPatch { status })
            .await?;
        Ok(Testimonial::from(row))
    }

    /// Delete a testimonial.
    #[instrument(skip(self))]
    pub async fn delete_testimonial(&self, id: TestimonialId) -> Result<(), TableStoreError> {
        self.delete_row("testimonials", &id.to_string()).await
    }

    // ========================================================================
    // Promo codes
    // ========================================================================

    /// List all promo codes, newest first by validity start.
    #[instrument(skip(self))]
    pub async fn list_promocodes(&self) -> Result<Vec<Promocode>, TableStoreError> {
        let rows: Vec<PromocodeRow> = self
            .get_rows(
                "promocodes",
                &[("select", "*"), ("order", "valid_from.desc")],
            )
            .await?;
        rows.into_iter().map(Promocode::try_from).collect()
    }

    /// Insert a promo code.
    #[instrument(skip(self, changeset), fields(code = %changeset.code))]
    pub async fn create_promocode(
        &self,
        changeset: &PromocodeChangeset,
    ) -> Result<Promocode, TableStoreError> {
        let row: PromocodeRow = self.insert_row("promocodes", changeset).await?;
        Promocode::try_from(row)
    }

    /// Replace the editable columns of a promo code.
    #[instrument(skip(self, changeset))]
    pub async fn update_promocode(
        &self,
        id: PromocodeId,
        changeset: &PromocodeChangeset,
    ) -> Result<Promocode, TableStoreError> {
        let row: PromocodeRow = self
            .patch_row("promocodes", &id.to_string(), changeset)
            .await?;
        Promocode::try_from(row)
    }

    /// Delete a promo code.
    #[instrument(skip(self))]
    pub async fn delete_promocode(&self, id: PromocodeId) -> Result<(), TableStoreError> {
        self.delete_row("promocodes", &id.to_string()).await
    }

    // ========================================================================
    // Dashboard aggregates
    // ========================================================================

    /// Exact number of orders.
    pub async fn count_orders(&self) -> Result<u64, TableStoreError> {
        self.count_rows("orders").await
    }

    /// Exact number of products.
    pub async fn count_products(&self) -> Result<u64, TableStoreError> {
        self.count_rows("products").await
    }

    /// Exact number of testimonials.
    pub async fn count_testimonials(&self) -> Result<u64, TableStoreError> {
        self.count_rows("testimonials").await
    }

    /// Sum of `total_amount` over all orders, regardless of status.
    #[instrument(skip(self))]
    pub async fn total_revenue(&self) -> Result<Decimal, TableStoreError> {
        let rows: Vec<OrderTotalRow> = self
            .get_rows("orders", &[("select", "total_amount")])
            .await?;
        Ok(rows.iter().map(|r| r.total_amount).sum())
    }

    /// Lightweight readiness probe: one row from the products table.
    pub async fn ping(&self) -> Result<(), TableStoreError> {
        let _: Vec<ProductRow> = self
            .get_rows("products", &[("select", "*"), ("limit", "1")])
            .await?;
        Ok(())
    }
}

impl ProductWriter for AdminTableStoreClient {
    fn create(
        &self,
        draft: ProductDraft,
    ) -> impl Future<Output = Result<Product, TableStoreError>> + Send {
        let client = self.clone();
        async move {
            client
                .create_product(&ProductChangeset::from(&draft))
                .await
        }
    }

    fn update(
        &self,
        id: ProductId,
        draft: ProductDraft,
    ) -> impl Future<Output = Result<Product, TableStoreError>> + Send {
        let client = self.clone();
        async move {
            client
                .update_product(id, &ProductChangeset::from(&draft))
                .await
        }
    }
}

/// Extract the total from a `Content-Range` header (`items 0-0/57`, `*/57`).
fn parse_content_range_total(header: &str) -> Option<u64> {
    let (_, total) = header.rsplit_once('/')?;
    total.trim().parse().ok()
}
