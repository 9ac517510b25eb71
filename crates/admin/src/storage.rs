//! Object-storage client for product images.
//!
//! Images live in a single public bucket. Uploads never overwrite: keys are
//! generated fresh for each upload (see [`crate::upload`]), and the service
//! is asked not to upsert so a key collision surfaces as a conflict instead
//! of silent data loss.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::ObjectStoreConfig;

/// Image uploads are capped at 5 MB.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Errors from the object-storage service, categorized by failure mode so
/// callers can react (and report) without string matching.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The configured bucket does not exist on the service.
    #[error("Storage bucket `{0}` does not exist")]
    BucketMissing(String),

    /// An object with the same key already exists.
    #[error("An object named `{0}` already exists")]
    Conflict(String),

    /// The service key is not allowed to write to the bucket.
    #[error("Not allowed to write to bucket `{0}`")]
    PermissionDenied(String),

    /// The payload is larger than the service (or this client) accepts.
    #[error("File is {size} bytes, limit is {limit}")]
    SizeExceeded { size: usize, limit: usize },

    /// Transport failure (connection, timeout, TLS).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Any other non-success reply from the service.
    #[error("Storage API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// A bucket as listed by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct Bucket {
    pub name: String,
    #[serde(default)]
    pub public: bool,
}

/// Client for the hosted object-storage service.
#[derive(Clone)]
pub struct ObjectStoreClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
}

impl ObjectStoreClient {
    /// Create a new object-storage client.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Api` if the API key cannot be encoded as a
    /// header value.
    pub fn new(config: &ObjectStoreConfig) -> Result<Self, StorageError> {
        let mut headers = HeaderMap::new();

        let key = config.api_key.expose_secret();
        let bearer =
            HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| StorageError::Api {
                status: 0,
                message: format!("invalid API key format: {e}"),
            })?;
        headers.insert("Authorization", bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                client,
                base_url: config.url.trim_end_matches('/').to_string(),
                bucket: config.bucket.clone(),
            }),
        })
    }

    /// Name of the bucket this client writes to.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.inner.bucket
    }

    /// List the buckets visible to the service key.
    #[instrument(skip(self))]
    pub async fn list_buckets(&self) -> Result<Vec<Bucket>, StorageError> {
        let url = format!("{}/storage/v1/bucket", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.categorize("", status, response.text().await.unwrap_or_default()));
        }

        response
            .json::<Vec<Bucket>>()
            .await
            .map_err(StorageError::from)
    }

    /// Upload an object to the configured bucket.
    ///
    /// The object is cached for an hour by downstream CDNs and never
    /// overwrites an existing key.
    ///
    /// # Errors
    ///
    /// `SizeExceeded` is returned locally before any network traffic when
    /// the payload is over [`MAX_UPLOAD_BYTES`].
    #[instrument(skip(self, bytes), fields(key, size = bytes.len()))]
    pub async fn upload(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(StorageError::SizeExceeded {
                size: bytes.len(),
                limit: MAX_UPLOAD_BYTES,
            });
        }

        let url = format!(
            "{}/storage/v1/object/{}/{key}",
            self.inner.base_url, self.inner.bucket
        );

        let response = self
            .inner
            .client
            .post(&url)
            .header("Content-Type", content_type)
            .header("Cache-Control", "3600")
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.categorize(key, status, response.text().await.unwrap_or_default()));
        }

        tracing::info!(key, "object uploaded");
        Ok(self.public_url(key))
    }

    /// Remove an object from the configured bucket.
    ///
    /// Removing a key that does not exist is not an error.
    #[instrument(skip(self))]
    pub async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let url = format!(
            "{}/storage/v1/object/{}/{key}",
            self.inner.base_url, self.inner.bucket
        );

        let response = self.inner.client.delete(&url).send().await?;

        let status = response.status();
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(self.categorize(key, status, response.text().await.unwrap_or_default()));
        }
        Ok(())
    }

    /// Public download URL for an object key.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{key}",
            self.inner.base_url, self.inner.bucket
        )
    }

    /// Recover the object key from a public URL produced by [`Self::public_url`].
    ///
    /// Returns `None` for URLs that do not point into this client's bucket;
    /// external image URLs pass through product rows untouched.
    #[must_use]
    pub fn object_key_from_url(&self, url: &str) -> Option<String> {
        let marker = format!("/storage/v1/object/public/{}/", self.inner.bucket);
        let (_, key) = url.split_once(&marker)?;
        if key.is_empty() {
            return None;
        }
        Some(key.to_string())
    }

    /// Map a non-success status onto the closed error set.
    fn categorize(&self, key: &str, status: StatusCode, message: String) -> StorageError {
        match status {
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => {
                StorageError::BucketMissing(self.inner.bucket.clone())
            }
            StatusCode::CONFLICT => StorageError::Conflict(key.to_string()),
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => {
                StorageError::PermissionDenied(self.inner.bucket.clone())
            }
            StatusCode::PAYLOAD_TOO_LARGE => StorageError::SizeExceeded {
                size: 0,
                limit: MAX_UPLOAD_BYTES,
            },
            _ => StorageError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}
