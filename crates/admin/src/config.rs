//! Admin configuration from environment variables.

use secrecy::{ExposeSecret, SecretString};
use std::env;
use std::net::SocketAddr;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment variable {name}: {message}")]
    InvalidEnvVar { name: String, message: String },

    #[error("Insecure secret for {name}: {message}")]
    InsecureSecret { name: String, message: String },
}

/// Admin server configuration.
///
/// Unlike the storefront, this binary holds the table-store *service* key
/// (full read/write) and the object-storage credentials. Keep it off the
/// public internet.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Table-store configuration (service credentials)
    pub tablestore: TablestoreConfig,

    /// Object-storage configuration
    pub object_store: ObjectStoreConfig,

    /// Password gating the back-office
    pub admin_password: SecretString,

    /// Sentry DSN for error tracking (optional)
    pub sentry_dsn: Option<String>,

    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Table-store connection settings.
#[derive(Clone)]
pub struct TablestoreConfig {
    /// Base URL of the hosted table-store service
    pub url: String,

    /// Service API key (read/write)
    pub api_key: SecretString,
}

impl std::fmt::Debug for TablestoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TablestoreConfig")
            .field("url", &self.url)
            .field("api_key", &"REDACTED")
            .finish()
    }
}

/// Object-storage connection settings.
#[derive(Clone)]
pub struct ObjectStoreConfig {
    /// Base URL of the object-storage service
    pub url: String,

    /// Service API key
    pub api_key: SecretString,

    /// Bucket holding product images
    pub bucket: String,
}

impl std::fmt::Debug for ObjectStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreConfig")
            .field("url", &self.url)
            .field("api_key", &"REDACTED")
            .field("bucket", &self.bucket)
            .finish()
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let tablestore_api_key = require_env("TABLESTORE_SERVICE_KEY")?;
        validate_secret_strength("TABLESTORE_SERVICE_KEY", &tablestore_api_key)?;

        let tablestore = TablestoreConfig {
            url: require_url("TABLESTORE_URL")?,
            api_key: SecretString::from(tablestore_api_key),
        };

        let object_store_api_key = require_env("OBJECT_STORE_SERVICE_KEY")?;
        validate_secret_strength("OBJECT_STORE_SERVICE_KEY", &object_store_api_key)?;

        let object_store = ObjectStoreConfig {
            url: require_url("OBJECT_STORE_URL")?,
            api_key: SecretString::from(object_store_api_key),
            bucket: env::var("OBJECT_STORE_BUCKET").unwrap_or_else(|_| "images".to_string()),
        };

        let admin_password = require_env("ADMIN_PASSWORD")?;
        validate_secret_strength("ADMIN_PASSWORD", &admin_password)?;

        let host = env::var("ADMIN_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("ADMIN_PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                name: "ADMIN_PORT".to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            host,
            port,
            tablestore,
            object_store,
            admin_password: SecretString::from(admin_password),
            sentry_dsn: env::var("SENTRY_DSN").ok().filter(|s| !s.is_empty()),
            sentry_environment: env::var("SENTRY_ENVIRONMENT").ok(),
        })
    }

    /// Socket address to bind to.
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], self.port)))
    }

    /// Constant-ish comparison of a login attempt against the configured
    /// password. Length leaks; content does not.
    pub fn verify_password(&self, attempt: &str) -> bool {
        let expected = self.admin_password.expose_secret().as_bytes();
        let given = attempt.as_bytes();
        if expected.len() != given.len() {
            return false;
        }
        expected
            .iter()
            .zip(given)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn require_url(name: &str) -> Result<String, ConfigError> {
    let value = require_env(name)?;
    url::Url::parse(&value).map_err(|e| ConfigError::InvalidEnvVar {
        name: name.to_string(),
        message: format!("not a valid URL: {e}"),
    })?;
    Ok(value)
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
pub(crate) fn validate_secret_strength(name: &str, value: &str) -> Result<(), ConfigError> {
    const PLACEHOLDERS: &[&str] = &[
        "changeme",
        "change-me",
        "placeholder",
        "secret",
        "password",
        "example",
        "your-key-here",
        "xxx",
        "test",
        "dummy",
    ];

    let lowered = value.to_lowercase();
    if PLACEHOLDERS.iter().any(|p| lowered.contains(p)) {
        return Err(ConfigError::InsecureSecret {
            name: name.to_string(),
            message: "value looks like a placeholder".to_string(),
        });
    }

    if value.len() < 16 {
        return Err(ConfigError::InsecureSecret {
            name: name.to_string(),
            message: "value is too short (minimum 16 characters)".to_string(),
        });
    }

    if shannon_entropy(value) < 3.0 {
        return Err(ConfigError::InsecureSecret {
            name: name.to_string(),
            message: "value has too little entropy".to_string(),
        });
    }

    Ok(())
}

/// Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    let len = s.chars().count();
    if len == 0 {
        return 0.0;
    }

    let mut counts = std::collections::HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_insert(0usize) += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    counts
        .values()
        .map(|&count| {
            let p = count as f64 / len as f64;
            -p * p.log2()
        })
        .sum()
}
