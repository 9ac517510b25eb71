//! CLI command implementations.

pub mod check;
pub mod seed;

use secrecy::SecretString;

use ruche_admin::config::{ObjectStoreConfig, TablestoreConfig};

/// Table-store service credentials from the environment.
pub(crate) fn tablestore_config() -> Result<TablestoreConfig, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let url = std::env::var("TABLESTORE_URL").map_err(|_| "TABLESTORE_URL not set")?;
    let api_key = std::env::var("TABLESTORE_SERVICE_KEY")
        .map(SecretString::from)
        .map_err(|_| "TABLESTORE_SERVICE_KEY not set")?;

    Ok(TablestoreConfig { url, api_key })
}

/// Object-store credentials from the environment.
pub(crate) fn object_store_config() -> Result<ObjectStoreConfig, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let url = std::env::var("OBJECT_STORE_URL").map_err(|_| "OBJECT_STORE_URL not set")?;
    let api_key = std::env::var("OBJECT_STORE_SERVICE_KEY")
        .map(SecretString::from)
        .map_err(|_| "OBJECT_STORE_SERVICE_KEY not set")?;
    let bucket = std::env::var("OBJECT_STORE_BUCKET").unwrap_or_else(|_| "images".to_string());

    Ok(ObjectStoreConfig {
        url,
        api_key,
        bucket,
    })
}
