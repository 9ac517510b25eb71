//! Connectivity check for the hosted services.

use tracing::{error, info};

use ruche_admin::storage::ObjectStoreClient;
use ruche_admin::tablestore::AdminTableStoreClient;

/// Ping the table store and verify the image bucket exists.
///
/// # Errors
///
/// Returns an error when either service is unreachable or the bucket is
/// missing.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut failures = 0;

    match super::tablestore_config().map(|c| AdminTableStoreClient::new(&c)) {
        Ok(Ok(client)) => match client.ping().await {
            Ok(()) => info!("table store: ok"),
            Err(e) => {
                error!("table store: {e}");
                failures += 1;
            }
        },
        Ok(Err(e)) => {
            error!("table store: {e}");
            failures += 1;
        }
        Err(e) => {
            error!("table store: {e}");
            failures += 1;
        }
    }

    match super::object_store_config().map(|c| ObjectStoreClient::new(&c)) {
        Ok(Ok(client)) => match client.list_buckets().await {
            Ok(buckets) => {
                if buckets.iter().any(|b| b.name == client.bucket()) {
                    info!("object store: ok, bucket `{}` present", client.bucket());
                } else {
                    error!("object store: bucket `{}` missing", client.bucket());
                    failures += 1;
                }
            }
            Err(e) => {
                error!("object store: {e}");
                failures += 1;
            }
        },
        Ok(Err(e)) => {
            error!("object store: {e}");
            failures += 1;
        }
        Err(e) => {
            error!("object store: {e}");
            failures += 1;
        }
    }

    if failures > 0 {
        return Err(format!("{failures} check(s) failed").into());
    }
    Ok(())
}
