//! Schema replication: copy index settings and mappings to a destination.

use serde_json::Value;
use tracing::{debug, info};

use crate::client::{error_body, EsClient};
use crate::error::{Error, Result};
use crate::source::IndexSource;

/// Cluster-assigned settings keys that are not portable across clusters.
/// The create call would reject or silently drop them.
const NON_PORTABLE_SETTINGS: [&str; 4] = ["creation_date", "provided_name", "uuid", "version"];

/// Replicates the source index schema to `destination_index`.
///
/// If the destination index already exists this is a no-op: an existing
/// schema is never overwritten. Otherwise the source settings (sanitized)
/// and mappings (verbatim) are used to create it.
///
/// # Errors
///
/// Returns `Error::SchemaReplication` on any fetch, exists-check, or
/// create failure; the enclosing task treats this as fatal.
pub async fn replicate_schema(
    source: &IndexSource,
    destination: &EsClient,
    destination_index: &str,
) -> Result<()> {
    let response = destination
        .head(destination_index)
        .send()
        .await
        .map_err(|e| Error::SchemaReplication(format!("exists check failed: {}", e)))?;

    if response.status().is_success() {
        debug!(
            "destination index '{}' already exists, keeping its schema",
            destination_index
        );
        return Ok(());
    }
    if response.status().as_u16() != 404 {
        return Err(Error::SchemaReplication(format!(
            "exists check for '{}' returned {}",
            destination_index,
            response.status()
        )));
    }

    let mut settings = fetch_index_field(source, "_settings", "settings").await?;
    sanitize_index_settings(&mut settings);
    let mappings = fetch_index_field(source, "_mapping", "mappings").await?;

    let body = serde_json::json!({
        "settings": settings,
        "mappings": mappings,
    });

    let response = destination
        .put(destination_index)
        .json(&body)
        .send()
        .await
        .map_err(|e| Error::SchemaReplication(format!("create request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = error_body(response).await;
        return Err(Error::SchemaReplication(format!(
            "create of '{}' rejected {}: {}",
            destination_index, status, body
        )));
    }

    info!(
        "created destination index '{}' from source schema",
        destination_index
    );
    Ok(())
}

/// Fetches `GET <index>/<endpoint>` and pulls `field` out of the per-index
/// entry. The response is keyed by the concrete index name, which may
/// differ from the requested name when scanning through an alias, so fall
/// back to the first entry.
async fn fetch_index_field(source: &IndexSource, endpoint: &str, field: &str) -> Result<Value> {
    let path = format!("{}/{}", source.index(), endpoint);
    let response = source
        .client()
        .get(&path)
        .send()
        .await
        .map_err(|e| Error::SchemaReplication(format!("fetch of {} failed: {}", path, e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = error_body(response).await;
        return Err(Error::SchemaReplication(format!(
            "fetch of {} returned {}: {}",
            path, status, body
        )));
    }

    let payload: Value = response.json().await.map_err(|e| {
        Error::SchemaReplication(format!("malformed response from {}: {}", path, e))
    })?;

    extract_index_entry(&payload, source.index(), field).ok_or_else(|| {
        Error::SchemaReplication(format!("no '{}' entry in response from {}", field, path))
    })
}

fn extract_index_entry(payload: &Value, index: &str, field: &str) -> Option<Value> {
    let map = payload.as_object()?;
    let entry = map.get(index).or_else(|| map.values().next())?;
    entry.get(field).cloned()
}

/// Removes cluster-assigned keys from the `index` settings block.
/// Tolerant of any subset of the keys (or the whole block) being absent.
pub(crate) fn sanitize_index_settings(settings: &mut Value) {
    if let Some(index) = settings.get_mut("index").and_then(Value::as_object_mut) {
        for key in NON_PORTABLE_SETTINGS {
            index.remove(key);
        }
    }
}
