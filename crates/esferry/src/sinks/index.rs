//! Remote index sink: upserts documents into a destination index.

use async_trait::async_trait;

use crate::client::{error_body, EsClient};
use crate::config::IndexSinkConfig;
use crate::error::{Error, Result};
use crate::schema::replicate_schema;
use crate::sinks::DocumentSink;
use crate::source::{Document, IndexSource};

/// Writes documents into an index on a destination cluster.
pub struct IndexSink {
    client: EsClient,
    index: String,
}

impl IndexSink {
    /// Creates a sink for the configured destination index.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the host list is invalid.
    pub fn new(config: &IndexSinkConfig) -> Result<Self> {
        Ok(Self {
            client: EsClient::new(&config.hosts)?,
            index: config.index.clone(),
        })
    }

    /// Client for the destination cluster.
    #[must_use]
    pub fn client(&self) -> &EsClient {
        &self.client
    }

    /// Name of the destination index.
    #[must_use]
    pub fn index(&self) -> &str {
        &self.index
    }
}

#[async_trait]
impl DocumentSink for IndexSink {
    /// Replicates the source schema into the destination index (no-op when
    /// the destination already exists).
    async fn prepare(&mut self, source: &IndexSource) -> Result<()> {
        replicate_schema(source, &self.client, &self.index).await
    }

    /// Upserts one document: an identifier-bearing document is
    /// created-or-replaced under its identifier; an identifier-less
    /// document gets a destination-assigned one (and is therefore not safe
    /// to retry — a duplicate would be created).
    async fn write(&mut self, doc: &Document) -> Result<()> {
        let request = match &doc.id {
            Some(id) => self.client.put(&format!("{}/_doc/{}", self.index, id)),
            None => self.client.post(&format!("{}/_doc", self.index)),
        };

        let response = request
            .json(&doc.source)
            .send()
            .await
            .map_err(|e| Error::Write(format!("index request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = error_body(response).await;
            return Err(Error::Write(format!("index error {}: {}", status, body)));
        }

        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn task_label(&self, source_index: &str) -> String {
        format!("Migrating: {} to: {}", source_index, self.index)
    }
}

#[cfg(test)]
#[path = "index_tests.rs"]
mod tests;
