//! Source index access: count estimation and cursor-based scanning.
//!
//! Scanning uses the server-side scroll API: the full result set is
//! partitioned into pages of at most `docs_per_request` documents, held
//! together by a keep-alive cursor so no document is duplicated or skipped
//! across page boundaries while the underlying data stays static.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{error_body, EsClient};
use crate::config::SourceConfig;
use crate::error::{Error, Result};

/// How long the server keeps the scroll cursor alive between page fetches.
const SCROLL_KEEP_ALIVE: &str = "5m";

/// One document pulled from a source index.
///
/// The body is opaque to the engine: it is carried as an untyped JSON value
/// and never interpreted. The identifier may be absent when the source did
/// not assign one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Source-assigned identifier, if any.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Opaque document body.
    #[serde(rename = "_source")]
    pub source: serde_json::Value,
}

/// Default request body: match every document.
#[must_use]
pub fn default_query() -> serde_json::Value {
    serde_json::json!({ "query": { "match_all": {} } })
}

#[derive(Debug, Deserialize)]
struct ScrollResponse {
    #[serde(rename = "_scroll_id")]
    scroll_id: Option<String>,
    hits: HitsContainer,
}

#[derive(Debug, Deserialize)]
struct HitsContainer {
    #[serde(default)]
    hits: Vec<Document>,
}

/// A source index on one cluster, with its query and page size.
pub struct IndexSource {
    client: EsClient,
    index: String,
    query: serde_json::Value,
    page_size: usize,
}

impl IndexSource {
    /// Creates a source from its configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the host list is invalid.
    pub fn new(config: &SourceConfig, page_size: usize) -> Result<Self> {
        Ok(Self {
            client: EsClient::new(&config.hosts)?,
            index: config.index.clone(),
            query: config.query.clone().unwrap_or_else(default_query),
            page_size,
        })
    }

    /// Name of the source index.
    #[must_use]
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Client for the source cluster.
    #[must_use]
    pub fn client(&self) -> &EsClient {
        &self.client
    }

    /// Counts the documents matching the configured query.
    ///
    /// The count is advisory: it is taken once, before scanning, and the
    /// true number of yielded documents may differ if the index mutates
    /// concurrently.
    ///
    /// # Errors
    ///
    /// Returns `Error::Count` if the count request fails.
    pub async fn count(&self) -> Result<u64> {
        let response = self
            .client
            .post(&format!("{}/_count", self.index))
            .json(&self.query)
            .send()
            .await
            .map_err(|e| Error::Count(format!("count request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = error_body(response).await;
            return Err(Error::Count(format!("count error {}: {}", status, body)));
        }

        #[derive(Deserialize)]
        struct CountResponse {
            count: u64,
        }

        let count_resp: CountResponse = response
            .json()
            .await
            .map_err(|e| Error::Count(format!("failed to parse count response: {}", e)))?;

        Ok(count_resp.count)
    }

    /// Opens a scroll cursor over the matching documents.
    ///
    /// The returned scan is single-pass; restarting means opening a new one.
    ///
    /// # Errors
    ///
    /// Returns `Error::Scan` if the initial search fails.
    pub async fn scan(&self) -> Result<DocumentScan<'_>> {
        let body = self.scan_body()?;
        let path = format!("{}/_search?scroll={}", self.index, SCROLL_KEEP_ALIVE);
        let page = fetch_page(&self.client, &path, &body).await?;

        let exhausted = page.hits.hits.is_empty();
        Ok(DocumentScan {
            client: &self.client,
            buffer: page.hits.hits.into(),
            scroll_id: page.scroll_id,
            exhausted,
        })
    }

    /// Builds the initial search body: the configured query plus the page
    /// size and the index-order sort the scroll API expects.
    fn scan_body(&self) -> Result<serde_json::Value> {
        let mut body = self.query.clone();
        let map = body
            .as_object_mut()
            .ok_or_else(|| Error::Config("query must be a JSON object".to_string()))?;
        map.insert("size".to_string(), serde_json::json!(self.page_size));
        map.insert("sort".to_string(), serde_json::json!(["_doc"]));
        Ok(body)
    }
}

async fn fetch_page(client: &EsClient, path: &str, body: &serde_json::Value) -> Result<ScrollResponse> {
    let response = client
        .post(path)
        .json(body)
        .send()
        .await
        .map_err(|e| Error::Scan(format!("page request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = error_body(response).await;
        return Err(Error::Scan(format!("page error {}: {}", status, body)));
    }

    response
        .json()
        .await
        .map_err(|e| Error::Scan(format!("failed to parse page response: {}", e)))
}

/// A lazy, single-pass sequence of documents held open by a scroll cursor.
pub struct DocumentScan<'a> {
    client: &'a EsClient,
    buffer: VecDeque<Document>,
    scroll_id: Option<String>,
    exhausted: bool,
}

impl DocumentScan<'_> {
    /// Yields the next document, fetching the next page when the current
    /// one is drained. Returns `Ok(None)` once the server reports no
    /// further pages.
    ///
    /// # Errors
    ///
    /// Returns `Error::Scan` if a page fetch fails mid-scan.
    pub async fn next(&mut self) -> Result<Option<Document>> {
        if let Some(doc) = self.buffer.pop_front() {
            return Ok(Some(doc));
        }
        if self.exhausted {
            return Ok(None);
        }
        self.fetch_next_page().await?;
        Ok(self.buffer.pop_front())
    }

    async fn fetch_next_page(&mut self) -> Result<()> {
        let Some(scroll_id) = self.scroll_id.clone() else {
            self.exhausted = true;
            return Ok(());
        };

        let body = serde_json::json!({
            "scroll": SCROLL_KEEP_ALIVE,
            "scroll_id": scroll_id,
        });
        let page = fetch_page(self.client, "_search/scroll", &body).await?;

        if let Some(id) = page.scroll_id {
            self.scroll_id = Some(id);
        }
        if page.hits.hits.is_empty() {
            self.exhausted = true;
        } else {
            self.buffer.extend(page.hits.hits);
        }
        Ok(())
    }

    /// Releases the server-side cursor. Best-effort: a failure here only
    /// leaves the cursor to expire on its own.
    pub async fn finish(&mut self) {
        let Some(scroll_id) = self.scroll_id.take() else {
            return;
        };
        let body = serde_json::json!({ "scroll_id": scroll_id });
        if let Err(e) = self.client.delete("_search/scroll").json(&body).send().await {
            debug!("failed to clear scroll cursor: {}", e);
        }
    }
}
