//! Shared HTTP plumbing for talking to a cluster.
//!
//! Every remote component (schema replicator, count estimator, scanner,
//! index sink) goes through [`EsClient`], which owns a timeout-configured
//! `reqwest` client and the list of endpoint addresses for one cluster.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use reqwest::Client;

use crate::error::{Error, Result};

/// Default HTTP timeout for all cluster requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Creates a configured HTTP client with timeout.
#[must_use]
pub fn create_http_client() -> Client {
    Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .connect_timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Parses a comma-separated host list into endpoint addresses.
///
/// # Errors
///
/// Returns `Error::Config` if the list is empty or an entry does not use
/// an http/https scheme.
pub fn parse_hosts(hosts: &str) -> Result<Vec<String>> {
    let parsed: Vec<String> = hosts
        .split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(|h| h.trim_end_matches('/').to_string())
        .collect();

    if parsed.is_empty() {
        return Err(Error::Config(format!("no hosts in '{}'", hosts)));
    }

    for host in &parsed {
        if !host.starts_with("http://") && !host.starts_with("https://") {
            return Err(Error::Config(format!(
                "invalid host '{}': expected an http:// or https:// address",
                host
            )));
        }
    }

    Ok(parsed)
}

/// HTTP client for one cluster, rotating requests across its endpoints.
pub struct EsClient {
    client: Client,
    hosts: Vec<String>,
    next: AtomicUsize,
}

impl EsClient {
    /// Creates a client from a comma-separated host list.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if no valid host addresses are given.
    pub fn new(hosts: &str) -> Result<Self> {
        Ok(Self {
            client: create_http_client(),
            hosts: parse_hosts(hosts)?,
            next: AtomicUsize::new(0),
        })
    }

    /// Endpoint addresses this client rotates through.
    #[must_use]
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Builds a full URL for `path` against the next endpoint in rotation.
    pub fn url(&self, path: &str) -> String {
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.hosts.len();
        format!("{}/{}", self.hosts[idx], path.trim_start_matches('/'))
    }

    /// Starts a GET request with the JSON content-type header.
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::GET, path)
    }

    /// Starts a POST request with the JSON content-type header.
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::POST, path)
    }

    /// Starts a PUT request with the JSON content-type header.
    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::PUT, path)
    }

    /// Starts a HEAD request.
    pub fn head(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.head(self.url(path))
    }

    /// Starts a DELETE request with the JSON content-type header.
    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::DELETE, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("Content-Type", "application/json")
    }
}

/// Reads the response body for an error message, with a fallback.
pub(crate) async fn error_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string())
}
