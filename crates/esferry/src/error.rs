//! Error types for esferry.

use thiserror::Error;

/// Errors that can occur during an index transfer.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration (malformed query, non-positive sizes, missing fields).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Schema replication failed (destination unreachable, create rejected).
    #[error("schema replication failed: {0}")]
    SchemaReplication(String),

    /// The source count query failed.
    #[error("count query failed: {0}")]
    Count(String),

    /// A page fetch failed or the cursor expired mid-scan.
    #[error("scan failed: {0}")]
    Scan(String),

    /// A destination index write or disk write failed.
    #[error("write failed: {0}")]
    Write(String),

    /// I/O error (config file access).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error (config file).
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for esferry operations.
pub type Result<T> = std::result::Result<T, Error>;
