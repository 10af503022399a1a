//! # esferry
//!
//! `esferry` is a CLI tool and library for transferring Elasticsearch
//! indices: replicate an index (schema + documents) into another cluster,
//! or dump it to chunked JSONL archive files.
//!
//! ## Modes
//!
//! | Sink | What happens |
//! |------|--------------|
//! | `index` | Destination index created from the source schema if absent, then every matching document is upserted |
//! | `jsonl` | Matching documents are written as newline-delimited JSON, `docs_per_file` per file |
//!
//! ## Quick Start
//!
//! ```bash
//! # Generate a config template, edit it, run
//! esferry init --mode index
//! esferry run --config transfer.yaml
//! ```
//!
//! ## Configuration Example
//!
//! ```yaml
//! source:
//!   hosts: http://localhost:9200
//!   index: products
//!
//! sink:
//!   type: index
//!   hosts: http://other-cluster:9200
//!   index: products
//!
//! options:
//!   docs_per_request: 10000
//! ```
//!
//! ## Delivery semantics
//!
//! Delivery is at-least-once. Identifier-bearing documents are written
//! with replace semantics, so re-running a transfer is safe for them.
//! Identifier-less documents get a destination-assigned identifier on
//! every write: re-running (or retrying after a transient failure) can
//! duplicate them. This is a known limitation, not something the engine
//! papers over.

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod schema;
pub mod sinks;
pub mod source;

pub use config::{
    IndexSinkConfig, JsonlSinkConfig, SinkConfig, SourceConfig, TransferConfig, TransferOptions,
};
pub use error::{Error, Result};
pub use pipeline::{TransferSummary, TransferTask};
pub use progress::{ProgressBarReporter, ProgressReporter, TaskStatus, TransferProgress};
pub use sinks::{create_sink, DocumentSink};
pub use source::{Document, DocumentScan, IndexSource};
