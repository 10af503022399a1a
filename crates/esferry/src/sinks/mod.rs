//! Document sinks: destinations for scanned documents.

pub mod index;
pub mod jsonl;

use async_trait::async_trait;

use crate::config::SinkConfig;
use crate::error::Result;
use crate::source::{Document, IndexSource};

/// Trait for document destinations.
///
/// Writes happen one document at a time, in scan order; `flush` forces any
/// buffered documents out at end of scan. Delivery is at-least-once: a
/// document retried after a transient failure may be written twice, which
/// is only safe for identifier-bearing documents (replace semantics) —
/// identifier-less documents can be duplicated by a retry.
#[async_trait]
pub trait DocumentSink: Send {
    /// One-time setup against the source, before any scanning starts.
    /// The index sink replicates the source schema here; failure is fatal
    /// to the enclosing task.
    async fn prepare(&mut self, _source: &IndexSource) -> Result<()> {
        Ok(())
    }

    /// Writes one document.
    async fn write(&mut self, doc: &Document) -> Result<()>;

    /// Flushes any buffered-but-unwritten documents.
    async fn flush(&mut self) -> Result<()>;

    /// Progress label for a transfer out of `source_index` into this sink.
    fn task_label(&self, source_index: &str) -> String;
}

/// Create a sink from configuration.
///
/// # Errors
///
/// Returns an error if the sink cannot be constructed (bad hosts, dump
/// directory not creatable).
pub fn create_sink(config: &SinkConfig, source_index: &str) -> Result<Box<dyn DocumentSink>> {
    match config {
        SinkConfig::Index(cfg) => Ok(Box::new(index::IndexSink::new(cfg)?)),
        SinkConfig::Jsonl(cfg) => Ok(Box::new(jsonl::JsonlSink::create(cfg, source_index)?)),
    }
}
