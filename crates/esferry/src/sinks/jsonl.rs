//! Chunked JSONL file sink.
//!
//! Documents are buffered in encounter order and written as
//! newline-delimited JSON, `docs_per_file` documents per file. Files are
//! named `<source_index>-<chunk>.jsonl` with chunk numbers starting at 1;
//! an existing file with the same name is truncated, never appended to.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::config::JsonlSinkConfig;
use crate::error::{Error, Result};
use crate::sinks::DocumentSink;
use crate::source::Document;

/// Writes documents to chunked JSONL files in a local directory.
pub struct JsonlSink {
    dir: PathBuf,
    collection: String,
    docs_per_file: usize,
    buffer: Vec<Document>,
    chunk: u64,
}

impl JsonlSink {
    /// Creates the sink, creating the destination directory if absent.
    ///
    /// # Errors
    ///
    /// Returns `Error::Write` if the directory cannot be created.
    pub fn create(config: &JsonlSinkConfig, collection: &str) -> Result<Self> {
        std::fs::create_dir_all(&config.dir).map_err(|e| {
            Error::Write(format!(
                "failed to create dump directory '{}': {}",
                config.dir.display(),
                e
            ))
        })?;

        Ok(Self {
            dir: config.dir.clone(),
            collection: collection.to_string(),
            docs_per_file: config.docs_per_file,
            buffer: Vec::with_capacity(config.docs_per_file),
            chunk: 0,
        })
    }

    /// Path of the chunk file with the given number.
    fn chunk_path(&self, chunk: u64) -> PathBuf {
        self.dir.join(format!("{}-{}.jsonl", self.collection, chunk))
    }

    /// Serializes the buffer to the next chunk file and clears it.
    fn write_chunk(&mut self) -> Result<()> {
        self.chunk += 1;
        let path = self.chunk_path(self.chunk);
        let file = File::create(&path)
            .map_err(|e| Error::Write(format!("failed to create '{}': {}", path.display(), e)))?;
        let mut writer = BufWriter::new(file);

        for doc in &self.buffer {
            write_line(&mut writer, doc, &path)?;
        }
        writer
            .flush()
            .map_err(|e| Error::Write(format!("failed to write '{}': {}", path.display(), e)))?;

        debug!("wrote {} documents to {}", self.buffer.len(), path.display());
        self.buffer.clear();
        Ok(())
    }
}

fn write_line(writer: &mut BufWriter<File>, doc: &Document, path: &Path) -> Result<()> {
    serde_json::to_writer(&mut *writer, doc)
        .map_err(|e| Error::Write(format!("failed to serialize into '{}': {}", path.display(), e)))?;
    writer
        .write_all(b"\n")
        .map_err(|e| Error::Write(format!("failed to write '{}': {}", path.display(), e)))
}

#[async_trait]
impl DocumentSink for JsonlSink {
    async fn write(&mut self, doc: &Document) -> Result<()> {
        self.buffer.push(doc.clone());
        if self.buffer.len() == self.docs_per_file {
            self.write_chunk()?;
        }
        Ok(())
    }

    /// Writes the final, possibly short, chunk.
    async fn flush(&mut self) -> Result<()> {
        if !self.buffer.is_empty() {
            self.write_chunk()?;
        }
        Ok(())
    }

    fn task_label(&self, source_index: &str) -> String {
        format!("Dumping: {}", source_index)
    }
}

#[cfg(test)]
#[path = "jsonl_tests.rs"]
mod tests;
