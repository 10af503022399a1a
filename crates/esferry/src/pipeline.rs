//! Transfer task orchestration.

use std::time::Instant;

use tracing::{info, warn};

use crate::config::TransferConfig;
use crate::error::{Error, Result};
use crate::progress::{ProgressReporter, TaskStatus, TransferProgress};
use crate::sinks::create_sink;
use crate::source::IndexSource;

/// Summary of a finished transfer.
#[derive(Debug, Default, Clone)]
pub struct TransferSummary {
    /// Documents successfully written.
    pub written: u64,
    /// Match count estimate taken before scanning.
    pub total_estimate: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
}

impl TransferSummary {
    /// Calculate throughput (documents per second).
    #[must_use]
    pub fn throughput(&self) -> f64 {
        if self.duration_secs > 0.0 {
            self.written as f64 / self.duration_secs
        } else {
            0.0
        }
    }
}

/// One transfer task: drives the scanner, feeds the sink, tracks progress.
///
/// The task owns its progress object exclusively for its whole lifetime;
/// a failure anywhere is terminal for this task (no retries, no rollback,
/// already-written documents stay in place). Tasks are independent: run
/// several concurrently and they share nothing.
pub struct TransferTask {
    config: TransferConfig,
    progress: TransferProgress,
    reporter: Box<dyn ProgressReporter>,
}

impl TransferTask {
    /// Create a task from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is invalid.
    pub fn new(config: TransferConfig, reporter: Box<dyn ProgressReporter>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            progress: TransferProgress::default(),
            reporter,
        })
    }

    /// Current progress of this task.
    #[must_use]
    pub fn progress(&self) -> &TransferProgress {
        &self.progress
    }

    /// Run the transfer to a terminal state.
    ///
    /// # Errors
    ///
    /// Returns the first error from replication, counting, scanning, or
    /// writing; the same message is recorded on the progress object.
    pub async fn run(&mut self) -> Result<TransferSummary> {
        let start = Instant::now();
        let outcome = self.execute().await;
        let duration_secs = start.elapsed().as_secs_f64();

        match outcome {
            Ok(label) => {
                self.progress.status = TaskStatus::Completed;
                self.reporter.finish(&label);
                let summary = TransferSummary {
                    written: self.progress.processed,
                    total_estimate: self.progress.total,
                    duration_secs,
                };
                info!(
                    "transfer complete: {} written of {} estimated in {:.2}s ({:.0} docs/sec)",
                    summary.written,
                    summary.total_estimate,
                    summary.duration_secs,
                    summary.throughput()
                );
                Ok(summary)
            }
            Err(e) => {
                self.progress.error = Some(e.to_string());
                self.progress.status = TaskStatus::Failed;
                warn!("transfer failed after {} documents: {}", self.progress.processed, e);
                Err(e)
            }
        }
    }

    async fn execute(&mut self) -> Result<String> {
        let source = IndexSource::new(&self.config.source, self.config.options.docs_per_request)?;
        let mut sink = create_sink(&self.config.sink, source.index())?;
        let label = sink.task_label(source.index());

        // Index mode replicates the destination schema here; failure aborts
        // before any scanning starts.
        sink.prepare(&source).await?;

        self.progress.total = source.count().await?;
        info!(
            "transferring {} (estimated {} documents)",
            label, self.progress.total
        );

        self.progress.status = TaskStatus::Running;
        self.reporter.begin(self.progress.total, &label);

        let mut scan = source.scan().await?;
        let mut failure: Option<Error> = None;

        loop {
            match scan.next().await {
                Ok(Some(doc)) => {
                    if let Err(e) = sink.write(&doc).await {
                        failure = Some(e);
                        break;
                    }
                    self.progress.processed += 1;
                    self.reporter
                        .report(self.progress.processed, self.progress.total, &label);
                }
                Ok(None) => break,
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        if failure.is_none() {
            if let Err(e) = sink.flush().await {
                failure = Some(e);
            }
        }

        // The cursor is released on every exit path.
        scan.finish().await;

        match failure {
            Some(e) => Err(e),
            None => Ok(label),
        }
    }
}
