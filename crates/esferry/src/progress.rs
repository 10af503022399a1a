//! Task progress: state machine, counters, and the reporting seam.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

/// Lifecycle state of a transfer task.
///
/// A task moves `Pending -> Running -> {Completed | Failed}` exactly once
/// along each edge and never returns to `Running` from a terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskStatus {
    /// Created, not yet scanning.
    #[default]
    Pending,
    /// Scanning and writing documents.
    Running,
    /// All matching documents written.
    Completed,
    /// Aborted on the first error; see [`TransferProgress::error`].
    Failed,
}

/// Progress of one transfer task, owned exclusively by that task.
#[derive(Debug, Clone, Default)]
pub struct TransferProgress {
    /// Documents successfully written so far. Monotonically non-decreasing.
    pub processed: u64,
    /// Match count taken once before scanning. Advisory only: never revised,
    /// and the true number of yielded documents may differ if the source
    /// mutates mid-transfer.
    pub total: u64,
    /// Current lifecycle state.
    pub status: TaskStatus,
    /// Failure message, present iff `status == Failed`.
    pub error: Option<String>,
}

impl TransferProgress {
    /// Completion ratio for display. An empty result set reports as
    /// complete rather than dividing by zero, and a stale advisory total
    /// clamps at 1.0.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.processed as f64 / self.total as f64).min(1.0)
    }
}

/// Receives progress updates from a transfer task.
///
/// Called after every successfully written document. Implementations are
/// display collaborators only; the engine never depends on them for
/// correctness.
pub trait ProgressReporter: Send + Sync {
    /// Called once, after the total estimate is known and before scanning.
    fn begin(&self, total: u64, label: &str);

    /// Called after each successfully written document.
    fn report(&self, processed: u64, total: u64, label: &str);

    /// Called once when the task completes.
    fn finish(&self, label: &str);
}

/// Terminal progress bar reporter.
///
/// The bar is built once the total estimate is known: a sized bar when the
/// estimate is positive, a spinner when it is zero ("unknown" treatment).
pub struct ProgressBarReporter {
    bar: Mutex<ProgressBar>,
}

impl ProgressBarReporter {
    /// Creates a reporter; the bar stays hidden until `begin`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(ProgressBar::hidden()),
        }
    }

    fn styled_bar(total: u64) -> ProgressBar {
        let pb = if total > 0 {
            ProgressBar::new(total)
        } else {
            ProgressBar::new_spinner()
        };

        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        pb
    }
}

impl Default for ProgressBarReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for ProgressBarReporter {
    fn begin(&self, total: u64, label: &str) {
        let sized = Self::styled_bar(total);
        sized.set_message(label.to_string());
        let mut bar = self.bar.lock().unwrap();
        bar.finish_and_clear();
        *bar = sized;
    }

    fn report(&self, processed: u64, _total: u64, label: &str) {
        let bar = self.bar.lock().unwrap();
        bar.set_position(processed);
        bar.set_message(label.to_string());
    }

    fn finish(&self, label: &str) {
        let bar = self.bar.lock().unwrap();
        bar.finish_with_message(label.to_string());
    }
}
