//! Progress reporting for a running batch.

use crate::batch::BatchState;
use crate::source::SourceFile;
use crate::store::{ReductionOutcome, Totals};
use crate::utils::create_progress_bar;
use indicatif::ProgressBar;
use tokio::sync::mpsc::UnboundedSender;

/// Receives batch events in submission order.
///
/// `on_batch_complete` is called once, after the last `on_file_finished`.
pub trait BatchObserver: Send + Sync {
    fn on_file_started(&self, _file: &SourceFile, _index: usize) {}

    fn on_file_finished(&self, _outcome: &ReductionOutcome, _processed: usize, _total: usize) {}

    fn on_batch_complete(&self, _state: &BatchState) {}
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl BatchObserver for NoopObserver {}

#[derive(Debug, Clone)]
pub enum ProgressEvent {
    FileStarted {
        file: SourceFile,
        index: usize,
    },
    FileFinished {
        outcome: ReductionOutcome,
        processed: usize,
        total: usize,
    },
    BatchComplete {
        processed: usize,
        total: usize,
        totals: Totals,
    },
}

// A dropped receiver only means nobody is listening any more.
impl BatchObserver for UnboundedSender<ProgressEvent> {
    fn on_file_started(&self, file: &SourceFile, index: usize) {
        let _ = self.send(ProgressEvent::FileStarted {
            file: file.clone(),
            index,
        });
    }

    fn on_file_finished(&self, outcome: &ReductionOutcome, processed: usize, total: usize) {
        let _ = self.send(ProgressEvent::FileFinished {
            outcome: outcome.clone(),
            processed,
            total,
        });
    }

    fn on_batch_complete(&self, state: &BatchState) {
        let _ = self.send(ProgressEvent::BatchComplete {
            processed: state.processed_count(),
            total: state.total_files(),
            totals: state.totals(),
        });
    }
}

/// Terminal progress bar showing the file currently being optimized.
pub struct ProgressBarObserver {
    bar: ProgressBar,
}

impl ProgressBarObserver {
    pub fn new(total: usize) -> Self {
        Self {
            bar: create_progress_bar(total as u64),
        }
    }

    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl BatchObserver for ProgressBarObserver {
    fn on_file_started(&self, file: &SourceFile, _index: usize) {
        self.bar.set_message(format!("Optimizing {}...", file.name()));
    }

    fn on_file_finished(&self, outcome: &ReductionOutcome, processed: usize, _total: usize) {
        if let Some(error) = &outcome.error {
            self.bar
                .println(format!("⚠️  {} kept as is: {}", outcome.source.name(), error));
        }
        self.bar.set_position(processed as u64);
    }

    fn on_batch_complete(&self, _state: &BatchState) {
        self.bar.finish_with_message("✅ Batch complete");
    }
}
