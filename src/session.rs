//! Lifecycle of one batch: submit, process, read results, clear.

use crate::batch::{validate_batch_limits, BatchProcessor, BatchState, CancelFlag};
use crate::error::{Result, SqueezeError};
use crate::export::{self, ExportedFile};
use crate::policy::ReductionPolicy;
use crate::processing::ReductionOptions;
use crate::progress::BatchObserver;
use crate::source::SourceFile;
use crate::store::ResultStore;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Submitted,
    Processing,
    Completed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Submitted => "submitted",
            SessionState::Processing => "processing",
            SessionState::Completed => "completed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owns the pending file set and the single active batch.
///
/// `Idle -> Submitted -> Processing -> Completed -> Idle`. Submitting again
/// from `Submitted` or `Completed` replaces the previous set.
#[derive(Debug)]
pub struct SessionController {
    processor: BatchProcessor,
    state: SessionState,
    pending: Vec<SourceFile>,
    batch: BatchState,
}

impl SessionController {
    pub fn new(options: &ReductionOptions) -> Self {
        Self::with_policy(ReductionPolicy::new(options))
    }

    pub fn with_policy(policy: ReductionPolicy) -> Self {
        Self {
            processor: BatchProcessor::new(policy),
            state: SessionState::Idle,
            pending: Vec::new(),
            batch: BatchState::new(),
        }
    }

    pub fn submit(&mut self, files: Vec<SourceFile>) -> Result<()> {
        if self.state == SessionState::Processing {
            return Err(SqueezeError::SessionBusy);
        }
        if files.is_empty() {
            return Err(SqueezeError::EmptyBatch);
        }
        let declared = validate_batch_limits(&files)?;

        log::info!("Submitted {} files ({} bytes declared)", files.len(), declared);
        self.batch.reset();
        self.processor.cancel_flag().reset();
        self.pending = files;
        self.state = SessionState::Submitted;
        Ok(())
    }

    /// Processes the submitted set and moves to `Completed`.
    ///
    /// A cancelled run also ends in `Completed`, with a partial store.
    pub async fn start(&mut self, observer: &dyn BatchObserver) -> Result<&BatchState> {
        if self.state != SessionState::Submitted {
            return Err(SqueezeError::InvalidTransition {
                action: "start",
                state: self.state.as_str(),
            });
        }

        self.state = SessionState::Processing;
        let files = std::mem::take(&mut self.pending);
        self.processor
            .process_batch(files, &mut self.batch, observer)
            .await;
        self.state = SessionState::Completed;

        Ok(&self.batch)
    }

    /// Back to `Idle` from any state, dropping results and pending files.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.batch.reset();
        self.processor.cancel_flag().reset();
        self.state = SessionState::Idle;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn pending(&self) -> &[SourceFile] {
        &self.pending
    }

    pub fn batch(&self) -> &BatchState {
        &self.batch
    }

    pub fn results(&self) -> &ResultStore {
        self.batch.results()
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.processor.cancel_flag()
    }

    pub fn export_one(&self, index: usize) -> Result<ExportedFile> {
        export::export_one(self.results().get(index)?)
    }

    pub fn export_all(&self) -> Result<Vec<u8>> {
        export::export_all(self.results().outcomes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopObserver;
    use crate::store::{ReductionOutcome, Totals};

    fn controller() -> SessionController {
        SessionController::new(&ReductionOptions::default())
    }

    fn text_files(count: usize) -> Vec<SourceFile> {
        (0..count)
            .map(|i| SourceFile::from_bytes(format!("f{}.txt", i), "text/plain", vec![0u8; 10]))
            .collect()
    }

    struct CancelOnFirst(CancelFlag);

    impl BatchObserver for CancelOnFirst {
        fn on_file_finished(&self, _outcome: &ReductionOutcome, _processed: usize, _total: usize) {
            self.0.cancel();
        }
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let mut session = controller();
        assert_eq!(session.state(), SessionState::Idle);

        session.submit(text_files(2)).unwrap();
        assert_eq!(session.state(), SessionState::Submitted);
        assert_eq!(session.pending().len(), 2);

        let batch = session.start(&NoopObserver).await.unwrap();
        assert_eq!(batch.processed_count(), 2);
        assert_eq!(session.state(), SessionState::Completed);
        assert!(session.pending().is_empty());

        session.clear();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.results().is_empty());
    }

    #[test]
    fn test_submit_empty_batch() {
        let mut session = controller();
        let result = session.submit(Vec::new());
        assert!(matches!(result, Err(SqueezeError::EmptyBatch)));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_start_requires_submission() {
        let mut session = controller();
        let result = session.start(&NoopObserver).await;
        assert!(matches!(
            result,
            Err(SqueezeError::InvalidTransition {
                action: "start",
                state: "idle"
            })
        ));
    }

    #[tokio::test]
    async fn test_start_twice_is_rejected() {
        let mut session = controller();
        session.submit(text_files(1)).unwrap();
        session.start(&NoopObserver).await.unwrap();

        let result = session.start(&NoopObserver).await;
        assert!(matches!(
            result,
            Err(SqueezeError::InvalidTransition {
                state: "completed",
                ..
            })
        ));
    }

    #[test]
    fn test_submit_while_processing_is_busy() {
        let mut session = controller();
        session.submit(text_files(1)).unwrap();
        session.state = SessionState::Processing;

        let result = session.submit(text_files(1));
        assert!(matches!(result, Err(SqueezeError::SessionBusy)));

        session.clear();
        assert!(session.submit(text_files(1)).is_ok());
    }

    #[tokio::test]
    async fn test_resubmit_after_completion_resets_results() {
        let mut session = controller();
        session.submit(text_files(3)).unwrap();
        session.start(&NoopObserver).await.unwrap();
        assert_eq!(session.results().len(), 3);

        session.submit(text_files(1)).unwrap();
        assert_eq!(session.state(), SessionState::Submitted);
        assert!(session.results().is_empty());
        assert_eq!(session.batch().totals(), Totals::default());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut session = controller();
        session.submit(text_files(2)).unwrap();

        session.clear();
        session.clear();

        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.pending().is_empty());
        assert_eq!(session.batch().total_files(), 0);
        assert_eq!(session.batch().processed_count(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_run_completes_with_partial_results() {
        let mut session = controller();
        let observer = CancelOnFirst(session.cancel_flag());
        session.submit(text_files(3)).unwrap();

        let batch = session.start(&observer).await.unwrap();
        assert!(batch.is_cancelled());
        assert_eq!(batch.processed_count(), 1);
        assert_eq!(session.state(), SessionState::Completed);
    }

    #[tokio::test]
    async fn test_resubmit_after_late_cancel_runs_fully() {
        let mut session = controller();
        let observer = CancelOnFirst(session.cancel_flag());
        session.submit(text_files(1)).unwrap();
        session.start(&observer).await.unwrap();

        session.submit(text_files(2)).unwrap();
        let batch = session.start(&NoopObserver).await.unwrap();

        assert!(!batch.is_cancelled());
        assert_eq!(batch.processed_count(), 2);
        assert!(batch.is_complete());
    }

    #[tokio::test]
    async fn test_submit_drops_stale_cancel() {
        let mut session = controller();
        session.cancel_flag().cancel();
        session.submit(text_files(2)).unwrap();

        let batch = session.start(&NoopObserver).await.unwrap();
        assert!(!batch.is_cancelled());
        assert_eq!(batch.processed_count(), 2);
    }

    #[tokio::test]
    async fn test_exports_through_session() {
        let mut session = controller();
        session.submit(text_files(2)).unwrap();
        session.start(&NoopObserver).await.unwrap();

        let single = session.export_one(1).unwrap();
        assert_eq!(single.name, "compressed_f1.txt");
        assert!(matches!(
            session.export_one(5),
            Err(SqueezeError::Lookup { index: 5, len: 2 })
        ));

        let archive = session.export_all().unwrap();
        assert!(!archive.is_empty());
        // Exporting leaves the store untouched
        assert_eq!(session.results().len(), 2);
    }

    #[test]
    fn test_state_names() {
        assert_eq!(SessionState::Processing.to_string(), "processing");
        assert_eq!(SessionState::default(), SessionState::Idle);
    }
}
