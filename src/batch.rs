use crate::constants::{MAX_BATCH_BYTES, MAX_BATCH_FILES};
use crate::error::{Result, SqueezeError};
use crate::policy::ReductionPolicy;
use crate::progress::BatchObserver;
use crate::source::SourceFile;
use crate::store::{ReductionOutcome, ResultStore, Totals};
use glob::glob;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use walkdir::WalkDir;

/// Bookkeeping for the single active batch.
///
/// `processed_count` is the store length, so it always equals the number of
/// recorded outcomes.
#[derive(Debug, Clone, Default)]
pub struct BatchState {
    total_files: usize,
    results: ResultStore,
    cancelled: bool,
}

impl BatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zeroes everything and announces a batch of `total_files`.
    pub fn begin(&mut self, total_files: usize) {
        self.reset();
        self.total_files = total_files;
    }

    pub fn reset(&mut self) {
        self.total_files = 0;
        self.results.clear();
        self.cancelled = false;
    }

    pub fn total_files(&self) -> usize {
        self.total_files
    }

    pub fn processed_count(&self) -> usize {
        self.results.len()
    }

    pub fn totals(&self) -> Totals {
        self.results.totals()
    }

    pub fn results(&self) -> &ResultStore {
        &self.results
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.processed_count() == self.total_files
    }

    /// Fraction of the batch already processed, 0.0 for an empty batch.
    pub fn progress_ratio(&self) -> f64 {
        if self.total_files == 0 {
            return 0.0;
        }
        self.processed_count() as f64 / self.total_files as f64
    }
}

/// Cooperative cancellation, checked between files.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Runs the reduction policy over a file set, one file at a time.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    policy: ReductionPolicy,
    cancel: CancelFlag,
}

impl BatchProcessor {
    pub fn new(policy: ReductionPolicy) -> Self {
        Self {
            policy,
            cancel: CancelFlag::new(),
        }
    }

    pub fn policy(&self) -> &ReductionPolicy {
        &self.policy
    }

    /// Handle that stops the batch before its next file.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Processes `files` in order into `state`.
    ///
    /// A file that cannot be read or reduced is recorded as a passthrough
    /// outcome carrying its error, and the batch moves on. If the cancel flag
    /// is raised the loop stops before the next file, marks the state as
    /// cancelled and skips `on_batch_complete`. A cancel that arrives while the
    /// last file is in flight is discarded once the batch completes.
    pub async fn process_batch(
        &self,
        files: Vec<SourceFile>,
        state: &mut BatchState,
        observer: &dyn BatchObserver,
    ) {
        state.begin(files.len());
        log::info!("Processing batch of {} files", files.len());

        for (index, file) in files.into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                self.cancel.reset();
                state.cancelled = true;
                log::warn!(
                    "Batch cancelled after {}/{} files",
                    state.processed_count(),
                    state.total_files()
                );
                return;
            }

            observer.on_file_started(&file, index);
            let outcome = self.reduce_one(file).await;
            state.results.add(outcome);

            if let Some(outcome) = state.results.last() {
                observer.on_file_finished(outcome, state.processed_count(), state.total_files());
            }
        }

        if self.cancel.is_cancelled() {
            log::debug!("Cancel arrived after the last file, ignoring it");
            self.cancel.reset();
        }

        let totals = state.totals();
        log::info!(
            "Batch complete: {} files, {} -> {} bytes",
            state.processed_count(),
            totals.original_bytes,
            totals.reduced_bytes
        );
        observer.on_batch_complete(state);
    }

    async fn reduce_one(&self, file: SourceFile) -> ReductionOutcome {
        log::debug!("Reducing {} ({})", file.name(), file.media_type());

        let bytes = match file.read_all().await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Failed to read {}: {}", file.name(), e);
                return ReductionOutcome::failed(file, None, format!("read failed: {}", e));
            }
        };

        match self.policy.reduce(&file, Arc::clone(&bytes)).await {
            Ok(reduced) => ReductionOutcome::reduced(
                file,
                reduced.payload,
                reduced.reduced_size,
                reduced.dimensions,
            ),
            Err(e) => {
                log::warn!("Failed to reduce {}, keeping original: {}", file.name(), e);
                ReductionOutcome::failed(file, Some(bytes), e.to_string())
            }
        }
    }
}

/// Validates a file set against the batch limits before processing.
///
/// # Returns
/// * `Ok(total_bytes)` - Sum of the declared sizes
/// * `Err(SqueezeError)` - If the file count or the declared total is too large
pub fn validate_batch_limits(files: &[SourceFile]) -> Result<u64> {
    if files.len() > MAX_BATCH_FILES {
        return Err(SqueezeError::BatchFileLimitExceeded(
            files.len(),
            MAX_BATCH_FILES,
        ));
    }

    let total_bytes = files
        .iter()
        .fold(0u64, |acc, file| acc.saturating_add(file.byte_size()));
    if total_bytes > MAX_BATCH_BYTES {
        return Err(SqueezeError::BatchSizeLimitExceeded(
            total_bytes,
            MAX_BATCH_BYTES,
        ));
    }

    Ok(total_bytes)
}

/// Collects the files named by `input`: a single file, a directory or a glob.
///
/// Hidden entries are skipped and directory listings are sorted by name so
/// the submission order is stable.
pub fn collect_input_files(input: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let input_path = Path::new(input);

    if input_path.is_file() {
        files.push(input_path.to_path_buf());
    } else if input_path.is_dir() {
        let walker = if recursive {
            WalkDir::new(input_path)
        } else {
            WalkDir::new(input_path).max_depth(1)
        };

        for entry in walker
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
        {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
    } else if let Ok(pattern) = glob(input) {
        for entry in pattern.flatten() {
            let hidden = entry.file_name().map(is_hidden).unwrap_or(false);
            if entry.is_file() && !hidden {
                files.push(entry);
            }
        }
    } else {
        return Err(SqueezeError::NoFilesFound(input.to_string()));
    }

    Ok(files)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}
