//! Ordered per-file outcomes and running totals.

use crate::constants::EXPORT_PREFIX;
use crate::error::{Result, SqueezeError};
use crate::source::SourceFile;
use crate::utils::calculate_reduction_percent;
use std::sync::Arc;

/// Recorded result of reducing one submitted file.
#[derive(Debug, Clone)]
pub struct ReductionOutcome {
    pub source: SourceFile,
    /// `None` only when the content could not be read
    pub payload: Option<Arc<[u8]>>,
    pub reduced_size: u64,
    pub dimensions: Option<(u32, u32)>,
    /// Set when the transform failed and the file was passed through
    pub error: Option<String>,
}

impl ReductionOutcome {
    pub fn reduced(
        source: SourceFile,
        payload: Arc<[u8]>,
        reduced_size: u64,
        dimensions: Option<(u32, u32)>,
    ) -> Self {
        Self {
            source,
            payload: Some(payload),
            reduced_size,
            dimensions,
            error: None,
        }
    }

    /// Passthrough record for a file whose transform failed.
    pub fn failed(source: SourceFile, payload: Option<Arc<[u8]>>, error: impl Into<String>) -> Self {
        let reduced_size = source.byte_size();
        Self {
            source,
            payload,
            reduced_size,
            dimensions: None,
            error: Some(error.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    pub fn original_size(&self) -> u64 {
        self.source.byte_size()
    }

    pub fn reduction_percent(&self) -> f64 {
        calculate_reduction_percent(self.original_size(), self.reduced_size)
    }

    /// File name used for downloads and archive entries
    pub fn export_name(&self) -> String {
        format!("{}{}", EXPORT_PREFIX, self.source.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub original_bytes: u64,
    pub reduced_bytes: u64,
}

impl Totals {
    pub fn reduction_percent(&self) -> f64 {
        calculate_reduction_percent(self.original_bytes, self.reduced_bytes)
    }
}

/// Append-only during a batch; cleared only as a whole.
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    outcomes: Vec<ReductionOutcome>,
    totals: Totals,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, outcome: ReductionOutcome) {
        self.totals.original_bytes = self
            .totals
            .original_bytes
            .saturating_add(outcome.original_size());
        self.totals.reduced_bytes = self
            .totals
            .reduced_bytes
            .saturating_add(outcome.reduced_size);
        self.outcomes.push(outcome);
    }

    pub fn get(&self, index: usize) -> Result<&ReductionOutcome> {
        self.outcomes.get(index).ok_or(SqueezeError::Lookup {
            index,
            len: self.outcomes.len(),
        })
    }

    pub fn last(&self) -> Option<&ReductionOutcome> {
        self.outcomes.last()
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn clear(&mut self) {
        self.outcomes.clear();
        self.totals = Totals::default();
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReductionOutcome> {
        self.outcomes.iter()
    }

    pub fn outcomes(&self) -> &[ReductionOutcome] {
        &self.outcomes
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }
}

impl<'a> IntoIterator for &'a ResultStore {
    type Item = &'a ReductionOutcome;
    type IntoIter = std::slice::Iter<'a, ReductionOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
