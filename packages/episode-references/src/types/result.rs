//! Pipeline output: one result per episode plus the run's diagnostics.

use serde::{Deserialize, Serialize};

use crate::error::ExtractionFailure;
use crate::types::episode::{BatchId, EpisodeRecord};
use crate::types::reference::Reference;

/// Output unit, one per input [`EpisodeRecord`].
///
/// Field order here is the field order of the output artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeResult {
    pub title: String,
    pub href: String,
    pub publish_date: String,
    pub references: Vec<Reference>,
}

impl EpisodeResult {
    /// Build a result carrying the record's identity fields verbatim.
    pub fn from_record(record: &EpisodeRecord, references: Vec<Reference>) -> Self {
        Self {
            title: record.title.clone(),
            href: record.href.clone(),
            publish_date: record.publish_date.clone(),
            references,
        }
    }
}

/// A non-fatal per-record failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// href of the record whose extraction failed
    pub href: String,
    pub failure: ExtractionFailure,
}

impl Diagnostic {
    pub fn new(href: impl Into<String>, failure: ExtractionFailure) -> Self {
        Self {
            href: href.into(),
            failure,
        }
    }
}

/// Everything one pipeline run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Batch the run consumed
    pub batch: BatchId,

    /// Results in input order, exactly one per record
    pub results: Vec<EpisodeResult>,

    /// Records whose extraction failed, in input order
    pub diagnostics: Vec<Diagnostic>,
}

impl RunReport {
    /// Create an empty report for a batch.
    pub fn new(batch: BatchId) -> Self {
        Self {
            batch,
            results: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Total references across all results.
    pub fn reference_count(&self) -> usize {
        self.results.iter().map(|r| r.references.len()).sum()
    }

    /// Number of records whose extraction failed.
    pub fn failure_count(&self) -> usize {
        self.diagnostics.len()
    }

    /// Check if every record extracted without failure.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
