//! The extraction pipeline: load a batch, extract each record, write once.
//!
//! Records flow through an ordered stream bounded by
//! [`PipelineConfig::concurrency`] and are folded into a [`RunReport`]
//! owned by the run. A failed extraction degrades that record to an empty
//! reference list plus a diagnostic; it never drops the record or stops
//! the run.

use futures::future;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::error::{ExtractionFailure, PipelineError, Result};
use crate::pipeline::validate::{validate_references, Validation};
use crate::traits::{extractor::ReferenceExtractor, store::EpisodeStore, writer::ResultWriter};
use crate::types::{
    config::PipelineConfig,
    episode::{Batch, BatchId, EpisodeRecord},
    reference::Reference,
    result::{Diagnostic, EpisodeResult, RunReport},
};

/// Outcome of one record's extraction.
type Outcome = std::result::Result<Vec<Reference>, ExtractionFailure>;

/// Reference extraction over stored episode batches.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = Pipeline::new(
///     DatasetStore::new("./storage/datasets/episodes"),
///     OpenAIExtractor::from_env()?,
///     JsonFileWriter::new("references.json"),
/// );
///
/// let report = pipeline.run().await?;
/// for diagnostic in &report.diagnostics {
///     eprintln!("{}: {}", diagnostic.href, diagnostic.failure);
/// }
/// ```
pub struct Pipeline<S: EpisodeStore, E: ReferenceExtractor, W: ResultWriter> {
    store: S,
    extractor: E,
    writer: W,
    config: PipelineConfig,
}

impl<S: EpisodeStore, E: ReferenceExtractor, W: ResultWriter> Pipeline<S, E, W> {
    /// Create a sequential pipeline.
    pub fn new(store: S, extractor: E, writer: W) -> Self {
        Self::with_config(store, extractor, writer, PipelineConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(store: S, extractor: E, writer: W, config: PipelineConfig) -> Self {
        Self {
            store,
            extractor,
            writer,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Run against the most recently stored batch.
    pub async fn run(&self) -> Result<RunReport> {
        let batch = self.store.load_latest_batch().await?;
        self.process(batch).await
    }

    /// Run against a specific batch, e.g. to replay an older crawl.
    pub async fn run_batch(&self, id: &BatchId) -> Result<RunReport> {
        let batch = self.store.load_batch(id).await?;
        self.process(batch).await
    }

    async fn process(&self, batch: Batch) -> Result<RunReport> {
        if batch.is_empty() {
            return Err(PipelineError::NoDataAvailable {
                location: format!("{} (batch {} has no records)", self.store.location(), batch.id),
            });
        }

        info!(
            batch = %batch.id,
            records = batch.len(),
            concurrency = self.config.concurrency.get(),
            "Extracting references"
        );

        let report = self.extract_batch(&batch).await;
        self.writer.write(&report.results).await?;

        info!(
            batch = %report.batch,
            episodes = report.results.len(),
            references = report.reference_count(),
            failures = report.failure_count(),
            target = %self.writer.target(),
            "Reference extraction complete"
        );

        Ok(report)
    }

    /// Extract every record of a batch without writing anything.
    ///
    /// Infallible: the report holds exactly one result per record, in
    /// batch order, whatever happens to individual extraction calls.
    pub async fn extract_batch(&self, batch: &Batch) -> RunReport {
        stream::iter(&batch.records)
            .map(|record| async move { (record, self.extract_record(record).await) })
            .buffered(self.config.concurrency.get())
            .fold(RunReport::new(batch.id.clone()), |report, (record, outcome)| {
                future::ready(accumulate(report, record, outcome))
            })
            .await
    }

    async fn extract_record(&self, record: &EpisodeRecord) -> Outcome {
        debug!(href = %record.href, chars = record.description.len(), "Extracting record");

        let list = self
            .extractor
            .extract_references(&record.description)
            .await?;

        match validate_references(list) {
            Validation::Valid(list) => Ok(list.references),
            Validation::Invalid(reason) => Err(ExtractionFailure::Invalid(reason)),
        }
    }
}

/// Fold one record's outcome into the report.
fn accumulate(mut report: RunReport, record: &EpisodeRecord, outcome: Outcome) -> RunReport {
    let references = match outcome {
        Ok(references) => {
            debug!(href = %record.href, references = references.len(), "Extracted references");
            references
        }
        Err(failure) => {
            warn!(
                href = %record.href,
                error = %failure,
                "Reference extraction failed, keeping episode without references"
            );
            report.diagnostics.push(Diagnostic::new(&record.href, failure));
            Vec::new()
        }
    };

    report
        .results
        .push(EpisodeResult::from_record(record, references));
    report
}
