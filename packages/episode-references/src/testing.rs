//! Testing utilities including mock implementations.
//!
//! Useful for exercising the pipeline without calling a model or touching
//! the filesystem.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{ExtractionFailure, PipelineError, Result};
use crate::traits::{extractor::ReferenceExtractor, writer::ResultWriter};
use crate::types::{
    reference::{Reference, ReferenceList},
    result::EpisodeResult,
};

/// A mock extractor with deterministic, configurable responses.
///
/// Responses are keyed by the exact input text. Unknown text yields an
/// empty reference list.
#[derive(Default)]
pub struct MockExtractor {
    /// Predefined payloads by text
    responses: Arc<RwLock<HashMap<String, ReferenceList>>>,

    /// Predefined failures by text
    failures: Arc<RwLock<HashMap<String, ExtractionFailure>>>,

    /// Per-text latency overrides
    latencies: Arc<RwLock<HashMap<String, Duration>>>,

    /// Latency for every call without an override
    default_latency: Option<Duration>,

    /// Input texts in call order
    calls: Arc<RwLock<Vec<String>>>,

    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return these references for `text`.
    pub fn with_references(self, text: impl Into<String>, references: Vec<Reference>) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(text.into(), ReferenceList::new(references));
        self
    }

    /// Fail every call for `text`.
    pub fn with_failure(self, text: impl Into<String>, failure: ExtractionFailure) -> Self {
        self.failures.write().unwrap().insert(text.into(), failure);
        self
    }

    /// Delay every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.default_latency = Some(latency);
        self
    }

    /// Delay calls for `text`.
    pub fn with_text_latency(self, text: impl Into<String>, latency: Duration) -> Self {
        self.latencies.write().unwrap().insert(text.into(), latency);
        self
    }

    /// Input texts in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Highest number of calls that were running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn latency_for(&self, text: &str) -> Option<Duration> {
        self.latencies
            .read()
            .unwrap()
            .get(text)
            .copied()
            .or(self.default_latency)
    }

    fn respond(&self, text: &str) -> std::result::Result<ReferenceList, ExtractionFailure> {
        if let Some(failure) = self.failures.read().unwrap().get(text) {
            return Err(failure.clone());
        }

        Ok(self
            .responses
            .read()
            .unwrap()
            .get(text)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ReferenceExtractor for MockExtractor {
    async fn extract_references(
        &self,
        text: &str,
    ) -> std::result::Result<ReferenceList, ExtractionFailure> {
        self.calls.write().unwrap().push(text.to_string());

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        if let Some(latency) = self.latency_for(text) {
            tokio::time::sleep(latency).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.respond(text)
    }
}

/// A writer whose every write fails with a permission error.
#[derive(Debug, Default)]
pub struct FailingWriter;

impl FailingWriter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResultWriter for FailingWriter {
    fn target(&self) -> String {
        "failing-writer".to_string()
    }

    async fn write(&self, _results: &[EpisodeResult]) -> Result<()> {
        Err(PipelineError::WriteFailure {
            target: self.target(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only target"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_extractor_responses() {
        let mock = MockExtractor::new()
            .with_references("known", vec![Reference::new("t", "a", "p")])
            .with_failure("broken", ExtractionFailure::MissingPayload("null".into()));

        assert_eq!(
            mock.extract_references("known").await.unwrap().references.len(),
            1
        );
        assert_eq!(
            mock.extract_references("unknown").await.unwrap(),
            ReferenceList::empty()
        );
        assert!(mock.extract_references("broken").await.is_err());
        assert_eq!(mock.calls(), vec!["known", "unknown", "broken"]);
    }

    #[tokio::test]
    async fn test_failing_writer() {
        let err = FailingWriter::new().write(&[]).await.unwrap_err();
        assert!(matches!(err, PipelineError::WriteFailure { .. }));
    }
}
