//! Typed errors for the reference extraction library.
//!
//! Fatal conditions ([`PipelineError`]) stop a run. Per-record extraction
//! problems ([`ExtractionFailure`]) never leave the pipeline; they are
//! folded into the run report as diagnostics.

use thiserror::Error;

use crate::types::episode::BatchId;

/// Why a single record's extraction call produced no usable references.
///
/// Recoverable: the pipeline degrades the record to an empty reference
/// list and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionFailure {
    /// Transport or service failure (network, rate limit, non-2xx status)
    #[error("extraction service error: {0}")]
    Service(String),

    /// A response arrived but its structured payload was absent
    /// (refusal, null or blank content)
    #[error("no structured payload: {0}")]
    MissingPayload(String),

    /// The payload did not match the reference schema
    #[error("invalid payload: {0}")]
    Invalid(String),
}

impl ExtractionFailure {
    /// Whether the failure came from the payload rather than the transport.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingPayload(_) | Self::Invalid(_))
    }
}

#[cfg(feature = "openai")]
impl From<openai_client::OpenAIError> for ExtractionFailure {
    fn from(err: openai_client::OpenAIError) -> Self {
        use openai_client::OpenAIError;

        match err {
            OpenAIError::Config(_) | OpenAIError::Network(_) | OpenAIError::Api { .. } => {
                Self::Service(err.to_string())
            }
            OpenAIError::Refusal(_) | OpenAIError::EmptyResponse(_) => {
                Self::MissingPayload(err.to_string())
            }
            OpenAIError::Parse(_) => Self::Invalid(err.to_string()),
        }
    }
}

/// Errors reading or writing the episode dataset.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed
    #[error("{operation} '{path}': {source}")]
    Io {
        operation: &'static str,
        path: String,
        source: std::io::Error,
    },

    /// Batch document is not `{ "data": [EpisodeRecord] }`
    #[error("batch {batch} is not a valid dataset document: {source}")]
    Malformed {
        batch: BatchId,
        source: serde_json::Error,
    },

    /// A stored record breaks a record invariant
    #[error("batch {batch}: record '{href}' is invalid: {reason}")]
    InvalidRecord {
        batch: BatchId,
        href: String,
        reason: String,
    },

    /// Two records in one batch share an href
    #[error("batch {batch}: duplicate href '{href}'")]
    DuplicateHref { batch: BatchId, href: String },

    /// Requested batch does not exist
    #[error("batch not found: {batch}")]
    BatchNotFound { batch: BatchId },

    /// A results artifact is not a JSON array of episode results
    #[error("results file '{path}' is not valid: {source}")]
    InvalidResults {
        path: String,
        source: serde_json::Error,
    },

    /// Batch could not be encoded for persistence
    #[error("failed to encode batch: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Fatal errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No crawled batch exists to process
    #[error("no episode data available in {location}")]
    NoDataAvailable { location: String },

    /// A batch exists but could not be loaded
    #[error("failed to load episode batch: {0}")]
    Store(#[from] StoreError),

    /// The output artifact could not be persisted
    #[error("failed to write results to {target}: {source}")]
    WriteFailure {
        target: String,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Stage of the run that failed, for operator-facing messages.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::NoDataAvailable { .. } | Self::Store(_) => "load",
            Self::WriteFailure { .. } => "write",
        }
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
