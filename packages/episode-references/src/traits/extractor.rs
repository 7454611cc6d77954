//! Structured extraction seam.
//!
//! The target schema is [`ReferenceList`]: implementations either return
//! an instance of it or an [`ExtractionFailure`]. Each call is stateless
//! and carries all the text it needs. Implementations do not retry;
//! retry policy belongs to the caller.

use async_trait::async_trait;

use crate::error::ExtractionFailure;
use crate::types::reference::ReferenceList;

/// Turns free text into a list of bibliographic references.
#[async_trait]
pub trait ReferenceExtractor: Send + Sync {
    /// Extract the references cited in `text`.
    async fn extract_references(&self, text: &str) -> Result<ReferenceList, ExtractionFailure>;
}
