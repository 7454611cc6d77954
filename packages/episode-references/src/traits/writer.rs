//! Output artifact seam.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::result::EpisodeResult;

/// Persists the final result collection of a run.
#[async_trait]
pub trait ResultWriter: Send + Sync {
    /// Where results go, used in operator messages.
    fn target(&self) -> String;

    /// Write the complete collection. Either the whole collection is
    /// persisted or [`crate::PipelineError::WriteFailure`] is returned.
    async fn write(&self, results: &[EpisodeResult]) -> Result<()>;
}
