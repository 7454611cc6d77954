//! Read access to persisted episode batches.
//!
//! A store is an append-only sequence of batches, each the output of one
//! crawl run. The pipeline reads the most recent batch only; older batches
//! stay on disk and can be replayed by id.

use async_trait::async_trait;

use crate::error::{PipelineError, Result, StoreResult};
use crate::types::episode::{Batch, BatchId};

/// Accessor over stored episode batches.
#[async_trait]
pub trait EpisodeStore: Send + Sync {
    /// Human-readable location of the store, used in operator messages.
    fn location(&self) -> String;

    /// Batch ids in creation order (oldest first).
    async fn list_batches(&self) -> StoreResult<Vec<BatchId>>;

    /// Load one batch by id. Records come back in stored order and have
    /// passed [`Batch::validated`].
    async fn load_batch(&self, id: &BatchId) -> StoreResult<Batch>;

    /// Load the most recently written batch.
    ///
    /// Fails with [`PipelineError::NoDataAvailable`] when the store holds
    /// no batches.
    async fn load_latest_batch(&self) -> Result<Batch> {
        let batches = self.list_batches().await?;
        let latest = batches
            .last()
            .ok_or_else(|| PipelineError::NoDataAvailable {
                location: self.location(),
            })?;

        Ok(self.load_batch(latest).await?)
    }
}
