//! In-memory episode store for testing and development.

use async_trait::async_trait;
use std::sync::{PoisonError, RwLock};

use crate::error::{StoreError, StoreResult};
use crate::traits::store::EpisodeStore;
use crate::types::episode::{Batch, BatchId, EpisodeRecord};

/// Episode batches held in memory, in push order.
#[derive(Default)]
pub struct MemoryStore {
    batches: RwLock<Vec<Batch>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MemoryStore::push_batch`].
    pub fn with_batch(self, records: Vec<EpisodeRecord>) -> Self {
        self.push_batch(records);
        self
    }

    /// Append a batch, returning its id.
    pub fn push_batch(&self, records: Vec<EpisodeRecord>) -> BatchId {
        let mut batches = self.batches.write().unwrap_or_else(PoisonError::into_inner);
        let id = BatchId::from_sequence(batches.len() as u64 + 1);
        batches.push(Batch::new(id.clone(), records));
        id
    }

    /// Get the number of stored batches.
    pub fn batch_count(&self) -> usize {
        self.batches.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl EpisodeStore for MemoryStore {
    fn location(&self) -> String {
        "memory".to_string()
    }

    async fn list_batches(&self) -> StoreResult<Vec<BatchId>> {
        Ok(self
            .batches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|b| b.id.clone())
            .collect())
    }

    async fn load_batch(&self, id: &BatchId) -> StoreResult<Batch> {
        let batch = self
            .batches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|b| &b.id == id)
            .cloned()
            .ok_or_else(|| StoreError::BatchNotFound { batch: id.clone() })?;

        batch.validated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    fn episode(href: &str) -> EpisodeRecord {
        EpisodeRecord::new(href, "Episode", "Notes", "2020-01-01T00:00:00Z")
    }

    #[tokio::test]
    async fn test_empty_store_has_no_data() {
        let store = MemoryStore::new();
        let err = store.load_latest_batch().await.unwrap_err();
        assert!(matches!(err, PipelineError::NoDataAvailable { location } if location == "memory"));
    }

    #[tokio::test]
    async fn test_latest_batch_wins() {
        let store = MemoryStore::new()
            .with_batch(vec![episode("old")])
            .with_batch(vec![episode("new-1"), episode("new-2")]);

        assert_eq!(store.batch_count(), 2);
        let latest = store.load_latest_batch().await.unwrap();
        assert_eq!(latest.id, BatchId::from_sequence(2));
        assert_eq!(latest.len(), 2);
        assert_eq!(latest.records[0].href, "new-1");
    }

    #[tokio::test]
    async fn test_load_validates() {
        let store = MemoryStore::new().with_batch(vec![episode("a"), episode("a")]);
        let err = store.load_batch(&BatchId::from_sequence(1)).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateHref { .. }));
    }
}
