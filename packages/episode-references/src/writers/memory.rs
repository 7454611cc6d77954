//! In-memory result writer.

use async_trait::async_trait;
use std::sync::{PoisonError, RwLock};

use crate::error::Result;
use crate::traits::writer::ResultWriter;
use crate::types::result::EpisodeResult;

/// Keeps every written collection in memory.
#[derive(Default)]
pub struct MemoryWriter {
    writes: RwLock<Vec<Vec<EpisodeResult>>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently written collection.
    pub fn last_written(&self) -> Option<Vec<EpisodeResult>> {
        self.writes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Number of completed writes.
    pub fn write_count(&self) -> usize {
        self.writes.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl ResultWriter for MemoryWriter {
    fn target(&self) -> String {
        "memory".to_string()
    }

    async fn write(&self, results: &[EpisodeResult]) -> Result<()> {
        self.writes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(results.to_vec());
        Ok(())
    }
}
