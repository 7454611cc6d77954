//! Directory-backed dataset of episode batches.
//!
//! Layout: one JSON document per batch, `{ "data": [EpisodeRecord, ...] }`,
//! named by a zero-padded sequence number so that lexicographic order is
//! creation order:
//!
//! ```text
//! storage/datasets/episodes/
//!   000000001.json
//!   000000002.json   <- latest
//! ```

use async_trait::async_trait;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::traits::store::EpisodeStore;
use crate::types::episode::{Batch, BatchDocument, BatchId, EpisodeRecord};

const BATCH_EXTENSION: &str = "json";

/// Episode store over a dataset directory.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    dir: PathBuf,
}

impl DatasetStore {
    /// Open a dataset directory. The directory does not need to exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Get the dataset directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn batch_path(&self, id: &BatchId) -> PathBuf {
        self.dir.join(format!("{}.{}", id, BATCH_EXTENSION))
    }

    /// Persist a new batch after the current latest one.
    ///
    /// This is the write side used by the crawl stage. Existing batches are
    /// never touched.
    pub async fn push_batch(&self, records: &[EpisodeRecord]) -> StoreResult<BatchId> {
        #[derive(Serialize)]
        struct Document<'a> {
            data: &'a [EpisodeRecord],
        }

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| io_error("create dataset dir", &self.dir, source))?;

        let next = self
            .list_batches()
            .await?
            .iter()
            .filter_map(BatchId::sequence)
            .max()
            .unwrap_or(0)
            + 1;
        let id = BatchId::from_sequence(next);
        let path = self.batch_path(&id);

        let bytes = serde_json::to_vec_pretty(&Document { data: records })
            .map_err(StoreError::Encode)?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| io_error("write batch", &path, source))?;

        info!(batch = %id, records = records.len(), path = %path.display(), "Stored episode batch");
        Ok(id)
    }
}

#[async_trait]
impl EpisodeStore for DatasetStore {
    fn location(&self) -> String {
        self.dir.display().to_string()
    }

    async fn list_batches(&self) -> StoreResult<Vec<BatchId>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(io_error("read dataset dir", &self.dir, source)),
        };

        let mut batches = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| io_error("read dataset dir", &self.dir, source))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(BATCH_EXTENSION) {
                continue;
            }
            // Only sequence-named documents are batches; skip crawler
            // bookkeeping such as `__metadata__.json`.
            if let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(BatchId::new)
                .filter(|id| id.sequence().is_some())
            {
                batches.push(id);
            }
        }

        batches.sort();
        debug!(dir = %self.dir.display(), count = batches.len(), "Listed episode batches");
        Ok(batches)
    }

    async fn load_batch(&self, id: &BatchId) -> StoreResult<Batch> {
        let path = self.batch_path(id);

        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::BatchNotFound { batch: id.clone() })
            }
            Err(source) => return Err(io_error("read batch", &path, source)),
        };

        let document: BatchDocument =
            serde_json::from_slice(&content).map_err(|source| StoreError::Malformed {
                batch: id.clone(),
                source,
            })?;

        let batch = Batch::new(id.clone(), document.data).validated()?;
        info!(batch = %id, records = batch.len(), "Loaded episode batch");
        Ok(batch)
    }
}

fn io_error(operation: &'static str, path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        operation,
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    fn episode(href: &str) -> EpisodeRecord {
        EpisodeRecord::new(href, "Episode", "Notes", "2020-01-01T00:00:00.000Z")
    }

    #[tokio::test]
    async fn test_missing_dir_has_no_batches() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(tmp.path().join("episodes"));

        assert!(store.list_batches().await.unwrap().is_empty());
        assert!(matches!(
            store.load_latest_batch().await,
            Err(PipelineError::NoDataAvailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_push_then_load_latest() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(tmp.path());

        let first = store.push_batch(&[episode("a")]).await.unwrap();
        let second = store.push_batch(&[episode("b"), episode("c")]).await.unwrap();

        assert_eq!(first.as_str(), "000000001");
        assert_eq!(second.as_str(), "000000002");
        assert_eq!(store.list_batches().await.unwrap(), vec![first.clone(), second.clone()]);

        let latest = store.load_latest_batch().await.unwrap();
        assert_eq!(latest.id, second);
        let hrefs: Vec<_> = latest.records.iter().map(|r| r.href.as_str()).collect();
        assert_eq!(hrefs, vec!["b", "c"]);

        let older = store.load_batch(&first).await.unwrap();
        assert_eq!(older.records, vec![episode("a")]);
    }

    #[tokio::test]
    async fn test_ignores_non_json_files_and_sorts() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("000000010.json"), r#"{"data":[]}"#).unwrap();
        std::fs::write(tmp.path().join("000000002.json"), r#"{"data":[]}"#).unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "ignore me").unwrap();

        let store = DatasetStore::new(tmp.path());
        let ids = store.list_batches().await.unwrap();

        assert_eq!(
            ids,
            vec![BatchId::new("000000002"), BatchId::new("000000010")]
        );
    }

    #[tokio::test]
    async fn test_metadata_document_is_not_a_batch() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(tmp.path());
        let first = store.push_batch(&[episode("a")]).await.unwrap();
        std::fs::write(tmp.path().join("__metadata__.json"), r#"{"id":"episodes"}"#).unwrap();

        assert_eq!(store.list_batches().await.unwrap(), vec![first.clone()]);
        assert_eq!(store.load_latest_batch().await.unwrap().id, first);

        let second = store.push_batch(&[episode("b")]).await.unwrap();
        assert_eq!(second.as_str(), "000000002");
        assert_eq!(store.load_latest_batch().await.unwrap().id, second);
    }

    #[tokio::test]
    async fn test_loads_dates_without_offset() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("000000001.json"),
            r#"{"data":[
                {"href":"a","title":"Ep1","description":"d","publishDate":"2020-01-01"},
                {"href":"b","title":"Ep2","description":"d","publishDate":"2020-01-02T08:30:00"}
            ]}"#,
        )
        .unwrap();

        let store = DatasetStore::new(tmp.path());
        let batch = store.load_latest_batch().await.unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.records[0].publish_date, "2020-01-01");
        assert_eq!(batch.records[1].publish_date, "2020-01-02T08:30:00");
    }

    #[tokio::test]
    async fn test_malformed_batch() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("000000001.json"), r#"[{"href":"a"}]"#).unwrap();

        let store = DatasetStore::new(tmp.path());
        let err = store.load_batch(&BatchId::from_sequence(1)).await.unwrap_err();

        assert!(matches!(err, StoreError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_unknown_batch() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DatasetStore::new(tmp.path());

        let err = store.load_batch(&BatchId::new("missing")).await.unwrap_err();
        assert!(matches!(err, StoreError::BatchNotFound { .. }));
    }

    #[tokio::test]
    async fn test_reads_crawler_written_pub_date() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("000000001.json"),
            r#"{"data":[{"href":"a","title":"Ep1","description":"d","pubDate":"2020-01-01T00:00:00.000Z"}]}"#,
        )
        .unwrap();

        let store = DatasetStore::new(tmp.path());
        let batch = store.load_latest_batch().await.unwrap();

        assert_eq!(batch.records[0].publish_date, "2020-01-01T00:00:00.000Z");
    }
}
