//! JSON file output.
//!
//! The artifact is a pretty-printed JSON array of [`EpisodeResult`]. The
//! document is written to a sibling temporary file first and renamed over
//! the target, so a failed write leaves any previous artifact intact.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{PipelineError, Result, StoreError, StoreResult};
use crate::traits::writer::ResultWriter;
use crate::types::result::EpisodeResult;

/// Writes results to a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileWriter {
    path: PathBuf,
}

impl JsonFileWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the output path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn failure(&self, source: std::io::Error) -> PipelineError {
        PipelineError::WriteFailure {
            target: self.target(),
            source,
        }
    }
}

#[async_trait]
impl ResultWriter for JsonFileWriter {
    fn target(&self) -> String {
        self.path.display().to_string()
    }

    async fn write(&self, results: &[EpisodeResult]) -> Result<()> {
        let mut bytes =
            serde_json::to_vec_pretty(results).map_err(|e| self.failure(e.into()))?;
        bytes.push(b'\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.failure(e))?;
        }

        let temp = self.temp_path();
        if let Err(e) = tokio::fs::write(&temp, &bytes).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(self.failure(e));
        }
        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(self.failure(e));
        }

        info!(path = %self.path.display(), episodes = results.len(), "Wrote episode references");
        Ok(())
    }
}

/// Read a previously written artifact back, e.g. to diff two runs.
pub async fn read_results(path: impl AsRef<Path>) -> StoreResult<Vec<EpisodeResult>> {
    let path = path.as_ref();
    let content = tokio::fs::read(path).await.map_err(|source| StoreError::Io {
        operation: "read results",
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_slice(&content).map_err(|source| StoreError::InvalidResults {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::reference::Reference;

    fn result(href: &str, references: Vec<Reference>) -> EpisodeResult {
        EpisodeResult {
            title: format!("Episode {}", href),
            href: href.to_string(),
            publish_date: "2020-01-01T00:00:00.000Z".to_string(),
            references,
        }
    }

    #[tokio::test]
    async fn test_write_creates_parent_and_reads_back() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out").join("references.json");
        let writer = JsonFileWriter::new(&path);

        let results = vec![
            result(
                "a",
                vec![Reference::new("paper", "Smith, J.", "example.com")
                    .with_href("https://example.com/paper")],
            ),
            result("b", vec![]),
        ];
        writer.write(&results).await.unwrap();

        assert_eq!(read_results(&path).await.unwrap(), results);
        assert!(!writer.temp_path().exists());
    }

    #[tokio::test]
    async fn test_write_replaces_previous_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("references.json");
        std::fs::write(&path, "stale").unwrap();

        let writer = JsonFileWriter::new(&path);
        writer.write(&[result("a", vec![])]).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with('['));
        assert!(content.ends_with("]\n"));
    }

    #[tokio::test]
    async fn test_write_into_missing_location_fails() {
        let tmp = tempfile::tempdir().unwrap();
        // A regular file where a directory is expected.
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let writer = JsonFileWriter::new(blocker.join("references.json"));
        let err = writer.write(&[result("a", vec![])]).await.unwrap_err();

        assert!(matches!(err, PipelineError::WriteFailure { .. }));
        assert_eq!(err.stage(), "write");
    }

    #[tokio::test]
    async fn test_read_results_reports_invalid_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("references.json");
        std::fs::write(&path, r#"{"title":"not an array"}"#).unwrap();

        let err = read_results(&path).await.unwrap_err();

        assert!(matches!(
            &err,
            StoreError::InvalidResults { source, .. } if source.is_data()
        ));
        assert!(err.to_string().contains("references.json"));
    }

    #[tokio::test]
    async fn test_read_results_missing_file_is_io() {
        let tmp = tempfile::tempdir().unwrap();
        let err = read_results(tmp.path().join("absent.json")).await.unwrap_err();
        assert!(matches!(err, StoreError::Io { operation: "read results", .. }));
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let writer = JsonFileWriter::new("/data/references.json");
        assert_eq!(
            writer.temp_path(),
            PathBuf::from("/data/references.json.tmp")
        );
    }
}
