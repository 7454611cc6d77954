use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use crate::types::config::PipelineConfig;

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_DATASET_DIR: &str = "./storage/datasets/episodes";
const DEFAULT_OUTPUT_PATH: &str = "./references.json";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub model: String,
    pub dataset_dir: PathBuf,
    pub output_path: PathBuf,
    pub concurrency: NonZeroUsize,
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let concurrency = match lookup("EXTRACTION_CONCURRENCY") {
            Some(raw) => parse_concurrency(&raw)?,
            None => NonZeroUsize::MIN,
        };
        let timeout_secs = match lookup("EXTRACTION_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().with_context(|| {
                format!("EXTRACTION_TIMEOUT_SECS must be a number, got '{}'", raw)
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            bail!("EXTRACTION_TIMEOUT_SECS must be at least 1");
        }

        Ok(Self {
            openai_api_key: lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()),
            openai_base_url: lookup("OPENAI_BASE_URL"),
            model: lookup("EXTRACTION_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            dataset_dir: lookup("DATASET_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_DIR)),
            output_path: lookup("OUTPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            concurrency,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// API key, required only when extraction actually runs.
    pub fn require_openai_api_key(&self) -> Result<&str> {
        self.openai_api_key
            .as_deref()
            .context("OPENAI_API_KEY must be set")
    }

    /// Pipeline settings derived from this configuration.
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig::new().with_concurrency(self.concurrency)
    }
}

/// Parse a concurrency setting; must be a positive integer.
pub fn parse_concurrency(raw: &str) -> Result<NonZeroUsize> {
    let value: usize = raw
        .trim()
        .parse()
        .with_context(|| format!("EXTRACTION_CONCURRENCY must be a number, got '{}'", raw))?;

    match NonZeroUsize::new(value) {
        Some(value) => Ok(value),
        None => bail!("EXTRACTION_CONCURRENCY must be at least 1"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.dataset_dir, PathBuf::from("./storage/datasets/episodes"));
        assert_eq!(config.output_path, PathBuf::from("./references.json"));
        assert_eq!(config.concurrency.get(), 1);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert!(config.pipeline().is_sequential());
        assert!(config.require_openai_api_key().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("EXTRACTION_MODEL", "gpt-4o"),
            ("DATASET_DIR", "/data/episodes"),
            ("OUTPUT_PATH", "/data/out.json"),
            ("EXTRACTION_CONCURRENCY", "3"),
            ("EXTRACTION_TIMEOUT_SECS", "30"),
        ])
        .unwrap();

        assert_eq!(config.require_openai_api_key().unwrap(), "sk-test");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.dataset_dir, PathBuf::from("/data/episodes"));
        assert_eq!(config.output_path, PathBuf::from("/data/out.json"));
        assert_eq!(config.concurrency.get(), 3);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let config = config_from(&[("OPENAI_API_KEY", "  ")]).unwrap();
        assert!(config.require_openai_api_key().is_err());
    }

    #[test]
    fn test_invalid_concurrency() {
        assert!(config_from(&[("EXTRACTION_CONCURRENCY", "0")]).is_err());
        assert!(config_from(&[("EXTRACTION_CONCURRENCY", "many")]).is_err());
    }

    #[test]
    fn test_invalid_timeout() {
        assert!(config_from(&[("EXTRACTION_TIMEOUT_SECS", "0")]).is_err());
        assert!(config_from(&[("EXTRACTION_TIMEOUT_SECS", "soon")]).is_err());
    }
}
