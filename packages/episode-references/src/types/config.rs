//! Pipeline configuration.

use std::num::NonZeroUsize;

/// Configuration for a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Maximum extraction calls in flight at once.
    ///
    /// 1 keeps the run strictly sequential. Larger values run calls
    /// concurrently but results still come back in input order.
    pub concurrency: NonZeroUsize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: NonZeroUsize::MIN,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of concurrent extraction calls.
    pub fn with_concurrency(mut self, concurrency: NonZeroUsize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Check if the run is strictly sequential.
    pub fn is_sequential(&self) -> bool {
        self.concurrency.get() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sequential() {
        let config = PipelineConfig::default();
        assert!(config.is_sequential());
        assert_eq!(config.concurrency.get(), 1);
    }

    #[test]
    fn test_with_concurrency() {
        let config = PipelineConfig::new().with_concurrency(NonZeroUsize::new(4).unwrap());
        assert!(!config.is_sequential());
        assert_eq!(config.concurrency.get(), 4);
    }
}
