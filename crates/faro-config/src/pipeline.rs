//! Pipeline tuning knobs.

use serde::{Deserialize, Serialize};

/// Default retry budget per sub-pipeline instance.
const fn default_max_retries() -> u32 {
    3
}

/// Default compression worker pool size.
const fn default_workers() -> usize {
    2
}

/// Default download timeout in seconds.
const fn default_download_timeout_secs() -> u64 {
    60
}

/// Default number of dominant terms to extract.
const fn default_top_terms() -> usize {
    15
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Maximum number of corrective model re-invocations per sub-pipeline
    /// instance. Shared by the global, monthly, and per-project workflows.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Bounded worker pool size for concurrent conversation compression.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Timeout for raw-data downloads. Exceeding it is fatal for the run;
    /// data loading has no retry path.
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,

    /// Only keep records from the last N months (relative to the newest
    /// record). `None` keeps everything.
    #[serde(default)]
    pub recent_months: Option<u32>,

    /// How many dominant terms to report per window.
    #[serde(default = "default_top_terms")]
    pub top_terms: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            workers: default_workers(),
            download_timeout_secs: default_download_timeout_secs(),
            recent_months: None,
            top_terms: default_top_terms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.workers, 2);
        assert_eq!(config.download_timeout_secs, 60);
        assert!(config.recent_months.is_none());
        assert_eq!(config.top_terms, 15);
    }
}
