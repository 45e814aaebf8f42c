//! Fatal error records persisted when a sub-pipeline instance terminates
//! without a valid document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::PipelineError;

/// The structured object written to the error prefix on terminal failure.
/// Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FatalErrorRecord {
    /// Always `"insights_pipeline"`; disambiguates records in shared buckets.
    pub pipeline: String,
    /// Data source label (e.g. `subsidio`).
    pub source: String,
    /// Sub-pipeline instance label (`global`, `monthly:2025-03`, ...).
    pub scope: String,
    /// Pipeline stage where the failure surfaced.
    pub stage: String,
    /// Machine-readable error kind, see [`PipelineError::kind`].
    pub kind: String,
    /// Human-readable description.
    pub reason: String,
    /// Number of model invocations spent before giving up. Zero for stages
    /// with no retry path.
    pub attempts: u32,
    pub timestamp: DateTime<Utc>,
    /// Extra debugging detail (missing keys, per-item errors).
    #[serde(default)]
    pub context: serde_json::Value,
}

impl FatalErrorRecord {
    /// Build a record for `error` surfacing at `stage`.
    #[must_use]
    pub fn new(
        source: &str,
        scope: &str,
        stage: &str,
        error: &PipelineError,
        attempts: u32,
        context: serde_json::Value,
    ) -> Self {
        Self {
            pipeline: "insights_pipeline".into(),
            source: source.into(),
            scope: scope.into(),
            stage: stage.into(),
            kind: error.kind().into(),
            reason: error.to_string(),
            attempts,
            timestamp: Utc::now(),
            context,
        }
    }
}
