//! Cross-cutting error types for the faro pipeline.
//!
//! Collaborator-specific errors (gateway, lake) are defined in their own
//! crates and converted into [`PipelineError`] at the engine boundary, where
//! they decide routing: transient errors consume the retry budget, fatal
//! errors terminate the sub-pipeline instance.

use thiserror::Error;

/// Errors that can surface from a pipeline run.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// Raw-data listing or download failed. No retry path.
    #[error("load failed: {0}")]
    Load(String),

    /// Input data was malformed beyond use.
    #[error("preprocess failed: {0}")]
    Preprocess(String),

    /// One conversation failed to compress. Absorbed by the summarize node.
    #[error("summarization failed for client {client_id}: {reason}")]
    Summarization { client_id: String, reason: String },

    /// Model call failed in a way worth retrying (throttle, timeout, 5xx).
    #[error("transient gateway error: {0}")]
    GatewayTransient(String),

    /// Model call failed in a way retrying cannot fix (auth, bad request).
    #[error("fatal gateway error: {0}")]
    GatewayFatal(String),

    /// Model output could not be turned into a JSON document.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// Document is missing or mistypes required fields.
    #[error("validation failed ({} missing, {} malformed)", missing.len(), malformed.len())]
    Validation {
        missing: Vec<String>,
        malformed: Vec<String>,
    },

    /// The retry budget ran out. An expected, reportable outcome.
    #[error("retries exhausted after {attempts} attempts: {reason}")]
    RetriesExhausted { attempts: u32, reason: String },

    /// A write to the persistence sink failed.
    #[error("persistence failed for key '{key}': {reason}")]
    Persistence { key: String, reason: String },
}

impl PipelineError {
    /// Stable machine-readable kind, recorded in fatal error objects.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Load(_) => "load_error",
            Self::Preprocess(_) => "preprocess_error",
            Self::Summarization { .. } => "summarization_error",
            Self::GatewayTransient(_) => "gateway_transient_error",
            Self::GatewayFatal(_) => "gateway_fatal_error",
            Self::Parse(_) => "parse_error",
            Self::Validation { .. } => "validation_error",
            Self::RetriesExhausted { .. } => "retries_exhausted",
            Self::Persistence { .. } => "persistence_error",
        }
    }

    /// Whether the engine may spend retry budget on this error.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::GatewayTransient(_) | Self::Parse(_) | Self::Validation { .. }
        )
    }
}
