//! Gateway error types.

use thiserror::Error;

/// A model invocation failure, classified for retry routing.
///
/// Transient failures (throttling, timeouts, server errors) are retried by
/// the orchestration engine like a validation failure. Fatal failures
/// (authentication, bad request, missing configuration) short-circuit the
/// retry loop immediately.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Worth retrying: throttle, timeout, connection loss, 5xx.
    #[error("transient gateway failure: {0}")]
    Transient(String),

    /// Retrying cannot fix it: auth, bad request, misconfiguration.
    #[error("fatal gateway failure: {0}")]
    Fatal(String),
}

impl GatewayError {
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}
