//! Generative model endpoint configuration.

use serde::{Deserialize, Serialize};

/// Default identifier for the main insights model.
fn default_main_model() -> String {
    String::from("anthropic.claude-sonnet-4-5")
}

/// Default identifier for the compression model.
fn default_compress_model() -> String {
    String::from("anthropic.claude-haiku-4-5")
}

/// Default per-request timeout in seconds.
const fn default_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    /// Messages endpoint URL of the model gateway.
    #[serde(default)]
    pub endpoint: String,

    /// Bearer token for the endpoint.
    #[serde(default)]
    pub api_key: String,

    /// Model used for the main insight/trend generation calls.
    #[serde(default = "default_main_model")]
    pub main_model: String,

    /// Model used for per-conversation compression.
    #[serde(default = "default_compress_model")]
    pub compress_model: String,

    /// Per-request timeout in seconds. A timed-out call is classified as
    /// transient and retried through the normal routing.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            main_model: default_main_model(),
            compress_model: default_compress_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ModelConfig {
    /// Check if the model config has the minimum required fields.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.endpoint.is_empty() && !self.api_key.is_empty()
    }
}
