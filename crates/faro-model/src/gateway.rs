//! The model gateway: sends a request payload to the generative model
//! endpoint and returns raw text.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use faro_config::ModelConfig;

use crate::error::GatewayError;

/// One request to the generative model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl ModelRequest {
    /// Request shape for the main insight/trend generation calls.
    #[must_use]
    pub fn generation(prompt: String) -> Self {
        Self {
            prompt,
            max_tokens: 8000,
            temperature: 0.3,
        }
    }

    /// Request shape for per-conversation compression: short answer, low
    /// temperature.
    #[must_use]
    pub fn compression(prompt: String) -> Self {
        Self {
            prompt,
            max_tokens: 200,
            temperature: 0.2,
        }
    }
}

/// Abstraction over the generative model endpoint.
///
/// Implementations must be stateless and shareable read-only across
/// concurrent pipeline instances.
pub trait ModelGateway: Send + Sync {
    /// Invoke `model_id` with `request`, returning the assistant's raw text.
    fn invoke(
        &self,
        request: &ModelRequest,
        model_id: &str,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send;
}

/// HTTP implementation speaking an Anthropic-style messages payload to the
/// configured endpoint.
#[derive(Debug, Clone)]
pub struct HttpModelGateway {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpModelGateway {
    /// Build a gateway from config. The request timeout is enforced by the
    /// underlying client; a timed-out call is classified transient.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Fatal`] when the model section is not
    /// configured or the client cannot be constructed.
    pub fn new(config: &ModelConfig) -> Result<Self, GatewayError> {
        if !config.is_configured() {
            return Err(GatewayError::Fatal(
                "model endpoint or api key not configured".into(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| GatewayError::Fatal(format!("failed to build http client: {error}")))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

impl ModelGateway for HttpModelGateway {
    async fn invoke(&self, request: &ModelRequest, model_id: &str) -> Result<String, GatewayError> {
        let payload = json!({
            "model": model_id,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "messages": [{"role": "user", "content": request.prompt}],
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| GatewayError::Transient(format!("failed to read body: {error}")))?;

        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        debug!(model = model_id, bytes = body.len(), "model call completed");
        Ok(unwrap_envelope(&body))
    }
}

fn classify_request_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() || error.is_connect() {
        GatewayError::Transient(error.to_string())
    } else if error.is_builder() || error.is_request() {
        GatewayError::Fatal(error.to_string())
    } else {
        GatewayError::Transient(error.to_string())
    }
}

fn classify_status(status: reqwest::StatusCode, body: &str) -> GatewayError {
    let summary = format!("status {status}: {}", body.chars().take(200).collect::<String>());
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        GatewayError::Transient(summary)
    } else {
        GatewayError::Fatal(summary)
    }
}

/// Extract the assistant's text from a messages-API response envelope.
///
/// The endpoint nests the reply under `content[0].text`. A body that is not
/// such an envelope is returned unchanged so downstream parsing can still
/// attempt recovery.
#[must_use]
pub fn unwrap_envelope(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(text) = value
            .get("content")
            .and_then(|c| c.get(0))
            .and_then(|item| item.get("text"))
            .and_then(|t| t.as_str())
        {
            return text.to_string();
        }
    }
    body.to_string()
}
