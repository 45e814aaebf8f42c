//! The per-conversation compression protocol.
//!
//! The compression model answers with a single line of `key: value` pairs
//! separated by commas or newlines. Keys and values are separated by a colon
//! or an equals sign; unknown keys are ignored. Parsing never fails: every
//! schema field starts at [`UNKNOWN`] and keeps it when the model says
//! nothing usable.

use tracing::warn;

use faro_core::summary::FIELD_SCHEMA;
use faro_core::{SummaryFields, UNKNOWN};

use crate::error::GatewayError;
use crate::gateway::{ModelGateway, ModelRequest};
use crate::prompts;

/// Parse the raw compression output into structured fields.
#[must_use]
pub fn parse_compress_output(text: &str) -> SummaryFields {
    let mut fields = SummaryFields::unknown();
    for line in text.split([',', '\n']) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some(separator) = line.find([':', '=']) else {
            continue;
        };
        let key = line[..separator].trim();
        let value = line[separator + 1..].trim().to_lowercase();
        if !value.is_empty() {
            fields.set(key, value);
        }
    }
    fields
}

/// Validate parsed fields against the compression schema.
///
/// Returns `(field, reason)` pairs; empty means valid. Closed-vocabulary
/// fields reject values outside their allowed set, except the [`UNKNOWN`]
/// sentinel which is always admissible.
#[must_use]
pub fn validate_compress_fields(fields: &SummaryFields) -> Vec<(String, String)> {
    let mut errors = Vec::new();
    for (name, allowed) in FIELD_SCHEMA {
        let value = fields.get(name);
        if value.is_empty() {
            errors.push(((*name).to_string(), "missing".to_string()));
            continue;
        }
        if let Some(allowed) = allowed {
            if value != UNKNOWN && !allowed.contains(&value) {
                errors.push(((*name).to_string(), format!("invalid_value: {value}")));
            }
        }
    }
    errors
}

/// Compress one conversation, retrying with repair prompts when the output
/// fails schema validation.
///
/// Up to `max_retries` model calls are made; after the last invalid attempt
/// an all-[`UNKNOWN`] summary is returned so the conversation still counts
/// in aggregate totals. Only gateway failures surface as errors -- the
/// caller excludes those conversations from the summary set.
///
/// # Errors
///
/// Returns the [`GatewayError`] of the failing invocation, transient or
/// fatal.
pub async fn compress_with_validation<G: ModelGateway>(
    gateway: &G,
    model_id: &str,
    conversation: &str,
    max_retries: u32,
) -> Result<SummaryFields, GatewayError> {
    let mut last_output = String::new();
    let mut errors: Vec<(String, String)> = Vec::new();

    for attempt in 1..=max_retries.max(1) {
        let prompt = if attempt == 1 {
            prompts::compress_prompt(conversation)
        } else {
            prompts::compress_repair_prompt(conversation, &last_output, &errors)
        };
        let raw = gateway
            .invoke(&ModelRequest::compression(prompt), model_id)
            .await?;

        let fields = parse_compress_output(&raw);
        errors = validate_compress_fields(&fields);
        if errors.is_empty() {
            return Ok(fields);
        }
        warn!(attempt, invalid_fields = errors.len(), "compression output rejected");
        last_output = raw;
    }

    Ok(SummaryFields::unknown())
}
