//! Compressed per-conversation summaries and their field schema.
//!
//! The compression model answers with a single line of `key: value` pairs.
//! Every field is a lowercase token; closed-vocabulary fields restrict the
//! allowed values and everything else accepts any single token. Fields the
//! model could not determine carry the sentinel [`UNKNOWN`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel for fields the compression model could not determine.
pub const UNKNOWN: &str = "unknown";

/// Closed vocabularies for the restricted fields. `None` accepts any token.
pub const FIELD_SCHEMA: &[(&str, Option<&[&str]>)] = &[
    ("sentiment", Some(&["positive", "neutral", "negative"])),
    ("pain_point", None),
    ("client_profile", None),
    ("employment", None),
    ("income", None),
    ("dropped_out", Some(&["yes", "no"])),
    (
        "dropout_reason",
        Some(&[
            "price",
            "subsidy",
            "requirements",
            "distrust",
            "silence",
            "other",
            "none",
        ]),
    ),
    ("bot_solution", None),
    ("bot_friction", Some(&["low", "medium", "high"])),
    ("topics", None),
    (
        "inquiry_type",
        Some(&[
            "informational",
            "comparative",
            "financial",
            "documentation",
            "closing",
        ]),
    ),
    ("valued_attribute", None),
    ("valued_topic", None),
    (
        "funnel_stage",
        Some(&["discovery", "evaluation", "decision", "closing", "dropout"]),
    ),
    ("purchase_intent", Some(&["low", "medium", "high"])),
    ("info_capacity", Some(&["high", "medium", "low"])),
];

/// The structured fields produced by the compression call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryFields {
    pub sentiment: String,
    pub pain_point: String,
    pub client_profile: String,
    pub employment: String,
    pub income: String,
    pub dropped_out: String,
    pub dropout_reason: String,
    pub bot_solution: String,
    pub bot_friction: String,
    pub topics: String,
    pub inquiry_type: String,
    pub valued_attribute: String,
    pub valued_topic: String,
    pub funnel_stage: String,
    pub purchase_intent: String,
    pub info_capacity: String,
}

impl Default for SummaryFields {
    fn default() -> Self {
        Self::unknown()
    }
}

impl SummaryFields {
    /// All fields set to [`UNKNOWN`]. This is both the parse baseline and the
    /// fallback when compression retries are exhausted.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            sentiment: UNKNOWN.into(),
            pain_point: UNKNOWN.into(),
            client_profile: UNKNOWN.into(),
            employment: UNKNOWN.into(),
            income: UNKNOWN.into(),
            dropped_out: UNKNOWN.into(),
            dropout_reason: UNKNOWN.into(),
            bot_solution: UNKNOWN.into(),
            bot_friction: UNKNOWN.into(),
            topics: UNKNOWN.into(),
            inquiry_type: UNKNOWN.into(),
            valued_attribute: UNKNOWN.into(),
            valued_topic: UNKNOWN.into(),
            funnel_stage: UNKNOWN.into(),
            purchase_intent: UNKNOWN.into(),
            info_capacity: UNKNOWN.into(),
        }
    }

    /// Read a field by schema name.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not in [`FIELD_SCHEMA`]; callers iterate the schema
    /// table rather than passing free-form names.
    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        match name {
            "sentiment" => &self.sentiment,
            "pain_point" => &self.pain_point,
            "client_profile" => &self.client_profile,
            "employment" => &self.employment,
            "income" => &self.income,
            "dropped_out" => &self.dropped_out,
            "dropout_reason" => &self.dropout_reason,
            "bot_solution" => &self.bot_solution,
            "bot_friction" => &self.bot_friction,
            "topics" => &self.topics,
            "inquiry_type" => &self.inquiry_type,
            "valued_attribute" => &self.valued_attribute,
            "valued_topic" => &self.valued_topic,
            "funnel_stage" => &self.funnel_stage,
            "purchase_intent" => &self.purchase_intent,
            "info_capacity" => &self.info_capacity,
            other => panic!("unknown summary field: {other}"),
        }
    }

    /// Write a field by schema name. Returns false for names outside the
    /// schema so parsers can ignore unknown keys.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "sentiment" => &mut self.sentiment,
            "pain_point" => &mut self.pain_point,
            "client_profile" => &mut self.client_profile,
            "employment" => &mut self.employment,
            "income" => &mut self.income,
            "dropped_out" => &mut self.dropped_out,
            "dropout_reason" => &mut self.dropout_reason,
            "bot_solution" => &mut self.bot_solution,
            "bot_friction" => &mut self.bot_friction,
            "topics" => &mut self.topics,
            "inquiry_type" => &mut self.inquiry_type,
            "valued_attribute" => &mut self.valued_attribute,
            "valued_topic" => &mut self.valued_topic,
            "funnel_stage" => &mut self.funnel_stage,
            "purchase_intent" => &mut self.purchase_intent,
            "info_capacity" => &mut self.info_capacity,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// The compressed structured output for one conversation.
///
/// Exactly one `Summary` exists per successfully compressed conversation;
/// conversations whose compression failed are excluded from the set and
/// counted by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Summary {
    pub client_id: String,
    pub project: Option<String>,
    /// Earliest message timestamp of the underlying conversation.
    pub started_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: SummaryFields,
}
