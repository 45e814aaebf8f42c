//! Prompt text and request assembly.
//!
//! The schema prompts are derived from the required-field declarations in
//! `faro-core`, so the instructions sent to the model and the validator
//! applied to its answer cannot drift apart.

use faro_core::summary::FIELD_SCHEMA;
use faro_core::{InsightScope, ReportKind};

use crate::retry::build_retry_prompt;
use crate::validator::ValidationResult;

/// The one-line output format demanded from the compression model.
#[must_use]
pub fn compress_format_block() -> String {
    let mut lines = Vec::with_capacity(FIELD_SCHEMA.len());
    for (name, allowed) in FIELD_SCHEMA {
        let values = allowed.map_or_else(|| "word".to_string(), |set| set.join("|"));
        lines.push(format!("{name}: {values}"));
    }
    lines.join(",\n")
}

/// First-attempt compression prompt for one conversation.
#[must_use]
pub fn compress_prompt(conversation: &str) -> String {
    format!(
        "Analyze the following COMPLETE conversation between a client and a bot.\n\
         Return ONLY one line with ALL of these fields, one word per field.\n\
         If there is no clear information for a field, use \"unknown\".\n\n\
         Required format:\n\n{}\n\nConversation:\n{conversation}",
        compress_format_block()
    )
}

/// Repair prompt after a rejected compression attempt. Lists the failing
/// fields and restates the full format.
#[must_use]
pub fn compress_repair_prompt(
    conversation: &str,
    previous_output: &str,
    errors: &[(String, String)],
) -> String {
    let error_list = errors
        .iter()
        .map(|(field, reason)| format!("- {field}: {reason}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Your previous output did NOT match the required format.\n\n\
         Detected errors:\n{error_list}\n\n\
         Return EXACTLY one line with ALL fields and ONLY the allowed values.\n\n\
         Required format (one word per field):\n\n{}\n\n\
         Rules:\n\
         - Use ONLY one word per field\n\
         - If there is no clear information, use \"unknown\"\n\
         - Do not add any extra text\n\n\
         Conversation:\n{conversation}\n\n\
         Previous output (incorrect):\n{previous_output}",
        compress_format_block()
    )
}

/// The schema portion of a generation prompt: which document shape the
/// model must return for this scope and report variant.
#[must_use]
pub fn schema_prompt(scope: &InsightScope, kind: ReportKind) -> String {
    match scope {
        InsightScope::Global | InsightScope::Project(_) => {
            let keys = scope
                .required_fields(kind)
                .iter()
                .map(|f| format!("- {}", f.path))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "You are a commercial analyst. From the structured data below, write an\n\
                 insight report as ONE JSON object containing EXACTLY these fields:\n{keys}\n\n\
                 Every field must be present. Answer with the JSON object only."
            )
        }
        InsightScope::Monthly(_) => {
            let item_keys = scope
                .required_fields(kind)
                .iter()
                .filter_map(|f| f.path.strip_prefix("monthly_trends[]."))
                .map(|key| format!("  - {key}"))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "You are a commercial analyst. From the structured data below, write a\n\
                 monthly trend report as ONE JSON object with:\n\
                 - monthly_trends: an array with one entry for the month, each entry\n\
                 containing EXACTLY these fields:\n{item_keys}\n\
                 - global_insight: a string summarizing the overall tendency\n\n\
                 Every field must be present. Answer with the JSON object only."
            )
        }
    }
}

/// Scope-pinning preamble so monthly and per-project documents echo the
/// exact window they were generated for.
#[must_use]
pub fn scope_preamble(scope: &InsightScope) -> String {
    match scope {
        InsightScope::Global => String::new(),
        InsightScope::Monthly(month) => format!(
            "The month for this data is: {month}\n\
             You must use EXACTLY this value in monthly_trends[].month.\n\n"
        ),
        InsightScope::Project(name) => format!(
            "The project name is: {name}\n\
             You must use EXACTLY this value in general_summary.project_name.\n\n"
        ),
    }
}

/// Assemble the full generation prompt for one attempt.
///
/// `deficiencies` from the prior attempt switch the schema portion to the
/// strict retry form. Deterministic for identical inputs.
#[must_use]
pub fn build_generation_prompt(
    scope: &InsightScope,
    kind: ReportKind,
    structured_input: &str,
    deficiencies: Option<&ValidationResult>,
) -> String {
    let schema = schema_prompt(scope, kind);
    let body = deficiencies.map_or(schema.clone(), |report| build_retry_prompt(&schema, report));
    format!(
        "{}{body}\n\nSTRUCTURED_DATA:\n{structured_input}",
        scope_preamble(scope)
    )
}
