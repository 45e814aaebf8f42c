//! Strict retry prompts built from validation deficiency reports.
//!
//! Pure and deterministic: identical (schema prompt, report) pairs produce
//! byte-identical output, so retries are reproducible in tests.

use crate::validator::ValidationResult;

/// Build the corrective prompt for a rejected attempt.
///
/// Restates the required structure and itemizes exactly which field paths
/// were missing or malformed in the prior attempt.
#[must_use]
pub fn build_retry_prompt(schema_prompt: &str, report: &ValidationResult) -> String {
    let mut parts = vec![
        "YOUR PREVIOUS ANSWER WAS NOT A VALID JSON DOCUMENT.\n\n".to_string(),
    ];

    if !report.missing.is_empty() {
        parts.push("The following REQUIRED fields were MISSING:\n".into());
        for path in &report.missing {
            parts.push(format!("- {path}\n"));
        }
        parts.push("\n".into());
    }
    if !report.malformed.is_empty() {
        parts.push("The following fields had the WRONG TYPE or shape:\n".into());
        for path in &report.malformed {
            parts.push(format!("- {path}\n"));
        }
        parts.push("\n".into());
    }

    parts.push(
        "Return ONLY a valid JSON object. No additional text, no comments.\n\
         Follow EXACTLY this structure:\n\n"
            .into(),
    );
    parts.push(schema_prompt.to_string());
    parts.push("\n\nRegenerate the COMPLETE JSON from scratch, correcting the fields listed above.".into());
    parts.concat()
}
