//! Dot-path required-field validation of insight documents.
//!
//! Field paths are dot-addressed (`general_summary.project_name`); a `[]`
//! suffix on a segment fans the check out over every element of that array
//! (`monthly_trends[].month`). The validator reports the most specific
//! failing path it can name, not just the top-level key.

use serde_json::Value;

use faro_core::{FieldKind, FieldSpec};

/// The deficiency report for one document. Empty `missing` and empty
/// `malformed` means the document is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub missing: Vec<String>,
    pub malformed: Vec<String>,
}

impl ValidationResult {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty() && self.malformed.is_empty()
    }
}

/// Check `doc` against `required` field specs.
#[must_use]
pub fn validate(doc: &Value, required: &[FieldSpec]) -> ValidationResult {
    let mut result = ValidationResult::default();
    for spec in required {
        check_path(doc, &spec.path, spec, "", &mut result);
    }
    result
}

/// Walk one declared path, recursing through `[]` wildcards.
///
/// `resolved` accumulates the concrete path (wildcards replaced with real
/// indices) so the report names the exact failing location.
fn check_path(value: &Value, path: &str, spec: &FieldSpec, resolved: &str, out: &mut ValidationResult) {
    let Some((segment, rest)) = split_first_segment(path) else {
        if !leaf_conforms(value, spec) {
            out.malformed.push(resolved.to_string());
        }
        return;
    };

    let (key, wildcard) = segment
        .strip_suffix("[]")
        .map_or((segment, false), |k| (k, true));

    let here = join(resolved, key);
    let Some(child) = value.get(key) else {
        // The most specific thing we can say: the full declared tail is
        // missing below this point.
        out.missing.push(join(&here, rest).trim_end_matches('.').to_string());
        return;
    };

    if wildcard {
        let Some(items) = child.as_array() else {
            out.malformed.push(here);
            return;
        };
        for (index, item) in items.iter().enumerate() {
            let indexed = format!("{here}[{index}]");
            if rest.is_empty() {
                if !leaf_conforms(item, spec) {
                    out.malformed.push(indexed);
                }
            } else {
                check_path(item, rest, spec, &indexed, out);
            }
        }
        return;
    }

    if rest.is_empty() {
        if !leaf_conforms(child, spec) {
            out.malformed.push(here);
        }
        return;
    }

    if !child.is_object() {
        // An intermediate segment that exists but cannot be descended into.
        out.malformed.push(here);
        return;
    }
    check_path(child, rest, spec, &here, out);
}

fn split_first_segment(path: &str) -> Option<(&str, &str)> {
    if path.is_empty() {
        return None;
    }
    match path.split_once('.') {
        Some((head, tail)) => Some((head, tail)),
        None => Some((path, "")),
    }
}

fn join(base: &str, segment: &str) -> String {
    if base.is_empty() {
        segment.to_string()
    } else if segment.is_empty() {
        base.to_string()
    } else {
        format!("{base}.{segment}")
    }
}

/// A leaf conforms when its type matches and, for value-pinned specs, the
/// string equals the expected value exactly.
fn leaf_conforms(value: &Value, spec: &FieldSpec) -> bool {
    if !kind_matches(value, spec.kind) {
        return false;
    }
    match &spec.expected {
        Some(expected) => value.as_str() == Some(expected.as_str()),
        None => true,
    }
}

fn kind_matches(value: &Value, kind: FieldKind) -> bool {
    match kind {
        FieldKind::Object => value.is_object(),
        FieldKind::Array => value.is_array(),
        FieldKind::String => value.is_string(),
        FieldKind::Number => value.is_number(),
        FieldKind::Any => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faro_core::{InsightScope, ReportKind};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn specs(entries: &[(&str, FieldKind)]) -> Vec<FieldSpec> {
        entries
            .iter()
            .map(|(path, kind)| FieldSpec::new(path, *kind))
            .collect()
    }

    #[test]
    fn complete_document_is_accepted() {
        let doc = json!({"risk_factors": ["churn"], "summary": "ok"});
        let result = validate(
            &doc,
            &specs(&[
                ("risk_factors", FieldKind::Array),
                ("summary", FieldKind::String),
            ]),
        );
        assert!(result.is_valid());
    }

    #[test]
    fn missing_top_level_key_is_reported() {
        let doc = json!({"summary": "ok"});
        let result = validate(&doc, &specs(&[("risk_factors", FieldKind::Array)]));
        assert_eq!(result.missing, vec!["risk_factors"]);
        assert!(result.malformed.is_empty());
    }

    #[test]
    fn nested_missing_path_is_specific() {
        let doc = json!({"general_summary": {"headline": "x"}});
        let result = validate(
            &doc,
            &specs(&[("general_summary.project_name", FieldKind::String)]),
        );
        assert_eq!(result.missing, vec!["general_summary.project_name"]);
    }

    #[test]
    fn missing_parent_reports_full_declared_path() {
        let doc = json!({});
        let result = validate(
            &doc,
            &specs(&[("general_summary.project_name", FieldKind::String)]),
        );
        assert_eq!(result.missing, vec!["general_summary.project_name"]);
    }

    #[test]
    fn type_mismatch_is_malformed_not_missing() {
        let doc = json!({"monthly_trends": "not an array"});
        let result = validate(&doc, &specs(&[("monthly_trends", FieldKind::Array)]));
        assert!(result.missing.is_empty());
        assert_eq!(result.malformed, vec!["monthly_trends"]);
    }

    #[test]
    fn wildcard_checks_every_array_element() {
        let doc = json!({
            "monthly_trends": [
                {"month": "2025-01"},
                {"other": true},
                {"month": "2025-03"},
            ]
        });
        let result = validate(&doc, &specs(&[("monthly_trends[].month", FieldKind::Any)]));
        assert_eq!(result.missing, vec!["monthly_trends[1].month"]);
    }

    #[test]
    fn wildcard_on_non_array_is_malformed() {
        let doc = json!({"monthly_trends": {"month": "2025-01"}});
        let result = validate(&doc, &specs(&[("monthly_trends[].month", FieldKind::Any)]));
        assert_eq!(result.malformed, vec!["monthly_trends"]);
    }

    #[test]
    fn value_pinned_field_rejects_a_different_string() {
        let doc = json!({"general_summary": {"project_name": "otro proyecto"}});
        let result = validate(
            &doc,
            &[FieldSpec::equals("general_summary.project_name", "valle verde")],
        );
        assert_eq!(result.malformed, vec!["general_summary.project_name"]);
    }

    #[test]
    fn value_pinned_field_accepts_the_exact_string() {
        let doc = json!({"general_summary": {"project_name": "valle verde"}});
        let result = validate(
            &doc,
            &[FieldSpec::equals("general_summary.project_name", "valle verde")],
        );
        assert!(result.is_valid());
    }

    #[test]
    fn scalar_intermediate_segment_is_malformed() {
        let doc = json!({"general_summary": "just a string"});
        let result = validate(
            &doc,
            &specs(&[("general_summary.project_name", FieldKind::String)]),
        );
        assert_eq!(result.malformed, vec!["general_summary"]);
    }

    #[test]
    fn accepts_iff_every_required_path_conforms() {
        let scope = InsightScope::Monthly("2025-02".into());
        let required = scope.required_fields(ReportKind::Standard);
        let mut doc = json!({
            "monthly_trends": [{
                "month": "2025-02",
                "top_valued_attributes": [],
                "top_topics": [],
                "client_segments": [],
                "product_affinity": [],
                "funnel": {},
                "recurring_themes": [],
                "average_sentiment": "neutral",
                "monthly_insight": "quiet month",
                "pareto_findings": [],
                "recommended_actions": [],
            }],
            "global_insight": "stable",
        });
        assert!(validate(&doc, &required).is_valid());

        doc["monthly_trends"][0]
            .as_object_mut()
            .unwrap()
            .remove("funnel");
        let result = validate(&doc, &required);
        assert_eq!(result.missing, vec!["monthly_trends[0].funnel"]);
    }
}
