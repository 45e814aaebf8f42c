//! Insight document scopes and their required-field declarations.
//!
//! An insight document is the JSON object returned by the main generative
//! call. Three scopes share one validation and retry contract; they differ
//! in the set of field paths that must be present, and that set in turn
//! depends on which report variant the data source uses.

use serde::{Deserialize, Serialize};

/// Which slice of the data an insight document covers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum InsightScope {
    /// The whole data source.
    Global,
    /// One calendar month (`YYYY-MM`).
    Monthly(String),
    /// One project.
    Project(String),
}

impl InsightScope {
    /// Short name used in logs and fatal records.
    #[must_use]
    pub fn stage_label(&self) -> String {
        match self {
            Self::Global => "global".into(),
            Self::Monthly(month) => format!("monthly:{month}"),
            Self::Project(name) => format!("project:{name}"),
        }
    }
}

/// Which report schema a data source's documents follow.
///
/// Subsidy-style sources share one key set; the recommender source asks the
/// model for a different report centered on location preferences and
/// objections.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReportKind {
    Standard,
    Recommender,
}

impl ReportKind {
    /// Pick the report variant for a configured source label.
    #[must_use]
    pub fn for_source(label: &str) -> Self {
        if label == "recomendador" {
            Self::Recommender
        } else {
            Self::Standard
        }
    }
}

/// Expected JSON shape of a required field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FieldKind {
    Object,
    Array,
    String,
    Number,
    /// Present with any type.
    Any,
}

/// One required field of an insight document.
///
/// Paths are dot-addressed; a `[]` suffix on a segment means "every element
/// of this array", e.g. `monthly_trends[].month`. A spec may additionally
/// pin the exact string value the field must hold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldSpec {
    pub path: String,
    pub kind: FieldKind,
    /// Exact value the field must equal, when the document has to echo a
    /// known input such as the project name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
}

impl FieldSpec {
    #[must_use]
    pub fn new(path: &str, kind: FieldKind) -> Self {
        Self {
            path: path.into(),
            kind,
            expected: None,
        }
    }

    /// A string field that must equal `value` exactly.
    #[must_use]
    pub fn equals(path: &str, value: &str) -> Self {
        Self {
            path: path.into(),
            kind: FieldKind::String,
            expected: Some(value.into()),
        }
    }
}

/// Top-level keys every subsidy-style global and per-project document must
/// carry.
const REPORT_KEYS: &[&str] = &[
    "general_summary",
    "pain_points",
    "audience_segments",
    "product_insights",
    "dropout_moments",
    "strategic_recommendations",
    "quick_wins",
    "recommended_kpis",
    "funnel_analysis",
    "inquiry_topics",
    "conclusions",
    "primary_opportunity",
];

/// Top-level keys of the recommender report variant.
const RECOMMENDER_REPORT_KEYS: &[&str] = &[
    "general_summary",
    "location_preferences",
    "priority_project_features",
    "common_objections",
    "brand_and_project_perception",
    "detected_client_segments",
    "inquiry_topics",
    "funnel_analysis",
    "product_analysis",
    "conclusions",
    "commercial_recommendations",
];

/// Per-item keys required inside `monthly_trends` for subsidy-style sources.
const MONTHLY_ITEM_KEYS: &[&str] = &[
    "month",
    "top_valued_attributes",
    "top_topics",
    "client_segments",
    "product_affinity",
    "funnel",
    "recurring_themes",
    "average_sentiment",
    "monthly_insight",
    "pareto_findings",
    "recommended_actions",
];

/// Per-item keys required inside `monthly_trends` for the recommender.
const RECOMMENDER_MONTHLY_ITEM_KEYS: &[&str] = &[
    "month",
    "top_mentioned_locations",
    "top_valued_features",
    "top_valued_attributes",
    "top_topics",
    "client_segments",
    "product_affinity",
    "top_objections",
    "funnel",
    "average_sentiment",
    "monthly_insight",
    "pareto_findings",
    "recommended_actions",
];

const fn report_keys(kind: ReportKind) -> &'static [&'static str] {
    match kind {
        ReportKind::Standard => REPORT_KEYS,
        ReportKind::Recommender => RECOMMENDER_REPORT_KEYS,
    }
}

const fn monthly_item_keys(kind: ReportKind) -> &'static [&'static str] {
    match kind {
        ReportKind::Standard => MONTHLY_ITEM_KEYS,
        ReportKind::Recommender => RECOMMENDER_MONTHLY_ITEM_KEYS,
    }
}

impl InsightScope {
    /// The required field paths for documents of this scope under the given
    /// report variant.
    #[must_use]
    pub fn required_fields(&self, kind: ReportKind) -> Vec<FieldSpec> {
        match self {
            Self::Global => report_keys(kind)
                .iter()
                .map(|key| FieldSpec::new(key, FieldKind::Any))
                .collect(),
            Self::Monthly(_) => {
                let mut fields = vec![
                    FieldSpec::new("monthly_trends", FieldKind::Array),
                    FieldSpec::new("global_insight", FieldKind::String),
                ];
                fields.extend(monthly_item_keys(kind).iter().map(|key| {
                    FieldSpec::new(&format!("monthly_trends[].{key}"), FieldKind::Any)
                }));
                fields
            }
            Self::Project(name) => {
                let mut fields: Vec<FieldSpec> = report_keys(kind)
                    .iter()
                    .map(|key| FieldSpec::new(key, FieldKind::Any))
                    .collect();
                fields.push(FieldSpec::equals("general_summary.project_name", name));
                fields
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_requires_all_report_keys() {
        let fields = InsightScope::Global.required_fields(ReportKind::Standard);
        assert_eq!(fields.len(), REPORT_KEYS.len());
        assert!(fields.iter().all(|f| f.kind == FieldKind::Any));
    }

    #[test]
    fn recommender_global_uses_its_own_key_set() {
        let fields = InsightScope::Global.required_fields(ReportKind::Recommender);
        assert!(fields.iter().any(|f| f.path == "location_preferences"));
        assert!(fields.iter().any(|f| f.path == "common_objections"));
        assert!(fields.iter().all(|f| f.path != "quick_wins"));
    }

    #[test]
    fn monthly_requires_trend_array_and_item_keys() {
        let fields =
            InsightScope::Monthly("2025-03".into()).required_fields(ReportKind::Standard);
        assert!(
            fields
                .iter()
                .any(|f| f.path == "monthly_trends" && f.kind == FieldKind::Array)
        );
        assert!(fields.iter().any(|f| f.path == "monthly_trends[].month"));
    }

    #[test]
    fn recommender_monthly_items_differ() {
        let fields =
            InsightScope::Monthly("2025-03".into()).required_fields(ReportKind::Recommender);
        assert!(
            fields
                .iter()
                .any(|f| f.path == "monthly_trends[].top_mentioned_locations")
        );
        assert!(
            fields
                .iter()
                .all(|f| f.path != "monthly_trends[].recurring_themes")
        );
    }

    #[test]
    fn project_requires_the_exact_name_echo() {
        let fields =
            InsightScope::Project("alto mirador".into()).required_fields(ReportKind::Standard);
        let name_spec = fields
            .iter()
            .find(|f| f.path == "general_summary.project_name")
            .unwrap();
        assert_eq!(name_spec.kind, FieldKind::String);
        assert_eq!(name_spec.expected.as_deref(), Some("alto mirador"));
    }

    #[test]
    fn report_kind_follows_the_source_label() {
        assert_eq!(ReportKind::for_source("recomendador"), ReportKind::Recommender);
        assert_eq!(ReportKind::for_source("subsidio"), ReportKind::Standard);
        assert_eq!(ReportKind::for_source("no_subsidio"), ReportKind::Standard);
    }

    #[test]
    fn stage_labels_identify_the_instance() {
        assert_eq!(InsightScope::Global.stage_label(), "global");
        assert_eq!(
            InsightScope::Monthly("2025-03".into()).stage_label(),
            "monthly:2025-03"
        );
        assert_eq!(
            InsightScope::Project("p1".into()).stage_label(),
            "project:p1"
        );
    }
}
