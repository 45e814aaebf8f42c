//! Windowed aggregate metrics over summary sets.
//!
//! Determinism contract: the input set is treated as unordered. Summaries
//! are sorted by `client_id` before counting, so percentages and top-k
//! rankings are identical for any permutation of the same set. Top-k ties
//! break by first-seen order in the sorted sequence.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use faro_core::{Summary, UNKNOWN, month_key};

use crate::terms::TermScore;

/// Predicate selecting the summaries a metrics computation covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Window {
    /// The whole data source.
    All,
    /// One calendar month (`YYYY-MM`), matched on the conversation start.
    Month(String),
    /// One project.
    Project(String),
}

impl Window {
    #[must_use]
    pub fn matches(&self, summary: &Summary) -> bool {
        match self {
            Self::All => true,
            Self::Month(month) => &month_key(summary.started_at) == month,
            Self::Project(project) => summary.project.as_deref() == Some(project.as_str()),
        }
    }
}

/// One ranked categorical value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
    /// Share of the windowed total, rounded to 3 decimals.
    pub pct: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SentimentShares {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FunnelMetrics {
    /// Share of conversations marked as dropped out.
    pub early_dropout_pct: f64,
    /// Share of conversations that reached the closing stage.
    pub closure_pct: f64,
    pub funnel_stages: Vec<CategoryCount>,
    pub purchase_intent: Vec<CategoryCount>,
}

/// Derived statistics over a windowed summary set. A value object,
/// recomputed per call and never mutated in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AggregateMetrics {
    pub total_conversations: usize,
    /// Set when the windowed set is empty; callers decide whether to skip
    /// generation instead of this crate failing.
    pub insufficient_data: bool,
    pub sentiment: SentimentShares,
    pub funnel: FunnelMetrics,
    pub pain_points: Vec<CategoryCount>,
    pub dropout_reasons: Vec<CategoryCount>,
    pub client_segments: Vec<CategoryCount>,
    pub employment: Vec<CategoryCount>,
    pub income: Vec<CategoryCount>,
    pub info_capacity: Vec<CategoryCount>,
    pub inquiry_topics: Vec<CategoryCount>,
    pub inquiry_types: Vec<CategoryCount>,
    pub valued_attributes: Vec<CategoryCount>,
    pub valued_topics: Vec<CategoryCount>,
    pub bot_solutions: Vec<CategoryCount>,
    pub bot_frictions: Vec<CategoryCount>,
    /// Dominant client language for the same window, attached by the caller
    /// (term extraction needs the conversation texts, not the summaries).
    pub dominant_terms: Vec<TermScore>,
}

/// Compute aggregate metrics over the summaries selected by `window`.
///
/// An empty filtered set yields all-zero metrics with `insufficient_data`
/// set rather than an error.
#[must_use]
pub fn compute_metrics(summaries: &[Summary], window: &Window) -> AggregateMetrics {
    let mut selected: Vec<&Summary> = summaries.iter().filter(|s| window.matches(s)).collect();
    selected.sort_by(|a, b| a.client_id.cmp(&b.client_id));

    let total = selected.len();
    if total == 0 {
        return AggregateMetrics {
            insufficient_data: true,
            ..AggregateMetrics::default()
        };
    }

    let field = |name: &str| -> Vec<&str> { selected.iter().map(|s| s.fields.get(name)).collect() };

    let sentiments = field("sentiment");
    let funnel_stages = field("funnel_stage");
    let dropout_reasons: Vec<&str> = selected
        .iter()
        .filter(|s| s.fields.dropped_out == "yes")
        .map(|s| s.fields.dropout_reason.as_str())
        .collect();

    AggregateMetrics {
        total_conversations: total,
        insufficient_data: false,
        sentiment: SentimentShares {
            positive: pct(&sentiments, "positive"),
            neutral: pct(&sentiments, "neutral"),
            negative: pct(&sentiments, "negative"),
        },
        funnel: FunnelMetrics {
            early_dropout_pct: pct(&field("dropped_out"), "yes"),
            closure_pct: pct(&funnel_stages, "closing"),
            funnel_stages: top_k(&funnel_stages, 5, total),
            purchase_intent: top_k(&field("purchase_intent"), 5, total),
        },
        pain_points: top_k(&field("pain_point"), 7, total),
        dropout_reasons: top_k(&dropout_reasons, 5, total),
        client_segments: top_k(&field("client_profile"), 5, total),
        employment: top_k(&field("employment"), 5, total),
        income: top_k(&field("income"), 5, total),
        info_capacity: top_k(&field("info_capacity"), 3, total),
        inquiry_topics: top_k(&field("topics"), 7, total),
        inquiry_types: top_k(&field("inquiry_type"), 5, total),
        valued_attributes: top_k(&field("valued_attribute"), 7, total),
        valued_topics: top_k(&field("valued_topic"), 7, total),
        bot_solutions: top_k(&field("bot_solution"), 5, total),
        bot_frictions: top_k(&field("bot_friction"), 5, total),
        dominant_terms: Vec::new(),
    }
}

/// Share of `values` equal to `target`, rounded to 3 decimals.
#[allow(clippy::cast_precision_loss)]
fn pct(values: &[&str], target: &str) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let matching = values.iter().filter(|v| **v == target).count();
    round3(matching as f64 / values.len() as f64)
}

/// Frequency ranking of the `k` most common values. Unknowns are excluded;
/// ties break by first-seen position in `values`.
#[allow(clippy::cast_precision_loss)]
fn top_k(values: &[&str], k: usize, total: usize) -> Vec<CategoryCount> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, value) in values.iter().enumerate() {
        if *value == UNKNOWN {
            continue;
        }
        let entry = counts.entry(value).or_insert((0, position));
        entry.0 += 1;
    }
    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(value, (count, first_seen))| (value, count, first_seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(&b.2)));
    ranked.truncate(k);
    ranked
        .into_iter()
        .map(|(value, count, _)| CategoryCount {
            value: value.to_string(),
            count,
            pct: round3(count as f64 / total as f64),
        })
        .collect()
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}
