//! # faro-aggregate
//!
//! Pure aggregation over conversation summaries: windowed counts,
//! percentages, deterministic top-k categorical rankings, and TF-IDF
//! dominant-term extraction. No side effects; everything here is a function
//! of its inputs and is recomputed per call.

pub mod metrics;
pub mod stopwords;
pub mod terms;

pub use metrics::{AggregateMetrics, CategoryCount, FunnelMetrics, SentimentShares, Window, compute_metrics};
pub use stopwords::SPANISH_STOPWORDS;
pub use terms::{TermScore, dominant_terms};
