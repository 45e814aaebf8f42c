//! # faro-pipeline
//!
//! The orchestration engine. One run per data source walks
//! load → preprocess → summarize → aggregate+generate → validate → persist,
//! then derives independent monthly and per-project instances, each with its
//! own retry budget.
//!
//! - [`stage`]: the stage set and routing table
//! - [`preprocess`]: turn merging and conversation assembly
//! - [`summarize`]: bounded concurrent compression fan-out
//! - [`generate`]: the validated generation sub-cycle
//! - [`runner`]: per-source workflow and fatal-record persistence

pub mod generate;
pub mod preprocess;
pub mod runner;
pub mod stage;
pub mod summarize;

pub use generate::{GenerationReport, run_generation};
pub use preprocess::{filter_recent_months, merge_conversations};
pub use runner::{RunReport, Runner};
pub use stage::{AttemptDisposition, Stage, route_after_validation};
pub use summarize::{SummarizeOutcome, summarize_conversations};
