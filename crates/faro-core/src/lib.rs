//! # faro-core
//!
//! Core types shared across the faro workspace:
//! - Raw interaction records and merged conversations
//! - Compressed per-conversation summaries with their field schema
//! - Insight document scopes and required-field declarations
//! - Fatal error records persisted on terminal failure
//! - Cross-cutting pipeline error types

pub mod errors;
pub mod fatal;
pub mod insight;
pub mod record;
pub mod summary;

pub use errors::PipelineError;
pub use fatal::FatalErrorRecord;
pub use insight::{FieldKind, FieldSpec, InsightScope, ReportKind};
pub use record::{Conversation, Record, month_key};
pub use summary::{Summary, SummaryFields, UNKNOWN};
