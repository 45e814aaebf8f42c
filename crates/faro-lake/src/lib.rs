//! # faro-lake
//!
//! Object-storage collaborators for the insight pipeline:
//! - [`source`]: NDJSON record loading from a per-source prefix
//! - [`sink`]: full-overwrite persistence of generated documents
//! - [`keys`]: deterministic output-key derivation
//!
//! Both collaborators are traits so the pipeline can run against in-memory
//! fakes in tests; the provided implementations target any S3-compatible
//! store.

pub mod error;
pub mod keys;
pub mod sink;
pub mod source;
mod store;

pub use error::LakeError;
pub use keys::{fatal_key, insights_key, project_insights_key, sanitize_segment, trends_key};
pub use sink::{InsightSink, S3InsightSink};
pub use source::{RecordSource, S3RecordSource};
