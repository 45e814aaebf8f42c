//! # faro-model
//!
//! Everything between the pipeline and the generative model:
//! - [`gateway`]: the model endpoint client with transient/fatal failure
//!   classification
//! - [`parser`]: lenient extraction of a JSON document from raw model text
//! - [`validator`]: dot-path required-field validation of insight documents
//! - [`retry`]: deterministic strict retry prompts from deficiency reports
//! - [`compress`]: the per-conversation compression protocol
//! - [`prompts`]: prompt text and request assembly
//!
//! The model is treated as an unreliable text-completion service: it may
//! return malformed JSON, partial JSON, or nothing at all. Nothing in this
//! crate panics on model output.

pub mod compress;
pub mod error;
pub mod gateway;
pub mod parser;
pub mod prompts;
pub mod retry;
pub mod validator;

pub use error::GatewayError;
pub use gateway::{HttpModelGateway, ModelGateway, ModelRequest};
pub use parser::{ParseFailure, parse_document};
pub use retry::build_retry_prompt;
pub use validator::{ValidationResult, validate};
