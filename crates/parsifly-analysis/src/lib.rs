//! Per-post classification for Parsifly.
//!
//! Builds an analyst prompt from a [`parsifly_core::Post`], sends it to a
//! [`ClassificationOracle`] (OpenAI chat completions in production), and turns
//! whatever comes back into an [`AnalysisResult`]. The [`Classifier`] is total:
//! every failure becomes a [`AnalysisResult::Failure`] with a reason string.

pub mod classifier;
pub mod error;
pub mod openai;
pub mod prompt;
pub mod types;

pub use classifier::{ClassificationOracle, Classifier};
pub use error::OracleError;
pub use openai::OpenAiOracle;
pub use prompt::build_request;
pub use types::{AnalysisResult, Assessment, ClassificationRequest};
