//! Batch orchestration: scrape one profile, classify every post, aggregate.
//!
//! [`BatchOrchestrator::run_batch`] walks the phases
//! `SCRAPING → ANALYZING → AGGREGATING → DONE`, failing into `FAILED` from any
//! of them. Per-post classification problems never fail a batch; only input,
//! scrape, timeout and cancellation errors do.

pub mod error;
pub mod orchestrator;
pub mod phase;

pub use error::BatchError;
pub use orchestrator::{BatchOrchestrator, BatchResult, PipelineSettings};
pub use phase::BatchPhase;
