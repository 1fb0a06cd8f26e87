use std::time::Duration;

use parsifly_scraper::ScraperError;
use thiserror::Error;

use crate::phase::BatchPhase;

/// Terminal batch failure. The `Display` text is the reason reported to callers.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("No posts found")]
    NoPostsFound,

    #[error("scrape failed: {0}")]
    Scrape(#[from] ScraperError),

    #[error("scrape timed out after {after:?}")]
    ScrapeTimeout { after: Duration },

    #[error("analysis timed out after {after:?}")]
    AnalysisTimeout { after: Duration },

    #[error("No posts analyzed")]
    NoPostsAnalyzed,

    #[error("batch cancelled during {phase}")]
    Cancelled { phase: BatchPhase },
}

impl BatchError {
    /// Phase the batch was in when it failed. Input errors are reported
    /// against `SCRAPING`, the first phase.
    #[must_use]
    pub fn failed_in(&self) -> BatchPhase {
        match self {
            BatchError::InvalidInput(_)
            | BatchError::NoPostsFound
            | BatchError::Scrape(_)
            | BatchError::ScrapeTimeout { .. } => BatchPhase::Scraping,
            BatchError::AnalysisTimeout { .. } => BatchPhase::Analyzing,
            BatchError::NoPostsAnalyzed => BatchPhase::Aggregating,
            BatchError::Cancelled { phase } => *phase,
        }
    }
}
