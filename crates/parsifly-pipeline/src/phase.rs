use std::fmt;

/// Lifecycle of one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchPhase {
    Scraping,
    Analyzing,
    Aggregating,
    Done,
    Failed,
}

impl BatchPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BatchPhase::Scraping => "SCRAPING",
            BatchPhase::Analyzing => "ANALYZING",
            BatchPhase::Aggregating => "AGGREGATING",
            BatchPhase::Done => "DONE",
            BatchPhase::Failed => "FAILED",
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, BatchPhase::Done | BatchPhase::Failed)
    }
}

impl fmt::Display for BatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
