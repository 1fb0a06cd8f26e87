use parsifly_core::PostAnalysis;

/// A parsed oracle answer for one post.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub category: String,
    pub theme: String,
    /// In `[0.0, 1.0]`.
    pub virality_score: f64,
    pub er_rating: String,
    pub reasoning: String,
}

/// Outcome of classifying one post. Never a partial mix: either every
/// assessment field came from the oracle, or none did.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResult {
    Success(Assessment),
    Failure(String),
}

impl AnalysisResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisResult::Success(_))
    }

    /// Converts to the fields stored on a post. Failures become `"N/A"`
    /// sentinels with the reason as the reasoning text.
    #[must_use]
    pub fn into_post_analysis(self) -> PostAnalysis {
        match self {
            AnalysisResult::Success(a) => PostAnalysis::new(
                a.category,
                a.theme,
                a.virality_score,
                a.er_rating,
                a.reasoning,
            ),
            AnalysisResult::Failure(reason) => PostAnalysis::not_available(reason),
        }
    }
}

/// Prompt pair sent to a [`crate::ClassificationOracle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
}
