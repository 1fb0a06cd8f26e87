//! The resilient per-post classifier.

use std::time::Duration;

use async_trait::async_trait;
use parsifly_core::{Post, NOT_AVAILABLE};
use serde_json::{Map, Value};

use crate::error::OracleError;
use crate::prompt::build_request;
use crate::types::{AnalysisResult, Assessment, ClassificationRequest};

pub const PARSE_FAILURE: &str = "Failed to parse OpenAI response";

/// A text-completion service that answers a classification prompt with a
/// JSON object (as a string).
#[async_trait]
pub trait ClassificationOracle: Send + Sync {
    async fn complete(&self, request: &ClassificationRequest) -> Result<String, OracleError>;
}

/// Wraps one oracle call per post with timeout, parsing and fallback handling.
pub struct Classifier<O> {
    oracle: O,
    call_timeout: Duration,
}

impl<O: ClassificationOracle> Classifier<O> {
    #[must_use]
    pub fn new(oracle: O, call_timeout: Duration) -> Self {
        Self {
            oracle,
            call_timeout,
        }
    }

    /// Lowers the per-call timeout to `limit` if it is currently longer.
    #[must_use]
    pub fn with_call_timeout_at_most(mut self, limit: Duration) -> Self {
        self.call_timeout = self.call_timeout.min(limit);
        self
    }

    #[must_use]
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    #[must_use]
    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Classifies one post. Never fails; every problem is reported as
    /// [`AnalysisResult::Failure`].
    pub async fn classify(&self, post: &Post) -> AnalysisResult {
        let request = build_request(post);
        let outcome = tokio::time::timeout(self.call_timeout, self.oracle.complete(&request)).await;

        let content = match outcome {
            Ok(Ok(content)) => content,
            Ok(Err(err)) => return AnalysisResult::Failure(failure_reason(&err)),
            Err(_) => {
                let err = OracleError::Timeout {
                    after: self.call_timeout,
                };
                return AnalysisResult::Failure(failure_reason(&err));
            }
        };

        match parse_assessment(&content) {
            Some(assessment) => AnalysisResult::Success(assessment),
            None => {
                tracing::debug!(content = %content, "oracle returned unparseable content");
                AnalysisResult::Failure(PARSE_FAILURE.to_string())
            }
        }
    }

    /// Classifies `post` and attaches the outcome as its analysis fields.
    pub async fn analyze(&self, post: Post) -> Post {
        let result = self.classify(&post).await;
        if let AnalysisResult::Failure(reason) = &result {
            tracing::warn!(post_url = %post.post_url, reason = %reason, "post classification failed");
        }
        post.with_analysis(result.into_post_analysis())
    }
}

fn failure_reason(err: &OracleError) -> String {
    match err {
        OracleError::NotConfigured => err.to_string(),
        OracleError::EmptyResponse => PARSE_FAILURE.to_string(),
        _ => format!("OpenAI API error: {err}"),
    }
}

/// Parses the oracle's JSON answer. Returns `None` unless `content` is a JSON
/// object; missing fields inside the object get defaults.
pub(crate) fn parse_assessment(content: &str) -> Option<Assessment> {
    let value: Value = serde_json::from_str(content.trim()).ok()?;
    let object = value.as_object()?;

    Some(Assessment {
        category: text_field(object, "category", NOT_AVAILABLE),
        theme: text_field(object, "theme", NOT_AVAILABLE),
        virality_score: virality_field(object.get("viralityScore")),
        er_rating: text_field(object, "erRating", NOT_AVAILABLE),
        reasoning: text_field(object, "reasoning", ""),
    })
}

fn text_field(object: &Map<String, Value>, key: &str, default: &str) -> String {
    match object.get(key) {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Numbers and numeric strings coerce to `f64` clamped to `[0, 1]`; anything
/// else is `0.0`.
fn virality_field(value: Option<&Value>) -> f64 {
    let score = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    score.filter(|s| s.is_finite()).unwrap_or(0.0).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "classifier_test.rs"]
mod tests;
