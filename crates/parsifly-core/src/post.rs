//! The canonical post record and its analysis fields.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sentinel written to categorical analysis fields when classification failed.
pub const NOT_AVAILABLE: &str = "N/A";

/// Sentinel written when processing a post failed unexpectedly.
pub const ERROR_SENTINEL: &str = "Error";

/// A post normalized from any supported platform.
///
/// Base fields are populated by the platform adapters and never change
/// afterwards. The analysis fields are absent until the classifier attaches a
/// [`PostAnalysis`], and serialize flat next to the base fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub account_url: String,
    pub post_url: String,
    pub timestamp: PostTimestamp,
    pub hook: String,
    pub caption: String,
    /// Number of whitespace-delimited tokens in `caption`.
    pub caption_length: usize,
    pub followers: u64,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    /// Video length in seconds.
    pub duration: f64,
    pub er_followers: f64,
    pub er_likes_comments: f64,
    pub er_shares: f64,
    #[serde(flatten)]
    pub analysis: Option<PostAnalysis>,
}

impl Post {
    /// Returns the post with `analysis` attached, replacing any previous one.
    #[must_use]
    pub fn with_analysis(mut self, analysis: PostAnalysis) -> Self {
        self.analysis = Some(analysis);
        self
    }

    #[must_use]
    pub fn is_analyzed(&self) -> bool {
        self.analysis.is_some()
    }
}

/// Classifier output as stored on a [`Post`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAnalysis {
    pub category: String,
    pub theme: String,
    /// Estimated virality in `[0.0, 1.0]`.
    pub virality_score: f64,
    /// Qualitative rating such as `LOW`, `AVERAGE`, `GOOD`, `BEST`.
    pub er_rating: String,
    pub analysis_reasoning: String,
}

impl PostAnalysis {
    /// Builds an analysis from oracle output. `virality_score` is clamped to
    /// `[0.0, 1.0]`; non-finite values become `0.0`.
    #[must_use]
    pub fn new(
        category: String,
        theme: String,
        virality_score: f64,
        er_rating: String,
        analysis_reasoning: String,
    ) -> Self {
        let virality_score = if virality_score.is_finite() {
            virality_score.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            category,
            theme,
            virality_score,
            er_rating,
            analysis_reasoning,
        }
    }

    /// `"N/A"` sentinels for a classification that failed; `reason` is kept as
    /// the reasoning text.
    #[must_use]
    pub fn not_available(reason: impl Into<String>) -> Self {
        Self {
            category: NOT_AVAILABLE.to_string(),
            theme: NOT_AVAILABLE.to_string(),
            virality_score: 0.0,
            er_rating: NOT_AVAILABLE.to_string(),
            analysis_reasoning: reason.into(),
        }
    }

    /// `"Error"` sentinels for a post whose processing failed unexpectedly.
    #[must_use]
    pub fn processing_error(detail: impl fmt::Display) -> Self {
        Self {
            category: ERROR_SENTINEL.to_string(),
            theme: ERROR_SENTINEL.to_string(),
            virality_score: 0.0,
            er_rating: ERROR_SENTINEL.to_string(),
            analysis_reasoning: format!("Processing error: {detail}"),
        }
    }
}

/// Publication time of a post.
///
/// Always serialized as a string: canonical instants as ISO-8601 with a `Z`
/// suffix, unparseable source values verbatim, and missing values as `""`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PostTimestamp {
    Canonical(DateTime<Utc>),
    /// Source value that could not be interpreted as an instant.
    Unparsed(String),
    #[default]
    Missing,
}

impl PostTimestamp {
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        matches!(self, PostTimestamp::Canonical(_))
    }

    #[must_use]
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            PostTimestamp::Canonical(dt) => Some(*dt),
            PostTimestamp::Unparsed(_) | PostTimestamp::Missing => None,
        }
    }
}

impl fmt::Display for PostTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostTimestamp::Canonical(dt) => {
                f.write_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            PostTimestamp::Unparsed(raw) => f.write_str(raw),
            PostTimestamp::Missing => Ok(()),
        }
    }
}

impl Serialize for PostTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PostTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw {
            None => PostTimestamp::Missing,
            Some(s) if s.is_empty() => PostTimestamp::Missing,
            Some(s) => match DateTime::parse_from_rfc3339(&s) {
                Ok(dt) => PostTimestamp::Canonical(dt.with_timezone(&Utc)),
                Err(_) => PostTimestamp::Unparsed(s),
            },
        })
    }
}
