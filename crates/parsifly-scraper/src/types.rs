//! Apify REST API shapes used by [`crate::ApifyClient`].
//!
//! Dataset items are deliberately NOT modelled here: their schema differs per
//! actor and drifts over time, so they stay as `serde_json::Value` and the
//! platform adapters in [`crate::normalize`] read them defensively.

use serde::{Deserialize, Serialize};

/// Input posted to every profile-scraper actor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorInput {
    pub handle: String,
    /// Always `"posts"`.
    pub results_type: String,
    pub max_posts: u32,
}

impl ActorInput {
    #[must_use]
    pub fn posts(handle: &str, max_posts: u32) -> Self {
        Self {
            handle: handle.to_string(),
            results_type: "posts".to_string(),
            max_posts,
        }
    }
}

/// Envelope around Apify object responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Metadata for one actor run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunData {
    pub id: String,
    /// `READY`, `RUNNING`, `SUCCEEDED`, `FAILED`, `ABORTED`, `TIMED-OUT`, ...
    pub status: String,
    pub default_dataset_id: String,
}

impl RunData {
    #[must_use]
    pub fn is_succeeded(&self) -> bool {
        self.status == "SUCCEEDED"
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(
            self.status.as_str(),
            "FAILED" | "ABORTED" | "TIMED-OUT" | "ABORTING" | "TIMING-OUT"
        )
    }
}
