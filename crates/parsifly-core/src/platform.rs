use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A short-video platform supported by the scrape and normalization stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "TikTok")]
    TikTok,
    #[serde(rename = "Instagram")]
    Instagram,
    #[serde(rename = "YouTube")]
    YouTube,
}

/// Divisor used for the `erLikesComments` ratio.
///
/// Instagram datasets carry no view count, so its likes+comments rate is taken
/// against followers instead. The field name stays the same across platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngagementBasis {
    Views,
    Followers,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::TikTok, Platform::Instagram, Platform::YouTube];

    /// Display name, matching the values accepted by [`FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::TikTok => "TikTok",
            Platform::Instagram => "Instagram",
            Platform::YouTube => "YouTube",
        }
    }

    #[must_use]
    pub fn engagement_basis(self) -> EngagementBasis {
        match self {
            Platform::TikTok | Platform::YouTube => EngagementBasis::Views,
            Platform::Instagram => EngagementBasis::Followers,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tiktok" => Ok(Platform::TikTok),
            "instagram" => Ok(Platform::Instagram),
            "youtube" => Ok(Platform::YouTube),
            _ => Err(CoreError::UnsupportedPlatform(s.to_string())),
        }
    }
}

/// Reduces user input to a bare profile handle.
///
/// Accepts `"name"`, `"@name"`, or a profile URL such as
/// `"https://www.tiktok.com/@name/"` and returns `"name"`. Query strings and
/// fragments are dropped. Returns an empty string for blank input.
#[must_use]
pub fn normalize_profile_handle(input: &str) -> String {
    let trimmed = input.trim();
    let without_query = trimmed
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');

    let segment = if without_query.contains("://") || without_query.contains(".com/") {
        without_query.rsplit('/').next().unwrap_or_default()
    } else {
        without_query
    };

    segment.trim_start_matches('@').to_string()
}
