use async_trait::async_trait;
use parsifly_core::Platform;
use serde_json::Value;

use crate::client::ApifyClient;
use crate::error::ScraperError;

/// Anything that can produce raw dataset items for one profile.
#[async_trait]
pub trait ScrapeSource: Send + Sync {
    /// Fetches the raw items for `profile` on `platform`. An empty vector is a
    /// valid answer; callers decide whether that is an error.
    async fn fetch(&self, platform: Platform, profile: &str) -> Result<Vec<Value>, ScraperError>;
}

#[async_trait]
impl ScrapeSource for ApifyClient {
    async fn fetch(&self, platform: Platform, profile: &str) -> Result<Vec<Value>, ScraperError> {
        self.scrape_profile(platform, profile).await
    }
}
