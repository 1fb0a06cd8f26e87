use std::time::Duration;

use parsifly_core::{AppConfig, Platform};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;
use crate::types::{ActorInput, ApiResponse, RunData};

/// Seconds Apify holds a run-status request open before answering.
const WAIT_FOR_FINISH_SECS: u32 = 60;

/// Default number of posts requested per profile.
const DEFAULT_MAX_POSTS: u32 = 20;

/// Apify actor that scrapes profiles on `platform`.
#[must_use]
pub fn actor_id(platform: Platform) -> &'static str {
    match platform {
        Platform::TikTok => "clockworks~free-tiktok-scraper",
        Platform::Instagram => "apify~instagram-reel-scraper",
        Platform::YouTube => "streamers~youtube-shorts-scraper",
    }
}

/// HTTP client for the Apify actor-run API.
///
/// A scrape starts one actor run, long-polls it until it reaches a terminal
/// status, then downloads the run's default dataset as raw JSON items.
///
/// Transient errors (429, 5xx, network failures) are retried per request with
/// exponential backoff up to `max_retries` additional attempts.
pub struct ApifyClient {
    client: Client,
    token: Option<String>,
    base_url: String,
    max_posts: u32,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl ApifyClient {
    /// Creates an `ApifyClient` with configured timeout, `User-Agent`, and retry policy.
    ///
    /// The request timeout must exceed the 60 s long-poll window or every
    /// status poll will time out; values below 90 s are raised to 90 s.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        token: Option<String>,
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(
                timeout_secs.max(u64::from(WAIT_FOR_FINISH_SECS) + 30),
            ))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_posts: DEFAULT_MAX_POSTS,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Builds a client from the Apify and HTTP settings in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Ok(Self::new(
            config.apify_api_token.clone(),
            &config.apify_base_url,
            config.http_request_timeout_secs,
            &config.http_user_agent,
            config.http_max_retries,
            config.http_retry_backoff_base_ms,
        )?
        .with_max_posts(config.scrape_max_posts))
    }

    #[must_use]
    pub fn with_max_posts(mut self, max_posts: u32) -> Self {
        self.max_posts = max_posts;
        self
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    /// Runs the platform's actor for `handle` and returns the raw dataset items.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::MissingToken`]: no Apify token configured.
    /// - [`ScraperError::RunFailed`]: the run ended `FAILED`, `ABORTED` or `TIMED-OUT`.
    /// - Any request error from [`Self::start_run`], [`Self::wait_for_run`] or
    ///   [`Self::dataset_items`].
    pub async fn scrape_profile(
        &self,
        platform: Platform,
        handle: &str,
    ) -> Result<Vec<Value>, ScraperError> {
        tracing::info!(%platform, handle, max_posts = self.max_posts, "starting Apify profile scrape");

        let run = self.start_run(actor_id(platform), handle).await?;
        tracing::info!(run_id = %run.id, "Apify run started, polling for completion");

        let completed = self.wait_for_run(run).await?;
        tracing::info!(
            run_id = %completed.id,
            dataset_id = %completed.default_dataset_id,
            "run completed, fetching dataset"
        );

        let items = self.dataset_items(&completed.default_dataset_id).await?;
        tracing::info!(%platform, handle, count = items.len(), "fetched raw posts");
        Ok(items)
    }

    /// Starts an actor run. Returns as soon as Apify has accepted it.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::MissingToken`] without a token, otherwise any
    /// request error.
    pub async fn start_run(&self, actor: &str, handle: &str) -> Result<RunData, ScraperError> {
        let url = format!("{}/acts/{actor}/runs", self.base_url);
        let input = ActorInput::posts(handle, self.max_posts);
        let response: ApiResponse<RunData> = self
            .request_json(Method::POST, &url, Some(&input), "actor run start")
            .await?;
        Ok(response.data)
    }

    /// Polls `run` until it reaches a terminal status.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::RunFailed`] when the run ends unsuccessfully.
    pub async fn wait_for_run(&self, run: RunData) -> Result<RunData, ScraperError> {
        let mut current = run;
        loop {
            if current.is_succeeded() {
                return Ok(current);
            }
            if current.is_failed() {
                return Err(ScraperError::RunFailed {
                    run_id: current.id,
                    status: current.status,
                });
            }
            tracing::debug!(run_id = %current.id, status = %current.status, "run still in progress");

            let url = format!(
                "{}/actor-runs/{}?waitForFinish={WAIT_FOR_FINISH_SECS}",
                self.base_url, current.id
            );
            let response: ApiResponse<RunData> = self
                .request_json(Method::GET, &url, None, "actor run status")
                .await?;
            current = response.data;
        }
    }

    /// Downloads every item of a dataset as raw JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Deserialize`] if the body is not a JSON array,
    /// otherwise any request error.
    pub async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<Value>, ScraperError> {
        let url = format!(
            "{}/datasets/{dataset_id}/items?format=json&clean=true",
            self.base_url
        );
        self.request_json(Method::GET, &url, None, "dataset items")
            .await
    }

    /// Sends one authenticated request with retry and decodes the JSON body.
    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<&ActorInput>,
        context: &str,
    ) -> Result<T, ScraperError> {
        let token = self.token.as_deref().ok_or(ScraperError::MissingToken)?;

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let method = method.clone();
            async move {
                tracing::debug!(%method, url, "Apify request");
                let mut request = self.client.request(method, url).bearer_auth(token);
                if let Some(body) = body {
                    request = request.json(body);
                }
                let response = request.send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(10);
                    return Err(ScraperError::RateLimited { retry_after_secs });
                }

                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: redact_query(url),
                        body,
                    });
                }

                let text = response.text().await?;
                serde_json::from_str::<T>(&text).map_err(|e| ScraperError::Deserialize {
                    context: context.to_string(),
                    source: e,
                })
            }
        })
        .await
    }
}

/// Drops the query string so error messages never echo request parameters.
fn redact_query(url: &str) -> String {
    url.split('?').next().unwrap_or(url).to_string()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
