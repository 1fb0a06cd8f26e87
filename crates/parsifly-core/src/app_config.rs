#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Apify token for the scrape source. `None` when unset or blank.
    pub apify_api_token: Option<String>,
    pub apify_base_url: String,
    /// Classification oracle credential. `None` means every post is analysed
    /// with `"N/A"` sentinels.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub scrape_max_posts: u32,
    pub scrape_timeout_secs: u64,
    pub analyze_timeout_per_post_secs: u64,
    pub classify_max_concurrent: usize,
    pub http_request_timeout_secs: u64,
    pub http_user_agent: String,
    pub http_max_retries: u32,
    pub http_retry_backoff_base_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field(
                "apify_api_token",
                &self.apify_api_token.as_ref().map(|_| "[redacted]"),
            )
            .field("apify_base_url", &self.apify_base_url)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("scrape_max_posts", &self.scrape_max_posts)
            .field("scrape_timeout_secs", &self.scrape_timeout_secs)
            .field(
                "analyze_timeout_per_post_secs",
                &self.analyze_timeout_per_post_secs,
            )
            .field("classify_max_concurrent", &self.classify_max_concurrent)
            .field("http_request_timeout_secs", &self.http_request_timeout_secs)
            .field("http_user_agent", &self.http_user_agent)
            .field("http_max_retries", &self.http_max_retries)
            .field(
                "http_retry_backoff_base_ms",
                &self.http_retry_backoff_base_ms,
            )
            .finish()
    }
}
