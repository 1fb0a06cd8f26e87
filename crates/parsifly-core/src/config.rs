use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a plain
/// `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank credentials are treated the same as unset ones.
    let secret = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("PARSIFLY_ENV", "development"))?;
    let log_level = or_default("PARSIFLY_LOG_LEVEL", "info");

    let apify_api_token = secret("APIFY_API_KEY");
    let apify_base_url = or_default("PARSIFLY_APIFY_BASE_URL", "https://api.apify.com/v2");

    let openai_api_key = secret("OPENAI_API_KEY");
    let openai_base_url = or_default("PARSIFLY_OPENAI_BASE_URL", "https://api.openai.com/v1");
    let openai_model = or_default("PARSIFLY_OPENAI_MODEL", "gpt-3.5-turbo");

    let scrape_max_posts = parse_u32("PARSIFLY_SCRAPE_MAX_POSTS", "20")?;
    let scrape_timeout_secs = parse_u64("PARSIFLY_SCRAPE_TIMEOUT_SECS", "600")?;
    let analyze_timeout_per_post_secs = parse_u64("PARSIFLY_ANALYZE_TIMEOUT_PER_POST_SECS", "30")?;
    let classify_max_concurrent = parse_usize("PARSIFLY_CLASSIFY_MAX_CONCURRENT", "4")?;

    let http_request_timeout_secs = parse_u64("PARSIFLY_HTTP_REQUEST_TIMEOUT_SECS", "60")?;
    let http_user_agent = or_default("PARSIFLY_HTTP_USER_AGENT", "parsifly/0.1 (post-analytics)");
    let http_max_retries = parse_u32("PARSIFLY_HTTP_MAX_RETRIES", "3")?;
    let http_retry_backoff_base_ms = parse_u64("PARSIFLY_HTTP_RETRY_BACKOFF_BASE_MS", "1000")?;

    Ok(AppConfig {
        env,
        log_level,
        apify_api_token,
        apify_base_url,
        openai_api_key,
        openai_base_url,
        openai_model,
        scrape_max_posts,
        scrape_timeout_secs,
        analyze_timeout_per_post_secs,
        classify_max_concurrent,
        http_request_timeout_secs,
        http_user_agent,
        http_max_retries,
        http_retry_backoff_base_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PARSIFLY_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
