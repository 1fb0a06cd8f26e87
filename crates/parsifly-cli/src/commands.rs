//! Subcommand handlers.
//!
//! Each handler prints exactly one JSON document to stdout. Logs go to stderr
//! so the output can be piped straight into another tool.

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use parsifly_analysis::{Classifier, OpenAiOracle};
use parsifly_core::{normalize_profile_handle, AppConfig, Platform, Post};
use parsifly_pipeline::orchestrator::MISSING_PROFILE;
use parsifly_pipeline::{BatchOrchestrator, PipelineSettings};
use parsifly_scraper::{adapt_all, ApifyClient};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

const MISSING_POSTS: &str = "Posts data is required";

type Orchestrator = BatchOrchestrator<ApifyClient, OpenAiOracle>;

fn build_orchestrator(config: &AppConfig) -> anyhow::Result<Orchestrator> {
    let source = ApifyClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build Apify client: {e}"))?;
    let oracle = OpenAiOracle::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build OpenAI client: {e}"))?;

    if !source.is_configured() {
        tracing::warn!("APIFY_API_KEY is not set; scraping will fail");
    }
    if !oracle.is_configured() {
        tracing::warn!("OPENAI_API_KEY is not set; posts will be marked N/A");
    }

    let classifier = Classifier::new(
        oracle,
        Duration::from_secs(config.http_request_timeout_secs),
    );
    Ok(BatchOrchestrator::new(
        source,
        classifier,
        PipelineSettings::from_config(config),
    ))
}

/// Returns a token that is cancelled on Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received; cancelling");
            trigger.cancel();
        }
    });
    token
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Run a full batch and print `{"performanceData": [...]}`.
///
/// Batch failures are reported as `{"error": reason}` on stdout with a
/// failing exit code rather than as an `Err`, so callers always get JSON.
pub(crate) async fn run_batch(
    config: &AppConfig,
    platform: Platform,
    profile: &str,
) -> anyhow::Result<ExitCode> {
    let orchestrator = build_orchestrator(config)?;
    let cancel = cancel_on_ctrl_c();

    match orchestrator.run_batch(platform, profile, &cancel).await {
        Ok(result) => {
            print_json(&json!({ "performanceData": result.posts }))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            print_json(&json!({ "error": e.to_string() }))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Scrape and normalize one profile and print `{"posts": [...]}`.
///
/// # Errors
///
/// Returns an error for a blank profile or when the scrape phase fails.
pub(crate) async fn scrape(
    config: &AppConfig,
    platform: Platform,
    profile: &str,
) -> anyhow::Result<()> {
    let handle = normalize_profile_handle(profile);
    if handle.is_empty() {
        anyhow::bail!(MISSING_PROFILE);
    }

    let orchestrator = build_orchestrator(config)?;
    let cancel = cancel_on_ctrl_c();
    let posts = orchestrator.scrape_posts(platform, &handle, &cancel).await?;

    tracing::info!(%platform, profile = %handle, posts = posts.len(), "scrape complete");
    print_json(&json!({ "posts": posts }))
}

/// Classify the posts in `input` and print `{"analyzedPosts": [...]}`.
///
/// # Errors
///
/// Returns an error if the file is unreadable, holds no posts, or the
/// analysis phase times out or is cancelled. Individual classification
/// failures are reported inside the posts, not as errors.
pub(crate) async fn analyze(config: &AppConfig, input: &Path) -> anyhow::Result<()> {
    let posts = posts_from_input(read_json(input)?)?;

    let orchestrator = build_orchestrator(config)?;
    let cancel = cancel_on_ctrl_c();
    let analyzed = orchestrator.analyze_posts(posts, &cancel).await?;

    print_json(&json!({ "analyzedPosts": analyzed }))
}

/// Normalize a saved raw dataset and print `{"posts": [...]}`.
///
/// # Errors
///
/// Returns an error if the file is unreadable or is not a JSON array.
pub(crate) fn adapt(platform: Platform, input: &Path) -> anyhow::Result<()> {
    let items = raw_items_from_input(read_json(input)?)?;
    let posts = adapt_all(platform, &items);
    tracing::info!(%platform, items = items.len(), posts = posts.len(), "adapted dataset");
    print_json(&json!({ "posts": posts }))
}

/// Accepts `{"posts": [...]}` or a bare array. An empty list is an error.
pub(crate) fn posts_from_input(value: Value) -> anyhow::Result<Vec<Post>> {
    let list = match value {
        Value::Object(mut map) => map.remove("posts").unwrap_or(Value::Null),
        other => other,
    };
    let posts: Vec<Post> = match list {
        Value::Null => Vec::new(),
        Value::Array(_) => serde_json::from_value(list).context("invalid post record")?,
        _ => anyhow::bail!("expected a list of posts"),
    };
    if posts.is_empty() {
        anyhow::bail!(MISSING_POSTS);
    }
    Ok(posts)
}

/// Accepts a bare array or the `{"items": [...]}` shape some exports use.
pub(crate) fn raw_items_from_input(value: Value) -> anyhow::Result<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => Ok(items),
            _ => anyhow::bail!("expected a JSON array of raw items"),
        },
        _ => anyhow::bail!("expected a JSON array of raw items"),
    }
}
