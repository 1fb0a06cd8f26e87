//! Full batch against mocked Apify and OpenAI servers.

use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use parsifly_analysis::{Classifier, OpenAiOracle};
use parsifly_core::Platform;
use parsifly_pipeline::{BatchError, BatchOrchestrator, PipelineSettings};
use parsifly_scraper::ApifyClient;

fn settings() -> PipelineSettings {
    PipelineSettings {
        scrape_timeout: Duration::from_secs(10),
        analyze_timeout_per_post: Duration::from_secs(10),
        max_concurrent: 2,
    }
}

async fn mount_apify(server: &MockServer, items: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/acts/clockworks~free-tiktok-scraper/runs"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {"id": "run-1", "status": "SUCCEEDED", "defaultDatasetId": "ds-1"}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/datasets/ds-1/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(items))
        .mount(server)
        .await;
}

fn orchestrator(
    apify: &MockServer,
    openai: &MockServer,
    openai_key: Option<&str>,
) -> BatchOrchestrator<ApifyClient, OpenAiOracle> {
    let source = ApifyClient::new(
        Some("apify-token".to_string()),
        &apify.uri(),
        5,
        "parsifly-test/0.1",
        0,
        0,
    )
    .expect("failed to build ApifyClient");
    let oracle = OpenAiOracle::new(
        openai_key.map(str::to_string),
        &openai.uri(),
        "gpt-3.5-turbo",
        5,
        "parsifly-test/0.1",
    )
    .expect("failed to build OpenAiOracle");
    BatchOrchestrator::new(
        source,
        Classifier::new(oracle, Duration::from_secs(5)),
        settings(),
    )
}

#[tokio::test]
async fn batch_scrapes_adapts_and_classifies() {
    let apify = MockServer::start().await;
    let openai = MockServer::start().await;

    mount_apify(
        &apify,
        json!([{
            "authorMeta": {"name": "x", "followerCount": 1000},
            "webVideoUrl": "u",
            "createTime": 1_700_000_000,
            "text": "Hello. World",
            "playCount": 100,
            "diggCount": 10,
            "commentCount": 5,
            "shareCount": 1,
            "video": {"duration": 15}
        }]),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content":
                "{\"category\":\"Lifestyle\",\"theme\":\"Greeting\",\"viralityScore\":0.3,\"erRating\":\"LOW\",\"reasoning\":\"Short.\"}"
            }}]
        })))
        .expect(1)
        .mount(&openai)
        .await;

    let result = orchestrator(&apify, &openai, Some("sk-test"))
        .run_batch(
            Platform::TikTok,
            "https://www.tiktok.com/@x",
            &CancellationToken::new(),
        )
        .await
        .expect("batch should succeed");

    assert_eq!(result.profile, "x");
    assert_eq!(result.posts.len(), 1);

    let value = serde_json::to_value(&result.posts[0]).unwrap();
    assert_eq!(value["accountUrl"], "https://www.tiktok.com/@x");
    assert_eq!(value["timestamp"], "2023-11-14T22:13:20Z");
    assert_eq!(value["hook"], "Hello");
    assert_eq!(value["erFollowers"], 1.5);
    assert_eq!(value["erLikesComments"], 15.0);
    assert_eq!(value["category"], "Lifestyle");
    assert_eq!(value["viralityScore"], 0.3);
    assert_eq!(value["analysisReasoning"], "Short.");
}

#[tokio::test]
async fn batch_without_openai_key_completes_with_sentinels() {
    let apify = MockServer::start().await;
    let openai = MockServer::start().await;

    mount_apify(&apify, json!([{"text": "a"}, {"text": "b"}])).await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&openai)
        .await;

    let result = orchestrator(&apify, &openai, None)
        .run_batch(Platform::TikTok, "x", &CancellationToken::new())
        .await
        .expect("batch should succeed");

    assert_eq!(result.posts.len(), 2);
    for post in result.posts {
        let analysis = post.analysis.expect("analysis attached");
        assert_eq!(analysis.category, "N/A");
        assert_eq!(analysis.analysis_reasoning, "OpenAI API key not configured");
    }
}

#[tokio::test]
async fn empty_dataset_fails_with_no_posts_found() {
    let apify = MockServer::start().await;
    let openai = MockServer::start().await;

    mount_apify(&apify, json!([])).await;

    let err = orchestrator(&apify, &openai, Some("sk-test"))
        .run_batch(Platform::TikTok, "x", &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, BatchError::NoPostsFound), "got: {err:?}");
}
