//! Integration tests for `OpenAiOracle` against a local `wiremock` server,
//! including the classifier's handling of each response shape.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use parsifly_analysis::{
    build_request, AnalysisResult, ClassificationOracle, Classifier, OpenAiOracle, OracleError,
};
use parsifly_core::{Post, PostTimestamp};

fn oracle(server: &MockServer, api_key: Option<&str>) -> OpenAiOracle {
    OpenAiOracle::new(
        api_key.map(str::to_string),
        &server.uri(),
        "gpt-3.5-turbo",
        5,
        "parsifly-test/0.1",
    )
    .expect("failed to build test OpenAiOracle")
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

fn sample_post() -> Post {
    Post {
        account_url: "https://www.youtube.com/channel/UC1".to_string(),
        post_url: "https://www.youtube.com/watch?v=abc".to_string(),
        timestamp: PostTimestamp::Missing,
        hook: "Leg day".to_string(),
        caption: "Leg day. No excuses".to_string(),
        caption_length: 4,
        followers: 500,
        views: 1000,
        likes: 40,
        comments: 10,
        shares: 0,
        duration: 58.0,
        er_followers: 10.0,
        er_likes_comments: 5.0,
        er_shares: 0.0,
        analysis: None,
    }
}

#[tokio::test]
async fn sends_json_mode_chat_request_and_returns_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-3.5-turbo",
            "temperature": 0.5,
            "max_tokens": 200,
            "response_format": {"type": "json_object"}
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion(r#"{"category":"Fitness"}"#)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = build_request(&sample_post());
    let content = oracle(&server, Some("sk-test"))
        .complete(&request)
        .await
        .expect("completion should succeed");
    assert_eq!(content, r#"{"category":"Fitness"}"#);
}

#[tokio::test]
async fn missing_key_sends_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("{}")))
        .expect(0)
        .mount(&server)
        .await;

    let err = oracle(&server, None)
        .complete(&build_request(&sample_post()))
        .await
        .unwrap_err();
    assert!(matches!(err, OracleError::NotConfigured), "got: {err:?}");
}

#[tokio::test]
async fn non_success_status_carries_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = oracle(&server, Some("sk-bad"))
        .complete(&build_request(&sample_post()))
        .await
        .unwrap_err();
    assert!(
        matches!(err, OracleError::Api { status: 401, ref body } if body == "invalid api key"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn empty_choices_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = oracle(&server, Some("sk-test"))
        .complete(&build_request(&sample_post()))
        .await
        .unwrap_err();
    assert!(matches!(err, OracleError::EmptyResponse), "got: {err:?}");
}

// ---------------------------------------------------------------------------
// Classifier over the real oracle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn classifier_parses_successful_completion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"category":"Fitness","theme":"Workout Tutorial","viralityScore":"0.7","erRating":"GOOD","reasoning":"Solid."}"#,
        )))
        .mount(&server)
        .await;

    let classifier = Classifier::new(oracle(&server, Some("sk-test")), Duration::from_secs(5));
    let post = classifier.analyze(sample_post()).await;
    let analysis = post.analysis.expect("analysis attached");
    assert_eq!(analysis.category, "Fitness");
    assert_eq!(analysis.theme, "Workout Tutorial");
    assert!((analysis.virality_score - 0.7).abs() < f64::EPSILON);
    assert_eq!(analysis.er_rating, "GOOD");
    assert_eq!(analysis.analysis_reasoning, "Solid.");
}

#[tokio::test]
async fn classifier_reports_rate_limit_as_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let classifier = Classifier::new(oracle(&server, Some("sk-test")), Duration::from_secs(5));
    let result = classifier.classify(&sample_post()).await;
    assert_eq!(
        result,
        AnalysisResult::Failure("OpenAI API error: status 429: slow down".to_string())
    );
}

#[tokio::test]
async fn classifier_reports_non_json_content_as_parse_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("Sure! Here is the analysis")),
        )
        .mount(&server)
        .await;

    let classifier = Classifier::new(oracle(&server, Some("sk-test")), Duration::from_secs(5));
    let result = classifier.classify(&sample_post()).await;
    assert_eq!(
        result,
        AnalysisResult::Failure("Failed to parse OpenAI response".to_string())
    );
}

#[tokio::test]
async fn classifier_times_out_slow_oracle() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("{}"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let classifier = Classifier::new(oracle(&server, Some("sk-test")), Duration::from_millis(100));
    let result = classifier.classify(&sample_post()).await;
    assert_eq!(
        result,
        AnalysisResult::Failure("OpenAI API error: request timed out after 100ms".to_string())
    );
}
