// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Gemini client and retry policy against a loopback server

use grapecheck_node::generation::{
    GeminiClient, GenerationClient, GenerationError, RetryPolicy, RetryingClient,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use super::mock_gemini::{MockGemini, Reply};

fn gemini(base_url: &str, timeout: Duration) -> GeminiClient {
    GeminiClient::new(base_url, "gemini-1.5-flash", "test-key", timeout).unwrap()
}

fn fast_retry(inner: GeminiClient, max_attempts: u32) -> RetryingClient {
    RetryingClient::new(
        Arc::new(inner),
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(20),
        },
    )
}

#[tokio::test]
async fn test_generate_sends_gemini_request() {
    let mock = MockGemini::start(vec![Reply::Text("Prune in late winter.".to_string())]).await;
    let client = gemini(&mock.base_url, Duration::from_secs(5));

    let text = client.generate("When should I prune?").await.unwrap();
    assert_eq!(text, "Prune in late winter.");

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path, "gemini-1.5-flash:generateContent");
    assert_eq!(calls[0].api_key.as_deref(), Some("test-key"));
    assert_eq!(
        calls[0].body,
        json!({"contents": [{"role": "user", "parts": [{"text": "When should I prune?"}]}]})
    );
}

#[tokio::test]
async fn test_rate_limit_is_retried() {
    let mock = MockGemini::start(vec![
        Reply::Status(429, json!({"error": {"code": 429, "message": "quota"}})),
        Reply::Status(503, json!({"error": {"code": 503, "message": "overloaded"}})),
        Reply::Text("finally".to_string()),
    ])
    .await;
    let client = fast_retry(gemini(&mock.base_url, Duration::from_secs(5)), 3);

    assert_eq!(client.generate("q").await.unwrap(), "finally");
    assert_eq!(mock.calls().len(), 3);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let mock = MockGemini::start(vec![
        Reply::Status(500, json!({})),
        Reply::Status(500, json!({})),
        Reply::Status(500, json!({})),
        Reply::Text("too late".to_string()),
    ])
    .await;
    let client = fast_retry(gemini(&mock.base_url, Duration::from_secs(5)), 3);

    let err = client.generate("q").await.unwrap_err();
    assert!(matches!(err, GenerationError::Api { status: 500, .. }));
    assert_eq!(mock.calls().len(), 3);
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mock = MockGemini::start(vec![Reply::Status(
        400,
        json!({"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}),
    )])
    .await;
    let client = fast_retry(gemini(&mock.base_url, Duration::from_secs(5)), 3);

    let err = client.generate("q").await.unwrap_err();
    assert_eq!(
        err,
        GenerationError::Api {
            status: 400,
            message: "API key not valid".to_string()
        }
    );
    assert_eq!(mock.calls().len(), 1);
}

#[tokio::test]
async fn test_missing_candidates_is_malformed() {
    let mock = MockGemini::start(vec![Reply::NoCandidates]).await;
    let client = fast_retry(gemini(&mock.base_url, Duration::from_secs(5)), 3);

    assert!(matches!(
        client.generate("q").await,
        Err(GenerationError::MalformedResponse(_))
    ));
    assert_eq!(mock.calls().len(), 1);
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let mock = MockGemini::start(vec![Reply::Slow(Duration::from_secs(3))]).await;
    let client = gemini(&mock.base_url, Duration::from_millis(200));

    assert_eq!(
        client.generate("q").await.unwrap_err(),
        GenerationError::Timeout
    );
}
