// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! POST /chat and /chat/reset through the real router

use axum::http::StatusCode;
use grapecheck_node::generation::GenerationError;
use tower::ServiceExt; // for `oneshot`

use super::helpers::*;

fn classifier() -> grapecheck_node::vision::ClassificationPipeline {
    pipeline_with_scores(vec![0.2; 5])
}

#[tokio::test]
async fn test_chat_without_api_key_is_unavailable() {
    let app = app(classifier(), None);

    let response = app
        .oneshot(chat_request(r#"{"prompt": "hello"}"#, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = json_body(response).await;
    assert_eq!(json["errorType"], "model_unavailable");
    assert_eq!(json["category"], "server");
}

#[tokio::test]
async fn test_unavailable_checked_before_body() {
    let app = app(classifier(), None);
    let response = app.oneshot(chat_request("not json", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_invalid_bodies_are_rejected() {
    let client = ScriptedClient::new(vec![]);
    let app = app(classifier(), Some(client.clone()));

    for body in [
        "not json",
        r#"{"question": "hi"}"#,
        r#"{"prompt": 7}"#,
        r#"{"prompt": ""}"#,
        r#"{"prompt": "   "}"#,
    ] {
        let response = app.clone().oneshot(chat_request(body, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {}", body);

        let json = json_body(response).await;
        assert_eq!(json["errorType"], "invalid_request");
        assert_eq!(json["category"], "client");
    }

    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_first_chat_issues_session_cookie() {
    let client = ScriptedClient::new(vec![Ok("Hello, grape grower!".to_string())]);
    let app = app(classifier(), Some(client.clone()));

    let response = app
        .oneshot(chat_request(r#"{"prompt": "Hi"}"#, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = session_cookie(&response).expect("session cookie");
    assert!(cookie.starts_with("grapecheck_session="));

    let json = json_body(response).await;
    assert_eq!(json, serde_json::json!({"response": "Hello, grape grower!"}));
    assert!(client.instruction(0).contains("Pertanyaan Pengguna Saat Ini: \"Hi\""));
}

#[tokio::test]
async fn test_history_carries_across_requests_in_a_session() {
    let client = ScriptedClient::new(vec![
        Ok("Esca is a trunk disease.".to_string()),
        Ok("Prune infected wood.".to_string()),
    ]);
    let app = app(classifier(), Some(client.clone()));

    let first = app
        .clone()
        .oneshot(chat_request(r#"{"prompt": "What is Esca?"}"#, None))
        .await
        .unwrap();
    let cookie = session_cookie(&first).unwrap();

    let second = app
        .oneshot(chat_request(r#"{"prompt": "How do I treat it?"}"#, Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    // An existing session is not re-issued
    assert!(session_cookie(&second).is_none());

    let instruction = client.instruction(1);
    assert!(instruction.contains("user: What is Esca?\nbot: Esca is a trunk disease."));
    assert!(instruction.contains("Pertanyaan Pengguna Saat Ini: \"How do I treat it?\""));
}

#[tokio::test]
async fn test_sessions_do_not_share_history() {
    let client = ScriptedClient::new(vec![]);
    let app = app(classifier(), Some(client.clone()));

    app.clone()
        .oneshot(chat_request(r#"{"prompt": "secret vineyard"}"#, Some("grapecheck_session=alpha")))
        .await
        .unwrap();
    app.oneshot(chat_request(r#"{"prompt": "hello"}"#, Some("grapecheck_session=beta")))
        .await
        .unwrap();

    assert!(!client.instruction(1).contains("secret vineyard"));
}

#[tokio::test]
async fn test_reset_clears_history() {
    let client = ScriptedClient::new(vec![]);
    let app = app(classifier(), Some(client.clone()));
    let cookie = "grapecheck_session=reset-me";

    app.clone()
        .oneshot(chat_request(r#"{"prompt": "remember me"}"#, Some(cookie)))
        .await
        .unwrap();

    let reset = app.clone().oneshot(reset_request(Some(cookie))).await.unwrap();
    assert_eq!(reset.status(), StatusCode::OK);
    assert_eq!(json_body(reset).await["status"], "ok");

    app.oneshot(chat_request(r#"{"prompt": "do you?"}"#, Some(cookie)))
        .await
        .unwrap();

    let instruction = client.instruction(1);
    assert!(!instruction.contains("remember me"));
    assert!(instruction.contains("Riwayat Percakapan:\n\n"));
}

#[tokio::test]
async fn test_reset_without_session_is_acknowledged() {
    let app = app(classifier(), None);
    let response = app.oneshot(reset_request(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["message"].as_str().unwrap().contains("reset"));
}

#[tokio::test]
async fn test_generation_failure_keeps_history() {
    let client = ScriptedClient::new(vec![
        Ok("first".to_string()),
        Err(GenerationError::Api {
            status: 500,
            message: "internal".to_string(),
        }),
        Ok("third".to_string()),
    ]);
    let app = app(classifier(), Some(client.clone()));
    let cookie = "grapecheck_session=flaky";

    app.clone()
        .oneshot(chat_request(r#"{"prompt": "one"}"#, Some(cookie)))
        .await
        .unwrap();

    let failed = app
        .clone()
        .oneshot(chat_request(r#"{"prompt": "two"}"#, Some(cookie)))
        .await
        .unwrap();
    assert_eq!(failed.status(), StatusCode::BAD_GATEWAY);
    let json = json_body(failed).await;
    assert_eq!(json["errorType"], "generation_failed");
    assert_eq!(json["category"], "server");

    app.oneshot(chat_request(r#"{"prompt": "three"}"#, Some(cookie)))
        .await
        .unwrap();

    let instruction = client.instruction(2);
    assert!(instruction.contains("user: one\nbot: first"));
    assert!(!instruction.contains("user: two"));
}

#[tokio::test]
async fn test_eleven_exchanges_keep_last_ten() {
    let client = ScriptedClient::new(vec![]);
    let app = app(classifier(), Some(client.clone()));
    let cookie = "grapecheck_session=long";

    for i in 0..12 {
        let body = format!(r#"{{"prompt": "question {}"}}"#, i);
        let response = app
            .clone()
            .oneshot(chat_request(&body, Some(cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // The 12th instruction sees the history left by the first 11 exchanges
    let instruction = client.instruction(11);
    assert!(!instruction.contains("user: question 0\n"));
    assert!(instruction.contains("user: question 1\n"));
    assert!(instruction.contains("user: question 10\n"));
    assert_eq!(instruction.matches("bot: default reply").count(), 10);
}
