use geeknews_reporter::ReporterError;
use geeknews_reporter::ai::LlmClient;
use geeknews_reporter::pipeline::CompletionRequest;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request() -> CompletionRequest {
    CompletionRequest {
        model: "claude-test".to_string(),
        max_tokens: 4096,
        prompt: "다음은 GeekNews의 최신 기사 1개입니다.".to_string(),
    }
}

#[tokio::test]
async fn test_create_message_returns_reply_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-ant-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-test",
            "max_tokens": 4096,
            "messages": [{"role": "user"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": "```json\n{\"articles\": []}\n```"}],
            "stop_reason": "end_turn"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = LlmClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
    let text = client.create_message(&request(), "sk-ant-test").await.unwrap();

    assert_eq!(text, "```json\n{\"articles\": []}\n```");
}

#[tokio::test]
async fn test_api_error_is_transport_error_with_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "type": "error",
            "error": {"type": "authentication_error", "message": "invalid x-api-key"}
        })))
        .mount(&server)
        .await;

    let client = LlmClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
    let err = client.create_message(&request(), "bad").await.unwrap_err();

    match err {
        ReporterError::Transport(msg) => {
            assert!(msg.contains("401"), "{msg}");
            assert!(msg.contains("authentication_error: invalid x-api-key"), "{msg}");
        }
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test]
async fn test_reply_without_text_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [],
            "stop_reason": "end_turn"
        })))
        .mount(&server)
        .await;

    let client = LlmClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
    let err = client.create_message(&request(), "k").await.unwrap_err();

    assert!(matches!(err, ReporterError::MalformedResponse(_)), "got {err:?}");
}
