use geeknews_reporter::ReporterError;
use geeknews_reporter::slack::blocks::{Block, ChannelMessage, TextObject};
use geeknews_reporter::slack::SlackClient;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn message() -> ChannelMessage {
    ChannelMessage::new(
        vec![
            Block::Header {
                text: TextObject::PlainText {
                    text: "GeekNews 최신 기사 요약(2026.10.18)".to_string(),
                },
            },
            Block::Divider,
        ],
        "GeekNews 최신 기사 요약(2026.10.18)".to_string(),
    )
}

async fn client_for(server: &MockServer) -> SlackClient {
    SlackClient::new(&format!("{}/api", server.uri()), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_post_message_delivered() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat.postMessage"))
        .and(header("authorization", "Bearer xoxb-test"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "channel": "010-agent-news",
            "blocks": [{"type": "header"}, {"type": "divider"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "channel": "C0AGENTNEWS",
            "ts": "1760745600.000100"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .await
        .post_message("010-agent-news", &message(), "xoxb-test")
        .await
        .unwrap();

    assert!(result.delivered);
    assert_eq!(result.channel_id, "C0AGENTNEWS");
    assert_eq!(result.message_timestamp.as_deref(), Some("1760745600.000100"));
}

#[tokio::test]
async fn test_ok_false_is_rejected_with_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat.postMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": false,
            "error": "channel_not_found"
        })))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .await
        .post_message("nope", &message(), "xoxb-test")
        .await
        .unwrap();

    assert!(!result.delivered);
    assert!(result.message_timestamp.is_none());
    let err = result.into_result().unwrap_err();
    match err {
        ReporterError::Delivery(msg) => assert_eq!(msg, "channel_not_found"),
        other => panic!("expected Delivery, got {other:?}"),
    }
}

#[tokio::test]
async fn test_http_error_is_rejected_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .await
        .post_message("C1", &message(), "xoxb-test")
        .await
        .unwrap();

    assert!(!result.delivered);
    let detail = result.provider_error.unwrap();
    assert!(detail.contains("500"), "{detail}");
    assert!(detail.contains("upstream exploded"), "{detail}");
}

#[tokio::test]
async fn test_unreadable_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .await
        .post_message("C1", &message(), "xoxb-test")
        .await
        .unwrap();

    assert!(!result.delivered);
    assert!(matches!(
        result.into_result(),
        Err(ReporterError::Delivery(_))
    ));
}

#[tokio::test]
async fn test_ok_without_ts_is_not_reported_as_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .await
        .post_message("C1", &message(), "xoxb-test")
        .await
        .unwrap();

    assert!(result.delivered);
    assert!(result.message_timestamp.is_none());
}

#[tokio::test]
async fn test_unreachable_slack_is_transport_error() {
    // Nothing listens on the port once the listener is dropped
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}/api", listener.local_addr().unwrap());
    drop(listener);

    let client = SlackClient::new(&uri, Duration::from_secs(2)).unwrap();
    let err = client
        .post_message("C1", &message(), "xoxb-test")
        .await
        .unwrap_err();

    assert!(matches!(err, ReporterError::Transport(_)), "got {err:?}");
}
