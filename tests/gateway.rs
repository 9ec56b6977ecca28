//! End-to-end tests of the chat gateway against a scripted provider.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::Engine;
use http_body_util::BodyExt;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use chatrelay::chat::{ChatMessage, Role};
use chatrelay::config::Config;
use chatrelay::gateway::{router, AppState};
use chatrelay::providers::Provider;

/// Records every call and answers with a fixed reply (or fails).
#[derive(Default)]
struct ScriptedProvider {
    reply: Option<String>,
    calls: Mutex<Vec<(String, Vec<ChatMessage>)>>,
}

impl ScriptedProvider {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            ..Self::default()
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn chat(&self, model: &str, messages: &[ChatMessage]) -> anyhow::Result<String> {
        self.calls
            .lock()
            .push((model.to_string(), messages.to_vec()));
        self.reply
            .clone()
            .ok_or_else(|| anyhow::anyhow!("upstream unavailable"))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

async fn post_chat(
    config: &Config,
    provider: Arc<ScriptedProvider>,
    body: Value,
) -> (StatusCode, Value) {
    let state = Arc::new(AppState::new(config, provider));
    let body = body.to_string();
    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .header("content-length", body.len())
        .body(Body::from(body))
        .unwrap();

    let response = router(config, state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

#[tokio::test]
async fn missing_model_is_rejected() {
    let provider = ScriptedProvider::replying("unused");
    let (status, body) = post_chat(
        &Config::default(),
        provider.clone(),
        json!({"messages": [{"role": "user", "content": "hi"}]}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid request"}));
    assert!(provider.calls.lock().is_empty());
}

#[tokio::test]
async fn non_list_messages_are_rejected() {
    let (status, body) = post_chat(
        &Config::default(),
        ScriptedProvider::replying("unused"),
        json!({"model": "m", "messages": {"role": "user"}}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid request"}));
}

#[tokio::test]
async fn reply_is_relayed_with_newlines_unescaped() {
    let provider = ScriptedProvider::replying(r"first\nsecond");
    let (status, body) = post_chat(
        &Config::default(),
        provider.clone(),
        json!({
            "model": "deepseek/deepseek-r1-0528-qwen3-8b",
            "messages": [{"role": "user", "content": "hello"}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"role": "assistant", "content": "first\nsecond"})
    );

    let calls = provider.calls.lock();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "deepseek/deepseek-r1-0528-qwen3-8b");
    assert_eq!(calls[0].1, vec![ChatMessage::user("hello")]);
}

#[tokio::test]
async fn attachments_are_folded_into_last_user_message() {
    let provider = ScriptedProvider::replying("done");
    let (status, _) = post_chat(
        &Config::default(),
        provider.clone(),
        json!({
            "model": "m",
            "messages": [
                {"role": "assistant", "content": "How can I help?"},
                {"role": "user", "content": "Summarize"}
            ],
            "experimental_attachments": [
                {"name": "a.txt", "contentType": "text/plain", "url": data_uri("text/plain", b"X")}
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let calls = provider.calls.lock();
    let sent = &calls[0].1;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], ChatMessage::assistant("How can I help?"));
    assert_eq!(sent[1].role, Role::User);
    assert_eq!(
        sent[1].content,
        "Summarize\n\n**Attached Files Content:**\n\n--- a.txt (text) ---\nX\n"
    );
}

#[tokio::test]
async fn unsupported_attachments_are_listed() {
    let provider = ScriptedProvider::replying("ok");
    let (status, _) = post_chat(
        &Config::default(),
        provider.clone(),
        json!({
            "model": "m",
            "messages": [{"role": "user", "content": "Look"}],
            "experimental_attachments": [
                {"name": "data.xlsx", "url": data_uri("", b"PK")},
                {
                    "name": "report.pdf",
                    "contentType": "application/pdf",
                    "url": data_uri("application/pdf", b"%PDF-1.4")
                }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let calls = provider.calls.lock();
    let content = &calls[0].1[0].content;
    let position = |header: &str| content.find(header).unwrap();
    let excel = position("--- data.xlsx (excel-unsupported) ---");
    let pdf = position("--- report.pdf (pdf) ---");
    let aggregate = position("--- Unsupported Files (unsupported) ---");
    assert!(excel < pdf && pdf < aggregate);
    assert!(content.contains("PDF document"));
}

#[tokio::test]
async fn malformed_attachment_url_fails_the_request() {
    let provider = ScriptedProvider::replying("unused");
    let (status, body) = post_chat(
        &Config::default(),
        provider.clone(),
        json!({
            "model": "m",
            "messages": [{"role": "user", "content": "hi"}],
            "experimental_attachments": [{"name": "a.txt", "url": "https://example.com/a.txt"}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to process file attachments"}));
    assert!(provider.calls.lock().is_empty());
}

#[tokio::test]
async fn provider_failure_is_an_internal_error() {
    let (status, body) = post_chat(
        &Config::default(),
        ScriptedProvider::failing(),
        json!({"model": "m", "messages": [{"role": "user", "content": "hi"}]}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal server error"}));
}

#[tokio::test]
async fn oversized_body_is_refused() {
    let mut config = Config::default();
    config.gateway.max_body_bytes = 64;
    let provider = ScriptedProvider::replying("unused");
    let (status, _) = post_chat(
        &config,
        provider.clone(),
        json!({"model": "m", "messages": [{"role": "user", "content": "x".repeat(256)}]}),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(provider.calls.lock().is_empty());
}

#[tokio::test]
async fn health_reports_ok() {
    let config = Config::default();
    let state = Arc::new(AppState::new(&config, ScriptedProvider::replying("")));
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = router(&config, state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], br#"{"status":"ok"}"#);
}
