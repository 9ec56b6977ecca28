use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::Instrument;

use super::error::ApiError;
use super::AppState;
use crate::attachments::{process_payloads, AttachmentPayload};
use crate::chat::{compose, ChatMessage, Role};

/// Body of `POST /api/chat` as sent by the chat client.
#[derive(Debug, Deserialize)]
struct ChatRequestBody {
    #[serde(default)]
    messages: Option<Vec<ChatMessage>>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    experimental_attachments: Option<Vec<AttachmentPayload>>,
}

/// A chat request that passed boundary validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub attachments: Vec<AttachmentPayload>,
}

impl ChatRequest {
    /// Parse and validate a raw request body. The first violation rejects
    /// the request.
    pub fn parse(body: &[u8]) -> Result<Self, ApiError> {
        let raw: ChatRequestBody = serde_json::from_slice(body)
            .map_err(|error| ApiError::InvalidRequest(error.to_string()))?;

        let model = raw
            .model
            .filter(|model| !model.is_empty())
            .ok_or_else(|| ApiError::invalid("model is missing or empty"))?;
        let messages = raw
            .messages
            .ok_or_else(|| ApiError::invalid("messages is missing"))?;

        Ok(Self {
            model,
            messages,
            attachments: raw.experimental_attachments.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    pub role: Role,
    pub content: String,
}

/// `POST /api/chat` — fold attachments into the conversation, call the
/// provider and return the assistant reply.
pub(super) async fn handle_chat(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ChatReply>, ApiError> {
    let request = ChatRequest::parse(&body)?;
    let span = tracing::info_span!(
        "chat",
        request_id = %uuid::Uuid::new_v4(),
        model = %request.model,
    );
    respond(&state, request).instrument(span).await.map(Json)
}

async fn respond(state: &AppState, request: ChatRequest) -> Result<ChatReply, ApiError> {
    tracing::info!(
        messages = request.messages.len(),
        attachments = request.attachments.len(),
        "chat request received"
    );

    let messages = if request.attachments.is_empty() {
        request.messages
    } else {
        let files = process_payloads(&request.attachments)?;
        compose(&request.messages, &files, &state.limits)
    };

    let text = state.provider.chat(&request.model, &messages).await?;
    tracing::info!(chars = text.chars().count(), "provider replied");

    Ok(ChatReply {
        role: Role::Assistant,
        content: unescape_newlines(&text),
    })
}

/// Models sometimes return literal `\n` sequences; turn them into newlines.
fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}
