use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::Provider;
use crate::chat::{ChatMessage, Role};
use crate::config::ProviderConfig;

/// OpenAI-compatible chat completions client. OpenRouter by default, but any
/// endpoint speaking the same format works through `base_url`.
pub struct OpenRouterProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    instructions: String,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenRouterProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        let base_url = config.base_url.trim_end_matches('/');
        let endpoint = format!("{base_url}/chat/completions");

        if config.api_key.is_none() {
            tracing::warn!("no provider API key configured, requests will be sent unauthenticated");
        }

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            instructions: config.instructions.clone(),
        })
    }

    fn build_request<'a>(
        &'a self,
        model: &'a str,
        messages: &'a [ChatMessage],
    ) -> CompletionRequest<'a> {
        let preamble = (!self.instructions.is_empty()).then(|| WireMessage {
            role: Role::System.as_str(),
            content: &self.instructions,
        });
        let messages = preamble
            .into_iter()
            .chain(messages.iter().map(|m| WireMessage {
                role: m.role.as_str(),
                content: &m.content,
            }))
            .collect();
        CompletionRequest { model, messages }
    }
}

#[async_trait]
impl Provider for OpenRouterProvider {
    async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String> {
        let body = self.build_request(model, messages);

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.context("Failed to reach provider")?;

        let status = response.status();
        if !status.is_success() {
            let payload: serde_json::Value = response.json().await.unwrap_or_default();
            let message = payload["error"]["message"]
                .as_str()
                .unwrap_or("unknown error");
            bail!("provider API error ({status}): {message}");
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .context("Failed to parse provider response")?;
        extract_reply(parsed)
    }

    fn name(&self) -> &str {
        "openrouter"
    }
}

fn extract_reply(response: CompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .context("empty response from provider")
}
