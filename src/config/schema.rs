use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::chat::compose::{ComposeLimits, DEFAULT_MAX_FILE_CHARS, DEFAULT_MAX_MESSAGE_CHARS};

/// Top-level configuration, loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub provider: ProviderConfig,
    pub attachments: AttachmentsConfig,
}

/// HTTP gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Address to bind.
    pub host: String,
    pub port: u16,
    /// Largest accepted request body, attachments included.
    pub max_body_bytes: usize,
    /// Whole-request deadline, provider call included.
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            max_body_bytes: 25 * 1024 * 1024,
            request_timeout_secs: 120,
        }
    }
}

impl GatewayConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// OpenAI-compatible chat completions provider (OpenRouter by default).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    /// Overridden by `OPENROUTER_API_KEY` when set.
    pub api_key: Option<String>,
    /// System prompt sent ahead of the conversation.
    pub instructions: String,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".into(),
            api_key: None,
            instructions: "You are a helpful assistant.".into(),
            timeout_secs: 120,
        }
    }
}

/// Caps applied when inlining attachment content into a message.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct AttachmentsConfig {
    pub max_file_chars: usize,
    pub max_message_chars: usize,
}

impl Default for AttachmentsConfig {
    fn default() -> Self {
        Self {
            max_file_chars: DEFAULT_MAX_FILE_CHARS,
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
        }
    }
}

impl From<&AttachmentsConfig> for ComposeLimits {
    fn from(config: &AttachmentsConfig) -> Self {
        Self {
            max_file_chars: config.max_file_chars,
            max_message_chars: config.max_message_chars,
        }
    }
}
