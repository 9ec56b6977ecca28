//! Language-model providers
//!
//! The gateway only sees the [`Provider`] trait; the concrete client is
//! built once at startup and injected.

pub mod openrouter;

pub use openrouter::OpenRouterProvider;

use async_trait::async_trait;

use crate::chat::ChatMessage;

/// Prompt in, text out. No retries at this layer.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate the assistant reply for `messages` with `model`.
    async fn chat(&self, model: &str, messages: &[ChatMessage]) -> anyhow::Result<String>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}
