//! HTTP gateway
//!
//! `POST /api/chat` takes the conversation plus data-URI attachments and
//! returns the assistant reply as JSON. `GET /health` answers liveness
//! checks.

pub mod chat;
pub mod error;

pub use chat::{ChatReply, ChatRequest};
pub use error::ApiError;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::chat::ComposeLimits;
use crate::config::Config;
use crate::providers::Provider;

/// Immutable state shared by all handlers.
pub struct AppState {
    pub provider: Arc<dyn Provider>,
    pub limits: ComposeLimits,
}

impl AppState {
    pub fn new(config: &Config, provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            limits: ComposeLimits::from(&config.attachments),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Build the gateway router with body-size and timeout guards.
pub fn router(config: &Config, state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat::handle_chat))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.gateway.max_body_bytes))
        .layer(TimeoutLayer::new(config.gateway.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: &Config, provider: Arc<dyn Provider>) -> Result<()> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind gateway to {addr}"))?;

    tracing::info!(%addr, provider = provider.name(), "gateway listening");

    let state = Arc::new(AppState::new(config, provider));
    axum::serve(listener, router(config, state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Gateway server error")?;

    tracing::info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
