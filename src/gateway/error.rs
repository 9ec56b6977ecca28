use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::attachments::DecodeError;

/// Failures surfaced to the chat client. The display string is the exact
/// `error` value in the response body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request")]
    InvalidRequest(String),
    #[error("Failed to process file attachments")]
    Attachments(#[source] DecodeError),
    #[error("Internal server error")]
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidRequest(reason.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Attachments(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DecodeError> for ApiError {
    fn from(error: DecodeError) -> Self {
        Self::Attachments(error)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        Self::Internal(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::InvalidRequest(reason) => tracing::debug!(%reason, "rejecting chat request"),
            Self::Attachments(error) => tracing::error!(%error, "attachment processing failed"),
            Self::Internal(error) => {
                tracing::error!(error = %format!("{error:#}"), "chat request failed")
            }
        }
        (
            self.status(),
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
