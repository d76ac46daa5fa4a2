use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::github::GithubError;
use crate::models::InvalidRequest;

/// Errors returned by the HTTP API.
///
/// Every variant renders as `{"error": <category>, "message": <detail>}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    /// The GitHub API answered with a non-success status. Its status and
    /// body are passed through unchanged.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "Invalid request",
            Self::Upstream { .. } => "GitHub API error",
            Self::Internal(_) => "Error generating summary",
        }
    }
}

impl From<GithubError> for ApiError {
    fn from(e: GithubError) -> Self {
        match e {
            GithubError::Upstream { status, body } => Self::Upstream {
                status,
                message: body,
            },
            other @ GithubError::WindowOutOfRange(_) => Self::BadRequest(other.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<InvalidRequest> for ApiError {
    fn from(e: InvalidRequest) -> Self {
        Self::BadRequest(e.0)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::BadRequest(msg) => tracing::warn!("Rejected request: {}", msg),
            Self::Upstream { status, message } => {
                tracing::warn!("GitHub API error {}: {}", status, message)
            }
            Self::Internal(msg) => tracing::error!("Error in summarize endpoint: {}", msg),
        }

        let body = Json(serde_json::json!({
            "error": self.category(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}
