use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ecoaction_core::EcoActionError;
use serde_json::json;
use thiserror::Error;

/// Startup failures of the server binary.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid server configuration: {0}")]
    Config(String),
    #[error("server io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error body returned by every route: `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    /// Maps a flow error to a response. Caller mistakes keep their message;
    /// anything else is logged and hidden behind the route's `failure` text.
    pub fn from_flow(route: &'static str, failure: &str, err: EcoActionError) -> Self {
        match err {
            EcoActionError::InvalidInput(message) => Self::bad_request(message),
            other => {
                tracing::error!(route, kind = other.kind(), error = %other, "{failure}");
                Self::internal(failure)
            }
        }
    }

    pub fn payload_too_large() -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "Request body too large".to_string(),
        }
    }

    pub fn from_rejection(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "rejected request body");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::payload_too_large();
        }
        Self::bad_request("Invalid request body")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
