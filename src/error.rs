//! API error taxonomy and its JSON envelopes.
//!
//! - `Validation` -> 400 `{error}`
//! - `NotFound`   -> 404 `{error}`
//! - `Rejected`   -> extractor status, `{error: {message, status}}`
//! - `Internal`   -> 500 `{error, message}`
//!
//! Upstream agent failures never reach this type; they are absorbed in `logic`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Body could not be extracted (malformed JSON, wrong content type, ...).
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    /// `context` is the caller-facing summary; `message` the underlying cause.
    #[error("{context}: {message}")]
    Internal { context: &'static str, message: String },
}

impl ApiError {
    pub fn internal(context: &'static str, err: impl std::fmt::Display) -> Self {
        ApiError::Internal { context, message: err.to_string() }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Rejected { status, .. } => *status,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected { status: rejection.status(), message: rejection.body_text() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(msg) | ApiError::NotFound(msg) => json!({ "error": msg }),
            ApiError::Rejected { status, message } => {
                json!({ "error": { "message": message, "status": status.as_u16() } })
            }
            ApiError::Internal { context, message } => {
                error!(target: "revision_backend", %context, %message, "Request failed");
                json!({ "error": context, "message": message })
            }
        };
        (status, Json(body)).into_response()
    }
}
