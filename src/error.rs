//! Error types for the store and the HTTP boundary.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Store invariant violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A match record did not have the shape the store accepts. Records inserted
    /// earlier in the same batch stay committed.
    #[error("invalid match record `{id}`: {reason}")]
    InvalidRecord { id: String, reason: &'static str },
}

/// Errors from the ingest/retrieve orchestrator.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Raw events rejected at the boundary; nothing from the batch was stored.
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("keyword configuration: {0:#}")]
    Keywords(anyhow::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Client sent events that do not pass boundary validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Body is not the expected JSON shape
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Body was not sent as `application/json`
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Keyword configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Config(_) | ApiError::Store(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::UnsupportedMediaType(_) => "unsupported_media_type",
            ApiError::Config(_) => "config_error",
            ApiError::Store(_) => "store_error",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl From<FeedError> for ApiError {
    fn from(err: FeedError) -> Self {
        match err {
            FeedError::Validation(msg) => ApiError::Validation(msg),
            FeedError::Keywords(e) => ApiError::Config(format!("{e:#}")),
            FeedError::Store(e) => ApiError::Store(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rej: JsonRejection) -> Self {
        match rej {
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::UnsupportedMediaType(rej.body_text())
            }
            _ => ApiError::BadRequest(rej.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        let body = ErrorResponse {
            error: self.error_type(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
