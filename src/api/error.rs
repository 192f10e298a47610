//! HTTP server error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::token::RedeemError;

/// Server lifecycle errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Server bind failed: {reason}")]
    BindFailed { reason: String },

    #[error("Internal server error: {reason}")]
    Internal { reason: String },
}

/// Request-level errors, mapped to status codes at the boundary
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Media unavailable: {0}")]
    Redeem(#[from] RedeemError),

    #[error("Internal server error: {reason}")]
    Internal { reason: String },
}

impl ApiError {
    pub fn internal(reason: impl ToString) -> Self {
        ApiError::Internal {
            reason: reason.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::Redeem(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message; never includes paths or internal detail
    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::InvalidJson(_) => "Invalid JSON",
            ApiError::Redeem(reason) => reason.public_message(),
            ApiError::Internal { .. } => "Internal server error",
        }
    }

    fn log(&self) {
        match self {
            ApiError::Internal { reason } => tracing::error!("Request failed: {}", reason),
            ApiError::InvalidJson(detail) => tracing::debug!("Rejected request body: {}", detail),
            ApiError::Redeem(reason) => tracing::debug!("Redemption failed: {}", reason),
        }
    }

    /// Plain-text rendering, used by the media endpoint
    pub fn into_plain_response(self) -> Response {
        self.log();
        (self.status_code(), self.public_message()).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        (
            self.status_code(),
            Json(json!({ "error": self.public_message() })),
        )
            .into_response()
    }
}
