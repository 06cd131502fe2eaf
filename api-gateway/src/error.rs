// ==============================================================================
// error.rs - Application Error Type
// ==============================================================================
// Description: Error taxonomy shared by handlers, stores, and the news client
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Application error type
///
/// Every variant renders as `{"detail": "..."}` with a matching status code.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or invalid server-side configuration (e.g. provider key)
    #[error("{0}")]
    Config(String),

    /// Transport failure talking to the upstream provider
    #[error("Unable to reach upstream news provider")]
    UpstreamUnavailable,

    /// Upstream answered but reported a non-ok status
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("CSRF verification failed")]
    CsrfFailed,

    #[error("{0}")]
    Conflict(String),

    #[error("Too many login attempts, please wait")]
    TooManyRequests,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Config(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpstreamUnavailable | Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::CsrfFailed => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(format!("Database error: {err}"))
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        Self::Internal(format!("Redis error: {err}"))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal details stay in the logs
        let detail = match &self {
            Self::Internal(msg) => {
                error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            Self::Config(msg) => {
                error!("Configuration error: {}", msg);
                msg.clone()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorResponse::new(detail))).into_response()
    }
}
