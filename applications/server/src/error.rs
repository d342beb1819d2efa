/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tilawa_core::TilawaError;

/// Message returned to callers over their request ceiling
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests, please reload the page.";

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unplayable range: {0}")]
    UnprocessableRange(String),

    #[error("Too many requests")]
    RateLimited,

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<TilawaError> for ServerError {
    fn from(err: TilawaError) -> Self {
        match err {
            TilawaError::InvalidSurah(_)
            | TilawaError::InvalidAyah { .. }
            | TilawaError::InvalidRange(_) => ServerError::UnprocessableRange(err.to_string()),
            TilawaError::RateLimited(_) => ServerError::RateLimited,
            TilawaError::VerseText(_) | TilawaError::RangeParse(_) | TilawaError::Network(_) => {
                ServerError::Upstream(err.to_string())
            }
            TilawaError::Audio(_) | TilawaError::Serialization(_) => {
                ServerError::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServerError::UnprocessableRange(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ServerError::RateLimited => {
                (StatusCode::TOO_MANY_REQUESTS, RATE_LIMIT_MESSAGE.to_string())
            }
            ServerError::Upstream(ref msg) => {
                tracing::error!("Upstream error: {}", msg);
                (StatusCode::BAD_GATEWAY, "Upstream request failed".to_string())
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
