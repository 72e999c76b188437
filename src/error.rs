use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::core::EngineError;
use crate::models::ErrorResponse;
use crate::services::FeedError;

/// Errors surfaced by the HTTP layer
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::Feed(_) => "feed_unavailable",
            AppError::Engine(EngineError::MalformedData { .. }) => "malformed_data",
            AppError::Engine(EngineError::EmptyInput) => "empty_input",
            AppError::Engine(EngineError::Computation { .. }) => "computation_failed",
            AppError::Serialization(_) => "serialization_failed",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Feed(_) => StatusCode::BAD_GATEWAY,
            AppError::Engine(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}
