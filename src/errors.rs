use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::services::{gateway::GatewayError, http_helpers::fail};

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    RateLimited(String),

    #[error(transparent)]
    Gateway(GatewayError),

    #[error("{0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "unauthorized",
            AppError::RateLimited(_) => "rate_limit",
            AppError::Gateway(_) => "server_error",
            AppError::InternalError(_) => "server_error",
        }
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::RateLimit => AppError::RateLimited("Gemini rate limit reached".to_string()),
            other => AppError::Gateway(other),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(format!("JSON serialization error: {}", err))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Gateway(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        fail(self.error_code(), &self.to_string(), self.status_code())
    }
}

pub type AppResult<T> = Result<T, AppError>;
