// crm-server/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use crm_core::CoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

// Expected business failures from the engine map onto client-facing kinds;
// infrastructure faults stay opaque 500s.
impl From<CoreError> for ApiError {
  fn from(err: CoreError) -> Self {
    match err {
      CoreError::Validation { reason } => ApiError::Validation(reason),
      CoreError::NotFound { reason } => ApiError::NotFound(reason),
      CoreError::Conflict { reason } => ApiError::Conflict(reason),
      CoreError::Infrastructure { source } => ApiError::Internal(source.to_string()),
    }
  }
}

// Allow anyhow::Error to be converted for convenience in startup code using `?`.
impl From<anyhow::Error> for ApiError {
  fn from(err: anyhow::Error) -> Self {
    ApiError::Internal(err.to_string())
  }
}

impl ResponseError for ApiError {
  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(api_error = %self, "Responding with error");
    match self {
      ApiError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      ApiError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
      ApiError::Conflict(m) => HttpResponse::Conflict().json(json!({"error": m})),
      ApiError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      ApiError::Sqlx(_) => HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"})),
      ApiError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = ApiError> = std::result::Result<T, E>;
