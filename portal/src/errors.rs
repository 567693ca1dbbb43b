// parish-portal/src/errors.rs

use crate::models::photo::PhotoError;
use crate::validation::FieldErrors;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use parish_flow::FlowError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation failed: {0}")]
  Validation(FieldErrors),

  #[error("Bad request: {0}")]
  BadRequest(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Payment Processing Error: {0}")]
  Payment(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Serialization Error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("Internal Server Error: {0}")]
  Internal(String),

  // A flow stopped on purpose but the caller needed it to finish.
  #[error("Flow execution was halted by a handler.")]
  FlowHalted,
}

impl From<PhotoError> for AppError {
  fn from(err: PhotoError) -> Self {
    AppError::BadRequest(err.to_string())
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(err) => match err.downcast::<AppError>() {
        Ok(app_err) => app_err,
        Err(err) => AppError::Internal(err.to_string()),
      },
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
      AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Payment(_) => StatusCode::PAYMENT_REQUIRED,
      AppError::FlowHalted => StatusCode::CONFLICT,
      AppError::Config(_)
      | AppError::Sqlx(_)
      | AppError::Workflow { .. }
      | AppError::Serialization(_)
      | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::info!(application_error = %self, status = status.as_u16(), "Request rejected");
    }
    let body = match self {
      AppError::Validation(fields) => json!({"error": "Validation failed", "fields": fields}),
      AppError::BadRequest(m) | AppError::NotFound(m) | AppError::Payment(m) => json!({"error": m}),
      AppError::Config(m) => json!({"error": "Configuration issue", "detail": m}),
      AppError::Sqlx(_) => json!({"error": "Database operation failed"}),
      AppError::Workflow { source } => {
        tracing::error!(flow_error_source = ?source, "Workflow error details");
        json!({"error": "Workflow processing error", "detail": source.to_string()})
      }
      AppError::Serialization(_) => json!({"error": "Stored data could not be read"}),
      AppError::Internal(m) => json!({"error": "An internal error occurred", "detail": m}),
      AppError::FlowHalted => json!({"error": "Process halted before completion."}),
    };
    HttpResponse::build(status).json(body)
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
