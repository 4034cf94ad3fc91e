//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use civic_core::{store::StoreError, validation::ValidationErrors};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// The request is well-formed but conflicts with the record's state.
  #[error("conflict: {0}")]
  Conflict(String),

  #[error(transparent)]
  Validation(ValidationErrors),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a store failure by the domain error behind it.
  pub fn from_store<E: StoreError>(e: E) -> Self {
    use civic_core::Error as Core;

    match e.as_core() {
      Some(
        Core::ComplaintNotFound(_)
        | Core::BloodRequestNotFound(_)
        | Core::FundraiserNotFound(_),
      ) => Self::NotFound(e.to_string()),
      Some(Core::GoalReached(_)) => Self::Conflict(e.to_string()),
      Some(Core::InvalidAmount(_) | Core::EmptyMessage) => {
        Self::BadRequest(e.to_string())
      }
      Some(Core::Validation(v)) => Self::Validation(v.clone()),
      Some(Core::Serialization(_)) | None => Self::Store(Box::new(e)),
    }
  }
}

impl From<ValidationErrors> for ApiError {
  fn from(e: ValidationErrors) -> Self { Self::Validation(e) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, json!({ "error": m })),
      ApiError::Validation(v) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({ "error": "validation failed", "fields": v.fields }),
      ),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          json!({ "error": e.to_string() }),
        )
      }
    };
    (status, Json(body)).into_response()
  }
}
