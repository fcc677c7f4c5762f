//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use rosary_core::{DomainError, Error as CoreError};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("unprocessable: {0}")]
  Unprocessable(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a store failure: domain rejections keep their meaning, anything
  /// else is an opaque server error.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + DomainError + Send + Sync + 'static,
  {
    match e.domain() {
      Some(domain) => Self::from_domain(domain),
      None => Self::Store(Box::new(e)),
    }
  }

  pub fn from_domain(e: &CoreError) -> Self {
    let message = e.to_string();
    match e {
      CoreError::GroupNotFound(_) | CoreError::ProfileNotFound(_) => {
        Self::NotFound(message)
      }
      CoreError::GroupNotEmpty { .. }
      | CoreError::GroupFull(_)
      | CoreError::EmailTaken(_) => Self::Conflict(message),
      CoreError::NotAdmin(_) => Self::Forbidden(message),
      CoreError::NotAssigned(_)
      | CoreError::MysteryMismatch { .. }
      | CoreError::InvalidMystery(_)
      | CoreError::InvalidMonth(_)
      | CoreError::InvalidPeriod(_)
      | CoreError::EmptyName => Self::Unprocessable(message),
    }
  }
}

impl From<CoreError> for ApiError {
  fn from(e: CoreError) -> Self { Self::from_domain(&e) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m.clone()),
      ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
