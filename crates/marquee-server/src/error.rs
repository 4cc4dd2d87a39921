//! Server error type and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::signature::SignatureError;

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing Svix headers")]
  MissingHeaders,

  #[error("invalid webhook signature")]
  InvalidSignature(#[source] SignatureError),

  #[error("invalid event payload: {0}")]
  InvalidPayload(String),

  #[error("sync queue unavailable")]
  QueueUnavailable,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      Error::MissingHeaders => (StatusCode::BAD_REQUEST, self.to_string()),
      Error::InvalidSignature(_) => (StatusCode::BAD_REQUEST, self.to_string()),
      Error::InvalidPayload(m) => {
        (StatusCode::BAD_REQUEST, format!("invalid event payload: {m}"))
      }
      Error::QueueUnavailable => {
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
      }
      Error::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
