//! Error type and axum `IntoResponse` implementation.
//!
//! Every failure leaves the server as `{"success": false, "error": "..."}`.

use axum::{
  BoxError, Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] wfsync_core::Error),

  /// A failure reported under an explicit status: extractor rejections and
  /// the legacy routes' own codes.
  #[error("{message}")]
  Status { status: StatusCode, message: String },

  #[error("the request took too long to process")]
  TimedOut,
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      Self::Core(e) => StatusCode::from_u16(e.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
      Self::Status { status, .. } => *status,
      Self::TimedOut => StatusCode::REQUEST_TIMEOUT,
    }
  }
}

/// Turn errors raised by middleware (the request timeout) into envelopes.
pub async fn handle_middleware_error(err: BoxError) -> ApiError {
  if err.is::<tower::timeout::error::Elapsed>() {
    ApiError::TimedOut
  } else {
    ApiError::Status {
      status:  StatusCode::INTERNAL_SERVER_ERROR,
      message: err.to_string(),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(r: JsonRejection) -> Self {
    Self::Status { status: r.status(), message: r.body_text() }
  }
}

impl From<PathRejection> for ApiError {
  fn from(r: PathRejection) -> Self {
    Self::Status { status: r.status(), message: r.body_text() }
  }
}

impl From<QueryRejection> for ApiError {
  fn from(r: QueryRejection) -> Self {
    Self::Status { status: r.status(), message: r.body_text() }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }

    let body = Json(json!({ "success": false, "error": self.to_string() }));
    (status, body).into_response()
  }
}
