//! Error types for the release server

use axum::{
  extract::{multipart::MultipartError, rejection::JsonRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("Database error: {0}")]
  Database(#[from] sea_orm::DbErr),

  #[error("Release not found")]
  ReleaseNotFound,

  #[error("No releases found")]
  NoReleases,

  #[error("Invalid ID")]
  InvalidId,

  #[error("{0}")]
  Validation(String),

  #[error("Malformed request: {0}")]
  Malformed(String),

  #[error("No file uploaded")]
  MissingUpload,

  #[error("{message}")]
  Upload { status: StatusCode, message: String },

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Internal error: {0}")]
  Internal(String),
}

impl Error {
  pub fn validation(message: impl Into<String>) -> Self {
    Self::Validation(message.into())
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Error::ReleaseNotFound | Error::NoReleases => StatusCode::NOT_FOUND,
      Error::InvalidId
      | Error::Validation(_)
      | Error::Malformed(_)
      | Error::MissingUpload => StatusCode::BAD_REQUEST,
      Error::Upload { status, .. } => *status,
      Error::Database(_) | Error::Io(_) | Error::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  /// Recovers a multipart failure that surfaced as an IO error while
  /// streaming a field to disk.
  pub fn into_upload_cause(self) -> Self {
    let Error::Io(err) = self else { return self };

    if !err.get_ref().is_some_and(|inner| inner.is::<MultipartError>()) {
      return Error::Io(err);
    }

    match err.into_inner().map(|inner| inner.downcast::<MultipartError>()) {
      Some(Ok(cause)) => (*cause).into(),
      _ => Error::Internal(String::from("upload stream failed")),
    }
  }
}

impl From<JsonRejection> for Error {
  fn from(rejection: JsonRejection) -> Self {
    Self::Malformed(rejection.body_text())
  }
}

impl From<MultipartError> for Error {
  fn from(err: MultipartError) -> Self {
    Self::Upload { status: err.status(), message: err.body_text() }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status();

    let message = if status.is_server_error() {
      error!("Request failed: {self}");
      String::from("Internal server error")
    } else {
      self.to_string()
    };

    let body = json::json!({ "message": message });
    (status, axum::Json(body)).into_response()
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  async fn body_of(err: Error) -> (StatusCode, json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes =
      axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, json::from_slice(&bytes).unwrap())
  }

  #[tokio::test]
  async fn test_not_found_message() {
    let (status, body) = body_of(Error::ReleaseNotFound).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Release not found");
  }

  #[tokio::test]
  async fn test_internal_details_hidden() {
    let err = Error::Internal("disk on fire".into());
    let (status, body) = body_of(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal server error");
  }

  #[test]
  fn test_plain_io_stays_io() {
    let err = Error::Io(std::io::Error::other("disk full")).into_upload_cause();
    assert!(matches!(err, Error::Io(_)));

    let err = Error::ReleaseNotFound.into_upload_cause();
    assert!(matches!(err, Error::ReleaseNotFound));
  }

  #[tokio::test]
  async fn test_validation_is_bad_request() {
    let (status, body) =
      body_of(Error::validation("`title` must not be empty")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "`title` must not be empty");
  }
}
