//! Error types for `wfsync-core`.
//!
//! Every failure a request can run into is a variant here. Each carries a
//! machine-readable [`ErrorKind`] and a suggested HTTP status so the boundary
//! layer can branch on data instead of matching on messages.

use thiserror::Error;
use uuid::Uuid;

/// Why the external session authority could not give an answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorityFailure {
  #[error("session servers returned an unexpected response status {0}")]
  Status(u16),

  #[error("timed out waiting for the session servers")]
  Timeout,

  #[error("couldn't reach the session servers: {0}")]
  Transport(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  AuthenticationRequired,
  InvalidOrExpiredToken,
  InvalidIdentity,
  AuthorityUnavailable,
  IdentityMismatch,
  Validation,
  NotFound,
  Unauthorized,
  StorageUnavailable,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("an authentication token or Mojang authentication is required")]
  AuthenticationRequired,

  #[error("the provided auth token is invalid or has expired")]
  InvalidOrExpiredToken,

  #[error(
    "couldn't authenticate against the session servers; did you forget to \
     send a join server request?"
  )]
  InvalidIdentity,

  #[error(transparent)]
  AuthorityUnavailable(AuthorityFailure),

  #[error("the provided authentication is not valid for {requested}")]
  IdentityMismatch { authenticated: Uuid, requested: Uuid },

  #[error("{0}")]
  Validation(String),

  #[error("no such user exists: {0}")]
  NotFound(Uuid),

  #[error("unauthorized")]
  Unauthorized,

  #[error("storage unavailable: {0}")]
  StorageUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error as [`Error::StorageUnavailable`].
  pub fn storage<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::StorageUnavailable(Box::new(e))
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::AuthenticationRequired => ErrorKind::AuthenticationRequired,
      Self::InvalidOrExpiredToken => ErrorKind::InvalidOrExpiredToken,
      Self::InvalidIdentity => ErrorKind::InvalidIdentity,
      Self::AuthorityUnavailable(_) => ErrorKind::AuthorityUnavailable,
      Self::IdentityMismatch { .. } => ErrorKind::IdentityMismatch,
      Self::Validation(_) => ErrorKind::Validation,
      Self::NotFound(_) => ErrorKind::NotFound,
      Self::Unauthorized => ErrorKind::Unauthorized,
      Self::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
    }
  }

  /// The HTTP status this error should be reported with.
  pub fn status_code(&self) -> u16 {
    match self.kind() {
      ErrorKind::AuthenticationRequired | ErrorKind::Unauthorized => 401,
      ErrorKind::InvalidOrExpiredToken
      | ErrorKind::InvalidIdentity
      | ErrorKind::IdentityMismatch => 403,
      ErrorKind::Validation => 400,
      ErrorKind::NotFound => 404,
      ErrorKind::AuthorityUnavailable | ErrorKind::StorageUnavailable => 503,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_codes_follow_kind() {
    assert_eq!(Error::AuthenticationRequired.status_code(), 401);
    assert_eq!(Error::InvalidOrExpiredToken.status_code(), 403);
    assert_eq!(Error::InvalidIdentity.status_code(), 403);
    assert_eq!(Error::Unauthorized.status_code(), 401);
    assert_eq!(Error::NotFound(Uuid::nil()).status_code(), 404);
    assert_eq!(Error::Validation("x".into()).status_code(), 400);
    assert_eq!(
      Error::IdentityMismatch {
        authenticated: Uuid::nil(),
        requested:     Uuid::new_v4(),
      }
      .status_code(),
      403
    );
  }

  #[test]
  fn timeout_is_a_distinct_authority_cause() {
    let timeout = Error::AuthorityUnavailable(AuthorityFailure::Timeout);
    let status = Error::AuthorityUnavailable(AuthorityFailure::Status(500));

    assert_eq!(timeout.kind(), ErrorKind::AuthorityUnavailable);
    assert_eq!(status.kind(), ErrorKind::AuthorityUnavailable);
    assert_eq!(timeout.status_code(), 503);
    assert_ne!(timeout.to_string(), status.to_string());
  }

  #[test]
  fn storage_wraps_backend_errors() {
    let io = std::io::Error::other("disk on fire");
    let err = Error::storage(io);
    assert_eq!(err.kind(), ErrorKind::StorageUnavailable);
    assert!(err.to_string().contains("disk on fire"));
  }
}
