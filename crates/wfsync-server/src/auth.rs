//! Credential extraction from request headers.
//!
//! Clients authenticate with either a previously issued `Auth-Token`, or a
//! `Moj-Auth-Username` + `Moj-Auth-Server` pair that is checked against the
//! session servers. The admin secret for nametag routes also travels in
//! `Auth-Token`.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, HeaderName, HeaderValue, request::Parts},
};
use wfsync_core::auth::{Authentication, Credentials, IdentityValidator};

use crate::{ApiError, AppState, Backend};

pub const AUTH_TOKEN: HeaderName = HeaderName::from_static("auth-token");
pub const AUTH_EXPIRES: HeaderName = HeaderName::from_static("auth-expires");
pub const MOJ_AUTH_USERNAME: HeaderName =
  HeaderName::from_static("moj-auth-username");
pub const MOJ_AUTH_SERVER: HeaderName =
  HeaderName::from_static("moj-auth-server");

/// `Auth-Expires` format, matching Java's `ISO_INSTANT` at second precision.
const EXPIRES_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

fn header_str<'h>(headers: &'h HeaderMap, name: &HeaderName) -> Option<&'h str> {
  headers.get(name).and_then(|v| v.to_str().ok())
}

/// Collect whatever credentials the request carried.
pub fn credentials(headers: &HeaderMap) -> Credentials {
  Credentials {
    token:     header_str(headers, &AUTH_TOKEN).map(str::to_owned),
    username:  header_str(headers, &MOJ_AUTH_USERNAME).map(str::to_owned),
    server_id: header_str(headers, &MOJ_AUTH_SERVER).map(str::to_owned),
  }
}

/// The `Auth-Token` header, if present and non-empty.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  header_str(headers, &AUTH_TOKEN).filter(|t| !t.is_empty())
}

/// The admin secret presented on a nametag route, if any.
pub fn admin_credential(headers: &HeaderMap) -> Option<&str> {
  header_str(headers, &AUTH_TOKEN)
}

/// Response headers announcing a token minted during this request.
///
/// Empty when the request authenticated with an existing token.
pub fn issued_headers(auth: &Authentication) -> HeaderMap {
  let mut headers = HeaderMap::new();
  if !auth.issued {
    return headers;
  }

  let expires = auth.token.expires_at().format(EXPIRES_FORMAT).to_string();
  if let (Ok(token), Ok(expires)) = (
    HeaderValue::from_str(&auth.token.value),
    HeaderValue::from_str(&expires),
  ) {
    headers.insert(AUTH_TOKEN, token);
    headers.insert(AUTH_EXPIRES, expires);
  }
  headers
}

/// Present in a handler means the request carried valid credentials.
pub struct Authenticated(pub Authentication);

impl<S, V> FromRequestParts<AppState<S, V>> for Authenticated
where
  S: Backend,
  V: IdentityValidator + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, V>,
  ) -> Result<Self, Self::Rejection> {
    let auth = state.auth.authenticate(&credentials(&parts.headers)).await?;
    Ok(Authenticated(auth))
  }
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use uuid::Uuid;
  use wfsync_core::token::SessionToken;

  use super::*;

  fn authentication(issued: bool) -> Authentication {
    Authentication {
      token: SessionToken {
        value:     "dGVzdC10b2tlbg".into(),
        owner:     Uuid::new_v4(),
        issued_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
      },
      issued,
    }
  }

  #[test]
  fn reads_all_credential_headers() {
    let mut headers = HeaderMap::new();
    headers.insert(AUTH_TOKEN, HeaderValue::from_static("tok"));
    headers.insert(MOJ_AUTH_USERNAME, HeaderValue::from_static("Steve"));
    headers.insert(MOJ_AUTH_SERVER, HeaderValue::from_static("abc"));

    let creds = credentials(&headers);
    assert_eq!(creds.token.as_deref(), Some("tok"));
    assert_eq!(creds.username.as_deref(), Some("Steve"));
    assert_eq!(creds.server_id.as_deref(), Some("abc"));
    assert_eq!(admin_credential(&headers), Some("tok"));
    assert_eq!(bearer_token(&headers), Some("tok"));
  }

  #[test]
  fn missing_headers_are_absent() {
    let creds = credentials(&HeaderMap::new());
    assert!(creds.token.is_none());
    assert!(creds.username.is_none());
    assert!(creds.server_id.is_none());

    let mut headers = HeaderMap::new();
    headers.insert(AUTH_TOKEN, HeaderValue::from_static(""));
    assert_eq!(bearer_token(&headers), None);
  }

  #[test]
  fn fresh_tokens_are_announced() {
    let headers = issued_headers(&authentication(true));
    assert_eq!(headers.get(AUTH_TOKEN).unwrap(), "dGVzdC10b2tlbg");
    assert_eq!(headers.get(AUTH_EXPIRES).unwrap(), "2025-03-01T13:00:00Z");
  }

  #[test]
  fn reused_tokens_are_not_announced() {
    assert!(issued_headers(&authentication(false)).is_empty());
  }
}
