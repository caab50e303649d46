//! Identity validation against the Mojang session servers.
//!
//! A client that wants to prove it controls an account first sends a "join
//! server" request to Mojang with a server transaction id, then hands us the
//! username and that id. Asking `hasJoined` with the same pair returns the
//! account's profile only if the join really happened.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use uuid::Uuid;
use wfsync_core::{
  AuthorityFailure, Error, Result, auth::IdentityValidator,
};

pub const DEFAULT_SESSION_SERVER_URL: &str =
  "https://sessionserver.mojang.com/session/minecraft/hasJoined";

/// Build the shared outbound client used for session-server calls.
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
  Client::builder().timeout(timeout).build()
}

/// Subset of the `hasJoined` profile response we care about.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HasJoined {
  id:    Option<String>,
  error: Option<serde_json::Value>,
}

/// [`IdentityValidator`] backed by a session-server `hasJoined` endpoint.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based. The client
/// is injected so its lifetime (and timeout) belong to the caller.
#[derive(Clone)]
pub struct SessionServerValidator {
  client: Client,
  url:    String,
}

impl SessionServerValidator {
  pub fn new(client: Client, url: impl Into<String>) -> Self {
    Self { client, url: url.into() }
  }

  async fn has_joined(&self, username: &str, server_id: &str) -> Result<Uuid> {
    let resp = self
      .client
      .get(&self.url)
      .query(&[("username", username), ("serverId", server_id)])
      .send()
      .await
      .map_err(authority_error)?;

    let status = resp.status();
    if status.is_client_error() || status.is_server_error() {
      tracing::warn!(%status, "session servers returned an error status");
      return Err(Error::AuthorityUnavailable(AuthorityFailure::Status(
        status.as_u16(),
      )));
    }

    let body = resp.bytes().await.map_err(authority_error)?;
    let profile: HasJoined =
      serde_json::from_slice(&body).map_err(|_| Error::InvalidIdentity)?;

    if profile.error.is_some() {
      return Err(Error::InvalidIdentity);
    }
    profile
      .id
      .as_deref()
      .and_then(|id| Uuid::parse_str(id).ok())
      .ok_or(Error::InvalidIdentity)
  }
}

impl IdentityValidator for SessionServerValidator {
  async fn validate(&self, username: &str, server_id: &str) -> Result<Uuid> {
    if username.is_empty() || server_id.is_empty() {
      return Err(Error::InvalidIdentity);
    }

    let id = self.has_joined(username, server_id).await?;
    tracing::debug!(username, %id, "session servers vouched for account");
    Ok(id)
  }
}

fn authority_error(e: reqwest::Error) -> Error {
  let cause = if e.is_timeout() {
    AuthorityFailure::Timeout
  } else {
    AuthorityFailure::Transport(e.to_string())
  };
  tracing::warn!(error = %cause, "session server request failed");
  Error::AuthorityUnavailable(cause)
}
