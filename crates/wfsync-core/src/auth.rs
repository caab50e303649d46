//! Session authentication: identity validation, token issuance, and
//! credential resolution.
//!
//! A caller proves who they are in one of two ways:
//!
//! 1. presenting a previously issued [`SessionToken`], or
//! 2. presenting a username and server transaction id that the external
//!    session authority can vouch for, which mints a new token.
//!
//! A presented token always takes precedence over the username pair, even if
//! the token turns out to be invalid.

use std::{future::Future, sync::Arc};

use chrono::Utc;
use uuid::Uuid;

use crate::{Error, Result, store::TokenStore, token::SessionToken};

// ─── Identity validation ─────────────────────────────────────────────────────

/// An external authority that can confirm a username currently controls an
/// account, for a given server transaction id.
///
/// Implementations make a single call per invocation (no retries) and map
/// failures to [`Error::InvalidIdentity`] or [`Error::AuthorityUnavailable`].
pub trait IdentityValidator: Send + Sync {
  fn validate<'a>(
    &'a self,
    username: &'a str,
    server_id: &'a str,
  ) -> impl Future<Output = Result<Uuid>> + Send + 'a;
}

// ─── Issuance ────────────────────────────────────────────────────────────────

/// Mints exclusive session tokens.
///
/// Issuance deletes every token the owner already has before inserting the
/// new one. The two steps are not atomic: concurrent issuance for the same
/// owner may briefly leave two live tokens, but the most recently issued one
/// always authenticates.
pub struct TokenIssuer<T> {
  tokens: Arc<T>,
}

impl<T: TokenStore> TokenIssuer<T> {
  pub fn new(tokens: Arc<T>) -> Self { Self { tokens } }

  pub async fn issue(&self, owner: Uuid) -> Result<SessionToken> {
    let revoked = self
      .tokens
      .delete_tokens_for(owner)
      .await
      .map_err(Error::storage)?;

    let token = SessionToken::mint(owner);
    self
      .tokens
      .insert_token(&token)
      .await
      .map_err(Error::storage)?;

    tracing::info!(%owner, revoked, expires_at = %token.expires_at(), "issued session token");
    Ok(token)
  }
}

// ─── Credentials ─────────────────────────────────────────────────────────────

/// Whatever credentials a request carried. Empty strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
  pub token:     Option<String>,
  pub username:  Option<String>,
  pub server_id: Option<String>,
}

impl Credentials {
  pub fn with_token(token: impl Into<String>) -> Self {
    Self { token: Some(token.into()), ..Self::default() }
  }

  pub fn with_session(
    username: impl Into<String>,
    server_id: impl Into<String>,
  ) -> Self {
    Self {
      token:     None,
      username:  Some(username.into()),
      server_id: Some(server_id.into()),
    }
  }

  fn token(&self) -> Option<&str> { present(&self.token) }

  fn session(&self) -> Option<(&str, &str)> {
    Some((present(&self.username)?, present(&self.server_id)?))
  }
}

fn present(v: &Option<String>) -> Option<&str> {
  v.as_deref().filter(|s| !s.is_empty())
}

/// A successfully resolved credential.
#[derive(Debug, Clone)]
pub struct Authentication {
  pub token:  SessionToken,
  /// `true` if the token was minted while handling this request.
  pub issued: bool,
}

impl Authentication {
  pub fn owner(&self) -> Uuid { self.token.owner }

  /// Fail with [`Error::IdentityMismatch`] unless the token belongs to
  /// `target`.
  pub fn ensure_owner(&self, target: Uuid) -> Result<()> {
    if self.token.owner == target {
      Ok(())
    } else {
      Err(Error::IdentityMismatch {
        authenticated: self.token.owner,
        requested:     target,
      })
    }
  }
}

// ─── Authenticator ───────────────────────────────────────────────────────────

/// Resolves inbound credentials into a verified, identity-bound token.
pub struct Authenticator<T, V> {
  tokens:    Arc<T>,
  issuer:    TokenIssuer<T>,
  validator: V,
}

impl<T, V> Authenticator<T, V>
where
  T: TokenStore,
  V: IdentityValidator,
{
  pub fn new(tokens: Arc<T>, validator: V) -> Self {
    Self {
      issuer: TokenIssuer::new(tokens.clone()),
      tokens,
      validator,
    }
  }

  /// Resolve `credentials`:
  ///
  /// 1. a token, if present, is looked up and nothing else is considered;
  /// 2. otherwise a complete username/server-id pair is validated against
  ///    the session authority and a new token issued;
  /// 3. otherwise [`Error::AuthenticationRequired`].
  pub async fn authenticate(
    &self,
    credentials: &Credentials,
  ) -> Result<Authentication> {
    if let Some(value) = credentials.token() {
      let token = self.lookup(value).await?;
      return Ok(Authentication { token, issued: false });
    }

    match credentials.session() {
      Some((username, server_id)) => {
        let token = self.login(username, server_id).await?;
        Ok(Authentication { token, issued: true })
      }
      None => Err(Error::AuthenticationRequired),
    }
  }

  /// Validate a username/server-id pair and issue a token for the verified
  /// identity.
  pub async fn login(
    &self,
    username: &str,
    server_id: &str,
  ) -> Result<SessionToken> {
    let owner = self
      .validator
      .validate(username, server_id)
      .await
      .inspect_err(|e| tracing::debug!(username, error = %e, "session validation failed"))?;
    self.issuer.issue(owner).await
  }

  /// Find a live token by value.
  pub async fn lookup(&self, value: &str) -> Result<SessionToken> {
    self
      .tokens
      .find_token(value)
      .await
      .map_err(Error::storage)?
      .filter(|t| t.is_live_at(Utc::now()))
      .ok_or(Error::InvalidOrExpiredToken)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_credentials_count_as_absent() {
    let c = Credentials {
      token:     Some(String::new()),
      username:  Some("Steve".into()),
      server_id: Some(String::new()),
    };
    assert!(c.token().is_none());
    assert!(c.session().is_none());

    let c = Credentials::with_session("Steve", "abc");
    assert_eq!(c.session(), Some(("Steve", "abc")));
  }

  #[test]
  fn ensure_owner_rejects_other_identities() {
    let owner = Uuid::new_v4();
    let auth = Authentication {
      token:  SessionToken::mint(owner),
      issued: false,
    };
    assert!(auth.ensure_owner(owner).is_ok());

    let other = Uuid::new_v4();
    match auth.ensure_owner(other) {
      Err(Error::IdentityMismatch { authenticated, requested }) => {
        assert_eq!(authenticated, owner);
        assert_eq!(requested, other);
      }
      r => panic!("expected IdentityMismatch, got {r:?}"),
    }
  }
}
