//! Session tokens: short-lived bearer credentials bound to one identity.
//!
//! A token is never mutated. It dies by TTL expiry or by being superseded when
//! a new token is issued for the same owner.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, SubsecRound as _, Utc};
use rand_core::{OsRng, RngCore as _};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of a session token, in seconds.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

/// Bytes of OS randomness behind every token value.
const TOKEN_ENTROPY_BYTES: usize = 32;

pub fn token_ttl() -> Duration { Duration::seconds(TOKEN_TTL_SECS) }

/// An issued bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
  /// URL-safe base64 of 32 random bytes.
  pub value:     String,
  pub owner:     Uuid,
  pub issued_at: DateTime<Utc>,
}

impl SessionToken {
  /// Mint a fresh token for `owner`, stamped with the current time.
  ///
  /// `issued_at` is truncated to microseconds, the precision stores keep.
  pub fn mint(owner: Uuid) -> Self {
    Self {
      value: generate_token_value(),
      owner,
      issued_at: Utc::now().trunc_subsecs(6),
    }
  }

  pub fn expires_at(&self) -> DateTime<Utc> { self.issued_at + token_ttl() }

  /// Whether the token is still inside its live window at `now`.
  pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
    now < self.expires_at()
  }
}

/// Generate an unguessable token value.
pub fn generate_token_value() -> String {
  let mut buf = [0u8; TOKEN_ENTROPY_BYTES];
  OsRng.fill_bytes(&mut buf);
  URL_SAFE_NO_PAD.encode(buf)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn token_values_are_url_safe_and_unique() {
    let a = generate_token_value();
    let b = generate_token_value();
    assert_ne!(a, b);
    // 32 bytes -> 43 base64 characters without padding.
    assert_eq!(a.len(), 43);
    assert!(
      a.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    );
  }

  #[test]
  fn live_window_is_exactly_one_hour() {
    let token = SessionToken::mint(Uuid::new_v4());
    let issued = token.issued_at;

    assert_eq!(token.expires_at() - issued, Duration::hours(1));
    assert!(token.is_live_at(issued));
    assert!(token.is_live_at(issued + Duration::minutes(59)));
    assert!(!token.is_live_at(issued + Duration::hours(1)));
    assert!(!token.is_live_at(issued + Duration::minutes(61)));
  }
}
