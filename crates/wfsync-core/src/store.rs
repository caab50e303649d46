//! Storage capability traits.
//!
//! Implemented by storage backends (e.g. `wfsync-store-sqlite`). The services
//! in this crate hold the consistency rules; the traits only describe keyed
//! reads and writes, so no backend query syntax leaks upward.

use std::future::Future;

use uuid::Uuid;

use crate::{
  document::ConfigDocument,
  token::SessionToken,
  user::{ContributorNametag, UserRecord},
};

// ─── Tokens ──────────────────────────────────────────────────────────────────

/// Keyed store of session tokens.
///
/// Implementations enforce the token TTL: a token whose live window has
/// passed must never be returned, whether or not it has been physically
/// removed yet.
pub trait TokenStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Look up a live token by its value.
  fn find_token<'a>(
    &'a self,
    value: &'a str,
  ) -> impl Future<Output = Result<Option<SessionToken>, Self::Error>> + Send + 'a;

  /// All live tokens owned by `owner`.
  fn tokens_for(
    &self,
    owner: Uuid,
  ) -> impl Future<Output = Result<Vec<SessionToken>, Self::Error>> + Send + '_;

  /// Remove every token owned by `owner`, live or not. Returns the number of
  /// tokens removed.
  fn delete_tokens_for(
    &self,
    owner: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Persist a new token. Token values are unique.
  fn insert_token<'a>(
    &'a self,
    token: &'a SessionToken,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

// ─── Users ───────────────────────────────────────────────────────────────────

/// Keyed store of [`UserRecord`]s.
pub trait UserStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Retrieve a record by identity. Returns `None` if not found.
  fn get_user(
    &self,
    uuid: Uuid,
  ) -> impl Future<Output = Result<Option<UserRecord>, Self::Error>> + Send + '_;

  /// Retrieve every existing record among `uuids`; unknown ids are skipped.
  fn get_users<'a>(
    &'a self,
    uuids: &'a [Uuid],
  ) -> impl Future<Output = Result<Vec<UserRecord>, Self::Error>> + Send + 'a;

  /// Insert `record` unless a record with the same identity already exists,
  /// then return whichever record is now stored.
  fn create_user<'a>(
    &'a self,
    record: &'a UserRecord,
  ) -> impl Future<Output = Result<UserRecord, Self::Error>> + Send + 'a;

  /// Replace only the config field. Returns `false` if no record exists.
  fn set_config<'a>(
    &'a self,
    uuid: Uuid,
    config: Option<&'a ConfigDocument>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Replace only the nametag field. Returns `false` if no record exists.
  fn set_nametag<'a>(
    &'a self,
    uuid: Uuid,
    nametag: Option<&'a ContributorNametag>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Physically remove a record. Returns `false` if no record existed.
  fn delete_user(
    &self,
    uuid: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Every record that carries a nametag.
  fn list_nametags(
    &self,
  ) -> impl Future<Output = Result<Vec<(Uuid, ContributorNametag)>, Self::Error>>
  + Send
  + '_;

  /// Number of records with a live (non-tombstoned) config.
  fn count_synced(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
