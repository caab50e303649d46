//! [`SqliteStore`], the SQLite implementation of [`TokenStore`] and
//! [`UserStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use wfsync_core::{
  document::ConfigDocument,
  store::{TokenStore, UserStore},
  token::{SessionToken, token_ttl},
  user::{ContributorNametag, UserRecord},
};

use crate::{
  Error, Result,
  encode::{
    RawToken, RawUser, decode_uuid, encode_config, encode_dt, encode_nametag,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A wfsync store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Tokens issued at or before this instant are expired.
fn live_cutoff() -> String { encode_dt(Utc::now() - token_ttl()) }

fn read_token(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawToken> {
  Ok(RawToken {
    token:     row.get(0)?,
    owner:     row.get(1)?,
    issued_at: row.get(2)?,
  })
}

fn read_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    uuid:         row.get(0)?,
    config_json:  row.get(1)?,
    nametag_json: row.get(2)?,
  })
}

// ─── TokenStore impl ─────────────────────────────────────────────────────────

impl TokenStore for SqliteStore {
  type Error = Error;

  async fn find_token(&self, value: &str) -> Result<Option<SessionToken>> {
    let value  = value.to_owned();
    let cutoff = live_cutoff();

    let raw: Option<RawToken> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT token, owner, issued_at FROM auth_tokens
             WHERE token = ?1 AND issued_at > ?2",
            rusqlite::params![value, cutoff],
            read_token,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawToken::into_token).transpose()
  }

  async fn tokens_for(&self, owner: Uuid) -> Result<Vec<SessionToken>> {
    let owner_str = encode_uuid(owner);
    let cutoff    = live_cutoff();

    let raws: Vec<RawToken> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT token, owner, issued_at FROM auth_tokens
           WHERE owner = ?1 AND issued_at > ?2
           ORDER BY issued_at DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str, cutoff], read_token)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawToken::into_token).collect()
  }

  async fn delete_tokens_for(&self, owner: Uuid) -> Result<u64> {
    let owner_str = encode_uuid(owner);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM auth_tokens WHERE owner = ?1",
          rusqlite::params![owner_str],
        )?)
      })
      .await?;

    Ok(removed as u64)
  }

  async fn insert_token(&self, token: &SessionToken) -> Result<()> {
    let value     = token.value.clone();
    let owner_str = encode_uuid(token.owner);
    let at_str    = encode_dt(token.issued_at);
    let cutoff    = live_cutoff();

    let purged = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let purged = tx.execute(
          "DELETE FROM auth_tokens WHERE issued_at <= ?1",
          rusqlite::params![cutoff],
        )?;
        tx.execute(
          "INSERT INTO auth_tokens (token, owner, issued_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![value, owner_str, at_str],
        )?;
        tx.commit()?;
        Ok(purged)
      })
      .await?;

    if purged > 0 {
      tracing::debug!(purged, "purged expired session tokens");
    }
    Ok(())
  }
}

// ─── UserStore impl ──────────────────────────────────────────────────────────

impl UserStore for SqliteStore {
  type Error = Error;

  async fn get_user(&self, uuid: Uuid) -> Result<Option<UserRecord>> {
    let id_str = encode_uuid(uuid);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT uuid, config_json, nametag_json FROM users WHERE uuid = ?1",
            rusqlite::params![id_str],
            read_user,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_record).transpose()
  }

  async fn get_users(&self, uuids: &[Uuid]) -> Result<Vec<UserRecord>> {
    if uuids.is_empty() {
      return Ok(Vec::new());
    }

    let ids: Vec<String> = uuids.iter().copied().map(encode_uuid).collect();
    let placeholders = (1..=ids.len())
      .map(|i| format!("?{i}"))
      .collect::<Vec<_>>()
      .join(", ");

    let raws: Vec<RawUser> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT uuid, config_json, nametag_json FROM users
           WHERE uuid IN ({placeholders})"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(ids.iter()), read_user)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_record).collect()
  }

  async fn create_user(&self, record: &UserRecord) -> Result<UserRecord> {
    let id_str      = encode_uuid(record.uuid);
    let config_str  = record.config.as_ref().map(encode_config).transpose()?;
    let nametag_str = record.nametag.as_ref().map(encode_nametag).transpose()?;

    let raw: RawUser = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO users (uuid, config_json, nametag_json) VALUES (?1, ?2, ?3)
           ON CONFLICT (uuid) DO NOTHING",
          rusqlite::params![id_str, config_str, nametag_str],
        )?;
        let stored = tx.query_row(
          "SELECT uuid, config_json, nametag_json FROM users WHERE uuid = ?1",
          rusqlite::params![id_str],
          read_user,
        )?;
        tx.commit()?;
        Ok(stored)
      })
      .await?;

    raw.into_record()
  }

  async fn set_config(
    &self,
    uuid:   Uuid,
    config: Option<&ConfigDocument>,
  ) -> Result<bool> {
    let id_str     = encode_uuid(uuid);
    let config_str = config.map(encode_config).transpose()?;

    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users SET config_json = ?2 WHERE uuid = ?1",
          rusqlite::params![id_str, config_str],
        )?)
      })
      .await?;

    Ok(updated > 0)
  }

  async fn set_nametag(
    &self,
    uuid:    Uuid,
    nametag: Option<&ContributorNametag>,
  ) -> Result<bool> {
    let id_str      = encode_uuid(uuid);
    let nametag_str = nametag.map(encode_nametag).transpose()?;

    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users SET nametag_json = ?2 WHERE uuid = ?1",
          rusqlite::params![id_str, nametag_str],
        )?)
      })
      .await?;

    Ok(updated > 0)
  }

  async fn delete_user(&self, uuid: Uuid) -> Result<bool> {
    let id_str = encode_uuid(uuid);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM users WHERE uuid = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(removed > 0)
  }

  async fn list_nametags(&self) -> Result<Vec<(Uuid, ContributorNametag)>> {
    let rows: Vec<(String, String)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT uuid, nametag_json FROM users WHERE nametag_json IS NOT NULL",
        )?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(id, json)| -> Result<(Uuid, ContributorNametag)> {
        Ok((decode_uuid(&id)?, serde_json::from_str(&json)?))
      })
      .collect()
  }

  async fn count_synced(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM users WHERE config_json IS NOT NULL",
          [],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count as u64)
  }
}
