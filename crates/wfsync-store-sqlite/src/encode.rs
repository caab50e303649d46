//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings (microsecond
//! precision, `Z` suffix) so that lexical order equals chronological order.
//! Documents and nametags are stored as compact JSON. UUIDs are stored as
//! hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;
use wfsync_core::{
  document::ConfigDocument,
  token::SessionToken,
  user::{ContributorNametag, UserRecord},
};

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── JSON columns ─────────────────────────────────────────────────────────────

pub fn encode_config(doc: &ConfigDocument) -> Result<String> {
  Ok(serde_json::to_string(doc)?)
}

pub fn encode_nametag(tag: &ContributorNametag) -> Result<String> {
  Ok(serde_json::to_string(tag)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `auth_tokens` row.
pub struct RawToken {
  pub token:     String,
  pub owner:     String,
  pub issued_at: String,
}

impl RawToken {
  pub fn into_token(self) -> Result<SessionToken> {
    Ok(SessionToken {
      value:     self.token,
      owner:     decode_uuid(&self.owner)?,
      issued_at: decode_dt(&self.issued_at)?,
    })
  }
}

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub uuid:         String,
  pub config_json:  Option<String>,
  pub nametag_json: Option<String>,
}

impl RawUser {
  pub fn into_record(self) -> Result<UserRecord> {
    let config = self
      .config_json
      .as_deref()
      .map(serde_json::from_str::<ConfigDocument>)
      .transpose()?;

    let nametag = self
      .nametag_json
      .as_deref()
      .map(serde_json::from_str::<ContributorNametag>)
      .transpose()?;

    Ok(UserRecord {
      uuid: decode_uuid(&self.uuid)?,
      config,
      nametag,
    })
  }
}
