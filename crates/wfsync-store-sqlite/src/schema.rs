//! SQL schema for the wfsync SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Session tokens. Rows older than the token TTL are dead: they are filtered
-- out of every read and purged whenever a new token is inserted.
CREATE TABLE IF NOT EXISTS auth_tokens (
    token      TEXT PRIMARY KEY,
    owner      TEXT NOT NULL,
    issued_at  TEXT NOT NULL       -- fixed-width RFC 3339 UTC; sorts lexically
);

CREATE INDEX IF NOT EXISTS auth_tokens_owner_idx  ON auth_tokens(owner);
CREATE INDEX IF NOT EXISTS auth_tokens_issued_idx ON auth_tokens(issued_at);

-- One row per identity. A NULL config_json with a non-NULL nametag_json is a
-- tombstone kept alive by its nametag.
CREATE TABLE IF NOT EXISTS users (
    uuid          TEXT PRIMARY KEY,
    config_json   TEXT,
    nametag_json  TEXT
);

CREATE INDEX IF NOT EXISTS users_nametag_idx ON users(nametag_json)
    WHERE nametag_json IS NOT NULL;

PRAGMA user_version = 1;
";
