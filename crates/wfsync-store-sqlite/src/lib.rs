//! SQLite backend for the wfsync config server.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Implements both
//! [`TokenStore`](wfsync_core::store::TokenStore) and
//! [`UserStore`](wfsync_core::store::UserStore).

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
