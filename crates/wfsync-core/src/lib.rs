//! Core types, store traits and services for the wfsync config server.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! storage backend (`wfsync-store-sqlite`), the session-server client
//! (`wfsync-mojang`) and the HTTP layer (`wfsync-server`) all depend on it.

pub mod auth;
pub mod configs;
pub mod document;
pub mod error;
pub mod nametags;
pub mod store;
pub mod token;
pub mod user;

pub use error::{AuthorityFailure, Error, ErrorKind, Result};
