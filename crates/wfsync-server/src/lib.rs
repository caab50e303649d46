//! HTTP layer for the wfsync config server.
//!
//! Exposes an axum [`Router`] over the core services, backed by any store
//! implementing both [`TokenStore`] and [`UserStore`].

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
  Router,
  error_handling::HandleErrorLayer,
  routing::{get, post, put},
};
use serde::Deserialize;
use tower::{ServiceBuilder, timeout::TimeoutLayer};
use tower_http::trace::TraceLayer;
use wfsync_core::{
  auth::{Authenticator, IdentityValidator},
  configs::ConfigStore,
  nametags::{AdminSecret, ContributorNametags},
  store::{TokenStore, UserStore},
};
use wfsync_mojang::DEFAULT_SESSION_SERVER_URL;

use handlers::{contributors, legacy, session, stats, users};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `WFSYNC_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                 String,
  #[serde(default = "default_port")]
  pub port:                 u16,
  #[serde(default = "default_store_path")]
  pub store_path:           PathBuf,
  /// Shared secret gating nametag writes.
  pub admin_token:          String,
  #[serde(default = "default_session_server_url")]
  pub session_server_url:   String,
  #[serde(default = "default_auth_timeout_secs")]
  pub auth_timeout_secs:    u64,
  #[serde(default = "default_request_timeout_secs")]
  pub request_timeout_secs: u64,
  #[serde(default)]
  pub silence_access_logs:  bool,
  #[serde(default = "default_homepage_url")]
  pub homepage_url:         String,
}

impl ServerConfig {
  /// A configuration with every optional key at its default.
  pub fn new(admin_token: impl Into<String>) -> Self {
    Self {
      host:                 default_host(),
      port:                 default_port(),
      store_path:           default_store_path(),
      admin_token:          admin_token.into(),
      session_server_url:   default_session_server_url(),
      auth_timeout_secs:    default_auth_timeout_secs(),
      request_timeout_secs: default_request_timeout_secs(),
      silence_access_logs:  false,
      homepage_url:         default_homepage_url(),
    }
  }

  pub fn auth_timeout(&self) -> Duration {
    Duration::from_secs(self.auth_timeout_secs)
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.request_timeout_secs)
  }
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 8000 }
fn default_store_path() -> PathBuf { PathBuf::from("wfsync.sqlite3") }
fn default_session_server_url() -> String { DEFAULT_SESSION_SERVER_URL.into() }
fn default_auth_timeout_secs() -> u64 { 4 }
fn default_request_timeout_secs() -> u64 { 10 }
fn default_homepage_url() -> String {
  "https://modrinth.com/mod/female-gender".into()
}

// ─── Application state ────────────────────────────────────────────────────────

/// Everything a wfsync backend must provide.
pub trait Backend: TokenStore + UserStore + 'static {}

impl<T: TokenStore + UserStore + 'static> Backend for T {}

/// Shared state threaded through all axum handlers.
pub struct AppState<S, V> {
  pub configs:      ConfigStore<S>,
  pub contributors: Arc<ContributorNametags<S>>,
  pub auth:         Arc<Authenticator<S, V>>,
  pub config:       Arc<ServerConfig>,
}

impl<S, V> Clone for AppState<S, V> {
  fn clone(&self) -> Self {
    Self {
      configs:      self.configs.clone(),
      contributors: self.contributors.clone(),
      auth:         self.auth.clone(),
      config:       self.config.clone(),
    }
  }
}

impl<S, V> AppState<S, V>
where
  S: Backend,
  V: IdentityValidator + 'static,
{
  pub fn new(store: Arc<S>, validator: V, config: ServerConfig) -> Self {
    let admin = AdminSecret::new(config.admin_token.clone());
    Self {
      configs:      ConfigStore::new(store.clone()),
      contributors: Arc::new(ContributorNametags::new(store.clone(), admin)),
      auth:         Arc::new(Authenticator::new(store, validator)),
      config:       Arc::new(config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

fn api_routes<S, V>() -> Router<AppState<S, V>>
where
  S: Backend,
  V: IdentityValidator + 'static,
{
  Router::new()
    .route(
      "/user/{uuid}",
      get(users::get_config::<S, V>)
        .put(users::update_config::<S, V>)
        .delete(users::delete_config::<S, V>),
    )
    .route("/bulk-query",         post(users::bulk_query::<S, V>))
    .route("/auth",               get(session::issue_token::<S, V>))
    .route("/contributors",       get(contributors::list::<S, V>))
    .route(
      "/contributors/{uuid}",
      put(contributors::set::<S, V>).delete(contributors::clear::<S, V>),
    )
    .route("/stats",              get(stats::stats::<S, V>))
}

/// The pre-`/v2` surface under `prefix`. The bulk query at `{prefix}/` is
/// registered by the caller, since the root shares that path with `home`.
fn legacy_routes<S, V>(prefix: &str) -> Router<AppState<S, V>>
where
  S: Backend,
  V: IdentityValidator + 'static,
{
  Router::new().route(
    &format!("{prefix}/{{uuid}}"),
    get(users::get_config::<S, V>).put(legacy::update_config::<S, V>),
  )
}

/// Build the axum [`Router`] for the config server.
///
/// Every API route is served both at the root and under `/v2`. The legacy
/// routes are served at the root and under `/v1`.
pub fn router<S, V>(state: AppState<S, V>) -> Router
where
  S: Backend,
  V: IdentityValidator + 'static,
{
  let api = api_routes::<S, V>();
  let silence = state.config.silence_access_logs;
  let timeout = state.config.request_timeout();

  let v1 = legacy_routes::<S, V>("/v1")
    .route("/v1/",             post(users::bulk_query::<S, V>))
    .route("/v1/auth",         get(session::issue_token::<S, V>))
    .route("/v1/contributors", get(contributors::list::<S, V>));

  let mut app = Router::new()
    .route(
      "/",
      get(stats::home::<S, V>).post(users::bulk_query::<S, V>),
    )
    .merge(api.clone())
    .merge(legacy_routes::<S, V>(""))
    .merge(v1)
    .nest("/v2", api)
    .layer(
      ServiceBuilder::new()
        .layer(HandleErrorLayer::new(error::handle_middleware_error))
        .layer(TimeoutLayer::new(timeout)),
    );

  if !silence {
    app = app.layer(TraceLayer::new_for_http());
  }

  app.with_state(state)
}
