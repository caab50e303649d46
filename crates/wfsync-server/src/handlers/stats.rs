//! Informational routes.

use axum::{Json, extract::State, response::Redirect};
use chrono::{DateTime, Utc};
use serde::Serialize;
use wfsync_core::auth::IdentityValidator;

use crate::{ApiError, AppState, Backend};

#[derive(Debug, Serialize)]
pub struct Stats {
  pub synced_users: u64,
  pub timestamp:    DateTime<Utc>,
}

pub async fn stats<S, V>(
  State(state): State<AppState<S, V>>,
) -> Result<Json<Stats>, ApiError>
where
  S: Backend,
  V: IdentityValidator + 'static,
{
  let synced_users = state.configs.count_synced().await?;
  Ok(Json(Stats { synced_users, timestamp: Utc::now() }))
}

/// `GET /` sends browsers to the project page.
pub async fn home<S, V>(State(state): State<AppState<S, V>>) -> Redirect
where
  S: Backend,
  V: IdentityValidator + 'static,
{
  Redirect::temporary(&state.config.homepage_url)
}
