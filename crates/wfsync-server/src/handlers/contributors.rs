//! Contributor nametag routes. Writes require the admin secret in
//! `Auth-Token`.

use std::collections::BTreeMap;

use axum::{Json, extract::State, http::HeaderMap};
use uuid::Uuid;
use wfsync_core::{auth::IdentityValidator, user::ContributorNametag};

use crate::{
  ApiError, AppState, Backend,
  auth::admin_credential,
  extract::{ApiJson, ApiPath},
  handlers::Success,
};

pub async fn list<S, V>(
  State(state): State<AppState<S, V>>,
) -> Result<Json<BTreeMap<Uuid, ContributorNametag>>, ApiError>
where
  S: Backend,
  V: IdentityValidator + 'static,
{
  Ok(Json(state.contributors.list_all().await?))
}

pub async fn set<S, V>(
  State(state): State<AppState<S, V>>,
  ApiPath(uuid): ApiPath<Uuid>,
  headers: HeaderMap,
  ApiJson(nametag): ApiJson<ContributorNametag>,
) -> Result<Json<Success>, ApiError>
where
  S: Backend,
  V: IdentityValidator + 'static,
{
  state
    .contributors
    .set(admin_credential(&headers), uuid, nametag)
    .await?;
  Ok(Json(Success::ok()))
}

pub async fn clear<S, V>(
  State(state): State<AppState<S, V>>,
  ApiPath(uuid): ApiPath<Uuid>,
  headers: HeaderMap,
) -> Result<Json<Success>, ApiError>
where
  S: Backend,
  V: IdentityValidator + 'static,
{
  state
    .contributors
    .clear(admin_credential(&headers), uuid)
    .await?;
  Ok(Json(Success::ok()))
}
