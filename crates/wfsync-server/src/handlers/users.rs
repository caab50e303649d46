//! Config document routes: single read, bulk read, replace and delete.

use std::collections::{BTreeMap, BTreeSet};

use axum::{
  Json,
  extract::State,
  http::HeaderMap,
};
use serde::Serialize;
use uuid::Uuid;
use wfsync_core::{auth::IdentityValidator, document::ConfigDocument};

use crate::{
  ApiError, AppState, Backend,
  auth::{Authenticated, credentials, issued_headers},
  extract::{ApiJson, ApiPath},
  handlers::Success,
};

#[derive(Debug, Serialize)]
pub struct BulkQuery {
  pub success: bool,
  pub users:   BTreeMap<Uuid, ConfigDocument>,
}

pub async fn get_config<S, V>(
  State(state): State<AppState<S, V>>,
  ApiPath(uuid): ApiPath<Uuid>,
) -> Result<Json<ConfigDocument>, ApiError>
where
  S: Backend,
  V: IdentityValidator + 'static,
{
  let document = state
    .configs
    .get(uuid)
    .await?
    .ok_or(wfsync_core::Error::NotFound(uuid))?;
  Ok(Json(document))
}

/// `POST /bulk-query` with a JSON array of identities. Duplicates collapse;
/// identities without a config are left out of the response.
pub async fn bulk_query<S, V>(
  State(state): State<AppState<S, V>>,
  ApiJson(uuids): ApiJson<BTreeSet<Uuid>>,
) -> Result<Json<BulkQuery>, ApiError>
where
  S: Backend,
  V: IdentityValidator + 'static,
{
  let users = state.configs.get_many(&uuids).await?;
  Ok(Json(BulkQuery { success: true, users }))
}

/// Credentials are resolved only once the body has parsed: a rejected body
/// must not rotate the caller's token.
pub async fn update_config<S, V>(
  State(state): State<AppState<S, V>>,
  ApiPath(uuid): ApiPath<Uuid>,
  headers: HeaderMap,
  ApiJson(document): ApiJson<ConfigDocument>,
) -> Result<(HeaderMap, Json<Success>), ApiError>
where
  S: Backend,
  V: IdentityValidator + 'static,
{
  let auth = state.auth.authenticate(&credentials(&headers)).await?;
  auth.ensure_owner(uuid)?;
  state.configs.replace(uuid, document).await?;
  Ok((issued_headers(&auth), Json(Success::ok())))
}

pub async fn delete_config<S, V>(
  State(state): State<AppState<S, V>>,
  ApiPath(uuid): ApiPath<Uuid>,
  Authenticated(auth): Authenticated,
) -> Result<(HeaderMap, Json<Success>), ApiError>
where
  S: Backend,
  V: IdentityValidator + 'static,
{
  auth.ensure_owner(uuid)?;
  state.configs.delete(uuid).await?;
  Ok((issued_headers(&auth), Json(Success::ok())))
}
