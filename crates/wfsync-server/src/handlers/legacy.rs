//! Routes kept for older mod releases, served at the root and under `/v1`.
//!
//! Reads and bulk queries behave like their current counterparts. Writes
//! accept only a previously issued `Auth-Token`; there is no inline session
//! login and no delete.

use axum::{Json, extract::State, http::{HeaderMap, StatusCode}};
use uuid::Uuid;
use wfsync_core::{Error, auth::IdentityValidator, document::ConfigDocument};

use crate::{
  ApiError, AppState, Backend,
  auth::bearer_token,
  extract::{ApiJson, ApiPath},
  handlers::Success,
};

fn invalid_token() -> ApiError {
  ApiError::Status {
    status:  StatusCode::UNAUTHORIZED,
    message: "authentication is invalid or has expired".into(),
  }
}

pub async fn update_config<S, V>(
  State(state): State<AppState<S, V>>,
  ApiPath(uuid): ApiPath<Uuid>,
  headers: HeaderMap,
  ApiJson(document): ApiJson<ConfigDocument>,
) -> Result<Json<Success>, ApiError>
where
  S: Backend,
  V: IdentityValidator + 'static,
{
  let value = bearer_token(&headers).ok_or_else(invalid_token)?;
  let token = state.auth.lookup(value).await.map_err(|e| match e {
    Error::InvalidOrExpiredToken => invalid_token(),
    other => other.into(),
  })?;

  if token.owner != uuid {
    return Err(
      Error::IdentityMismatch { authenticated: token.owner, requested: uuid }
        .into(),
    );
  }

  state.configs.replace(uuid, document).await?;
  Ok(Json(Success::ok()))
}
