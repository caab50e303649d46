//! `GET /auth`: trade a session-server join for a bearer token.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wfsync_core::auth::IdentityValidator;

use crate::{ApiError, AppState, Backend, extract::ApiQuery};

#[derive(Debug, Deserialize)]
pub struct SessionParams {
  #[serde(rename = "serverId")]
  pub server_id: String,
  pub username:  String,
}

#[derive(Debug, Serialize)]
pub struct IssuedToken {
  pub success: bool,
  pub token:   String,
  pub account: Uuid,
  pub expires: DateTime<Utc>,
}

pub async fn issue_token<S, V>(
  State(state): State<AppState<S, V>>,
  ApiQuery(params): ApiQuery<SessionParams>,
) -> Result<Json<IssuedToken>, ApiError>
where
  S: Backend,
  V: IdentityValidator + 'static,
{
  let token = state.auth.login(&params.username, &params.server_id).await?;
  Ok(Json(IssuedToken {
    success: true,
    expires: token.expires_at(),
    account: token.owner,
    token:   token.value,
  }))
}
