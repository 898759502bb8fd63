use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use super::{CurrentUser, Payload};
use crate::{
  entity::{PassType, access_pass, license},
  prelude::*,
  state::AppState,
  sv::license::AccessMethod,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPassRes {
  pub has_access: bool,
  pub method: AccessMethod,
  pub is_active: bool,
  pub access_pass: Option<access_pass::Model>,
}

/// Pass status of the caller. Reports the latest pass even when it is no
/// longer active.
pub async fn access_pass(
  CurrentUser(session): CurrentUser,
  State(app): State<Arc<AppState>>,
) -> Result<Json<AccessPassRes>> {
  let sv = app.sv();
  let access = sv.license.check_access(&session.user_id, None).await?;
  let latest = sv.access_pass.latest(&session.user_id).await?;

  let now = Utc::now().naive_utc();
  Ok(Json(AccessPassRes {
    has_access: access.has_access,
    method: access.method,
    is_active: latest.as_ref().is_some_and(|pass| pass.is_active_at(now)),
    access_pass: latest,
  }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantPassReq {
  pub user_id: String,
  pub pass_type: PassType,
}

/// Admin grant of an access pass to `userId`. Purchases go through the
/// same service call.
pub async fn grant_access_pass(
  admin: CurrentUser,
  State(app): State<Arc<AppState>>,
  Payload(req): Payload<GrantPassReq>,
) -> Result<impl IntoResponse> {
  admin.require_admin()?;

  let sv = app.sv();
  let user = sv.user.by_id(&req.user_id).await?.ok_or(Error::UserNotFound)?;
  let pass = sv.access_pass.create(&user.id, req.pass_type).await?;

  info!(
    "Access pass {} granted to {} by {}",
    pass.id, user.id, admin.0.user_id
  );
  Ok((StatusCode::CREATED, Json(pass)))
}

pub async fn cancel_access_pass(
  CurrentUser(session): CurrentUser,
  State(app): State<Arc<AppState>>,
) -> Result<Json<access_pass::Model>> {
  let pass = app.sv().access_pass.cancel(&session.user_id).await?;
  info!("Access pass {} cancelled by {}", pass.id, session.user_id);
  Ok(Json(pass))
}

#[derive(Debug, Serialize)]
pub struct LicensesRes {
  pub licenses: Vec<license::Model>,
}

pub async fn licenses(
  CurrentUser(session): CurrentUser,
  State(app): State<Arc<AppState>>,
) -> Result<Json<LicensesRes>> {
  let licenses = app.sv().license.by_user(&session.user_id).await?;
  Ok(Json(LicensesRes { licenses }))
}

pub async fn revoke_license(
  user: CurrentUser,
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<license::Model>> {
  user.require_admin()?;

  let license = app.sv().license.revoke(&id).await?;
  warn!("License {id} revoked by {}", user.0.user_id);
  Ok(Json(license))
}
