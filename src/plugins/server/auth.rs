use std::sync::Arc;

use axum::{
  Json,
  extract::{FromRequestParts, State},
  http::{
    HeaderMap, StatusCode,
    header::{AUTHORIZATION, COOKIE, SET_COOKIE},
    request::Parts,
  },
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use super::Payload;
use crate::{
  entity::{Role, user},
  prelude::*,
  state::{AppState, Session},
  sv::user::NewUser,
};

pub const SESSION_COOKIE: &str = "session_token";

/// Session of the caller, taken from `Authorization: Bearer` or the
/// session cookie. Rejects with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Session);

impl CurrentUser {
  pub fn require_admin(&self) -> Result<()> {
    match self.0.role {
      Role::Admin => Ok(()),
      Role::User => Err(Error::Forbidden),
    }
  }
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    app: &Arc<AppState>,
  ) -> Result<Self, Self::Rejection> {
    let token = session_token(&parts.headers).ok_or(Error::Unauthorized)?;
    app.session(&token).map(CurrentUser).ok_or(Error::Unauthorized)
  }
}

fn session_token(headers: &HeaderMap) -> Option<String> {
  if let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
    && let Some(token) = value.strip_prefix("Bearer ")
  {
    return Some(token.trim().to_string());
  }

  headers
    .get_all(COOKIE)
    .iter()
    .filter_map(|value| value.to_str().ok())
    .flat_map(|value| value.split(';'))
    .find_map(|pair| {
      let (name, value) = pair.trim().split_once('=')?;
      (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
  pub id: String,
  pub email: String,
  pub name: String,
  pub image: Option<String>,
  pub role: Role,
  pub verified: bool,
}

impl From<user::Model> for SessionUser {
  fn from(user: user::Model) -> Self {
    Self {
      id: user.id,
      email: user.email,
      name: user.name,
      image: user.image,
      role: user.role,
      verified: user.verified,
    }
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRes {
  pub token: String,
  pub expires_at: DateTime,
  pub user: SessionUser,
}

#[derive(Debug, Deserialize)]
pub struct SignInReq {
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub password: String,
}

pub async fn sign_in(
  State(app): State<Arc<AppState>>,
  Payload(req): Payload<SignInReq>,
) -> Result<impl IntoResponse> {
  if req.email.trim().is_empty() || req.password.is_empty() {
    return Err(Error::InvalidCredentials);
  }

  let user = app.sv().user.authenticate(&req.email, &req.password).await?;
  let session = app.create_session(&user);
  info!("User {} signed in", user.id);

  let cookie = format!(
    "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
    session.token,
    app.config.session_lifetime.as_secs()
  );

  Ok((
    [(SET_COOKIE, cookie)],
    Json(SessionRes {
      token: session.token,
      expires_at: session.expires_at,
      user: user.into(),
    }),
  ))
}

#[derive(Debug, Deserialize)]
pub struct RegisterReq {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub password: String,
}

pub async fn register(
  State(app): State<Arc<AppState>>,
  Payload(req): Payload<RegisterReq>,
) -> Result<impl IntoResponse> {
  let user = app
    .sv()
    .user
    .register(NewUser {
      name: &req.name,
      email: &req.email,
      password: &req.password,
      role: Role::User,
    })
    .await?;

  info!("Registered user {}", user.id);
  Ok((StatusCode::CREATED, Json(SessionUser::from(user))))
}

pub async fn sign_out(
  CurrentUser(session): CurrentUser,
  State(app): State<Arc<AppState>>,
) -> impl IntoResponse {
  app.drop_session(&session.token);

  let cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0");
  ([(SET_COOKIE, cookie)], Json(json::json!({ "success": true })))
}

pub async fn session(
  CurrentUser(session): CurrentUser,
  State(app): State<Arc<AppState>>,
) -> Result<Json<SessionRes>> {
  let user = app
    .sv()
    .user
    .by_id(&session.user_id)
    .await?
    .ok_or(Error::Unauthorized)?;

  Ok(Json(SessionRes {
    token: session.token,
    expires_at: session.expires_at,
    user: user.into(),
  }))
}

#[cfg(test)]
mod tests {
  use axum::http::{HeaderValue, Method, StatusCode};

  use super::*;
  use crate::plugins::server::testing::TestApp;

  #[test]
  fn reads_bearer_then_cookie() {
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, HeaderValue::from_static("theme=dark; session_token=abc"));
    assert_eq!(session_token(&headers).as_deref(), Some("abc"));

    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
    assert_eq!(session_token(&headers).as_deref(), Some("xyz"));

    assert!(session_token(&HeaderMap::new()).is_none());
  }

  #[tokio::test]
  async fn sign_in_session_sign_out() {
    let app = TestApp::new().await;
    let token = app.sign_in("demo@example.com").await;

    let (status, body) = app.get("/api/auth/session", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "demo@example.com");
    assert_eq!(body["user"]["role"], "user");

    let (status, _) =
      app.send(Method::POST, "/api/auth/signout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/api/auth/session", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
  }

  #[tokio::test]
  async fn wrong_password_is_401() {
    let app = TestApp::new().await;
    let (status, body) = app
      .send(
        Method::POST,
        "/api/auth/signin",
        None,
        Some(json::json!({ "email": "demo@example.com", "password": "nope" })),
      )
      .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");

    let (status, _) = app
      .send(Method::POST, "/api/auth/signin", None, Some(json::json!({})))
      .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn malformed_bodies_are_json_errors() {
    let app = TestApp::new().await;

    let response =
      app.raw(Method::POST, "/api/auth/signin", None, None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
      response.headers()[axum::http::header::CONTENT_TYPE],
      "application/json"
    );

    let (status, body) =
      app.send(Method::POST, "/api/auth/signin", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = app
      .send(
        Method::POST,
        "/api/auth/register",
        None,
        Some(json::json!({ "name": 5, "email": [] })),
      )
      .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn register_then_sign_in() {
    let app = TestApp::new().await;
    let (status, body) = app
      .send(
        Method::POST,
        "/api/auth/register",
        None,
        Some(json::json!({
          "name": "New Buyer",
          "email": "buyer@example.com",
          "password": "demo123",
        })),
      )
      .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["verified"], false);
    assert!(body.get("passwordHash").is_none());

    app.sign_in("buyer@example.com").await;

    let (status, _) = app
      .send(
        Method::POST,
        "/api/auth/register",
        None,
        Some(json::json!({
          "name": "Dup",
          "email": "buyer@example.com",
          "password": "demo123",
        })),
      )
      .await;
    assert_eq!(status, StatusCode::CONFLICT);
  }
}
