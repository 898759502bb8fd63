mod account;
mod auth;
mod catalog;
mod download;
mod health;

use std::{net::SocketAddr, sync::Arc};

use async_trait::async_trait;
use axum::{
  Router,
  extract::FromRequest,
  routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

pub use auth::CurrentUser;

use crate::{prelude::*, state::AppState};

/// JSON request body. Malformed or missing bodies are rejected with the
/// usual `{ error }` response.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct Payload<T>(pub T);

pub struct Plugin;

#[async_trait]
impl super::Plugin for Plugin {
  fn name(&self) -> &'static str {
    "http"
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    let governor_conf = Arc::new(
      GovernorConfigBuilder::default()
        .per_second(2)
        .burst_size(100)
        .finish()
        .context("Failed to build rate limiter config")?,
    );

    let limiter = governor_conf.limiter().clone();
    let port = app.config.port;

    let router = router(app)
      .layer(GovernorLayer::new(governor_conf))
      .into_make_service_with_connect_info::<SocketAddr>();

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
      .await
      .with_context(|| format!("Failed to bind {addr}"))?;
    info!("HTTP Server listening on {addr}");

    let limiter = async {
      loop {
        tokio::time::sleep(Duration::from_secs(60)).await;
        limiter.retain_recent();
      }
    };

    let server = async {
      axum::serve(listener, router).await.context("Axum server error")
    };

    tokio::select! {
      result = server => {
        match &result {
            Ok(_) => info!("Server stopped gracefully"),
            Err(err) => error!("Server stopped with error: {err}"),
        }
        result
      }
      _ = limiter => {
        error!("Rate limiter cleaner stopped unexpectedly!");
        Ok(())
      }
    }
  }
}

pub fn routes() -> Router<Arc<AppState>> {
  Router::new()
    .route("/health", get(health::ok))
    .route("/api/health/database", get(health::database))
    .route("/api/test-data", get(health::test_data))
    .route("/api/products", get(catalog::products))
    .route("/api/products/{id}", get(catalog::product))
    .route("/api/courses", get(catalog::courses))
    .route("/api/projects", get(catalog::projects))
    .route("/api/auth/signin", post(auth::sign_in))
    .route("/api/auth/register", post(auth::register))
    .route("/api/auth/signout", post(auth::sign_out))
    .route("/api/auth/session", get(auth::session))
    .route(
      "/api/access-pass",
      get(account::access_pass)
        .post(account::grant_access_pass)
        .delete(account::cancel_access_pass),
    )
    .route("/api/licenses", get(account::licenses))
    .route("/api/licenses/{id}", delete(account::revoke_license))
    .route(
      "/api/download/access-pass/{product_id}",
      get(download::access_pass).post(download::access_pass_event),
    )
    .route("/api/download", get(download::file))
}

/// Routes with tracing and CORS. Rate limiting is added by the plugin
/// because it needs the peer address.
pub fn router(app: Arc<AppState>) -> Router {
  routes()
    .layer(
      ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
        CorsLayer::new()
          .allow_origin(Any)
          .allow_methods(Any)
          .allow_headers(Any),
      ),
    )
    .with_state(app)
}


#[cfg(test)]
mod tests {
  use axum::http::StatusCode;

  use super::testing::TestApp;

  #[tokio::test]
  async fn liveness() {
    let app = TestApp::new().await;
    let response = app.raw(axum::http::Method::GET, "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn unknown_route_is_404() {
    let app = TestApp::new().await;
    let (status, _) = app.get("/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
