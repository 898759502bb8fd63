use std::sync::Arc;

use axum::{
  Json,
  body::Body,
  extract::{Path, Query, State},
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;

use super::{CurrentUser, Payload};
use crate::{
  entity::{LicenseType, PassType},
  prelude::*,
  state::AppState,
  sv::{delivery::ProductFile, license::{AccessMethod, NewLicense}},
};

const PASS_REQUIRED_MESSAGE: &str = "You need an active access pass to download this product. Please purchase an access pass to get unlimited downloads.";
const FREE_PRODUCT_MESSAGE: &str = "Free products can be downloaded without an access pass using the regular download endpoint.";
const INTERNAL_MESSAGE: &str =
  "An internal error occurred. Please try again or contact support.";

/// Refusal of the access-pass download route. Always carries
/// `canDownload: false`.
#[derive(Debug)]
pub struct Denied {
  status: StatusCode,
  error: String,
  message: Option<&'static str>,
  has_access_pass: Option<bool>,
}

impl Denied {
  fn new(status: StatusCode, error: impl Into<String>) -> Self {
    Self { status, error: error.into(), message: None, has_access_pass: None }
  }

  fn message(mut self, message: &'static str) -> Self {
    self.message = Some(message);
    self
  }
}

impl From<Error> for Denied {
  fn from(err: Error) -> Self {
    if err.status().is_server_error() {
      error!("Error generating access pass download URL: {err}");
      return Denied::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to generate download URL",
      )
      .message(INTERNAL_MESSAGE);
    }
    Denied::new(err.status(), err.public_message())
  }
}

impl IntoResponse for Denied {
  fn into_response(self) -> Response {
    let mut body = json::json!({
      "error": self.error,
      "canDownload": false,
    });
    if let Some(message) = self.message {
      body["message"] = message.into();
    }
    if let Some(has_access_pass) = self.has_access_pass {
      body["hasAccessPass"] = has_access_pass.into();
    }
    (self.status, Json(body)).into_response()
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
  pub id: String,
  pub title: String,
  pub author: String,
  pub categories: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Benefits {
  pub unlimited_downloads: bool,
  pub commercial_license: bool,
  pub premium_features: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassSummary {
  #[serde(rename = "type")]
  pub pass_type: PassType,
  pub is_active: bool,
  pub benefits: Benefits,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadGrant {
  pub can_download: bool,
  pub download_url: String,
  pub expires_in: u64,
  pub files: Vec<ProductFile>,
  pub product: ProductSummary,
  pub access_pass: PassSummary,
  pub message: &'static str,
}

pub async fn access_pass(
  CurrentUser(session): CurrentUser,
  State(app): State<Arc<AppState>>,
  Path(product_id): Path<String>,
) -> Result<Json<DownloadGrant>, Denied> {
  let product_id = product_id.trim();
  if product_id.is_empty() {
    return Err(Denied::new(StatusCode::BAD_REQUEST, "Product ID required"));
  }

  let user_id = session.user_id.as_str();
  let sv = app.sv();

  let access = sv.license.check_access(user_id, None).await?;
  let pass = match access.access_pass {
    Some(pass) if access.method == AccessMethod::AccessPass => pass,
    _ => {
      return Err(Denied {
        has_access_pass: Some(false),
        ..Denied::new(StatusCode::FORBIDDEN, "Active access pass required")
          .message(PASS_REQUIRED_MESSAGE)
      });
    }
  };

  let product =
    sv.product.by_id(product_id).await?.ok_or(Error::ProductNotFound)?;

  if product.freebie {
    return Err(
      Denied::new(
        StatusCode::BAD_REQUEST,
        "This is a free product and does not require an access pass",
      )
      .message(FREE_PRODUCT_MESSAGE),
    );
  }

  let files = sv.delivery.product_files(product_id).await?;
  if files.is_empty() {
    return Err(Error::NoFiles.into());
  }

  let secure = sv.delivery.secure_url(user_id, product_id, &pass.id)?;

  let tracked = sv
    .license
    .create(NewLicense {
      user_id: user_id.to_string(),
      product_id: product_id.to_string(),
      order_id: format!("access-pass-{}", pass.id),
      license_type: LicenseType::AccessPass,
      metadata: Some(json::json!({
        "accessPassId": pass.id,
        "accessPassType": pass.pass_type,
        "downloadMethod": "access_pass",
      })),
    })
    .await;
  if let Err(err) = tracked {
    warn!("Could not create license record for access pass download: {err}");
  }

  if let Err(err) = sv.access_pass.record_download(&pass.id).await {
    warn!("Could not update access pass statistics: {err}");
  }

  info!("Download URL issued: user {user_id}, product {product_id}");

  Ok(Json(DownloadGrant {
    can_download: true,
    download_url: secure.url,
    expires_in: secure.expires_in,
    files,
    product: ProductSummary {
      id: product.id,
      title: product.title,
      author: product.author_name,
      categories: vec![product.category_title],
    },
    access_pass: PassSummary {
      pass_type: pass.pass_type,
      is_active: access.has_access,
      benefits: Benefits {
        unlimited_downloads: true,
        commercial_license: true,
        premium_features: pass.pass_type.has_premium_features(),
      },
    },
    message: "Download URL generated successfully via access pass",
  }))
}

#[derive(Debug, Deserialize)]
pub struct EventReq {
  #[serde(default)]
  pub action: String,
}

/// Download analytics reported by the client after a transfer.
pub async fn access_pass_event(
  CurrentUser(session): CurrentUser,
  State(app): State<Arc<AppState>>,
  Path(product_id): Path<String>,
  Payload(req): Payload<EventReq>,
) -> Result<Json<json::Value>> {
  if req.action != "download_completed" {
    return Err(Error::BadRequest("Invalid action".into()));
  }

  let access = app.sv().license.check_access(&session.user_id, None).await?;
  if access.method != AccessMethod::AccessPass {
    return Err(Error::AccessPassRequired);
  }

  info!(
    "Access pass download completed: user {}, product {product_id}",
    session.user_id
  );
  Ok(Json(json::json!({
    "success": true,
    "message": "Download completion recorded",
  })))
}

#[derive(Debug, Deserialize)]
pub struct FileQuery {
  #[serde(default)]
  pub token: String,
  pub file: Option<String>,
}

/// Streams a product file for a signed download token.
pub async fn file(
  State(app): State<Arc<AppState>>,
  Query(query): Query<FileQuery>,
) -> Result<impl IntoResponse> {
  let sv = app.sv();
  let grant = sv.delivery.verify(&query.token)?;
  let (path, file) = sv.delivery.resolve(&grant.pid, query.file.as_deref()).await?;

  let handle = tokio::fs::File::open(&path).await?;
  let body = Body::from_stream(ReaderStream::new(handle));

  if let Err(err) = sv.product.increment_downloads(&grant.pid).await {
    warn!("Could not count download of product {}: {err}", grant.pid);
  }
  if let Err(err) = sv.license.record_download(&grant.uid, &grant.pid).await {
    debug!("No license download counted for {}: {err}", grant.uid);
  }

  let headers = [
    (header::CONTENT_TYPE, "application/octet-stream".to_string()),
    (header::CONTENT_LENGTH, file.size.to_string()),
    (
      header::CONTENT_DISPOSITION,
      format!("attachment; filename=\"{}\"", file.name.replace('"', "")),
    ),
  ];

  Ok((headers, body))
}

#[cfg(test)]
mod tests {
  use axum::{
    body::to_bytes,
    http::{Method, StatusCode},
  };

  use super::*;
  use crate::{entity::LicenseStatus, plugins::server::testing::TestApp};

  const ROUTE: &str = "/api/download/access-pass";

  async fn with_pass(app: &TestApp, pass_type: PassType) -> String {
    app.state.sv().access_pass.create("user-1", pass_type).await.unwrap();
    app.sign_in("demo@example.com").await
  }

  #[tokio::test]
  async fn unauthenticated_is_401() {
    let app = TestApp::new().await;
    let (status, body) = app.get(&format!("{ROUTE}/1"), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let (status, _) = app.get(&format!("{ROUTE}/1"), Some("stale-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn blank_product_id_is_400() {
    let app = TestApp::new().await;
    let token = with_pass(&app, PassType::Monthly).await;

    let (status, body) = app.get(&format!("{ROUTE}/%20"), Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Product ID required");
  }

  #[tokio::test]
  async fn without_pass_is_403() {
    let app = TestApp::new().await;
    let token = app.sign_in("demo@example.com").await;

    let (status, body) = app.get(&format!("{ROUTE}/1"), Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Active access pass required");
    assert_eq!(body["hasAccessPass"], false);
    assert_eq!(body["canDownload"], false);
    assert!(body["message"].is_string());
  }

  #[tokio::test]
  async fn per_product_license_is_not_a_pass() {
    let app = TestApp::new().await;
    app
      .state
      .sv()
      .license
      .create(NewLicense {
        user_id: "user-1".into(),
        product_id: "1".into(),
        order_id: "order-1".into(),
        license_type: LicenseType::Standard,
        metadata: None,
      })
      .await
      .unwrap();
    let token = app.sign_in("demo@example.com").await;

    let (status, _) = app.get(&format!("{ROUTE}/1"), Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
  }

  #[tokio::test]
  async fn unknown_product_is_404() {
    let app = TestApp::new().await;
    let token = with_pass(&app, PassType::Monthly).await;

    let (status, body) = app.get(&format!("{ROUTE}/999"), Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found");
    assert_eq!(body["canDownload"], false);
  }

  #[tokio::test]
  async fn free_product_is_400() {
    let app = TestApp::new().await;
    let token = with_pass(&app, PassType::Monthly).await;
    app.add_file("2", "templates.sketch", b"free");

    let (status, body) = app.get(&format!("{ROUTE}/2"), Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
      body["error"],
      "This is a free product and does not require an access pass"
    );
    assert_eq!(body["canDownload"], false);
  }

  #[tokio::test]
  async fn no_files_is_404() {
    let app = TestApp::new().await;
    let token = with_pass(&app, PassType::Monthly).await;

    let (status, body) = app.get(&format!("{ROUTE}/1"), Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No files available for download");
  }

  #[tokio::test]
  async fn grants_download_and_tracks_usage() {
    let app = TestApp::new().await;
    let token = with_pass(&app, PassType::Yearly).await;
    app.add_file("1", "Dashboard-UI-Kit.zip", b"PK\x03\x04kit");

    let (status, body) = app.get(&format!("{ROUTE}/1"), Some(&token)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["canDownload"], true);
    assert_eq!(body["expiresIn"], 3600);
    assert_eq!(body["files"][0]["name"], "Dashboard-UI-Kit.zip");
    assert_eq!(body["files"][0]["size"], 7);
    assert_eq!(body["product"]["author"], "Design Studio");
    assert_eq!(body["product"]["categories"][0], "UI Kits");
    assert_eq!(body["accessPass"]["type"], "yearly");
    assert_eq!(body["accessPass"]["isActive"], true);
    assert_eq!(body["accessPass"]["benefits"]["premiumFeatures"], true);

    let url = body["downloadUrl"].as_str().unwrap();
    assert!(url.starts_with("http://test.local/api/download?token="));

    let sv = app.state.sv();
    let license = sv.license.find("user-1", "1").await.unwrap().unwrap();
    assert_eq!(license.license_type, LicenseType::AccessPass);
    assert_eq!(license.status, LicenseStatus::Active);
    assert!(license.order_id.starts_with("access-pass-"));

    let pass = sv.access_pass.active("user-1").await.unwrap().unwrap();
    assert_eq!(pass.total_downloads, 1);

    let path = url.strip_prefix("http://test.local").unwrap();
    let response = app.raw(Method::GET, path, None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
      response.headers()[header::CONTENT_DISPOSITION],
      "attachment; filename=\"Dashboard-UI-Kit.zip\""
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"PK\x03\x04kit");

    assert_eq!(sv.product.by_id("1").await.unwrap().unwrap().downloads, 1);
    assert_eq!(
      sv.license.find("user-1", "1").await.unwrap().unwrap().download_count,
      1
    );
  }

  #[tokio::test]
  async fn monthly_pass_has_no_premium_features() {
    let app = TestApp::new().await;
    let token = with_pass(&app, PassType::Monthly).await;
    app.add_file("6", "kit.zip", b"kit");

    let (_, body) = app.get(&format!("{ROUTE}/6"), Some(&token)).await;
    assert_eq!(body["accessPass"]["benefits"]["premiumFeatures"], false);
  }

  #[tokio::test]
  async fn file_route_rejects_bad_tokens() {
    let app = TestApp::new().await;

    let (status, _) = app.get("/api/download", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.get("/api/download?token=abc.def", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired download token");

    app.add_file("3", "kit.zip", b"kit");
    let secure = app.state.sv().delivery.secure_url("user-1", "3", "p").unwrap();
    let path = secure.url.strip_prefix("http://test.local").unwrap();
    let (status, _) = app.get(&format!("{path}&file=other.zip"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn completion_event() {
    let app = TestApp::new().await;
    let uri = format!("{ROUTE}/1");
    let event = |action: &str| Some(json::json!({ "action": action }));

    let (status, _) =
      app.send(Method::POST, &uri, None, event("download_completed")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = app.sign_in("demo@example.com").await;
    let (status, _) = app
      .send(Method::POST, &uri, Some(&token), event("download_completed"))
      .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    app.state.sv().access_pass.create("user-1", PassType::Lifetime).await.unwrap();
    let (status, body) = app
      .send(Method::POST, &uri, Some(&token), event("download_completed"))
      .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) =
      app.send(Method::POST, &uri, Some(&token), event("rewind")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid action");
  }

  #[tokio::test]
  async fn unknown_action_is_400_without_pass() {
    let app = TestApp::new().await;
    let token = app.sign_in("demo@example.com").await;
    let uri = format!("{ROUTE}/1");

    let (status, body) = app
      .send(
        Method::POST,
        &uri,
        Some(&token),
        Some(json::json!({ "action": "rewind" })),
      )
      .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid action");

    let (status, body) = app.send(Method::POST, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn storage_failure_is_500() {
    let app = TestApp::new().await;
    let token = with_pass(&app, PassType::Monthly).await;
    app.add_file("1", "kit.zip", b"kit");
    app.state.db.clone().close().await.unwrap();

    let (status, body) = app.get(&format!("{ROUTE}/1"), Some(&token)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to generate download URL");
    assert_eq!(body["canDownload"], false);
    assert!(body["message"].is_string());
  }

  #[tokio::test]
  async fn token_for_product_without_files_is_404() {
    let app = TestApp::new().await;
    let secure = app.state.sv().delivery.secure_url("user-1", "5", "p").unwrap();
    let path = secure.url.strip_prefix("http://test.local").unwrap();

    let (status, body) = app.get(path, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "File not found");
  }

}
