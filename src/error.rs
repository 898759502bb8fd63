use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("Database error: {0}")]
  Database(#[from] sea_orm::DbErr),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Unauthorized")]
  Unauthorized,

  #[error("Forbidden")]
  Forbidden,

  #[error("Invalid email or password")]
  InvalidCredentials,

  #[error("Email already registered")]
  EmailTaken,

  #[error("{0}")]
  BadRequest(String),

  #[error("Product not found")]
  ProductNotFound,

  #[error("License not found")]
  LicenseNotFound,

  #[error("Access pass not found")]
  AccessPassNotFound,

  #[error("An access pass is already active")]
  AccessPassActive,

  #[error("Active access pass required")]
  AccessPassRequired,

  #[error("User not found")]
  UserNotFound,

  #[error("No files available for download")]
  NoFiles,

  #[error("File not found")]
  FileNotFound,

  #[error("Invalid or expired download token")]
  InvalidToken,

  #[error("Internal error: {0}")]
  Internal(String),
}

impl Error {
  pub fn status(&self) -> StatusCode {
    match self {
      Error::Database(_) | Error::Io(_) | Error::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
      Error::Unauthorized | Error::InvalidCredentials | Error::InvalidToken => {
        StatusCode::UNAUTHORIZED
      }
      Error::Forbidden | Error::AccessPassRequired => StatusCode::FORBIDDEN,
      Error::EmailTaken | Error::AccessPassActive => StatusCode::CONFLICT,
      Error::BadRequest(_) => StatusCode::BAD_REQUEST,
      Error::ProductNotFound
      | Error::UserNotFound
      | Error::LicenseNotFound
      | Error::AccessPassNotFound
      | Error::NoFiles
      | Error::FileNotFound => StatusCode::NOT_FOUND,
    }
  }

  /// Message safe to show to clients.
  pub fn public_message(&self) -> String {
    match self {
      Error::Database(_) => "Database error".into(),
      Error::Io(_) | Error::Internal(_) => "Internal error".into(),
      other => other.to_string(),
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!("Request failed: {self}");
    }

    let body = json::json!({ "error": self.public_message() });
    (status, Json(body)).into_response()
  }
}

impl From<JsonRejection> for Error {
  fn from(rejection: JsonRejection) -> Self {
    Error::BadRequest(rejection.body_text())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
