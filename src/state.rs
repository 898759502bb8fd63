use std::{env, path::PathBuf};

use sea_orm::{ConnectOptions, DbErr};

use crate::{entity::Role, fixtures, prelude::*, sv};

/// Keeps the single in-memory connection from being recycled, which would
/// drop the seeded fixture database.
const MEMORY_CONN_LIFETIME: Duration = Duration::from_secs(365 * 24 * 3600);
const DEFAULT_SECRET: &str = "development-secret-key-change-in-production";

#[derive(Debug, Clone)]
pub struct Session {
  pub token: String,
  pub user_id: String,
  pub role: Role,
  pub expires_at: DateTime,
  pub last_seen: DateTime,
}

pub type Sessions = DashMap<String, Session>;

#[derive(Debug, Clone)]
pub struct Config {
  pub port: u16,
  pub database_url: Option<String>,
  pub use_mock_data: bool,
  /// Raw `USE_MOCK_DATA` value, reported by the diagnostics endpoints.
  pub mock_data_flag: Option<String>,
  pub secret: String,
  pub files_directory: PathBuf,
  pub public_url: String,
  pub session_lifetime: Duration,
  pub download_ttl: Duration,
  pub environment: String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      port: 3000,
      database_url: None,
      use_mock_data: false,
      mock_data_flag: None,
      secret: String::from(DEFAULT_SECRET),
      files_directory: PathBuf::from("./files"),
      public_url: String::from("http://localhost:3000"),
      session_lifetime: Duration::from_secs(30 * 24 * 3600),
      download_ttl: Duration::from_secs(3600),
      environment: String::from("development"),
    }
  }
}

impl Config {
  pub fn from_env() -> anyhow::Result<Self> {
    let defaults = Self::default();

    let port = match env::var("PORT") {
      Ok(port) => port.parse().context("Invalid PORT")?,
      Err(_) => defaults.port,
    };

    let mock_data_flag = env::var("USE_MOCK_DATA").ok();
    let use_mock_data = mock_data_flag.as_deref() == Some("true");

    let secret = env::var("SERVER_SECRET").unwrap_or_else(|_| {
      warn!("SERVER_SECRET not set, using the development secret");
      defaults.secret.clone()
    });

    let public_url = env::var("PUBLIC_URL")
      .unwrap_or_else(|_| format!("http://localhost:{port}"))
      .trim_end_matches('/')
      .to_string();

    Ok(Self {
      port,
      database_url: env::var("DATABASE_URL")
        .ok()
        .filter(|url| !url.trim().is_empty()),
      use_mock_data,
      mock_data_flag,
      secret,
      files_directory: env::var("FILES_DIRECTORY")
        .map(PathBuf::from)
        .unwrap_or(defaults.files_directory),
      public_url,
      session_lifetime: duration_var(
        "SESSION_LIFETIME",
        defaults.session_lifetime,
      )?,
      download_ttl: duration_var("DOWNLOAD_URL_TTL", defaults.download_ttl)?,
      environment: env::var("APP_ENV").unwrap_or(defaults.environment),
    })
  }
}

fn duration_var(key: &str, default: Duration) -> anyhow::Result<Duration> {
  match env::var(key) {
    Ok(value) => humantime::parse_duration(&value)
      .with_context(|| format!("Invalid {key} value `{value}`")),
    Err(_) => Ok(default),
  }
}

/// Where the data served by the handlers comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataMode {
  /// Mock data was requested explicitly.
  Mock,
  Database,
  /// The database was unavailable, fixtures are served instead.
  Fallback { reason: String },
}

impl DataMode {
  pub fn uses_mock_data(&self) -> bool {
    !matches!(self, DataMode::Database)
  }
}

pub struct Services<'a> {
  pub user: sv::User<'a>,
  pub product: sv::Product<'a>,
  pub course: sv::Course<'a>,
  pub project: sv::Project<'a>,
  pub license: sv::License<'a>,
  pub access_pass: sv::AccessPass<'a>,
  pub delivery: sv::Delivery<'a>,
}

pub struct AppState {
  pub db: DatabaseConnection,
  pub mode: DataMode,
  pub config: Config,
  pub sessions: Sessions,
}

impl AppState {
  pub async fn new(config: Config) -> anyhow::Result<Self> {
    if config.use_mock_data {
      info!("USE_MOCK_DATA=true, serving fixture data");
      return Self::mock(config).await;
    }

    let Some(url) = config.database_url.clone() else {
      warn!("DATABASE_URL not set, falling back to fixture data");
      return Self::fallback(config, "DATABASE_URL not configured".into())
        .await;
    };

    match connect(&url).await {
      Ok(db) => Ok(Self::with_db(db, DataMode::Database, config)),
      Err(err) => {
        warn!("Cannot connect to database: {err}, falling back to fixture data");
        Self::fallback(config, format!("Cannot connect to database: {err}"))
          .await
      }
    }
  }

  pub async fn mock(config: Config) -> anyhow::Result<Self> {
    let db = connect_fixtures().await?;
    Ok(Self::with_db(db, DataMode::Mock, config))
  }

  async fn fallback(config: Config, reason: String) -> anyhow::Result<Self> {
    let db = connect_fixtures().await?;
    Ok(Self::with_db(db, DataMode::Fallback { reason }, config))
  }

  pub fn with_db(db: DatabaseConnection, mode: DataMode, config: Config) -> Self {
    Self { db, mode, config, sessions: DashMap::new() }
  }

  pub fn sv(&self) -> Services<'_> {
    Services {
      user: sv::User::new(&self.db),
      product: sv::Product::new(&self.db),
      course: sv::Course::new(&self.db),
      project: sv::Project::new(&self.db),
      license: sv::License::new(&self.db),
      access_pass: sv::AccessPass::new(&self.db),
      delivery: sv::Delivery::new(&self.config),
    }
  }

  pub fn create_session(&self, user: &crate::entity::user::Model) -> Session {
    let now = Utc::now().naive_utc();
    let lifetime = TimeDelta::from_std(self.config.session_lifetime)
      .unwrap_or(TimeDelta::days(30));

    let session = Session {
      token: utils::new_id(),
      user_id: user.id.clone(),
      role: user.role,
      expires_at: now + lifetime,
      last_seen: now,
    };

    self.sessions.insert(session.token.clone(), session.clone());
    session
  }

  /// Returns the live session for `token`, touching `last_seen`.
  pub fn session(&self, token: &str) -> Option<Session> {
    let now = Utc::now().naive_utc();
    let mut session = self.sessions.get_mut(token)?;

    if session.expires_at <= now {
      drop(session);
      self.sessions.remove(token);
      return None;
    }

    session.last_seen = now;
    Some(session.clone())
  }

  pub fn drop_session(&self, token: &str) -> bool {
    self.sessions.remove(token).is_some()
  }

  pub fn gc_sessions(&self) -> usize {
    let now = Utc::now().naive_utc();
    let before = self.sessions.len();
    self.sessions.retain(|_token, session| session.expires_at > now);
    before - self.sessions.len()
  }
}

pub async fn connect(url: &str) -> Result<DatabaseConnection, DbErr> {
  info!("Connecting to database...");
  let db = Database::connect(url).await?;

  info!("Running migrations...");
  migration::Migrator::up(&db, None).await?;
  Ok(db)
}

/// In-memory SQLite database, migrated and seeded with the fixtures.
pub async fn connect_fixtures() -> Result<DatabaseConnection> {
  let mut opts = ConnectOptions::new("sqlite::memory:");
  opts
    .max_connections(1)
    .min_connections(1)
    .idle_timeout(MEMORY_CONN_LIFETIME)
    .max_lifetime(MEMORY_CONN_LIFETIME)
    .sqlx_logging(false);

  let db = Database::connect(opts).await?;
  migration::Migrator::up(&db, None).await?;
  fixtures::seed(&db).await?;
  Ok(db)
}
