use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::{
  fixtures,
  prelude::*,
  state::{AppState, Config, DataMode},
};

pub async fn ok() -> &'static str {
  "OK"
}

#[derive(Debug, Serialize)]
pub struct DatabaseSection {
  pub connected: bool,
  pub uri: &'static str,
  pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSection {
  pub courses: u64,
  pub projects: u64,
  pub using_mock_data: bool,
}

#[derive(Debug, Serialize)]
pub struct Environment {
  #[serde(rename = "DATABASE_URL")]
  pub database_url: &'static str,
  #[serde(rename = "USE_MOCK_DATA")]
  pub use_mock_data: String,
  #[serde(rename = "APP_ENV")]
  pub app_env: String,
}

impl Environment {
  fn of(config: &Config) -> Self {
    Self {
      database_url: if config.database_url.is_some() { "set" } else { "not set" },
      use_mock_data: config
        .mock_data_flag
        .clone()
        .unwrap_or_else(|| "not set".into()),
      app_env: config.environment.clone(),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
  pub status: &'static str,
  /// Database section, named after the store clients were built against.
  #[serde(rename = "mongodb")]
  pub database: DatabaseSection,
  pub data: DataSection,
  pub environment: Environment,
  pub recommendations: Vec<&'static str>,
  pub summary: String,
  pub timestamp: chrono::DateTime<Utc>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<&'static str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl DatabaseHealth {
  fn new(config: &Config) -> Self {
    Self {
      status: "checking",
      database: DatabaseSection {
        connected: false,
        uri: if config.database_url.is_some() {
          "configured"
        } else {
          "not configured"
        },
        error: None,
      },
      data: DataSection { courses: 0, projects: 0, using_mock_data: false },
      environment: Environment::of(config),
      recommendations: Vec::new(),
      summary: String::new(),
      timestamp: Utc::now(),
      message: None,
      error: None,
    }
  }

  fn summarize(mut self) -> Self {
    self.summary = if self.database.connected {
      format!(
        "Database connected with {} courses and {} projects",
        self.data.courses, self.data.projects
      )
    } else if self.data.using_mock_data {
      "Using mock data (database not connected)".into()
    } else {
      "Database not connected and mock data not enabled".into()
    };
    self
  }
}

pub async fn database(
  State(app): State<Arc<AppState>>,
) -> (StatusCode, Json<DatabaseHealth>) {
  let mut health = DatabaseHealth::new(&app.config);

  match &app.mode {
    DataMode::Mock => {
      health.status = "healthy";
      health.database.error =
        Some("Using mock data mode (USE_MOCK_DATA=true)".into());
      health.data = DataSection {
        courses: fixtures::courses().len() as u64,
        projects: fixtures::projects().len() as u64,
        using_mock_data: true,
      };
      health.message = Some("Platform is using mock data successfully");
    }
    DataMode::Fallback { reason } => {
      health.status = "degraded";
      health.database.error = Some(reason.clone());
      health.data.using_mock_data = true;
      health.recommendations = vec![
        "Set DATABASE_URL in the server environment",
        "Or set USE_MOCK_DATA=true to use mock data",
      ];
    }
    DataMode::Database => {
      if let Err(err) = app.db.ping().await {
        error!("Database health check failed: {err}");
        health.status = "error";
        health.error = Some("Database unreachable".into());
        health.database.error = Some("Health check failed".into());
        health.summary = "Database health check failed".into();
        health.data.using_mock_data = true;
        health.recommendations = vec![
          "Check server logs for details",
          "Ensure the database connection string is correct",
          "Set USE_MOCK_DATA=true to bypass the database",
        ];
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(health));
      }

      health.database.connected = true;
      let sv = app.sv();
      match tokio::try_join!(sv.course.count(), sv.project.count()) {
        Ok((courses, projects)) => {
          health.status = "healthy";
          health.data.courses = courses;
          health.data.projects = projects;
          if courses == 0 && projects == 0 {
            health.recommendations.push(
              "Database is empty. Run: storefront seed to populate it with sample data",
            );
          }
        }
        Err(err) => {
          error!("Error counting documents: {err}");
          health.status = "degraded";
          health.database.error = Some("Connected but cannot query data".into());
          health.recommendations.push(
            "Database connected but queries failing. Check database permissions",
          );
        }
      }
    }
  }

  (StatusCode::OK, Json(health.summarize()))
}

#[derive(Debug, Serialize)]
pub struct MockCounts {
  pub products: u64,
  pub courses: u64,
  pub projects: u64,
  pub message: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDataRes {
  pub status: &'static str,
  pub data_mode: &'static str,
  pub environment: Environment,
  pub mock_data: MockCounts,
  pub instructions: &'static str,
}

/// Reports which data source the handlers serve from, with the row counts
/// they currently see.
pub async fn test_data(
  State(app): State<Arc<AppState>>,
) -> Result<Json<TestDataRes>> {
  let mock = app.mode.uses_mock_data();
  let sv = app.sv();
  let (products, courses, projects) =
    tokio::try_join!(sv.product.count(), sv.course.count(), sv.project.count())?;

  Ok(Json(TestDataRes {
    status: "ok",
    data_mode: if mock { "MOCK DATA" } else { "REAL DATABASE" },
    environment: Environment::of(&app.config),
    mock_data: MockCounts {
      products,
      courses,
      projects,
      message: if mock {
        "Using mock data - no database required!"
      } else {
        "Using the real database"
      },
    },
    instructions: if mock {
      "The platform is using mock data. All features work without a database."
    } else {
      "Set USE_MOCK_DATA=true to use mock data"
    },
  }))
}
