//! Storefront - digital product marketplace backend
//!
//! Architecture:
//! - SeaORM for storage (SQLite, in-memory fixtures in mock mode)
//! - Axum for the HTTP API with rate limiting
//! - Plugins supervised by `plugins::App`: HTTP server and housekeeping
//! - Tokio for async runtime

mod entity;
mod error;
mod fixtures;
mod plugins;
mod prelude;
mod state;
mod sv;
mod utils;

use std::env;

use tracing_subscriber::{
  EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{
  plugins::{App, cron, server},
  prelude::*,
  state::{AppState, Config},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "storefront=debug,tower_http=debug,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = Config::from_env()?;

  if env::args().nth(1).as_deref() == Some("seed") {
    return seed(&config).await;
  }

  info!("Starting Storefront v{}", env!("CARGO_PKG_VERSION"));

  let app = Arc::new(AppState::new(config).await?);
  info!("Data mode: {:?}", app.mode);

  App::new().register(server::Plugin).register(cron::Plugin).run(app).await;
  Ok(())
}

async fn seed(config: &Config) -> anyhow::Result<()> {
  let url = config
    .database_url
    .as_deref()
    .context("DATABASE_URL must be set to seed the database")?;

  let db = state::connect(url).await.context("Failed to connect")?;
  fixtures::reseed(&db).await.context("Failed to seed fixtures")?;

  info!("Database seeded");
  Ok(())
}
