pub mod cron;
pub mod server;

use std::{sync::Arc, time::Duration};

use tokio::{
  task::{JoinHandle, JoinSet},
  time::Instant,
};
use tracing::{error, info, warn};

use crate::state::AppState;

const MIN_BACKOFF: Duration = Duration::from_secs(5);
const MAX_BACKOFF: Duration = Duration::from_secs(60);
/// A run at least this long resets the backoff.
const HEALTHY_RUN: Duration = Duration::from_secs(60);

/// Long-running part of the storefront, supervised by [`App`].
#[async_trait::async_trait]
pub trait Plugin: Send + Sync {
  fn name(&self) -> &'static str;

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()>;
}

/// Runs every registered plugin on its own task and restarts it when it
/// stops or crashes, until Ctrl-C.
pub struct App {
  plugins: Vec<Arc<dyn Plugin>>,
}

impl App {
  pub fn new() -> Self {
    Self { plugins: Vec::new() }
  }

  pub fn register<P: Plugin + 'static>(mut self, plugin: P) -> Self {
    self.plugins.push(Arc::new(plugin));
    self
  }

  pub async fn run(self, app: Arc<AppState>) {
    let mut set = JoinSet::new();
    for plugin in self.plugins {
      set.spawn(supervise(plugin, app.clone()));
    }

    tokio::select! {
      _ = tokio::signal::ctrl_c() => info!("Shutdown requested"),
      _ = async { while set.join_next().await.is_some() {} } => {}
    }

    set.shutdown().await;
    info!("All services stopped");
  }
}

/// Aborts the plugin run when the supervisor itself is dropped.
struct Run(JoinHandle<anyhow::Result<()>>);

impl Drop for Run {
  fn drop(&mut self) {
    self.0.abort();
  }
}

async fn supervise(plugin: Arc<dyn Plugin>, app: Arc<AppState>) {
  let name = plugin.name();
  let mut backoff = MIN_BACKOFF;
  info!("Service `{name}` started");

  loop {
    let started = Instant::now();
    let mut run = Run(tokio::spawn({
      let plugin = plugin.clone();
      let app = app.clone();
      async move { plugin.start(app).await }
    }));

    match (&mut run.0).await {
      Ok(Ok(())) => warn!("Service `{name}` stopped unexpectedly"),
      Ok(Err(err)) => error!("Service `{name}` crashed: {err:#}"),
      Err(err) => error!("Service `{name}` panicked: {err}"),
    }

    if started.elapsed() >= HEALTHY_RUN {
      backoff = MIN_BACKOFF;
    }
    info!("Restarting service `{name}` in {}", humantime::format_duration(backoff));
    tokio::time::sleep(backoff).await;
    backoff = (backoff * 2).min(MAX_BACKOFF);
  }
}
