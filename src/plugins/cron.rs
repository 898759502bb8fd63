//! Periodic housekeeping: session GC and access pass expiry.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{prelude::*, state::AppState};

const SESSION_GC_INTERVAL: Duration = Duration::from_secs(60);
const PASS_EXPIRY_INTERVAL: Duration = Duration::from_secs(600);

pub struct Plugin;

#[async_trait]
impl super::Plugin for Plugin {
  fn name(&self) -> &'static str {
    "cron"
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    let mut sessions = tokio::time::interval(SESSION_GC_INTERVAL);
    let mut passes = tokio::time::interval(PASS_EXPIRY_INTERVAL);

    loop {
      tokio::select! {
        _ = sessions.tick() => {
          let removed = app.gc_sessions();
          if removed > 0 {
            debug!("Dropped {removed} expired sessions");
          }
        }
        _ = passes.tick() => {
          let expired = app
            .sv()
            .access_pass
            .expire_stale()
            .await
            .context("Access pass expiry failed")?;
          if expired > 0 {
            info!("Expired {expired} access passes");
          }
        }
      }
    }
  }
}
