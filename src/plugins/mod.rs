pub mod server;

use std::{sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::state::AppState;

const RESTART_DELAY: Duration = Duration::from_secs(5);

/// Long-running service supervised by [`App`].
#[async_trait::async_trait]
pub trait Plugin: Send + Sync {
  fn name(&self) -> &'static str {
    std::any::type_name::<Self>()
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()>;
}

#[derive(Default)]
pub struct App {
  plugins: Vec<Arc<dyn Plugin>>,
}

impl App {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register<P: Plugin + 'static>(mut self, plugin: P) -> Self {
    self.plugins.push(Arc::new(plugin));
    self
  }

  /// Spawns every plugin, restarting it whenever it returns or panics.
  pub fn run(self, app: Arc<AppState>) -> Vec<tokio::task::JoinHandle<()>> {
    self
      .plugins
      .into_iter()
      .map(|plugin| tokio::spawn(supervise(plugin, app.clone())))
      .collect()
  }
}

async fn supervise(plugin: Arc<dyn Plugin>, app: Arc<AppState>) {
  let name = plugin.name();
  info!("SYSTEM: Service `{name}` initialized");

  loop {
    let handle = {
      let (plugin, app) = (plugin.clone(), app.clone());
      tokio::spawn(async move { plugin.start(app).await })
    };

    match handle.await {
      Ok(Ok(())) => warn!("Service `{name}` stopped unexpectedly (Ok)."),
      Ok(Err(err)) => error!("Service `{name}` crashed with error: {err:#}."),
      Err(join_err) if join_err.is_cancelled() => {
        info!("Service `{name}` shutdown.");
        break;
      }
      Err(_) => error!("Service `{name}` PANICKED!"),
    }

    sleep(RESTART_DELAY).await;
    info!("SYSTEM: Restarting service `{name}`...");
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use super::*;
  use crate::{state::Config, sv::test_db};

  struct Flaky(Arc<AtomicUsize>);

  #[async_trait::async_trait]
  impl Plugin for Flaky {
    async fn start(&self, _app: Arc<AppState>) -> anyhow::Result<()> {
      self.0.fetch_add(1, Ordering::SeqCst);
      anyhow::bail!("boom")
    }
  }

  #[tokio::test]
  async fn test_crashed_plugin_restarts() {
    let starts = Arc::new(AtomicUsize::new(0));
    let app = Arc::new(AppState::with_db(test_db().await, Config::default()));
    tokio::time::pause();

    let handles = App::new().register(Flaky(starts.clone())).run(app);

    sleep(RESTART_DELAY * 2 + Duration::from_millis(100)).await;
    assert!(starts.load(Ordering::SeqCst) >= 3);

    for handle in handles {
      handle.abort();
    }
  }
}
