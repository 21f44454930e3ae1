use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use migration::Migrator;

use crate::{prelude::*, sv};

#[derive(Debug, Clone)]
pub struct Config {
  pub database_url: String,
  pub port: u16,
  pub uploads_directory: PathBuf,
  pub max_upload_bytes: usize,
  /// Insert demo releases into an empty database on start-up
  pub seed_demo: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_url: String::from("sqlite:releases.db?mode=rwc"),
      port: 3000,
      uploads_directory: PathBuf::from("./uploads"),
      max_upload_bytes: 256 * 1024 * 1024,
      seed_demo: true,
    }
  }
}

impl Config {
  pub fn from_env() -> anyhow::Result<Self> {
    let default = Self::default();

    let max_upload_mb: usize =
      load("MAX_UPLOAD_MB", default.max_upload_bytes >> 20)?;

    Ok(Self {
      database_url: env::var("DATABASE_URL").unwrap_or(default.database_url),
      port: load("PORT", default.port)?,
      uploads_directory: env::var("UPLOADS_DIR")
        .map(PathBuf::from)
        .unwrap_or(default.uploads_directory),
      max_upload_bytes: max_upload_mb << 20,
      seed_demo: load("SEED_DEMO", default.seed_demo)?,
    })
  }
}

fn load<T>(key: &str, default: T) -> anyhow::Result<T>
where
  T: FromStr + Display,
  T::Err: std::error::Error + Send + Sync + 'static,
{
  match env::var(key) {
    Ok(raw) => {
      raw.trim().parse().with_context(|| format!("Invalid {key} value `{raw}`"))
    }
    Err(_) => {
      debug!("{key} not set, using default: {default}");
      Ok(default)
    }
  }
}

pub struct Services<'a> {
  pub release: sv::Release<'a>,
  pub status: sv::Status<'a>,
  pub uploads: sv::Uploads<'a>,
}

pub struct AppState {
  pub db: DatabaseConnection,
  pub config: Config,
}

impl AppState {
  pub async fn new(config: Config) -> anyhow::Result<Self> {
    info!("Connecting to database...");
    let db = Database::connect(config.database_url.as_str())
      .await
      .context("Failed to connect to database")?;

    info!("Running migrations...");
    Migrator::up(&db, None).await.context("Failed to run migrations")?;

    Ok(Self::with_db(db, config))
  }

  pub fn with_db(db: DatabaseConnection, config: Config) -> Self {
    Self { db, config }
  }

  pub fn sv(&self) -> Services<'_> {
    Services {
      release: sv::Release::new(&self.db),
      status: sv::Status::new(&self.db),
      uploads: sv::Uploads::new(&self.config.uploads_directory),
    }
  }
}
