pub mod release;
pub mod status;
pub mod upload;

pub use release::Release;
pub use status::Status;
pub use upload::Uploads;

#[cfg(test)]
pub(crate) async fn test_db() -> sea_orm::DatabaseConnection {
  use crate::prelude::*;

  // a single connection, otherwise every pooled handle opens its own
  // in-memory database
  let mut opts = sea_orm::ConnectOptions::new("sqlite::memory:");
  opts.max_connections(1).min_connections(1).sqlx_logging(false);

  let db = Database::connect(opts).await.unwrap();
  migration::Migrator::up(&db, None).await.unwrap();
  db
}
