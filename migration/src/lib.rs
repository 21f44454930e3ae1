pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_releases;
mod m20260301_000002_create_system_status;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20260301_000001_create_releases::Migration),
      Box::new(m20260301_000002_create_system_status::Migration),
    ]
  }
}
