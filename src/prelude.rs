pub use std::time::Duration;

pub use anyhow::Context;
pub use chrono::Utc;
pub use migration::MigratorTrait;
pub use sea_orm::{
  ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait,
  NotSet, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
pub use tracing::{debug, error, info};

pub use crate::error::{Error, Result};
