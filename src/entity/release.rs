//! Release entity - a distributable version of one product line

use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "releases")]
#[serde(rename_all = "camelCase")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub version: String,
  pub title: String,
  #[sea_orm(column_type = "Text")]
  pub description: String,
  /// External URL or a path under `/uploads/`
  #[sea_orm(column_type = "Text")]
  pub download_url: String,
  pub download_count: i32,
  pub created_at: NaiveDateTime,
  /// At most one release per executor type carries this flag
  pub is_latest: bool,
  pub executor_type: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
