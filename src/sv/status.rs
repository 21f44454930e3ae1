use sea_orm::sea_query::OnConflict;

use crate::{entity::system_status, prelude::*};

pub struct Status<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Status<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Status row of `executor`, created as "up" on first access.
  pub async fn get(&self, executor: &str) -> Result<system_status::Model> {
    if let Some(status) = self.find(executor).await? {
      return Ok(status);
    }

    let status = system_status::ActiveModel {
      id: NotSet,
      executor_type: Set(executor.to_string()),
      is_up: Set(true),
      last_updated: Set(Utc::now().naive_utc()),
    };

    // a concurrent first read may have won the race, keep its row
    system_status::Entity::insert(status)
      .on_conflict(
        OnConflict::column(system_status::Column::ExecutorType)
          .do_nothing()
          .to_owned(),
      )
      .do_nothing()
      .exec(self.db)
      .await?;

    debug!("Created status row for {executor}");

    self.find(executor).await?.ok_or_else(|| {
      Error::Internal(format!("status row for `{executor}` vanished"))
    })
  }

  pub async fn update(
    &self,
    executor: &str,
    is_up: bool,
  ) -> Result<system_status::Model> {
    let status = self.get(executor).await?;

    let status = system_status::ActiveModel {
      is_up: Set(is_up),
      last_updated: Set(Utc::now().naive_utc()),
      ..status.into()
    }
    .update(self.db)
    .await?;

    info!(
      "System status of {executor} set to {}",
      if is_up { "up" } else { "down" }
    );
    Ok(status)
  }

  async fn find(&self, executor: &str) -> Result<Option<system_status::Model>> {
    let status = system_status::Entity::find()
      .filter(system_status::Column::ExecutorType.eq(executor))
      .one(self.db)
      .await?;
    Ok(status)
  }
}
