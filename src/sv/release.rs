use sea_orm::{DatabaseTransaction, sea_query::Expr};

use crate::{
  entity::release,
  model::{DEFAULT_EXECUTOR, NewRelease, ReleasePatch},
  prelude::*,
};

pub struct Release<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Release<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Newest first, optionally restricted to one executor type.
  pub async fn list(
    &self,
    executor: Option<&str>,
  ) -> Result<Vec<release::Model>> {
    let mut query = release::Entity::find();

    if let Some(executor) = executor {
      query = query.filter(release::Column::ExecutorType.eq(executor));
    }

    let releases = query
      .order_by_desc(release::Column::CreatedAt)
      .order_by_desc(release::Column::Id)
      .all(self.db)
      .await?;

    Ok(releases)
  }

  /// The flagged release of `executor`, falling back to the most recently
  /// created one when nothing is flagged.
  pub async fn latest(&self, executor: &str) -> Result<Option<release::Model>> {
    let flagged = release::Entity::find()
      .filter(release::Column::ExecutorType.eq(executor))
      .filter(release::Column::IsLatest.eq(true))
      .order_by_desc(release::Column::CreatedAt)
      .one(self.db)
      .await?;

    if flagged.is_some() {
      return Ok(flagged);
    }

    let recent = release::Entity::find()
      .filter(release::Column::ExecutorType.eq(executor))
      .order_by_desc(release::Column::CreatedAt)
      .order_by_desc(release::Column::Id)
      .one(self.db)
      .await?;

    Ok(recent)
  }

  pub async fn create(&self, new: NewRelease) -> Result<release::Model> {
    let txn = self.db.begin().await?;

    if new.is_latest {
      clear_latest(&txn, &new.executor_type, None).await?;
    }

    let release = release::ActiveModel {
      id: NotSet,
      version: Set(new.version),
      title: Set(new.title),
      description: Set(new.description),
      download_url: Set(new.download_url),
      download_count: Set(0),
      created_at: Set(Utc::now().naive_utc()),
      is_latest: Set(new.is_latest),
      executor_type: Set(new.executor_type),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
      "Release {} `{}` created for {}{}",
      release.id,
      release.version,
      release.executor_type,
      if release.is_latest { " (latest)" } else { "" }
    );
    Ok(release)
  }

  pub async fn update(
    &self,
    id: i32,
    patch: ReleasePatch,
  ) -> Result<Option<release::Model>> {
    let txn = self.db.begin().await?;

    let Some(release) = release::Entity::find_by_id(id).one(&txn).await? else {
      return Ok(None);
    };

    let executor =
      patch.executor_type.clone().unwrap_or_else(|| release.executor_type.clone());
    let is_latest = patch.is_latest.unwrap_or(release.is_latest);

    // re-check even when the flag is untouched: moving a latest release
    // into another line must not leave two flagged releases there
    if is_latest {
      clear_latest(&txn, &executor, Some(id)).await?;
    }

    let mut active: release::ActiveModel = release.clone().into();
    if let Some(version) = patch.version {
      active.version = Set(version);
    }
    if let Some(title) = patch.title {
      active.title = Set(title);
    }
    if let Some(description) = patch.description {
      active.description = Set(description);
    }
    if let Some(download_url) = patch.download_url {
      active.download_url = Set(download_url);
    }
    if let Some(executor_type) = patch.executor_type {
      active.executor_type = Set(executor_type);
    }
    if let Some(is_latest) = patch.is_latest {
      active.is_latest = Set(is_latest);
    }

    let updated =
      if active.is_changed() { active.update(&txn).await? } else { release };

    txn.commit().await?;
    Ok(Some(updated))
  }

  pub async fn increment_downloads(
    &self,
    id: i32,
  ) -> Result<Option<release::Model>> {
    let txn = self.db.begin().await?;

    let result = release::Entity::update_many()
      .col_expr(
        release::Column::DownloadCount,
        Expr::col(release::Column::DownloadCount).add(1),
      )
      .filter(release::Column::Id.eq(id))
      .exec(&txn)
      .await?;

    if result.rows_affected == 0 {
      return Ok(None);
    }

    let release = release::Entity::find_by_id(id).one(&txn).await?;
    txn.commit().await?;

    Ok(release)
  }

  pub async fn delete(&self, id: i32) -> Result<bool> {
    let result = release::Entity::delete_by_id(id).exec(self.db).await?;
    if result.rows_affected > 0 {
      info!("Release {id} deleted");
    }
    Ok(result.rows_affected > 0)
  }

  pub async fn count(&self) -> Result<u64> {
    Ok(release::Entity::find().count(self.db).await?)
  }

  /// Populates an empty table with the demo releases.
  pub async fn seed_defaults(&self) -> Result<bool> {
    if self.count().await? > 0 {
      return Ok(false);
    }

    info!("Seeding initial release data...");

    self
      .create(NewRelease {
        version: "v1.0.0".into(),
        title: "Zenon Executor Initial Release".into(),
        description: "First public release of Zenon Executor. Features \
                      include key system, script hub, and more."
          .into(),
        download_url: "https://example.com/zenon-v1.zip".into(),
        executor_type: DEFAULT_EXECUTOR.into(),
        is_latest: false,
      })
      .await?;

    self
      .create(NewRelease {
        version: "v1.1.0".into(),
        title: "Performance Update".into(),
        description: "Improved injection speed and stability. Added new themes."
          .into(),
        download_url: "https://example.com/zenon-v1.1.zip".into(),
        executor_type: DEFAULT_EXECUTOR.into(),
        is_latest: true,
      })
      .await?;

    Ok(true)
  }
}

async fn clear_latest(
  txn: &DatabaseTransaction,
  executor: &str,
  except: Option<i32>,
) -> Result<()> {
  let mut query = release::Entity::update_many()
    .col_expr(release::Column::IsLatest, Expr::value(false))
    .filter(release::Column::ExecutorType.eq(executor))
    .filter(release::Column::IsLatest.eq(true));

  if let Some(id) = except {
    query = query.filter(release::Column::Id.ne(id));
  }

  let result = query.exec(txn).await?;
  if result.rows_affected > 0 {
    debug!("Cleared latest flag on {} {executor} release(s)", result.rows_affected);
  }
  Ok(())
}
