use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Releases::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Releases::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Releases::Version).string().not_null())
          .col(ColumnDef::new(Releases::Title).string().not_null())
          .col(ColumnDef::new(Releases::Description).text().not_null())
          .col(ColumnDef::new(Releases::DownloadUrl).text().not_null())
          .col(
            ColumnDef::new(Releases::DownloadCount)
              .integer()
              .not_null()
              .default(0),
          )
          .col(ColumnDef::new(Releases::CreatedAt).date_time().not_null())
          .col(
            ColumnDef::new(Releases::IsLatest)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(
            ColumnDef::new(Releases::ExecutorType)
              .string()
              .not_null()
              .default("velocity"),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .if_not_exists()
          .name("idx_releases_executor_type")
          .table(Releases::Table)
          .col(Releases::ExecutorType)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Releases::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Releases {
  Table,
  Id,
  Version,
  Title,
  Description,
  DownloadUrl,
  DownloadCount,
  CreatedAt,
  IsLatest,
  ExecutorType,
}
