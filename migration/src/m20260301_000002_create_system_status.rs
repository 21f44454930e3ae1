use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(SystemStatus::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(SystemStatus::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(
            ColumnDef::new(SystemStatus::ExecutorType)
              .string()
              .not_null()
              .unique_key(),
          )
          .col(
            ColumnDef::new(SystemStatus::IsUp).boolean().not_null().default(true),
          )
          .col(ColumnDef::new(SystemStatus::LastUpdated).date_time().not_null())
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(SystemStatus::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum SystemStatus {
  Table,
  Id,
  ExecutorType,
  IsUp,
  LastUpdated,
}
