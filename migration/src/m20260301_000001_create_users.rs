use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Users::Table)
          .if_not_exists()
          .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
          .col(ColumnDef::new(Users::Name).string().not_null())
          .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
          .col(ColumnDef::new(Users::PasswordHash).string().null())
          .col(ColumnDef::new(Users::Image).string().null())
          .col(ColumnDef::new(Users::Role).string().not_null().default("user"))
          .col(
            ColumnDef::new(Users::Verified).boolean().not_null().default(false),
          )
          .col(
            ColumnDef::new(Users::Provider)
              .string()
              .not_null()
              .default("credentials"),
          )
          .col(ColumnDef::new(Users::CreatedAt).date_time().not_null())
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Users {
  Table,
  Id,
  Name,
  Email,
  PasswordHash,
  Image,
  Role,
  Verified,
  Provider,
  CreatedAt,
}
