use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Projects::Table)
          .if_not_exists()
          .col(ColumnDef::new(Projects::Id).string().not_null().primary_key())
          .col(ColumnDef::new(Projects::Title).string().not_null())
          .col(ColumnDef::new(Projects::Slug).string().not_null().unique_key())
          .col(ColumnDef::new(Projects::Description).text().not_null())
          .col(ColumnDef::new(Projects::Year).integer().not_null())
          .col(ColumnDef::new(Projects::Status).string().not_null())
          .col(ColumnDef::new(Projects::Poster).string().not_null())
          .col(ColumnDef::new(Projects::Studio).string().not_null())
          .col(ColumnDef::new(Projects::Platforms).json().not_null())
          .col(ColumnDef::new(Projects::Genre).json().not_null())
          .col(ColumnDef::new(Projects::Tech).json().not_null())
          .col(
            ColumnDef::new(Projects::Featured)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(
            ColumnDef::new(Projects::Approved)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(ColumnDef::new(Projects::SubmittedBy).string().not_null())
          .col(ColumnDef::new(Projects::Views).integer().not_null().default(0))
          .col(ColumnDef::new(Projects::Likes).integer().not_null().default(0))
          .col(
            ColumnDef::new(Projects::Downloads).integer().not_null().default(0),
          )
          .col(ColumnDef::new(Projects::CreatedAt).date_time().not_null())
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Projects::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Projects {
  Table,
  Id,
  Title,
  Slug,
  Description,
  Year,
  Status,
  Poster,
  Studio,
  Platforms,
  Genre,
  Tech,
  Featured,
  Approved,
  SubmittedBy,
  Views,
  Likes,
  Downloads,
  CreatedAt,
}
