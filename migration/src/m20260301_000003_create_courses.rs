use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Courses::Table)
          .if_not_exists()
          .col(ColumnDef::new(Courses::Id).string().not_null().primary_key())
          .col(ColumnDef::new(Courses::Title).string().not_null())
          .col(ColumnDef::new(Courses::Slug).string().not_null().unique_key())
          .col(ColumnDef::new(Courses::Description).text().not_null())
          .col(ColumnDef::new(Courses::Thumbnail).string().not_null())
          .col(ColumnDef::new(Courses::InstructorName).string().not_null())
          .col(ColumnDef::new(Courses::InstructorBio).string().not_null())
          .col(ColumnDef::new(Courses::Duration).string().not_null())
          .col(ColumnDef::new(Courses::Difficulty).string().not_null())
          .col(ColumnDef::new(Courses::Category).string().not_null())
          .col(ColumnDef::new(Courses::Rating).double().not_null().default(0.0))
          .col(ColumnDef::new(Courses::Enrolled).integer().not_null().default(0))
          .col(ColumnDef::new(Courses::Price).integer().not_null().default(0))
          .col(
            ColumnDef::new(Courses::Featured).boolean().not_null().default(false),
          )
          .col(
            ColumnDef::new(Courses::Published).boolean().not_null().default(true),
          )
          .col(ColumnDef::new(Courses::Lessons).json().not_null())
          .col(ColumnDef::new(Courses::CreatedAt).date_time().not_null())
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Courses::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Courses {
  Table,
  Id,
  Title,
  Slug,
  Description,
  Thumbnail,
  InstructorName,
  InstructorBio,
  Duration,
  Difficulty,
  Category,
  Rating,
  Enrolled,
  Price,
  Featured,
  Published,
  Lessons,
  CreatedAt,
}
