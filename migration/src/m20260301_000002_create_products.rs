use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Products::Table)
          .if_not_exists()
          .col(ColumnDef::new(Products::Id).string().not_null().primary_key())
          .col(ColumnDef::new(Products::Title).string().not_null())
          .col(ColumnDef::new(Products::Slug).string().not_null().unique_key())
          .col(ColumnDef::new(Products::Description).text().not_null())
          .col(ColumnDef::new(Products::Price).integer().not_null().default(0))
          .col(ColumnDef::new(Products::SalePrice).integer().null())
          .col(ColumnDef::new(Products::ImageUrl).string().not_null())
          .col(
            ColumnDef::new(Products::Freebie).boolean().not_null().default(false),
          )
          .col(
            ColumnDef::new(Products::Featured)
              .boolean()
              .not_null()
              .default(false),
          )
          .col(ColumnDef::new(Products::CategoryTitle).string().not_null())
          .col(ColumnDef::new(Products::CategorySlug).string().not_null())
          .col(ColumnDef::new(Products::AuthorName).string().not_null())
          .col(ColumnDef::new(Products::AuthorImage).string().null())
          .col(ColumnDef::new(Products::AuthorSlug).string().not_null())
          .col(ColumnDef::new(Products::Likes).integer().not_null().default(0))
          .col(ColumnDef::new(Products::Rating).double().not_null().default(0.0))
          .col(
            ColumnDef::new(Products::ReviewsCount)
              .integer()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(Products::Downloads).integer().not_null().default(0),
          )
          .col(ColumnDef::new(Products::CreatedAt).date_time().not_null())
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_products_category")
          .table(Products::Table)
          .col(Products::CategorySlug)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Products::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Products {
  Table,
  Id,
  Title,
  Slug,
  Description,
  Price,
  SalePrice,
  ImageUrl,
  Freebie,
  Featured,
  CategoryTitle,
  CategorySlug,
  AuthorName,
  AuthorImage,
  AuthorSlug,
  Likes,
  Rating,
  ReviewsCount,
  Downloads,
  CreatedAt,
}
