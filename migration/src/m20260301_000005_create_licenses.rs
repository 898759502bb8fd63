use sea_orm_migration::prelude::*;

use super::{
  m20260301_000001_create_users::Users,
  m20260301_000002_create_products::Products,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Licenses::Table)
          .if_not_exists()
          .col(ColumnDef::new(Licenses::Id).string().not_null().primary_key())
          .col(ColumnDef::new(Licenses::UserId).string().not_null())
          .col(ColumnDef::new(Licenses::ProductId).string().not_null())
          .col(ColumnDef::new(Licenses::OrderId).string().not_null())
          .col(
            ColumnDef::new(Licenses::LicenseType)
              .string()
              .not_null()
              .default("standard"),
          )
          .col(
            ColumnDef::new(Licenses::Status)
              .string()
              .not_null()
              .default("active"),
          )
          .col(ColumnDef::new(Licenses::Metadata).json().null())
          .col(
            ColumnDef::new(Licenses::DownloadCount)
              .integer()
              .not_null()
              .default(0),
          )
          .col(ColumnDef::new(Licenses::CreatedAt).date_time().not_null())
          .col(ColumnDef::new(Licenses::UpdatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_licenses_user")
              .from(Licenses::Table, Licenses::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_licenses_product")
              .from(Licenses::Table, Licenses::ProductId)
              .to(Products::Table, Products::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_licenses_user_product")
          .table(Licenses::Table)
          .col(Licenses::UserId)
          .col(Licenses::ProductId)
          .unique()
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Licenses::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Licenses {
  Table,
  Id,
  UserId,
  ProductId,
  OrderId,
  LicenseType,
  Status,
  Metadata,
  DownloadCount,
  CreatedAt,
  UpdatedAt,
}
