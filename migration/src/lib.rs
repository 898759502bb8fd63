//! Storefront schema migrations

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_users;
mod m20260301_000002_create_products;
mod m20260301_000003_create_courses;
mod m20260301_000004_create_projects;
mod m20260301_000005_create_licenses;
mod m20260301_000006_create_access_passes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20260301_000001_create_users::Migration),
      Box::new(m20260301_000002_create_products::Migration),
      Box::new(m20260301_000003_create_courses::Migration),
      Box::new(m20260301_000004_create_projects::Migration),
      Box::new(m20260301_000005_create_licenses::Migration),
      Box::new(m20260301_000006_create_access_passes::Migration),
    ]
  }
}
