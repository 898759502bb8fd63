//! Game-dev showcase entries

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
#[serde(rename_all = "camelCase")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: String,
  pub title: String,
  #[sea_orm(unique)]
  pub slug: String,
  pub description: String,
  pub year: i32,
  pub status: String,
  pub poster: String,
  pub studio: String,
  pub platforms: Json,
  pub genre: Json,
  pub tech: Json,
  pub featured: bool,
  pub approved: bool,
  pub submitted_by: String,
  pub views: i32,
  pub likes: i32,
  pub downloads: i32,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
