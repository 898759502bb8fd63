use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
#[serde(rename_all = "camelCase")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: String,
  pub title: String,
  #[sea_orm(unique)]
  pub slug: String,
  pub description: String,
  pub thumbnail: String,
  pub instructor_name: String,
  pub instructor_bio: String,
  pub duration: String,
  pub difficulty: String,
  pub category: String,
  pub rating: f64,
  pub enrolled: i32,
  pub price: i32,
  pub featured: bool,
  pub published: bool,
  /// json array of lessons
  pub lessons: Json,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
