use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
#[serde(rename_all = "camelCase")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: String,
  pub title: String,
  #[sea_orm(unique)]
  pub slug: String,
  pub description: String,
  pub price: i32,
  pub sale_price: Option<i32>,
  pub image_url: String,
  pub freebie: bool,
  pub featured: bool,
  pub category_title: String,
  pub category_slug: String,
  pub author_name: String,
  pub author_image: Option<String>,
  pub author_slug: String,
  pub likes: i32,
  pub rating: f64,
  pub reviews_count: i32,
  pub downloads: i32,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "super::license::Entity")]
  Licenses,
}

impl Related<super::license::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Licenses.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
