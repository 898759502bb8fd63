//! Access pass entity - subscription granting unlimited downloads

use chrono::TimeDelta;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
  Clone,
  Copy,
  Debug,
  PartialEq,
  Eq,
  EnumIter,
  DeriveActiveEnum,
  Serialize,
  Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum PassType {
  #[sea_orm(string_value = "monthly")]
  Monthly,
  #[sea_orm(string_value = "yearly")]
  Yearly,
  #[sea_orm(string_value = "lifetime")]
  Lifetime,
}

impl PassType {
  /// `None` for passes that never expire.
  pub fn duration(self) -> Option<TimeDelta> {
    match self {
      PassType::Monthly => Some(TimeDelta::days(30)),
      PassType::Yearly => Some(TimeDelta::days(365)),
      PassType::Lifetime => None,
    }
  }

  pub fn has_premium_features(self) -> bool {
    matches!(self, PassType::Yearly | PassType::Lifetime)
  }
}

#[derive(
  Clone,
  Copy,
  Debug,
  PartialEq,
  Eq,
  EnumIter,
  DeriveActiveEnum,
  Serialize,
  Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum PassStatus {
  #[sea_orm(string_value = "active")]
  Active,
  #[sea_orm(string_value = "cancelled")]
  Cancelled,
  #[sea_orm(string_value = "expired")]
  Expired,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "access_passes")]
#[serde(rename_all = "camelCase")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: String,
  pub user_id: String,
  pub pass_type: PassType,
  pub status: PassStatus,
  pub started_at: DateTime,
  pub expires_at: Option<DateTime>,
  pub total_downloads: i32,
  pub last_download_at: Option<DateTime>,
  pub created_at: DateTime,
}

impl Model {
  pub fn is_active_at(&self, now: DateTime) -> bool {
    self.status == PassStatus::Active
      && self.expires_at.is_none_or(|expires_at| expires_at > now)
  }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "super::user::Entity",
    from = "Column::UserId",
    to = "super::user::Column::Id"
  )]
  User,
}

impl Related<super::user::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::User.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
