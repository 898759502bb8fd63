use sea_orm::{ActiveEnum, Condition, sea_query::Expr};

use crate::{
  entity::{PassStatus, PassType, access_pass},
  prelude::*,
};

pub struct AccessPass<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> AccessPass<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Most recent pass of the user regardless of status.
  pub async fn latest(
    &self,
    user_id: &str,
  ) -> Result<Option<access_pass::Model>> {
    let pass = access_pass::Entity::find()
      .filter(access_pass::Column::UserId.eq(user_id))
      .order_by_desc(access_pass::Column::CreatedAt)
      .one(self.db)
      .await?;
    Ok(pass)
  }

  pub async fn active(
    &self,
    user_id: &str,
  ) -> Result<Option<access_pass::Model>> {
    let now = Utc::now().naive_utc();
    let pass = access_pass::Entity::find()
      .filter(access_pass::Column::UserId.eq(user_id))
      .filter(access_pass::Column::Status.eq(PassStatus::Active))
      .filter(
        Condition::any()
          .add(access_pass::Column::ExpiresAt.is_null())
          .add(access_pass::Column::ExpiresAt.gt(now)),
      )
      .order_by_desc(access_pass::Column::CreatedAt)
      .one(self.db)
      .await?;
    Ok(pass)
  }

  pub async fn create(
    &self,
    user_id: &str,
    pass_type: PassType,
  ) -> Result<access_pass::Model> {
    if self.active(user_id).await?.is_some() {
      return Err(Error::AccessPassActive);
    }

    let now = Utc::now().naive_utc();
    let pass = access_pass::ActiveModel {
      id: Set(utils::new_id()),
      user_id: Set(user_id.to_string()),
      pass_type: Set(pass_type),
      status: Set(PassStatus::Active),
      started_at: Set(now),
      expires_at: Set(pass_type.duration().map(|duration| now + duration)),
      total_downloads: Set(0),
      last_download_at: Set(None),
      created_at: Set(now),
    };

    let pass = pass.insert(self.db).await?;
    info!("Access pass {} ({:?}) created for {user_id}", pass.id, pass_type);
    Ok(pass)
  }

  pub async fn cancel(&self, user_id: &str) -> Result<access_pass::Model> {
    let pass = self.active(user_id).await?.ok_or(Error::AccessPassNotFound)?;

    let pass = access_pass::ActiveModel {
      status: Set(PassStatus::Cancelled),
      ..pass.into()
    }
    .update(self.db)
    .await?;

    Ok(pass)
  }

  pub async fn record_download(&self, id: &str) -> Result<access_pass::Model> {
    let pass = access_pass::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::AccessPassNotFound)?;

    let pass = access_pass::ActiveModel {
      total_downloads: Set(pass.total_downloads + 1),
      last_download_at: Set(Some(Utc::now().naive_utc())),
      ..pass.into()
    }
    .update(self.db)
    .await?;

    Ok(pass)
  }

  /// Marks active passes past their expiry as expired.
  pub async fn expire_stale(&self) -> Result<u64> {
    let now = Utc::now().naive_utc();
    let result = access_pass::Entity::update_many()
      .col_expr(
        access_pass::Column::Status,
        Expr::value(PassStatus::Expired.to_value()),
      )
      .filter(access_pass::Column::Status.eq(PassStatus::Active))
      .filter(access_pass::Column::ExpiresAt.lte(now))
      .exec(self.db)
      .await?;

    Ok(result.rows_affected)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::state::connect_fixtures;

  #[tokio::test]
  async fn create_and_cancel() {
    let db = connect_fixtures().await.unwrap();
    let sv = AccessPass::new(&db);

    let pass = sv.create("user-1", PassType::Monthly).await.unwrap();
    assert_eq!(pass.status, PassStatus::Active);
    assert!(pass.expires_at.is_some());

    assert!(matches!(
      sv.create("user-1", PassType::Yearly).await,
      Err(Error::AccessPassActive)
    ));

    let cancelled = sv.cancel("user-1").await.unwrap();
    assert_eq!(cancelled.status, PassStatus::Cancelled);
    assert!(sv.active("user-1").await.unwrap().is_none());
    assert_eq!(sv.latest("user-1").await.unwrap().unwrap().id, pass.id);

    assert!(matches!(
      sv.cancel("user-1").await,
      Err(Error::AccessPassNotFound)
    ));
  }

  #[tokio::test]
  async fn lifetime_never_expires() {
    let db = connect_fixtures().await.unwrap();
    let sv = AccessPass::new(&db);

    let pass = sv.create("admin-1", PassType::Lifetime).await.unwrap();
    assert!(pass.expires_at.is_none());
    assert_eq!(sv.expire_stale().await.unwrap(), 0);
    assert!(sv.active("admin-1").await.unwrap().is_some());
  }

  #[tokio::test]
  async fn expires_stale_passes() {
    let db = connect_fixtures().await.unwrap();
    let sv = AccessPass::new(&db);

    let pass = sv.create("user-1", PassType::Monthly).await.unwrap();
    access_pass::ActiveModel {
      expires_at: Set(Some(Utc::now().naive_utc() - TimeDelta::hours(1))),
      ..pass.clone().into()
    }
    .update(&db)
    .await
    .unwrap();

    assert!(sv.active("user-1").await.unwrap().is_none());
    assert_eq!(sv.expire_stale().await.unwrap(), 1);

    let stale = sv.latest("user-1").await.unwrap().unwrap();
    assert_eq!(stale.status, PassStatus::Expired);
    assert_eq!(stale.status.to_value(), "expired");
  }

  #[tokio::test]
  async fn records_downloads() {
    let db = connect_fixtures().await.unwrap();
    let sv = AccessPass::new(&db);

    let pass = sv.create("user-1", PassType::Yearly).await.unwrap();
    sv.record_download(&pass.id).await.unwrap();
    let pass = sv.record_download(&pass.id).await.unwrap();

    assert_eq!(pass.total_downloads, 2);
    assert!(pass.last_download_at.is_some());
  }
}
