use serde::Serialize;

use crate::{
  entity::{LicenseStatus, LicenseType, access_pass, license},
  prelude::*,
  sv,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMethod {
  AccessPass,
  License,
  None,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Access {
  pub has_access: bool,
  pub method: AccessMethod,
  pub access_pass: Option<access_pass::Model>,
}

pub struct NewLicense {
  pub user_id: String,
  pub product_id: String,
  pub order_id: String,
  pub license_type: LicenseType,
  pub metadata: Option<json::Value>,
}

pub struct License<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> License<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// An active access pass wins over a per-product license.
  pub async fn check_access(
    &self,
    user_id: &str,
    product_id: Option<&str>,
  ) -> Result<Access> {
    if let Some(pass) = sv::AccessPass::new(self.db).active(user_id).await? {
      return Ok(Access {
        has_access: true,
        method: AccessMethod::AccessPass,
        access_pass: Some(pass),
      });
    }

    // rows written by pass downloads only track usage
    if let Some(product_id) = product_id
      && let Some(license) = self.find(user_id, product_id).await?
      && license.status == LicenseStatus::Active
      && license.license_type != LicenseType::AccessPass
    {
      return Ok(Access {
        has_access: true,
        method: AccessMethod::License,
        access_pass: None,
      });
    }

    Ok(Access { has_access: false, method: AccessMethod::None, access_pass: None })
  }

  /// Creates the license, or refreshes the existing one for the same
  /// user and product. An access-pass record never replaces a purchased or
  /// revoked license.
  pub async fn create(&self, new: NewLicense) -> Result<license::Model> {
    let now = Utc::now().naive_utc();

    if let Some(existing) = self.find(&new.user_id, &new.product_id).await? {
      if new.license_type == LicenseType::AccessPass
        && (existing.license_type != LicenseType::AccessPass
          || existing.status == LicenseStatus::Revoked)
      {
        return Ok(existing);
      }

      let license = license::ActiveModel {
        order_id: Set(new.order_id),
        license_type: Set(new.license_type),
        status: Set(LicenseStatus::Active),
        metadata: Set(new.metadata),
        updated_at: Set(now),
        ..existing.into()
      }
      .update(self.db)
      .await?;
      return Ok(license);
    }

    let license = license::ActiveModel {
      id: Set(utils::new_id()),
      user_id: Set(new.user_id),
      product_id: Set(new.product_id),
      order_id: Set(new.order_id),
      license_type: Set(new.license_type),
      status: Set(LicenseStatus::Active),
      metadata: Set(new.metadata),
      download_count: Set(0),
      created_at: Set(now),
      updated_at: Set(now),
    };

    Ok(license.insert(self.db).await?)
  }

  pub async fn find(
    &self,
    user_id: &str,
    product_id: &str,
  ) -> Result<Option<license::Model>> {
    let license = license::Entity::find()
      .filter(license::Column::UserId.eq(user_id))
      .filter(license::Column::ProductId.eq(product_id))
      .one(self.db)
      .await?;
    Ok(license)
  }

  pub async fn by_user(&self, user_id: &str) -> Result<Vec<license::Model>> {
    let licenses = license::Entity::find()
      .filter(license::Column::UserId.eq(user_id))
      .order_by_desc(license::Column::UpdatedAt)
      .all(self.db)
      .await?;
    Ok(licenses)
  }

  pub async fn revoke(&self, id: &str) -> Result<license::Model> {
    let license = license::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::LicenseNotFound)?;

    let license = license::ActiveModel {
      status: Set(LicenseStatus::Revoked),
      updated_at: Set(Utc::now().naive_utc()),
      ..license.into()
    }
    .update(self.db)
    .await?;

    Ok(license)
  }

  pub async fn record_download(
    &self,
    user_id: &str,
    product_id: &str,
  ) -> Result<()> {
    let license = self
      .find(user_id, product_id)
      .await?
      .ok_or(Error::LicenseNotFound)?;

    license::ActiveModel {
      download_count: Set(license.download_count + 1),
      ..license.into()
    }
    .update(self.db)
    .await?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{entity::PassType, state::connect_fixtures};

  fn standard(product_id: &str, order_id: &str) -> NewLicense {
    NewLicense {
      user_id: "user-1".into(),
      product_id: product_id.into(),
      order_id: order_id.into(),
      license_type: LicenseType::Standard,
      metadata: None,
    }
  }

  #[tokio::test]
  async fn create_upserts_per_product() {
    let db = connect_fixtures().await.unwrap();
    let sv = License::new(&db);

    let first = sv.create(standard("1", "order-1")).await.unwrap();
    let second = sv.create(standard("1", "order-2")).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.order_id, "order-2");
    assert_eq!(sv.by_user("user-1").await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn check_access_prefers_access_pass() {
    let db = connect_fixtures().await.unwrap();
    let sv = License::new(&db);

    let none = sv.check_access("user-1", Some("1")).await.unwrap();
    assert!(!none.has_access);
    assert_eq!(none.method, AccessMethod::None);

    sv.create(standard("1", "order-1")).await.unwrap();
    let licensed = sv.check_access("user-1", Some("1")).await.unwrap();
    assert_eq!(licensed.method, AccessMethod::License);
    assert!(
      !sv.check_access("user-1", Some("3")).await.unwrap().has_access
    );

    sv::AccessPass::new(&db).create("user-1", PassType::Yearly).await.unwrap();
    let pass = sv.check_access("user-1", None).await.unwrap();
    assert_eq!(pass.method, AccessMethod::AccessPass);
    assert!(pass.access_pass.is_some());
  }

  #[tokio::test]
  async fn revoked_license_grants_nothing() {
    let db = connect_fixtures().await.unwrap();
    let sv = License::new(&db);

    let license = sv.create(standard("5", "order-9")).await.unwrap();
    let revoked = sv.revoke(&license.id).await.unwrap();
    assert_eq!(revoked.status, LicenseStatus::Revoked);

    assert!(!sv.check_access("user-1", Some("5")).await.unwrap().has_access);
    assert!(matches!(sv.revoke("missing").await, Err(Error::LicenseNotFound)));
  }

  #[tokio::test]
  async fn pass_records_keep_purchased_and_revoked_licenses() {
    let db = connect_fixtures().await.unwrap();
    let sv = License::new(&db);
    let tracked = |product_id: &str| NewLicense {
      license_type: LicenseType::AccessPass,
      ..standard(product_id, "access-pass")
    };

    let bought = sv.create(standard("1", "order-1")).await.unwrap();
    let kept = sv.create(tracked("1")).await.unwrap();
    assert_eq!(kept.license_type, LicenseType::Standard);
    assert_eq!(kept.order_id, bought.order_id);

    let revoked = sv.create(standard("2", "order-2")).await.unwrap();
    sv.revoke(&revoked.id).await.unwrap();
    let kept = sv.create(tracked("2")).await.unwrap();
    assert_eq!(kept.status, LicenseStatus::Revoked);
    assert!(!sv.check_access("user-1", Some("2")).await.unwrap().has_access);
  }

  #[tokio::test]
  async fn pass_records_do_not_unlock_products() {
    let db = connect_fixtures().await.unwrap();
    let sv = License::new(&db);

    sv.create(NewLicense {
      license_type: LicenseType::AccessPass,
      ..standard("4", "access-pass")
    })
    .await
    .unwrap();

    let access = sv.check_access("user-1", Some("4")).await.unwrap();
    assert!(!access.has_access);
    assert_eq!(access.method, AccessMethod::None);
  }

  #[tokio::test]
  async fn counts_file_downloads() {
    let db = connect_fixtures().await.unwrap();
    let sv = License::new(&db);

    sv.create(standard("3", "order-3")).await.unwrap();
    sv.record_download("user-1", "3").await.unwrap();

    assert_eq!(sv.find("user-1", "3").await.unwrap().unwrap().download_count, 1);
    assert!(matches!(
      sv.record_download("user-1", "4").await,
      Err(Error::LicenseNotFound)
    ));
  }
}
