//! Read side of the storefront: products, courses and showcase projects.

use crate::{
  entity::{course, product, project},
  prelude::*,
};

pub const DEFAULT_LIMIT: u64 = 24;

pub struct Product<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Product<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn list(
    &self,
    category: Option<&str>,
    limit: u64,
  ) -> Result<Vec<product::Model>> {
    let mut query =
      product::Entity::find().order_by_asc(product::Column::CreatedAt);

    if let Some(slug) = category.filter(|slug| !slug.is_empty()) {
      query = query.filter(product::Column::CategorySlug.eq(slug));
    }

    Ok(query.limit(limit).all(self.db).await?)
  }

  pub async fn by_id(&self, id: &str) -> Result<Option<product::Model>> {
    Ok(product::Entity::find_by_id(id).one(self.db).await?)
  }

  /// Distinct `(title, slug)` pairs in catalog order.
  pub async fn categories(&self) -> Result<Vec<(String, String)>> {
    let rows: Vec<(String, String)> = product::Entity::find()
      .select_only()
      .column(product::Column::CategoryTitle)
      .column(product::Column::CategorySlug)
      .order_by_asc(product::Column::CreatedAt)
      .into_tuple()
      .all(self.db)
      .await?;

    let mut categories: Vec<(String, String)> = Vec::new();
    for (title, slug) in rows {
      if !categories.iter().any(|(_, seen)| *seen == slug) {
        categories.push((title, slug));
      }
    }
    Ok(categories)
  }

  pub async fn increment_downloads(&self, id: &str) -> Result<()> {
    let product = product::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::ProductNotFound)?;

    product::ActiveModel {
      downloads: Set(product.downloads + 1),
      ..product.into()
    }
    .update(self.db)
    .await?;

    Ok(())
  }

  pub async fn count(&self) -> Result<u64> {
    Ok(product::Entity::find().count(self.db).await?)
  }
}

pub struct Course<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Course<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn list(
    &self,
    featured: Option<bool>,
    limit: u64,
  ) -> Result<Vec<course::Model>> {
    let mut query = course::Entity::find()
      .filter(course::Column::Published.eq(true))
      .order_by_asc(course::Column::CreatedAt);

    if let Some(featured) = featured {
      query = query.filter(course::Column::Featured.eq(featured));
    }

    Ok(query.limit(limit).all(self.db).await?)
  }

  pub async fn count(&self) -> Result<u64> {
    Ok(course::Entity::find().count(self.db).await?)
  }
}

pub struct Project<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Project<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn list(
    &self,
    featured: Option<bool>,
    limit: u64,
  ) -> Result<Vec<project::Model>> {
    let mut query = project::Entity::find()
      .filter(project::Column::Approved.eq(true))
      .order_by_asc(project::Column::CreatedAt);

    if let Some(featured) = featured {
      query = query.filter(project::Column::Featured.eq(featured));
    }

    Ok(query.limit(limit).all(self.db).await?)
  }

  pub async fn count(&self) -> Result<u64> {
    Ok(project::Entity::find().count(self.db).await?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::state::connect_fixtures;

  #[tokio::test]
  async fn filters_products_by_category() {
    let db = connect_fixtures().await.unwrap();
    let sv = Product::new(&db);

    let ui_kits = sv.list(Some("ui-kits"), DEFAULT_LIMIT).await.unwrap();
    let ids: Vec<_> = ui_kits.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["1", "7", "10"]);

    assert_eq!(sv.list(Some(""), DEFAULT_LIMIT).await.unwrap().len(), 10);
    assert!(sv.list(Some("unknown"), DEFAULT_LIMIT).await.unwrap().is_empty());
    assert_eq!(sv.list(None, 3).await.unwrap().len(), 3);
  }

  #[tokio::test]
  async fn categories_keep_catalog_order() {
    let db = connect_fixtures().await.unwrap();
    let slugs: Vec<_> = Product::new(&db)
      .categories()
      .await
      .unwrap()
      .into_iter()
      .map(|(_, slug)| slug)
      .collect();

    assert_eq!(
      slugs,
      ["ui-kits", "mobile", "web-templates", "icons", "graphics", "presentations"]
    );
  }

  #[tokio::test]
  async fn counts_downloads() {
    let db = connect_fixtures().await.unwrap();
    let sv = Product::new(&db);

    sv.increment_downloads("3").await.unwrap();
    sv.increment_downloads("3").await.unwrap();

    assert_eq!(sv.by_id("3").await.unwrap().unwrap().downloads, 2);
    assert!(matches!(
      sv.increment_downloads("missing").await,
      Err(Error::ProductNotFound)
    ));
  }

  #[tokio::test]
  async fn featured_filter_on_showcase() {
    let db = connect_fixtures().await.unwrap();

    let featured = Course::new(&db).list(Some(true), 24).await.unwrap();
    assert!(featured.iter().all(|c| c.featured && c.published));
    assert_eq!(featured.len(), 3);

    let projects = Project::new(&db).list(None, 2).await.unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].slug, "cyber-runners");
  }
}
