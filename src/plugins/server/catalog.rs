use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::{
  entity::{course, product, project},
  prelude::*,
  state::AppState,
  sv::catalog::DEFAULT_LIMIT,
};

#[derive(Debug, Serialize)]
pub struct Slug {
  pub current: String,
}

impl From<String> for Slug {
  fn from(current: String) -> Self {
    Self { current }
  }
}

#[derive(Debug, Serialize)]
pub struct Asset {
  pub url: String,
}

#[derive(Debug, Serialize)]
pub struct Image {
  pub asset: Asset,
}

#[derive(Debug, Serialize)]
pub struct Category {
  pub title: String,
  pub slug: Slug,
}

#[derive(Debug, Serialize)]
pub struct Author {
  pub name: String,
  pub image: Option<String>,
  pub slug: Slug,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
  pub likes: i32,
  pub rating: f64,
  pub reviews_count: i32,
  pub downloads: i32,
}

/// Product in the storefront's document shape.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
  #[serde(rename = "_id")]
  pub id: String,
  pub title: String,
  pub slug: Slug,
  pub price: i32,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sale_price: Option<i32>,
  pub images: Vec<Image>,
  pub freebie: bool,
  pub featured: bool,
  pub description: String,
  pub category: Category,
  pub author: Author,
  pub stats: Stats,
}

impl From<product::Model> for ProductView {
  fn from(p: product::Model) -> Self {
    Self {
      id: p.id,
      title: p.title,
      slug: p.slug.into(),
      price: p.price,
      sale_price: p.sale_price,
      images: vec![Image { asset: Asset { url: p.image_url } }],
      freebie: p.freebie,
      featured: p.featured,
      description: p.description,
      category: Category { title: p.category_title, slug: p.category_slug.into() },
      author: Author {
        name: p.author_name,
        image: p.author_image,
        slug: p.author_slug.into(),
      },
      stats: Stats {
        likes: p.likes,
        rating: p.rating,
        reviews_count: p.reviews_count,
        downloads: p.downloads,
      },
    }
  }
}

/// Limits are bounded by `u32` so they always fit the SQL `LIMIT` bind.
fn parse_limit(raw: Option<&str>) -> Result<u64> {
  match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
    None => Ok(DEFAULT_LIMIT),
    Some(raw) => raw
      .parse::<u32>()
      .map(u64::from)
      .map_err(|_| Error::BadRequest(format!("Invalid limit `{raw}`"))),
  }
}

fn parse_featured(raw: Option<&str>) -> Result<Option<bool>> {
  match raw.map(str::trim) {
    None | Some("") => Ok(None),
    Some("true") => Ok(Some(true)),
    Some("false") => Ok(Some(false)),
    Some(raw) => Err(Error::BadRequest(format!("Invalid featured flag `{raw}`"))),
  }
}

#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
  pub category: Option<String>,
  pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductsRes {
  pub success: bool,
  pub products: Vec<ProductView>,
  pub total: usize,
  pub categories: Vec<Category>,
}

pub async fn products(
  State(app): State<Arc<AppState>>,
  Query(query): Query<ProductsQuery>,
) -> Result<Json<ProductsRes>> {
  let limit = parse_limit(query.limit.as_deref())?;
  let category = query.category.as_deref().filter(|slug| !slug.is_empty());
  debug!("Products requested, category: {category:?}, limit: {limit}");

  let sv = app.sv();
  let products = sv.product.list(category, limit).await?;
  let categories = sv
    .product
    .categories()
    .await?
    .into_iter()
    .map(|(title, slug)| Category { title, slug: slug.into() })
    .collect();

  Ok(Json(ProductsRes {
    success: true,
    total: products.len(),
    products: products.into_iter().map(ProductView::from).collect(),
    categories,
  }))
}

pub async fn product(
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<ProductView>> {
  let product = app.sv().product.by_id(&id).await?.ok_or(Error::ProductNotFound)?;
  Ok(Json(product.into()))
}

#[derive(Debug, Deserialize)]
pub struct ShowcaseQuery {
  pub featured: Option<String>,
  pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CoursesRes {
  pub success: bool,
  pub courses: Vec<course::Model>,
  pub total: usize,
}

pub async fn courses(
  State(app): State<Arc<AppState>>,
  Query(query): Query<ShowcaseQuery>,
) -> Result<Json<CoursesRes>> {
  let featured = parse_featured(query.featured.as_deref())?;
  let limit = parse_limit(query.limit.as_deref())?;

  let courses = app.sv().course.list(featured, limit).await?;
  Ok(Json(CoursesRes { success: true, total: courses.len(), courses }))
}

#[derive(Debug, Serialize)]
pub struct ProjectsRes {
  pub success: bool,
  pub projects: Vec<project::Model>,
  pub total: usize,
}

pub async fn projects(
  State(app): State<Arc<AppState>>,
  Query(query): Query<ShowcaseQuery>,
) -> Result<Json<ProjectsRes>> {
  let featured = parse_featured(query.featured.as_deref())?;
  let limit = parse_limit(query.limit.as_deref())?;

  let projects = app.sv().project.list(featured, limit).await?;
  Ok(Json(ProjectsRes { success: true, total: projects.len(), projects }))
}
