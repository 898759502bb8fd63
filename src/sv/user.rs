use sea_orm::{DbErr, SqlErr};

use crate::{
  entity::{Role, user},
  prelude::*,
};

const MIN_PASSWORD_LEN: usize = 6;

pub struct NewUser<'a> {
  pub name: &'a str,
  pub email: &'a str,
  pub password: &'a str,
  pub role: Role,
}

pub struct User<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> User<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn by_id(&self, id: &str) -> Result<Option<user::Model>> {
    Ok(user::Entity::find_by_id(id).one(self.db).await?)
  }

  pub async fn by_email(&self, email: &str) -> Result<Option<user::Model>> {
    let user = user::Entity::find()
      .filter(user::Column::Email.eq(normalize_email(email)))
      .one(self.db)
      .await?;
    Ok(user)
  }

  pub async fn register(&self, new: NewUser<'_>) -> Result<user::Model> {
    let name = new.name.trim();
    let email = normalize_email(new.email);

    if name.is_empty() || email.is_empty() || !email.contains('@') {
      return Err(Error::BadRequest("Name and a valid email are required".into()));
    }
    if new.password.chars().count() < MIN_PASSWORD_LEN {
      return Err(Error::BadRequest(format!(
        "Password must be at least {MIN_PASSWORD_LEN} characters"
      )));
    }
    if self.by_email(&email).await?.is_some() {
      return Err(Error::EmailTaken);
    }

    let image = format!(
      "https://ui-avatars.com/api/?name={}&background=random",
      name.replace(' ', "+")
    );

    let user = user::ActiveModel {
      id: Set(utils::new_id()),
      name: Set(name.to_string()),
      email: Set(email),
      password_hash: Set(Some(utils::hash_password(new.password)?)),
      image: Set(Some(image)),
      role: Set(new.role),
      verified: Set(false),
      provider: Set("credentials".into()),
      created_at: Set(Utc::now().naive_utc()),
    };

    user.insert(self.db).await.map_err(insert_error)
  }

  /// Credentials sign-in. Unknown emails and wrong passwords look the same.
  pub async fn authenticate(
    &self,
    email: &str,
    password: &str,
  ) -> Result<user::Model> {
    let user = self.by_email(email).await?.ok_or(Error::InvalidCredentials)?;

    match &user.password_hash {
      Some(hash) if utils::verify_password(password, hash) => Ok(user),
      _ => Err(Error::InvalidCredentials),
    }
  }
}

fn normalize_email(email: &str) -> String {
  email.trim().to_lowercase()
}

/// A concurrent registration can pass the lookup and still hit the unique
/// email index.
fn insert_error(err: DbErr) -> Error {
  match err.sql_err() {
    Some(SqlErr::UniqueConstraintViolation(_)) => Error::EmailTaken,
    _ => err.into(),
  }
}
