use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::{SaltString, rand_core::OsRng},
};
use uuid::Uuid;

use crate::error::{Error, Result};

pub fn new_id() -> String {
  Uuid::new_v4().to_string()
}

/// Argon2id hash in PHC string format.
pub fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map_err(|err| Error::Internal(format!("Password hashing failed: {err}")))?;
  Ok(hash.to_string())
}

/// Malformed stored hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
  let Ok(hash) = PasswordHash::new(stored) else {
    return false;
  };
  Argon2::default().verify_password(password.as_bytes(), &hash).is_ok()
}

/// Ids used as directory names must not escape the files root.
pub fn is_safe_segment(segment: &str) -> bool {
  !segment.is_empty()
    && segment
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
