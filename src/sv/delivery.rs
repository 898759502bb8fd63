//! Product file delivery
//!
//! Files for a product live under `<files_directory>/<product_id>/`. Access
//! is granted through short-lived HS256 tokens signed with the server
//! secret, carrying a [`Grant`] as claims.

use std::path::PathBuf;

use jsonwebtoken::{
  Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
  get_current_timestamp,
};
use serde::{Deserialize, Serialize};

use crate::{prelude::*, state::Config};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductFile {
  pub name: String,
  pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
  /// user id
  pub uid: String,
  /// product id
  pub pid: String,
  /// license or access pass the grant was issued under
  pub lid: String,
  /// unix seconds
  pub exp: u64,
}

#[derive(Debug, Clone)]
pub struct SecureUrl {
  pub url: String,
  pub expires_in: u64,
}

pub struct Delivery<'a> {
  config: &'a Config,
}

impl<'a> Delivery<'a> {
  pub fn new(config: &'a Config) -> Self {
    Self { config }
  }

  fn product_dir(&self, product_id: &str) -> Option<PathBuf> {
    utils::is_safe_segment(product_id)
      .then(|| self.config.files_directory.join(product_id))
  }

  /// Regular files of the product sorted by name. A missing directory
  /// means no files.
  pub async fn product_files(&self, product_id: &str) -> Result<Vec<ProductFile>> {
    let Some(dir) = self.product_dir(product_id) else {
      return Ok(Vec::new());
    };

    let mut entries = match tokio::fs::read_dir(&dir).await {
      Ok(entries) => entries,
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
        return Ok(Vec::new());
      }
      Err(err) => return Err(err.into()),
    };

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
      let meta = entry.metadata().await?;
      if !meta.is_file() {
        continue;
      }
      if let Some(name) = entry.file_name().to_str() {
        files.push(ProductFile { name: name.to_string(), size: meta.len() });
      }
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
  }

  /// Resolves a requested file against the product listing, so only listed
  /// names can be served. `None` picks the first file.
  pub async fn resolve(
    &self,
    product_id: &str,
    file: Option<&str>,
  ) -> Result<(PathBuf, ProductFile)> {
    let files = self.product_files(product_id).await?;
    let dir = self.product_dir(product_id).ok_or(Error::FileNotFound)?;

    let found = match file {
      Some(name) => files.into_iter().find(|f| f.name == name),
      None => files.into_iter().next(),
    };

    let file = found.ok_or(Error::FileNotFound)?;
    Ok((dir.join(&file.name), file))
  }

  pub fn secure_url(
    &self,
    user_id: &str,
    product_id: &str,
    license_id: &str,
  ) -> Result<SecureUrl> {
    let expires_in = self.config.download_ttl.as_secs();
    let grant = Grant {
      uid: user_id.to_string(),
      pid: product_id.to_string(),
      lid: license_id.to_string(),
      exp: get_current_timestamp() + expires_in,
    };

    let token = self.sign(&grant)?;
    Ok(SecureUrl {
      url: format!("{}/api/download?token={token}", self.config.public_url),
      expires_in,
    })
  }

  pub fn sign(&self, grant: &Grant) -> Result<String> {
    let key = EncodingKey::from_secret(self.config.secret.as_bytes());
    encode(&Header::new(Algorithm::HS256), grant, &key)
      .map_err(|err| Error::Internal(format!("Failed to sign grant: {err}")))
  }

  /// Checks signature and expiry. Every failure is an invalid token.
  pub fn verify(&self, token: &str) -> Result<Grant> {
    let key = DecodingKey::from_secret(self.config.secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Grant>(token, &key, &validation)
      .map(|data| data.claims)
      .map_err(|err| {
        debug!("Rejected download token: {err}");
        Error::InvalidToken
      })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn config(dir: &std::path::Path) -> Config {
    Config {
      files_directory: dir.to_path_buf(),
      public_url: "https://shop.example".into(),
      secret: "test-secret".into(),
      ..Config::default()
    }
  }

  #[tokio::test]
  async fn lists_only_regular_files_sorted() {
    let dir = tempfile::tempdir().unwrap();
    let product = dir.path().join("7");
    std::fs::create_dir_all(product.join("nested")).unwrap();
    std::fs::write(product.join("b.zip"), b"bbbb").unwrap();
    std::fs::write(product.join("a.fig"), b"aa").unwrap();

    let config = config(dir.path());
    let files = Delivery::new(&config).product_files("7").await.unwrap();

    assert_eq!(
      files,
      vec![
        ProductFile { name: "a.fig".into(), size: 2 },
        ProductFile { name: "b.zip".into(), size: 4 },
      ]
    );
  }

  #[tokio::test]
  async fn missing_or_unsafe_dirs_have_no_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let sv = Delivery::new(&config);

    assert!(sv.product_files("42").await.unwrap().is_empty());
    assert!(sv.product_files("../etc").await.unwrap().is_empty());
    assert!(matches!(
      sv.resolve("../etc", Some("passwd")).await,
      Err(Error::FileNotFound)
    ));
  }

  #[tokio::test]
  async fn resolve_only_serves_listed_names() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("1")).unwrap();
    std::fs::write(dir.path().join("1/kit.zip"), b"zip").unwrap();

    let config = config(dir.path());
    let sv = Delivery::new(&config);

    let (path, file) = sv.resolve("1", None).await.unwrap();
    assert_eq!(file.name, "kit.zip");
    assert!(path.ends_with("1/kit.zip"));

    assert!(matches!(
      sv.resolve("1", Some("../1/kit.zip")).await,
      Err(Error::FileNotFound)
    ));
  }

  #[test]
  fn secure_url_roundtrip() {
    let config = config(std::path::Path::new("."));
    let sv = Delivery::new(&config);

    let url = sv.secure_url("user-1", "3", "pass-1").unwrap();
    assert_eq!(url.expires_in, 3600);

    let token = url
      .url
      .strip_prefix("https://shop.example/api/download?token=")
      .unwrap();
    let grant = sv.verify(token).unwrap();
    assert_eq!((grant.uid.as_str(), grant.pid.as_str()), ("user-1", "3"));
    assert_eq!(grant.lid, "pass-1");
  }

  #[test]
  fn rejects_tampered_and_expired_tokens() {
    let config = config(std::path::Path::new("."));
    let sv = Delivery::new(&config);

    let grant = Grant {
      uid: "user-1".into(),
      pid: "3".into(),
      lid: "pass-1".into(),
      exp: get_current_timestamp() + 60,
    };
    let token = sv.sign(&grant).unwrap();
    assert_eq!(token.split('.').count(), 3);

    // payload of another grant under this grant's signature
    let forged = sv.sign(&Grant { pid: "7".into(), ..grant.clone() }).unwrap();
    let parts: Vec<&str> = token.split('.').collect();
    let forged_parts: Vec<&str> = forged.split('.').collect();
    let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);
    assert!(matches!(sv.verify(&spliced), Err(Error::InvalidToken)));

    let other = Config { secret: "other".into(), ..config.clone() };
    assert!(Delivery::new(&other).verify(&token).is_err());

    let expired = sv
      .sign(&Grant { exp: get_current_timestamp() - 1, ..grant })
      .unwrap();
    assert!(matches!(sv.verify(&expired), Err(Error::InvalidToken)));

    assert!(sv.verify("garbage").is_err());
    assert!(sv.verify("").is_err());
  }
}
