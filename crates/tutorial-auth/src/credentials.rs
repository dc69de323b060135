use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::{FromRow, SqlitePool};

use crate::error::AuthError;

/// A user allowed to edit tutorials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
  pub username: String,
  pub created_at: DateTime<Utc>,
}

/// Trait for checking credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync {
  /// Return the user if `password` matches, `None` otherwise.
  async fn verify(&self, username: &str, password: &str) -> Result<Option<User>, AuthError>;
}

/// SQLite-backed credential store.
///
/// Uses the `users` table created by the tutorial store migrations. Passwords
/// are kept as a salted SHA-256 digest.
pub struct SqliteCredentialStore {
  pool: SqlitePool,
}

#[derive(FromRow)]
struct UserRow {
  username: String,
  password_salt: String,
  password_hash: String,
  created_at: DateTime<Utc>,
}

impl SqliteCredentialStore {
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }

  /// Add a user.
  pub async fn create_user(&self, username: &str, password: &str) -> Result<User, AuthError> {
    let salt = uuid::Uuid::new_v4().simple().to_string();
    let hash = hash_password(&salt, password);

    let result = sqlx::query_as(
      r#"
            INSERT INTO users (username, password_salt, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING username, created_at
            "#,
    )
    .bind(username)
    .bind(&salt)
    .bind(&hash)
    .bind(Utc::now())
    .fetch_one(&self.pool)
    .await;

    match result {
      Ok(user) => {
        tracing::info!(username, "created user");
        Ok(user)
      }
      Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
        Err(AuthError::UserExists(username.to_string()))
      }
      Err(e) => Err(e.into()),
    }
  }

  /// Replace a user's password. Returns `false` if the user does not exist.
  pub async fn set_password(&self, username: &str, password: &str) -> Result<bool, AuthError> {
    let salt = uuid::Uuid::new_v4().simple().to_string();
    let hash = hash_password(&salt, password);

    let result =
      sqlx::query("UPDATE users SET password_salt = ?, password_hash = ? WHERE username = ?")
        .bind(&salt)
        .bind(&hash)
        .bind(username)
        .execute(&self.pool)
        .await?;

    Ok(result.rows_affected() > 0)
  }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
  async fn verify(&self, username: &str, password: &str) -> Result<Option<User>, AuthError> {
    let row: Option<UserRow> = sqlx::query_as(
      r#"
            SELECT username, password_salt, password_hash, created_at
            FROM users
            WHERE username = ?
            "#,
    )
    .bind(username)
    .fetch_optional(&self.pool)
    .await?;

    let Some(row) = row else {
      return Ok(None);
    };

    let candidate = hash_password(&row.password_salt, password);
    if !constant_time_eq(candidate.as_bytes(), row.password_hash.as_bytes()) {
      return Ok(None);
    }

    Ok(Some(User {
      username: row.username,
      created_at: row.created_at,
    }))
  }
}

fn hash_password(salt: &str, password: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(salt.as_bytes());
  hasher.update(password.as_bytes());
  hex::encode(hasher.finalize())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
  a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_hash_depends_on_salt() {
    let a = hash_password("salt-a", "hunter2");
    let b = hash_password("salt-b", "hunter2");

    assert_ne!(a, b);
    assert_eq!(a, hash_password("salt-a", "hunter2"));
    assert_eq!(a.len(), 64);
  }

  #[test]
  fn test_constant_time_eq() {
    assert!(constant_time_eq(b"abc", b"abc"));
    assert!(!constant_time_eq(b"abc", b"abd"));
    assert!(!constant_time_eq(b"abc", b"ab"));
  }
}
