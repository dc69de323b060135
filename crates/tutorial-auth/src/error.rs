use thiserror::Error;

/// Errors that can occur during authentication.
#[derive(Debug, Error)]
pub enum AuthError {
  /// Username and password did not match a known user.
  #[error("Invalid credentials")]
  InvalidCredentials,

  /// The caller has no valid session.
  #[error("authentication required")]
  Unauthenticated,

  /// A user with this name already exists.
  #[error("user already exists: {0}")]
  UserExists(String),

  /// A database error occurred.
  #[error("database error: {0}")]
  Database(#[from] sqlx::Error),
}
