//! Login, logout and session checks against a real credential table.

use std::sync::Arc;

use chrono::Duration;
use sqlx::sqlite::SqlitePoolOptions;
use tutorial_auth::{
  AccessGate, AuthError, CredentialStore, CurrentUser, InMemorySessionStore, SqliteCredentialStore,
};

async fn create_credentials() -> SqliteCredentialStore {
  let pool = SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("failed to open in-memory database");

  sqlx::migrate!("../../migrations")
    .run(&pool)
    .await
    .expect("failed to run migrations");

  let credentials = SqliteCredentialStore::new(pool);
  credentials
    .create_user("editor", "correct horse")
    .await
    .expect("failed to create user");
  credentials
}

async fn create_gate() -> AccessGate {
  AccessGate::new(
    Arc::new(create_credentials().await),
    Arc::new(InMemorySessionStore::new()),
  )
}

#[tokio::test]
async fn test_verify_credentials() {
  let credentials = create_credentials().await;

  let user = credentials.verify("editor", "correct horse").await.unwrap();
  assert_eq!(user.map(|u| u.username), Some("editor".to_string()));

  assert!(credentials.verify("editor", "wrong").await.unwrap().is_none());
  assert!(credentials.verify("nobody", "correct horse").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_user_is_rejected() {
  let credentials = create_credentials().await;

  let result = credentials.create_user("editor", "again").await;
  assert!(matches!(result, Err(AuthError::UserExists(name)) if name == "editor"));
}

#[tokio::test]
async fn test_set_password() {
  let credentials = create_credentials().await;

  assert!(credentials.set_password("editor", "new secret").await.unwrap());
  assert!(credentials.verify("editor", "correct horse").await.unwrap().is_none());
  assert!(credentials.verify("editor", "new secret").await.unwrap().is_some());

  assert!(!credentials.set_password("nobody", "x").await.unwrap());
}

#[tokio::test]
async fn test_login_and_logout() {
  let gate = create_gate().await;

  let session = gate.login("editor", "correct horse").await.unwrap();
  assert_eq!(session.username, "editor");

  let current = gate.current_user(Some(&session.session_id)).await;
  assert_eq!(
    current,
    CurrentUser {
      authenticated: true,
      username: "editor".to_string()
    }
  );
  assert_eq!(
    gate.require_user(Some(&session.session_id)).await.unwrap(),
    "editor"
  );

  gate.logout(Some(&session.session_id)).await;
  assert_eq!(
    gate.current_user(Some(&session.session_id)).await,
    CurrentUser::anonymous()
  );

  // Logging out again, or without a session, is harmless.
  gate.logout(Some(&session.session_id)).await;
  gate.logout(None).await;
}

#[tokio::test]
async fn test_bad_credentials() {
  let gate = create_gate().await;

  assert!(matches!(
    gate.login("editor", "nope").await,
    Err(AuthError::InvalidCredentials)
  ));
  assert!(matches!(
    gate.login("", "").await,
    Err(AuthError::InvalidCredentials)
  ));
}

#[tokio::test]
async fn test_anonymous_caller() {
  let gate = create_gate().await;

  assert_eq!(gate.current_user(None).await, CurrentUser::anonymous());
  assert_eq!(gate.current_user(Some("forged")).await, CurrentUser::anonymous());
  assert!(matches!(
    gate.require_user(None).await,
    Err(AuthError::Unauthenticated)
  ));
}

#[tokio::test]
async fn test_expired_session_is_anonymous() {
  let gate = AccessGate::new(
    Arc::new(create_credentials().await),
    Arc::new(InMemorySessionStore::with_ttl(Duration::zero())),
  );

  let session = gate.login("editor", "correct horse").await.unwrap();
  assert!(!gate.current_user(Some(&session.session_id)).await.authenticated);
}
