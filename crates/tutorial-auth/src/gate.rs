use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::credentials::CredentialStore;
use crate::error::AuthError;
use crate::session::{Session, SessionStore};

/// Who is making a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
  pub authenticated: bool,
  /// Empty for anonymous callers.
  pub username: String,
}

impl CurrentUser {
  pub fn anonymous() -> Self {
    Self::default()
  }
}

/// Login, logout and session checks over injected stores.
#[derive(Clone)]
pub struct AccessGate {
  credentials: Arc<dyn CredentialStore>,
  sessions: Arc<dyn SessionStore>,
}

impl AccessGate {
  pub fn new(credentials: Arc<dyn CredentialStore>, sessions: Arc<dyn SessionStore>) -> Self {
    Self {
      credentials,
      sessions,
    }
  }

  /// Check credentials and start a session.
  pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
    if username.is_empty() || password.is_empty() {
      return Err(AuthError::InvalidCredentials);
    }

    match self.credentials.verify(username, password).await? {
      Some(user) => {
        let session = self.sessions.create(&user.username).await;
        tracing::info!(username = %user.username, "user logged in");
        Ok(session)
      }
      None => {
        tracing::warn!(username, "rejected login");
        Err(AuthError::InvalidCredentials)
      }
    }
  }

  /// End the session, if there is one.
  pub async fn logout(&self, session_id: Option<&str>) {
    if let Some(id) = session_id {
      self.sessions.remove(id).await;
    }
  }

  /// Resolve the caller behind `session_id`.
  pub async fn current_user(&self, session_id: Option<&str>) -> CurrentUser {
    match self.session(session_id).await {
      Some(session) => CurrentUser {
        authenticated: true,
        username: session.username,
      },
      None => CurrentUser::anonymous(),
    }
  }

  /// Require a live session, returning its username.
  pub async fn require_user(&self, session_id: Option<&str>) -> Result<String, AuthError> {
    self
      .session(session_id)
      .await
      .map(|s| s.username)
      .ok_or(AuthError::Unauthenticated)
  }

  async fn session(&self, session_id: Option<&str>) -> Option<Session> {
    match session_id {
      Some(id) if !id.is_empty() => self.sessions.get(id).await,
      _ => None,
    }
  }
}
