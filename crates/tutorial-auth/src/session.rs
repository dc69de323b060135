use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// How long a session stays valid unless configured otherwise (two weeks).
pub const DEFAULT_SESSION_TTL_SECS: i64 = 14 * 24 * 60 * 60;

/// Longest session lifetime accepted from configuration (ten years).
pub const MAX_SESSION_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// A logged-in user's session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub session_id: String,
  pub username: String,
  pub expires_at: DateTime<Utc>,
}

impl Session {
  pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
    self.expires_at <= now
  }
}

/// Trait for session storage.
///
/// Maps opaque session ids to users. Expired sessions must behave as if
/// they did not exist.
///
/// This trait is async to support networked backends like Redis.
#[async_trait]
pub trait SessionStore: Send + Sync {
  /// Start a session for `username`.
  async fn create(&self, username: &str) -> Session;

  /// Look up a live session.
  async fn get(&self, session_id: &str) -> Option<Session>;

  /// End a session. Unknown ids are ignored.
  async fn remove(&self, session_id: &str);
}

/// In-memory session store.
///
/// Suitable for a single server process or testing. Sessions are lost on
/// restart.
#[derive(Debug)]
pub struct InMemorySessionStore {
  ttl: Duration,
  sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
  pub fn new() -> Self {
    Self::with_ttl(Duration::seconds(DEFAULT_SESSION_TTL_SECS))
  }

  pub fn with_ttl(ttl: Duration) -> Self {
    Self {
      ttl,
      sessions: RwLock::new(HashMap::new()),
    }
  }

  /// Drop all expired sessions. Returns how many were removed.
  pub fn purge_expired(&self) -> usize {
    let now = Utc::now();
    let mut sessions = self.sessions.write();
    let before = sessions.len();
    sessions.retain(|_, s| !s.is_expired(now));
    before - sessions.len()
  }

  pub fn len(&self) -> usize {
    self.sessions.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.sessions.read().is_empty()
  }
}

impl Default for InMemorySessionStore {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
  async fn create(&self, username: &str) -> Session {
    let session = Session {
      session_id: uuid::Uuid::new_v4().simple().to_string(),
      username: username.to_string(),
      expires_at: Utc::now()
        .checked_add_signed(self.ttl)
        .unwrap_or(DateTime::<Utc>::MAX_UTC),
    };
    self
      .sessions
      .write()
      .insert(session.session_id.clone(), session.clone());
    session
  }

  async fn get(&self, session_id: &str) -> Option<Session> {
    let session = self.sessions.read().get(session_id).cloned()?;
    if session.is_expired(Utc::now()) {
      self.sessions.write().remove(session_id);
      return None;
    }
    Some(session)
  }

  async fn remove(&self, session_id: &str) {
    self.sessions.write().remove(session_id);
  }
}
