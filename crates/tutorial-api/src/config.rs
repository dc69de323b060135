use tutorial_auth::DEFAULT_SESSION_TTL_SECS;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "sessionid";

/// Settings for the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
  /// Link returned by `/api/me` for the editing interface.
  pub admin_url: String,
  /// Lifetime of the session cookie, in seconds.
  pub session_ttl_secs: i64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      admin_url: "/admin/".to_string(),
      session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
    }
  }
}
