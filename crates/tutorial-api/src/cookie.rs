//! Session cookie transport.

use axum::http::HeaderMap;
use axum::http::header::COOKIE;

use crate::config::SESSION_COOKIE;

/// Extract the session id from the request's `Cookie` headers.
pub fn session_id(headers: &HeaderMap) -> Option<String> {
  headers
    .get_all(COOKIE)
    .iter()
    .filter_map(|value| value.to_str().ok())
    .flat_map(|value| value.split(';'))
    .filter_map(|pair| pair.trim().split_once('='))
    .find(|(name, _)| *name == SESSION_COOKIE)
    .map(|(_, value)| value.to_string())
    .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value that stores `session_id` for `max_age` seconds.
///
/// Negative ages are sent as 0.
pub fn issue(session_id: &str, max_age: i64) -> String {
  format!(
    "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
    SESSION_COOKIE,
    session_id,
    max_age.max(0)
  )
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear() -> String {
  format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE)
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;

  #[test]
  fn test_session_id_from_cookie_header() {
    let mut headers = HeaderMap::new();
    assert_eq!(session_id(&headers), None);

    headers.insert(
      COOKIE,
      HeaderValue::from_static("csrftoken=abc; sessionid=s3ss10n; theme=dark"),
    );
    assert_eq!(session_id(&headers), Some("s3ss10n".to_string()));
  }

  #[test]
  fn test_empty_session_cookie_is_ignored() {
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, HeaderValue::from_static("sessionid="));
    assert_eq!(session_id(&headers), None);
  }

  #[test]
  fn test_cookie_values() {
    assert_eq!(
      issue("abc", 60),
      "sessionid=abc; HttpOnly; SameSite=Lax; Path=/; Max-Age=60"
    );
    assert!(clear().contains("Max-Age=0"));
  }

  #[test]
  fn test_negative_max_age_is_clamped() {
    assert!(issue("abc", -5).ends_with("Max-Age=0"));
  }
}
