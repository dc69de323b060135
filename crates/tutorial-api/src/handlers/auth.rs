use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;

use super::parse_body;
use crate::cookie;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct LoginRequest {
  #[serde(default)]
  username: Option<String>,
  #[serde(default)]
  password: Option<String>,
}

/// `POST /api/login`
pub(crate) async fn login(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
  let request: LoginRequest = parse_body(&body)?;

  let session = state
    .gate
    .login(
      request.username.as_deref().unwrap_or_default(),
      request.password.as_deref().unwrap_or_default(),
    )
    .await?;

  let cookie = cookie::issue(&session.session_id, state.config.session_ttl_secs);
  let body = Json(json!({
    "status": "success",
    "username": session.username,
  }));

  Ok(([(SET_COOKIE, cookie)], body).into_response())
}

/// `POST /api/logout`. Succeeds whether or not the caller was logged in.
pub(crate) async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
  state
    .gate
    .logout(cookie::session_id(&headers).as_deref())
    .await;

  (
    [(SET_COOKIE, cookie::clear())],
    Json(json!({ "status": "success" })),
  )
    .into_response()
}

/// `GET /api/me`
pub(crate) async fn me(State(state): State<AppState>, headers: HeaderMap) -> Json<serde_json::Value> {
  let user = state
    .gate
    .current_user(cookie::session_id(&headers).as_deref())
    .await;

  Json(json!({
    "is_authenticated": user.authenticated,
    "username": user.username,
    "admin_url": state.config.admin_url,
  }))
}
