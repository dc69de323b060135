use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tutorial_auth::AuthError;

/// Errors returned by API handlers.
///
/// Every variant renders as `{"status": "error", "message": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  /// Bad credentials or no session.
  #[error("{0}")]
  Auth(String),

  /// Unknown tutorial or revision.
  #[error("{0}")]
  NotFound(String),

  /// Malformed request body or graph.
  #[error("{0}")]
  Validation(String),

  /// Anything unexpected. Logged with its source chain.
  #[error("{0}")]
  Internal(String),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      Self::Auth(_) => StatusCode::UNAUTHORIZED,
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::Validation(_) | Self::Internal(_) => StatusCode::BAD_REQUEST,
    }
  }

  fn internal(err: &(dyn std::error::Error + 'static)) -> Self {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
      chain.push_str(": ");
      chain.push_str(&cause.to_string());
      source = cause.source();
    }
    tracing::error!(error = %chain, "internal error while handling request");
    Self::Internal(err.to_string())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if !matches!(self, Self::Internal(_)) {
      tracing::warn!(status = status.as_u16(), message = %self, "request rejected");
    }

    let body = Json(json!({
      "status": "error",
      "message": self.to_string(),
    }));
    (status, body).into_response()
  }
}

impl From<tutorial_store::Error> for ApiError {
  fn from(err: tutorial_store::Error) -> Self {
    match err {
      tutorial_store::Error::NotFound(what) => Self::NotFound(format!("{} not found", what)),
      tutorial_store::Error::AlreadyExists(what) => Self::Validation(format!("{} already exists", what)),
      tutorial_store::Error::Validation(e) => Self::Validation(e.to_string()),
      err @ tutorial_store::Error::Database(_) => Self::internal(&err),
    }
  }
}

impl From<AuthError> for ApiError {
  fn from(err: AuthError) -> Self {
    match err {
      AuthError::InvalidCredentials | AuthError::Unauthenticated => Self::Auth(err.to_string()),
      AuthError::UserExists(_) => Self::Validation(err.to_string()),
      err @ AuthError::Database(_) => Self::internal(&err),
    }
  }
}

impl From<serde_json::Error> for ApiError {
  fn from(err: serde_json::Error) -> Self {
    Self::Validation(format!("invalid JSON body: {}", err))
  }
}
