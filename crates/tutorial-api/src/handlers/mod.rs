pub(crate) mod auth;
pub(crate) mod flow;
pub(crate) mod tutorials;

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Parse a tutorial id from the path. Non-numeric ids name no tutorial.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
  raw
    .parse()
    .map_err(|_| ApiError::NotFound(format!("tutorial {} not found", raw)))
}

/// Parse a JSON request body.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
  Ok(serde_json::from_slice(body)?)
}
