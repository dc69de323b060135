use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use serde_json::{Value, json};

use super::{parse_body, parse_id};
use crate::cookie;
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/flow/{id}`: the raw editor graph, or an empty one.
pub(crate) async fn get_flow(
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
  let id = parse_id(&id)?;
  let graph = state
    .store
    .get_graph(id)
    .await?
    .unwrap_or_else(|| json!({ "nodes": [], "connections": [] }));

  Ok(Json(graph))
}

/// `POST /api/flow/save/{id}`: store, compile and publish a graph snapshot.
pub(crate) async fn save_flow(
  State(state): State<AppState>,
  headers: HeaderMap,
  Path(id): Path<String>,
  body: Bytes,
) -> Result<Json<Value>, ApiError> {
  let username = state
    .gate
    .require_user(cookie::session_id(&headers).as_deref())
    .await?;

  let id = parse_id(&id)?;
  let graph: Value = parse_body(&body)?;
  let saved = state.store.save_flow(id, &graph).await?;

  tracing::info!(
    tutorial_id = id,
    %username,
    revision = saved.revision,
    steps = saved.saved_step_count,
    "saved tutorial flow"
  );

  Ok(Json(json!({
    "status": "success",
    "message": format!("Saved {} steps.", saved.saved_step_count),
    "page_id": id,
    "revision": saved.revision,
  })))
}
