use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use serde::Serialize;
use serde_json::{Value, json};
use tutorial_document::Document;
use tutorial_store::{NewTutorial, Revision, Tutorial};

use super::{parse_body, parse_id};
use crate::cookie;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct Meta {
  total_count: usize,
}

/// Paged-list envelope. Everything fits on one page.
#[derive(Debug, Serialize)]
pub(crate) struct Listing<T> {
  meta: Meta,
  items: Vec<T>,
}

impl<T> From<Vec<T>> for Listing<T> {
  fn from(items: Vec<T>) -> Self {
    Self {
      meta: Meta {
        total_count: items.len(),
      },
      items,
    }
  }
}

/// A tutorial with its live document inlined.
#[derive(Debug, Serialize)]
pub(crate) struct TutorialDetail {
  #[serde(flatten)]
  tutorial: Tutorial,
  #[serde(flatten)]
  document: Document,
}

/// `GET /api/tutorials`
pub(crate) async fn list(State(state): State<AppState>) -> Result<Json<Listing<Tutorial>>, ApiError> {
  let tutorials = state.store.list_tutorials().await?;
  Ok(Json(tutorials.into()))
}

/// `GET /api/tutorials/{id}`
pub(crate) async fn detail(
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<Json<TutorialDetail>, ApiError> {
  let id = parse_id(&id)?;
  let tutorial = state.store.get_tutorial(id).await?;
  let document = state.store.get_document(id).await?;

  Ok(Json(TutorialDetail { tutorial, document }))
}

/// `POST /api/tutorials`
pub(crate) async fn create(
  State(state): State<AppState>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<(StatusCode, Json<Tutorial>), ApiError> {
  let username = state
    .gate
    .require_user(cookie::session_id(&headers).as_deref())
    .await?;

  let new: NewTutorial = parse_body(&body)?;
  if new.title.trim().is_empty() {
    return Err(ApiError::Validation("title is required".to_string()));
  }

  let tutorial = state.store.create_tutorial(&new).await?;
  tracing::info!(tutorial_id = tutorial.id, slug = %tutorial.slug, %username, "created tutorial");

  Ok((StatusCode::CREATED, Json(tutorial)))
}

/// `GET /api/tutorials/{id}/revisions`
pub(crate) async fn revisions(
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<Json<Listing<Revision>>, ApiError> {
  let id = parse_id(&id)?;
  let revisions = state.store.list_revisions(id).await?;
  Ok(Json(revisions.into()))
}

/// `POST /api/tutorials/{id}/revisions/{revision}/publish`
pub(crate) async fn publish(
  State(state): State<AppState>,
  headers: HeaderMap,
  Path((id, revision)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
  let username = state
    .gate
    .require_user(cookie::session_id(&headers).as_deref())
    .await?;

  let id = parse_id(&id)?;
  let revision: i64 = revision
    .parse()
    .map_err(|_| ApiError::NotFound(format!("revision {} of tutorial {} not found", revision, id)))?;

  let document = state.store.publish_revision(id, revision).await?;
  tracing::info!(tutorial_id = id, revision, %username, "re-published revision");

  Ok(Json(json!({
    "status": "success",
    "message": format!("Published revision {} with {} steps.", revision, document.len()),
    "page_id": id,
    "revision": revision,
  })))
}
