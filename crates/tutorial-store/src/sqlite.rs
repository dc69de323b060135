use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::types::Json;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tutorial_document::Document;

use crate::slug::slugify;
use crate::{Error, NewTutorial, Revision, SavedFlow, Store, Tutorial};

/// SQLite-based store implementation.
pub struct SqliteStore {
  pool: SqlitePool,
  /// One async lock per tutorial, held for the whole save transaction.
  locks: Mutex<HashMap<i64, Arc<tokio::sync::Mutex<()>>>>,
}

impl SqliteStore {
  /// Create a new SQLite store with the given connection pool.
  pub fn new(pool: SqlitePool) -> Self {
    Self {
      pool,
      locks: Mutex::new(HashMap::new()),
    }
  }

  /// Open (creating if needed) the database at `url` and return a store.
  pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(url)?
      .create_if_missing(true)
      .foreign_keys(true)
      .journal_mode(SqliteJournalMode::Wal)
      .busy_timeout(Duration::from_secs(5));
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    Ok(Self::new(pool))
  }

  /// The underlying pool, for sharing with other SQLite-backed services.
  pub fn pool(&self) -> &SqlitePool {
    &self.pool
  }

  /// Run database migrations.
  pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(&self.pool).await
  }

  fn lock_for(&self, tutorial_id: i64) -> Arc<tokio::sync::Mutex<()>> {
    self.locks.lock().entry(tutorial_id).or_default().clone()
  }

  /// Start a write transaction holding SQLite's write lock from the outset.
  ///
  /// A deferred transaction that reads before writing cannot upgrade its lock
  /// while another connection writes, and fails without waiting.
  async fn begin_write(&self) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    self.pool.begin_with("BEGIN IMMEDIATE").await
  }

  async fn ensure_exists(
    tx: &mut Transaction<'_, Sqlite>,
    tutorial_id: i64,
  ) -> Result<(), Error> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM tutorials WHERE id = ?")
      .bind(tutorial_id)
      .fetch_optional(&mut **tx)
      .await?;

    found
      .map(|_| ())
      .ok_or_else(|| Error::NotFound(format!("tutorial {}", tutorial_id)))
  }
}

#[async_trait]
impl Store for SqliteStore {
  async fn create_tutorial(&self, tutorial: &NewTutorial) -> Result<Tutorial, Error> {
    let slug = tutorial
      .slug
      .clone()
      .filter(|s| !s.is_empty())
      .unwrap_or_else(|| slugify(&tutorial.title));
    let now = Utc::now();

    let created = sqlx::query_as(
      r#"
            INSERT INTO tutorials (title, slug, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, title, slug, description, live_revision, created_at, updated_at
            "#,
    )
    .bind(&tutorial.title)
    .bind(&slug)
    .bind(&tutorial.description)
    .bind(now)
    .bind(now)
    .fetch_one(&self.pool)
    .await;

    match created {
      Ok(created) => Ok(created),
      Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
        Err(Error::AlreadyExists(format!("tutorial with slug '{}'", slug)))
      }
      Err(e) => Err(e.into()),
    }
  }

  async fn get_tutorial(&self, tutorial_id: i64) -> Result<Tutorial, Error> {
    sqlx::query_as(
      r#"
            SELECT id, title, slug, description, live_revision, created_at, updated_at
            FROM tutorials
            WHERE id = ?
            "#,
    )
    .bind(tutorial_id)
    .fetch_optional(&self.pool)
    .await?
    .ok_or_else(|| Error::NotFound(format!("tutorial {}", tutorial_id)))
  }

  async fn list_tutorials(&self) -> Result<Vec<Tutorial>, Error> {
    let tutorials = sqlx::query_as(
      r#"
            SELECT id, title, slug, description, live_revision, created_at, updated_at
            FROM tutorials
            ORDER BY id ASC
            "#,
    )
    .fetch_all(&self.pool)
    .await?;

    Ok(tutorials)
  }

  async fn delete_tutorial(&self, tutorial_id: i64) -> Result<(), Error> {
    self.get_tutorial(tutorial_id).await?;

    let lock = self.lock_for(tutorial_id);
    let _guard = lock.lock().await;

    let mut tx = self.begin_write().await?;
    Self::ensure_exists(&mut tx, tutorial_id).await?;

    sqlx::query("DELETE FROM tutorial_revisions WHERE tutorial_id = ?")
      .bind(tutorial_id)
      .execute(&mut *tx)
      .await?;
    sqlx::query("DELETE FROM tutorials WHERE id = ?")
      .bind(tutorial_id)
      .execute(&mut *tx)
      .await?;
    tx.commit().await?;

    self.locks.lock().remove(&tutorial_id);
    tracing::info!(tutorial_id, "deleted tutorial");
    Ok(())
  }

  async fn get_graph(&self, tutorial_id: i64) -> Result<Option<Value>, Error> {
    let graph: Option<Json<Value>> =
      sqlx::query_scalar::<_, Option<Json<Value>>>("SELECT flow_graph FROM tutorials WHERE id = ?")
        .bind(tutorial_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("tutorial {}", tutorial_id)))?;

    Ok(graph.map(|Json(g)| g).filter(|g| !is_blank(g)))
  }

  async fn get_document(&self, tutorial_id: i64) -> Result<Document, Error> {
    let Json(document) =
      sqlx::query_scalar::<_, Json<Document>>("SELECT document FROM tutorials WHERE id = ?")
        .bind(tutorial_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("tutorial {}", tutorial_id)))?;

    Ok(document)
  }

  async fn save_flow(&self, tutorial_id: i64, graph: &Value) -> Result<SavedFlow, Error> {
    // Unknown tutorials are reported before validation errors.
    self.get_tutorial(tutorial_id).await?;

    let document = tutorial_compiler::compile_json(graph)?;
    let saved_step_count = document.steps.len();

    let lock = self.lock_for(tutorial_id);
    let _guard = lock.lock().await;

    let mut tx = self.begin_write().await?;
    Self::ensure_exists(&mut tx, tutorial_id).await?;

    let revision: i64 = sqlx::query_scalar(
      "SELECT COALESCE(MAX(revision), 0) + 1 FROM tutorial_revisions WHERE tutorial_id = ?",
    )
    .bind(tutorial_id)
    .fetch_one(&mut *tx)
    .await?;

    let now = Utc::now();

    sqlx::query(
      r#"
            INSERT INTO tutorial_revisions (tutorial_id, revision, flow_graph, document, step_count, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
    )
    .bind(tutorial_id)
    .bind(revision)
    .bind(Json(graph))
    .bind(Json(&document))
    .bind(saved_step_count as i64)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
      r#"
            UPDATE tutorials
            SET flow_graph = ?, document = ?, live_revision = ?, updated_at = ?
            WHERE id = ?
            "#,
    )
    .bind(Json(graph))
    .bind(Json(&document))
    .bind(revision)
    .bind(now)
    .bind(tutorial_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
      tutorial_id,
      revision,
      steps = saved_step_count,
      "published tutorial flow"
    );

    Ok(SavedFlow {
      document,
      saved_step_count,
      revision,
    })
  }

  async fn list_revisions(&self, tutorial_id: i64) -> Result<Vec<Revision>, Error> {
    let tutorial = self.get_tutorial(tutorial_id).await?;

    let mut revisions: Vec<Revision> = sqlx::query_as(
      r#"
            SELECT tutorial_id, revision, step_count, created_at
            FROM tutorial_revisions
            WHERE tutorial_id = ?
            ORDER BY revision DESC
            "#,
    )
    .bind(tutorial_id)
    .fetch_all(&self.pool)
    .await?;

    for revision in &mut revisions {
      revision.live = tutorial.live_revision == Some(revision.revision);
    }

    Ok(revisions)
  }

  async fn publish_revision(&self, tutorial_id: i64, revision: i64) -> Result<Document, Error> {
    self.get_tutorial(tutorial_id).await?;

    let lock = self.lock_for(tutorial_id);
    let _guard = lock.lock().await;

    let mut tx = self.begin_write().await?;
    Self::ensure_exists(&mut tx, tutorial_id).await?;

    let (Json(graph), Json(document)): (Json<Value>, Json<Document>) = sqlx::query_as(
      r#"
            SELECT flow_graph, document
            FROM tutorial_revisions
            WHERE tutorial_id = ? AND revision = ?
            "#,
    )
    .bind(tutorial_id)
    .bind(revision)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| Error::NotFound(format!("revision {} of tutorial {}", revision, tutorial_id)))?;

    sqlx::query(
      r#"
            UPDATE tutorials
            SET flow_graph = ?, document = ?, live_revision = ?, updated_at = ?
            WHERE id = ?
            "#,
    )
    .bind(Json(&graph))
    .bind(Json(&document))
    .bind(revision)
    .bind(Utc::now())
    .bind(tutorial_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(tutorial_id, revision, "re-published tutorial revision");
    Ok(document)
  }
}

/// A stored graph that carries nothing, as written by a fresh editor.
fn is_blank(graph: &Value) -> bool {
  match graph {
    Value::Null => true,
    Value::Object(map) => map.is_empty(),
    Value::Array(items) => items.is_empty(),
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  async fn create_store() -> SqliteStore {
    let pool = SqlitePoolOptions::new()
      .max_connections(1)
      .connect("sqlite::memory:")
      .await
      .expect("failed to open in-memory database");
    let store = SqliteStore::new(pool);
    store.migrate().await.expect("failed to run migrations");
    store
  }

  #[tokio::test]
  async fn test_unknown_ids_do_not_leave_locks_behind() {
    let store = create_store().await;

    assert!(matches!(
      store.publish_revision(404, 1).await,
      Err(Error::NotFound(_))
    ));
    assert!(matches!(
      store.save_flow(404, &json!({ "nodes": [] })).await,
      Err(Error::NotFound(_))
    ));
    assert!(matches!(
      store.delete_tutorial(404).await,
      Err(Error::NotFound(_))
    ));

    assert!(store.locks.lock().is_empty());
  }

  #[test]
  fn test_is_blank() {
    assert!(is_blank(&json!(null)));
    assert!(is_blank(&json!({})));
    assert!(is_blank(&json!([])));
    assert!(!is_blank(&json!({ "nodes": [] })));
  }
}
