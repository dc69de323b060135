//! Tutorial Store
//!
//! This crate provides the storage trait and implementations for tutorials.
//! Each tutorial owns one raw editor graph and one compiled document; both
//! are replaced together on every save. Data is persisted to SQLite.
//!
//! The [`Store`] trait defines operations for:
//! - Creating, listing and deleting tutorials
//! - Saving a flow (store raw graph, compile, store document, publish)
//! - Reading the raw graph or the compiled document independently
//! - Listing revisions and re-publishing an older one

mod slug;
mod sqlite;
mod types;

pub use slug::slugify;
pub use sqlite::SqliteStore;
pub use types::{NewTutorial, Revision, SavedFlow, Tutorial};

use async_trait::async_trait;
use tutorial_compiler::CompileError;
use tutorial_document::Document;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// The requested record was not found.
  #[error("not found: {0}")]
  NotFound(String),

  /// A record with the same unique key already exists.
  #[error("already exists: {0}")]
  AlreadyExists(String),

  /// The submitted graph could not be compiled.
  #[error(transparent)]
  Validation(#[from] CompileError),

  /// A database error occurred.
  #[error("database error: {0}")]
  Database(#[from] sqlx::Error),
}

/// Storage trait for tutorials.
#[async_trait]
pub trait Store: Send + Sync {
  /// Create a new, empty tutorial.
  async fn create_tutorial(&self, tutorial: &NewTutorial) -> Result<Tutorial, Error>;

  /// Get a tutorial's metadata by ID.
  async fn get_tutorial(&self, tutorial_id: i64) -> Result<Tutorial, Error>;

  /// List all tutorials, oldest first.
  async fn list_tutorials(&self) -> Result<Vec<Tutorial>, Error>;

  /// Delete a tutorial together with its graph, document and revisions.
  async fn delete_tutorial(&self, tutorial_id: i64) -> Result<(), Error>;

  /// Get the raw editor graph, or `None` if nothing has been saved yet.
  async fn get_graph(&self, tutorial_id: i64) -> Result<Option<serde_json::Value>, Error>;

  /// Get the live compiled document.
  async fn get_document(&self, tutorial_id: i64) -> Result<Document, Error>;

  /// Store a graph snapshot, compile it and publish the result.
  ///
  /// The graph is compiled before anything is written, so a graph that fails
  /// to compile leaves the tutorial untouched. Saves to the same tutorial are
  /// serialized.
  async fn save_flow(
    &self,
    tutorial_id: i64,
    graph: &serde_json::Value,
  ) -> Result<SavedFlow, Error>;

  /// List revisions of a tutorial, newest first.
  async fn list_revisions(&self, tutorial_id: i64) -> Result<Vec<Revision>, Error>;

  /// Make an earlier revision live again.
  async fn publish_revision(&self, tutorial_id: i64, revision: i64) -> Result<Document, Error>;
}
