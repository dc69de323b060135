use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tutorial_document::Document;

/// A tutorial's metadata as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Tutorial {
  pub id: i64,
  pub title: String,
  pub slug: String,
  pub description: String,
  /// Revision currently published, `None` until the first save.
  pub live_revision: Option<i64>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Input for creating a tutorial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTutorial {
  pub title: String,
  /// Derived from the title when absent.
  #[serde(default)]
  pub slug: Option<String>,
  #[serde(default)]
  pub description: String,
}

/// A stored revision of a tutorial's flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Revision {
  pub tutorial_id: i64,
  pub revision: i64,
  pub step_count: i64,
  pub created_at: DateTime<Utc>,
  /// Whether this revision is the one currently published.
  #[sqlx(skip)]
  pub live: bool,
}

/// Outcome of a successful save.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedFlow {
  pub document: Document,
  pub saved_step_count: usize,
  pub revision: i64,
}
