use serde::{Deserialize, Serialize};

/// A piece of step content.
///
/// Serialized adjacently tagged, e.g. `{"type": "text", "value": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ContentBlock {
  /// Rich text, stored verbatim.
  Text(String),
  Image(ImageBlock),
  /// Externally hosted media such as a video.
  Embed(EmbedBlock),
}

impl ContentBlock {
  pub fn text(text: impl Into<String>) -> Self {
    Self::Text(text.into())
  }

  pub fn as_text(&self) -> Option<&str> {
    match self {
      Self::Text(text) => Some(text),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlock {
  pub url: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedBlock {
  pub url: String,
}
