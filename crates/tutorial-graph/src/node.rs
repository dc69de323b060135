use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::connection::FALLBACK_LABEL;
use crate::error::GraphError;

/// Title given to steps whose node has no usable title.
pub const DEFAULT_TITLE: &str = "Step";

/// Identifier of a node on the editor canvas.
///
/// The editor hands out integer ids while hand-written graphs usually use
/// strings. Both are accepted and stored in stringified form, so `1` and
/// `"1"` name the same node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  /// Interpret a JSON value as a node reference.
  ///
  /// Returns `None` for anything but strings and numbers.
  pub fn from_json(value: &Value) -> Option<Self> {
    match value {
      Value::String(s) => Some(Self(s.clone())),
      Value::Number(n) => Some(Self(n.to_string())),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for NodeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for NodeId {
  fn from(id: &str) -> Self {
    Self(id.to_string())
  }
}

/// What a node does, with the payload fields that kind carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
  /// Entry marker. Never becomes a step.
  Start,
  /// A step that shows instructional text.
  Instruction { text: Option<String> },
  /// A branching question. Its outputs are the possible answers.
  Condition,
  /// Terminal node drawn by the editor.
  End,
  /// Any type string this crate does not know about.
  Other(String),
}

impl NodeKind {
  fn parse(kind: &str, data: Option<&Map<String, Value>>) -> Self {
    match kind {
      "start" => Self::Start,
      "instruction" => Self::Instruction {
        text: data
          .and_then(|d| d.get("text"))
          .and_then(Value::as_str)
          .map(str::to_string),
      },
      "condition" => Self::Condition,
      "end" => Self::End,
      other => Self::Other(other.to_string()),
    }
  }

  /// The `type` string this kind was parsed from.
  pub fn as_str(&self) -> &str {
    match self {
      Self::Start => "start",
      Self::Instruction { .. } => "instruction",
      Self::Condition => "condition",
      Self::End => "end",
      Self::Other(kind) => kind,
    }
  }

  pub fn is_start(&self) -> bool {
    matches!(self, Self::Start)
  }
}

/// A node of the editor graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
  pub id: NodeId,
  pub kind: NodeKind,
  /// Raw title as submitted. See [`Node::title`] for the defaulted value.
  pub title: Option<String>,
  /// Output port labels, in port order.
  pub outputs: Vec<String>,
}

impl Node {
  pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
    Self {
      id: id.into(),
      kind,
      title: None,
      outputs: Vec::new(),
    }
  }

  pub fn with_title(mut self, title: impl Into<String>) -> Self {
    self.title = Some(title.into());
    self
  }

  pub fn with_outputs<I, S>(mut self, outputs: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.outputs = outputs.into_iter().map(Into::into).collect();
    self
  }

  /// Title to display, falling back to [`DEFAULT_TITLE`] when absent or empty.
  pub fn title(&self) -> &str {
    match self.title.as_deref() {
      Some(title) if !title.is_empty() => title,
      _ => DEFAULT_TITLE,
    }
  }

  /// Label of the output at `port`, if the port exists.
  pub fn output_label(&self, port: usize) -> Option<&str> {
    self.outputs.get(port).map(String::as_str)
  }

  /// Instruction text, when this node carries any.
  pub fn text(&self) -> Option<&str> {
    match &self.kind {
      NodeKind::Instruction { text } => text.as_deref().filter(|t| !t.is_empty()),
      _ => None,
    }
  }

  pub(crate) fn from_json(index: usize, value: &Value) -> Result<Self, GraphError> {
    let obj = value.as_object().ok_or(GraphError::EntryNotAnObject {
      collection: "nodes",
      index,
    })?;

    let id = match obj.get("id") {
      None => {
        return Err(GraphError::MissingField {
          collection: "nodes",
          index,
          field: "id",
        });
      }
      Some(raw) => NodeId::from_json(raw).ok_or(GraphError::InvalidId {
        collection: "nodes",
        index,
        field: "id",
      })?,
    };

    let kind = match obj.get("type") {
      None => {
        return Err(GraphError::MissingField {
          collection: "nodes",
          index,
          field: "type",
        });
      }
      Some(raw) => {
        let kind = raw.as_str().ok_or(GraphError::InvalidType { index })?;
        NodeKind::parse(kind, obj.get("data").and_then(Value::as_object))
      }
    };

    let title = obj.get("title").and_then(Value::as_str).map(str::to_string);

    // Non-string labels keep their slot so later ports stay aligned.
    let outputs = obj
      .get("outputs")
      .and_then(Value::as_array)
      .map(|labels| {
        labels
          .iter()
          .map(|label| label.as_str().unwrap_or(FALLBACK_LABEL).to_string())
          .collect()
      })
      .unwrap_or_default();

    Ok(Self {
      id,
      kind,
      title,
      outputs,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_numeric_and_string_ids_stringify_the_same() {
    assert_eq!(NodeId::from_json(&json!(7)), Some(NodeId::from("7")));
    assert_eq!(NodeId::from_json(&json!("7")), Some(NodeId::from("7")));
    assert_eq!(NodeId::from_json(&json!(null)), None);
    assert_eq!(NodeId::from_json(&json!([1])), None);
  }

  #[test]
  fn test_parse_instruction_node() {
    let node = Node::from_json(
      0,
      &json!({
        "id": 1,
        "type": "instruction",
        "title": "Do this",
        "data": { "text": "Hello world" },
        "outputs": ["Next"],
        "x": 120,
        "y": 80
      }),
    )
    .unwrap();

    assert_eq!(node.id.as_str(), "1");
    assert_eq!(node.title(), "Do this");
    assert_eq!(node.text(), Some("Hello world"));
    assert_eq!(node.output_label(0), Some("Next"));
    assert_eq!(node.output_label(1), None);
  }

  #[test]
  fn test_missing_optional_fields_get_defaults() {
    let node = Node::from_json(0, &json!({ "id": "a", "type": "condition" })).unwrap();

    assert_eq!(node.kind, NodeKind::Condition);
    assert_eq!(node.title(), DEFAULT_TITLE);
    assert!(node.outputs.is_empty());
    assert_eq!(node.text(), None);
  }

  #[test]
  fn test_empty_title_falls_back() {
    let node = Node::new("1", NodeKind::End).with_title("");
    assert_eq!(node.title(), DEFAULT_TITLE);
  }

  #[test]
  fn test_non_string_output_labels_keep_their_slot() {
    let node = Node::from_json(
      0,
      &json!({ "id": 3, "type": "condition", "outputs": [5, "No"] }),
    )
    .unwrap();

    assert_eq!(node.output_label(0), Some(FALLBACK_LABEL));
    assert_eq!(node.output_label(1), Some("No"));
  }

  #[test]
  fn test_text_only_read_for_instructions() {
    let node = Node::from_json(
      0,
      &json!({ "id": 2, "type": "condition", "data": { "text": "ignored" } }),
    )
    .unwrap();
    assert_eq!(node.text(), None);

    let empty = Node::from_json(
      0,
      &json!({ "id": 3, "type": "instruction", "data": { "text": "" } }),
    )
    .unwrap();
    assert_eq!(empty.text(), None);
  }

  #[test]
  fn test_unknown_type_is_kept() {
    let node = Node::from_json(0, &json!({ "id": 9, "type": "video" })).unwrap();
    assert_eq!(node.kind, NodeKind::Other("video".to_string()));
    assert_eq!(node.kind.as_str(), "video");
  }

  #[test]
  fn test_missing_id_is_structural() {
    let err = Node::from_json(4, &json!({ "type": "instruction" })).unwrap_err();
    assert_eq!(
      err,
      GraphError::MissingField {
        collection: "nodes",
        index: 4,
        field: "id"
      }
    );
  }

  #[test]
  fn test_bad_type_is_structural() {
    let err = Node::from_json(0, &json!({ "id": 1, "type": 3 })).unwrap_err();
    assert_eq!(err, GraphError::InvalidType { index: 0 });

    let err = Node::from_json(0, &json!({ "id": {}, "type": "start" })).unwrap_err();
    assert!(matches!(err, GraphError::InvalidId { .. }));
  }
}
