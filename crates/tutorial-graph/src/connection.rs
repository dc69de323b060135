use serde_json::Value;

use crate::error::GraphError;
use crate::node::{Node, NodeId};

/// Label used when a connection's source port has no label.
pub const FALLBACK_LABEL: &str = "Next";

/// A directed edge from one node's output port to another node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
  pub from: NodeId,
  /// Output port on the source node. `None` when the submitted port is not
  /// a usable index (negative, fractional, not a number).
  pub from_port: Option<usize>,
  pub to: NodeId,
}

impl Connection {
  pub fn new(from: impl Into<NodeId>, from_port: usize, to: impl Into<NodeId>) -> Self {
    Self {
      from: from.into(),
      from_port: Some(from_port),
      to: to.into(),
    }
  }

  /// Resolve the label shown for this edge.
  ///
  /// This is the source node's output label at `from_port`, or
  /// [`FALLBACK_LABEL`] if the source node or the port does not exist.
  pub fn label<'a>(&self, source: Option<&'a Node>) -> &'a str {
    match (source, self.from_port) {
      (Some(node), Some(port)) => node.output_label(port).unwrap_or(FALLBACK_LABEL),
      _ => FALLBACK_LABEL,
    }
  }

  pub(crate) fn from_json(index: usize, value: &Value) -> Result<Self, GraphError> {
    let obj = value.as_object().ok_or(GraphError::EntryNotAnObject {
      collection: "connections",
      index,
    })?;

    let endpoint = |field: &'static str| -> Result<NodeId, GraphError> {
      let raw = obj.get(field).ok_or(GraphError::MissingField {
        collection: "connections",
        index,
        field,
      })?;
      NodeId::from_json(raw).ok_or(GraphError::InvalidId {
        collection: "connections",
        index,
        field,
      })
    };

    let from = endpoint("from")?;
    let to = endpoint("to")?;

    let from_port = match obj.get("fromPort") {
      None | Some(Value::Null) => Some(0),
      Some(port) => port.as_u64().and_then(|p| usize::try_from(p).ok()),
    };

    Ok(Self {
      from,
      from_port,
      to,
    })
  }
}
