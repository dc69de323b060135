use serde_json::Value;

use crate::connection::Connection;
use crate::error::GraphError;
use crate::node::{Node, NodeId};

/// A full editor snapshot: nodes and connections in submission order.
///
/// Order matters. Node order becomes step order and connection order
/// becomes option order once the graph is compiled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
  pub nodes: Vec<Node>,
  pub connections: Vec<Connection>,
}

impl Graph {
  pub fn new(nodes: Vec<Node>, connections: Vec<Connection>) -> Self {
    Self { nodes, connections }
  }

  /// Parse an editor snapshot.
  ///
  /// Missing `nodes` or `connections` mean an empty list. Everything else
  /// that cannot be read as a graph is a [`GraphError`].
  pub fn from_json(value: &Value) -> Result<Self, GraphError> {
    let obj = value.as_object().ok_or(GraphError::NotAnObject)?;

    let nodes = entries(obj.get("nodes"), "nodes")?
      .iter()
      .enumerate()
      .map(|(index, node)| Node::from_json(index, node))
      .collect::<Result<Vec<_>, _>>()?;

    let connections = entries(obj.get("connections"), "connections")?
      .iter()
      .enumerate()
      .map(|(index, conn)| Connection::from_json(index, conn))
      .collect::<Result<Vec<_>, _>>()?;

    Ok(Self { nodes, connections })
  }

  /// Get the first node with the given id.
  pub fn node(&self, id: &NodeId) -> Option<&Node> {
    self.nodes.iter().find(|n| &n.id == id)
  }

  /// All `start` nodes, in submission order.
  pub fn start_nodes(&self) -> impl Iterator<Item = &Node> {
    self.nodes.iter().filter(|n| n.kind.is_start())
  }

  /// Connections leaving `id`, in submission order.
  pub fn outgoing<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Connection> {
    self.connections.iter().filter(move |c| &c.from == id)
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty() && self.connections.is_empty()
  }
}

impl TryFrom<&Value> for Graph {
  type Error = GraphError;

  fn try_from(value: &Value) -> Result<Self, Self::Error> {
    Self::from_json(value)
  }
}

fn entries<'a>(value: Option<&'a Value>, field: &'static str) -> Result<&'a [Value], GraphError> {
  match value {
    None => Ok(&[][..]),
    Some(Value::Array(items)) => Ok(items.as_slice()),
    Some(_) => Err(GraphError::NotAnArray { field }),
  }
}
