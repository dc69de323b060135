use thiserror::Error;

use tutorial_graph::GraphError;

/// Errors that can occur while compiling a graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
  /// The submitted graph is structurally invalid.
  #[error("invalid graph: {0}")]
  InvalidGraph(#[from] GraphError),

  /// Two nodes share an id (after stringification).
  #[error("duplicate node id: {node_id}")]
  DuplicateNodeId { node_id: String },
}
