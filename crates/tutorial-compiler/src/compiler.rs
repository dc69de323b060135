use std::collections::HashMap;

use serde_json::Value;
use tutorial_document::{ContentBlock, Document, Step, StepOption};
use tutorial_graph::{Connection, Graph, Node, NodeId};

use crate::error::CompileError;

/// Compile a raw editor snapshot into a document.
///
/// Shorthand for [`Graph::from_json`] followed by [`compile`].
pub fn compile_json(value: &Value) -> Result<Document, CompileError> {
  let graph = Graph::from_json(value)?;
  compile(&graph)
}

/// Compile a graph into a document.
///
/// This process:
/// 1. Rejects duplicate node ids
/// 2. Groups connections into options per source node, keeping submission order
/// 3. Emits one step per non-`start` node, in node order
/// 4. Derives the entry step from the single `start` node, if there is one
///
/// The output depends only on the input. Dangling option targets are kept.
pub fn compile(graph: &Graph) -> Result<Document, CompileError> {
  let nodes = index_nodes(graph)?;
  let mut options = collect_options(&graph.connections, &nodes);

  let steps: Vec<Step> = graph
    .nodes
    .iter()
    .filter(|node| !node.kind.is_start())
    .map(|node| build_step(node, options.remove(&node.id).unwrap_or_default()))
    .collect();

  let document = Document {
    entry_step_id: entry_step_id(graph),
    steps,
  };

  tracing::debug!(
    nodes = graph.nodes.len(),
    connections = graph.connections.len(),
    steps = document.steps.len(),
    entry = ?document.entry_step_id,
    "compiled tutorial graph"
  );

  Ok(document)
}

/// Index nodes by id, rejecting duplicates.
fn index_nodes(graph: &Graph) -> Result<HashMap<&NodeId, &Node>, CompileError> {
  let mut nodes = HashMap::with_capacity(graph.nodes.len());
  for node in &graph.nodes {
    if nodes.insert(&node.id, node).is_some() {
      return Err(CompileError::DuplicateNodeId {
        node_id: node.id.to_string(),
      });
    }
  }
  Ok(nodes)
}

/// Group connections by source node, resolving each label.
fn collect_options<'a>(
  connections: &'a [Connection],
  nodes: &HashMap<&NodeId, &Node>,
) -> HashMap<&'a NodeId, Vec<StepOption>> {
  let mut options: HashMap<&NodeId, Vec<StepOption>> = HashMap::new();
  for conn in connections {
    let label = conn.label(nodes.get(&conn.from).copied());
    options
      .entry(&conn.from)
      .or_default()
      .push(StepOption::new(label, conn.to.as_str()));
  }
  options
}

fn build_step(node: &Node, options: Vec<StepOption>) -> Step {
  let content = node
    .text()
    .map(|text| vec![ContentBlock::text(text)])
    .unwrap_or_default();

  Step {
    step_id: node.id.to_string(),
    title: node.title().to_string(),
    content,
    options,
  }
}

/// First target wired from the graph's only `start` node.
fn entry_step_id(graph: &Graph) -> Option<String> {
  let mut starts = graph.start_nodes();
  let start = starts.next()?;

  if starts.next().is_some() {
    tracing::warn!(
      start = %start.id,
      count = graph.start_nodes().count(),
      "graph has more than one start node; leaving entry step unset"
    );
    return None;
  }

  graph
    .outgoing(&start.id)
    .next()
    .map(|conn| conn.to.to_string())
}
