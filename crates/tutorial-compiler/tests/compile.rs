//! End-to-end compilation of editor snapshots.

use serde_json::json;
use tutorial_compiler::{CompileError, compile_json};
use tutorial_document::{ContentBlock, StepOption};
use tutorial_graph::GraphError;

#[test]
fn test_instruction_and_condition() {
  let graph = json!({
    "nodes": [
      { "id": 1, "type": "instruction", "title": "Do this", "data": { "text": "Hello world" }, "outputs": ["Next"] },
      { "id": 2, "type": "condition", "title": "Check X", "outputs": ["Yes", "No"] }
    ],
    "connections": [
      { "from": 1, "to": 2, "fromPort": 0 }
    ]
  });

  let doc = compile_json(&graph).unwrap();

  assert_eq!(doc.steps.len(), 2);

  let first = doc.step("1").unwrap();
  assert_eq!(first.title, "Do this");
  assert_eq!(first.content, vec![ContentBlock::text("Hello world")]);
  assert_eq!(first.options, vec![StepOption::new("Next", "2")]);

  let second = doc.step("2").unwrap();
  assert_eq!(second.title, "Check X");
  assert!(second.content.is_empty());
  assert!(second.options.is_empty());

  assert_eq!(doc.entry_step_id, None);
}

#[test]
fn test_editor_snapshot_with_start_node() {
  let graph = json!({
    "nodes": [
      { "id": 1, "type": "start", "x": 100, "y": 100, "title": "Start", "outputs": ["Next"], "inputs": false, "data": {} },
      { "id": 2, "type": "instruction", "x": 300, "y": 100, "title": "Is the router on?", "outputs": ["Next"], "inputs": true, "data": { "text": "Check the power lights." } },
      { "id": 3, "type": "condition", "x": 500, "y": 100, "title": "Lights green?", "outputs": ["Yes", "No"], "inputs": true, "data": {} },
      { "id": 4, "type": "end", "x": 700, "y": 100, "title": "End", "outputs": [], "inputs": true, "data": {} }
    ],
    "connections": [
      { "from": 1, "fromPort": 0, "to": 2 },
      { "from": 2, "fromPort": 0, "to": 3 },
      { "from": 3, "fromPort": 1, "to": 2 },
      { "from": 3, "fromPort": 0, "to": 4 }
    ],
    "nextId": 5,
    "canvasX": -2000,
    "canvasY": -2000,
    "scale": 1
  });

  let doc = compile_json(&graph).unwrap();

  let ids: Vec<_> = doc.steps.iter().map(|s| s.step_id.as_str()).collect();
  assert_eq!(ids, vec!["2", "3", "4"]);
  assert_eq!(doc.entry_step_id.as_deref(), Some("2"));
  assert_eq!(doc.entry_step().unwrap().title, "Is the router on?");

  assert_eq!(
    doc.step("3").unwrap().options,
    vec![StepOption::new("No", "2"), StepOption::new("Yes", "4")]
  );
  assert!(doc.step("4").unwrap().is_final());
  assert!(doc.dangling_targets().is_empty());
}

#[test]
fn test_ids_are_always_strings() {
  let graph = json!({
    "nodes": [
      { "id": 10, "type": "instruction", "outputs": ["Go"] },
      { "id": "router-check", "type": "condition", "outputs": ["Yes"] }
    ],
    "connections": [
      { "from": 10, "to": "router-check" },
      { "from": "router-check", "to": 99 }
    ]
  });

  let doc = compile_json(&graph).unwrap();
  let value = serde_json::to_value(&doc).unwrap();

  assert_eq!(value["steps"][0]["step_id"], json!("10"));
  assert_eq!(value["steps"][0]["options"][0]["next_step_id"], json!("router-check"));
  assert_eq!(value["steps"][1]["options"][0]["next_step_id"], json!("99"));
  assert_eq!(doc.dangling_targets(), vec!["99"]);
}

#[test]
fn test_compilation_is_deterministic() {
  let graph = json!({
    "nodes": [
      { "id": 1, "type": "condition", "outputs": ["A", "B", "C"] },
      { "id": 2, "type": "instruction", "data": { "text": "x" } },
      { "id": 3, "type": "instruction", "data": { "text": "y" } }
    ],
    "connections": [
      { "from": 1, "fromPort": 2, "to": 3 },
      { "from": 1, "fromPort": 0, "to": 2 },
      { "from": 1, "fromPort": 1, "to": 3 }
    ]
  });

  let first = compile_json(&graph).unwrap();
  for _ in 0..10 {
    assert_eq!(compile_json(&graph).unwrap(), first);
  }

  let labels: Vec<_> = first.steps[0].options.iter().map(|o| o.label.as_str()).collect();
  assert_eq!(labels, vec!["C", "A", "B"]);
}

#[test]
fn test_stringified_id_collision_is_rejected() {
  let graph = json!({
    "nodes": [
      { "id": 1, "type": "instruction" },
      { "id": "1", "type": "condition" }
    ]
  });

  assert_eq!(
    compile_json(&graph),
    Err(CompileError::DuplicateNodeId {
      node_id: "1".to_string()
    })
  );
}

#[test]
fn test_structural_errors() {
  assert_eq!(
    compile_json(&json!({ "nodes": [], "connections": "none" })),
    Err(CompileError::InvalidGraph(GraphError::NotAnArray {
      field: "connections"
    }))
  );
  assert!(matches!(
    compile_json(&json!({ "nodes": [{ "type": "start" }] })),
    Err(CompileError::InvalidGraph(GraphError::MissingField { field: "id", .. }))
  ));
  assert_eq!(
    compile_json(&json!(null)),
    Err(CompileError::InvalidGraph(GraphError::NotAnObject))
  );
}

#[test]
fn test_empty_graph_compiles_to_empty_document() {
  let doc = compile_json(&json!({ "nodes": [], "connections": [] })).unwrap();
  assert!(doc.is_empty());
  assert_eq!(doc.entry_step_id, None);
}
