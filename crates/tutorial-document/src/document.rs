use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::step::Step;

/// A compiled tutorial: steps in authoring order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
  /// Step a reader starts on. Derived from the graph's `start` node; `None`
  /// when the graph has no single start node wired to a step.
  #[serde(default)]
  pub entry_step_id: Option<String>,
  #[serde(default)]
  pub steps: Vec<Step>,
}

impl Document {
  pub fn new(steps: Vec<Step>) -> Self {
    Self {
      entry_step_id: None,
      steps,
    }
  }

  /// Get a step by ID.
  pub fn step(&self, step_id: &str) -> Option<&Step> {
    self.steps.iter().find(|s| s.step_id == step_id)
  }

  /// The step a reader starts on.
  ///
  /// Uses `entry_step_id` when it names a step in this document, otherwise
  /// the first step.
  pub fn entry_step(&self) -> Option<&Step> {
    self
      .entry_step_id
      .as_deref()
      .and_then(|id| self.step(id))
      .or_else(|| self.steps.first())
  }

  /// Option targets that name no step in this document, in first-seen order.
  pub fn dangling_targets(&self) -> Vec<&str> {
    let known: HashSet<&str> = self.steps.iter().map(|s| s.step_id.as_str()).collect();
    let mut seen = HashSet::new();

    self
      .steps
      .iter()
      .flat_map(|s| &s.options)
      .filter(|o| !o.is_terminal())
      .map(|o| o.next_step_id.as_str())
      .filter(|id| !known.contains(id) && seen.insert(*id))
      .collect()
  }

  pub fn len(&self) -> usize {
    self.steps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }
}
