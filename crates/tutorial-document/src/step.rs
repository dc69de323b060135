use serde::{Deserialize, Serialize};

use crate::content::ContentBlock;

/// A labeled choice leading to another step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOption {
  pub label: String,
  /// Target step. Empty means the tutorial ends here.
  #[serde(default)]
  pub next_step_id: String,
}

impl StepOption {
  pub fn new(label: impl Into<String>, next_step_id: impl Into<String>) -> Self {
    Self {
      label: label.into(),
      next_step_id: next_step_id.into(),
    }
  }

  /// An option that ends the tutorial.
  pub fn terminal(label: impl Into<String>) -> Self {
    Self::new(label, String::new())
  }

  pub fn is_terminal(&self) -> bool {
    self.next_step_id.is_empty()
  }
}

/// One screen of a tutorial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
  pub step_id: String,
  pub title: String,
  #[serde(default)]
  pub content: Vec<ContentBlock>,
  #[serde(default)]
  pub options: Vec<StepOption>,
}

impl Step {
  pub fn new(step_id: impl Into<String>, title: impl Into<String>) -> Self {
    Self {
      step_id: step_id.into(),
      title: title.into(),
      content: Vec::new(),
      options: Vec::new(),
    }
  }

  /// True when no option leads to another step.
  pub fn is_final(&self) -> bool {
    self.options.iter().all(StepOption::is_terminal)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_missing_next_step_is_terminal() {
    let option: StepOption = serde_json::from_value(json!({ "label": "Done" })).unwrap();
    assert!(option.is_terminal());
    assert_eq!(option, StepOption::terminal("Done"));
  }

  #[test]
  fn test_is_final() {
    let mut step = Step::new("check-cables", "Check Cables");
    assert!(step.is_final());

    step.options.push(StepOption::terminal("It works now!"));
    assert!(step.is_final());

    step.options.push(StepOption::new("Still no internet", "contact-isp"));
    assert!(!step.is_final());
  }
}
