use thiserror::Error;

/// Structural problems in a submitted graph.
///
/// Only input that cannot be interpreted as a graph at all ends up here.
/// Soft irregularities (missing titles, out-of-range ports) are repaired
/// during parsing instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
  /// The graph snapshot is not a JSON object.
  #[error("graph must be a JSON object")]
  NotAnObject,

  /// `nodes` or `connections` is present but not an array.
  #[error("'{field}' must be an array")]
  NotAnArray { field: &'static str },

  /// An entry of `nodes` or `connections` is not an object.
  #[error("{collection}[{index}] must be an object")]
  EntryNotAnObject {
    collection: &'static str,
    index: usize,
  },

  /// A required field is absent.
  #[error("{collection}[{index}] is missing '{field}'")]
  MissingField {
    collection: &'static str,
    index: usize,
    field: &'static str,
  },

  /// A node reference is neither a string nor a number.
  #[error("{collection}[{index}].{field} must be a string or a number")]
  InvalidId {
    collection: &'static str,
    index: usize,
    field: &'static str,
  },

  /// A node's `type` is not a string.
  #[error("nodes[{index}].type must be a string")]
  InvalidType { index: usize },
}
