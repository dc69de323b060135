//! Tutorial Graph
//!
//! This crate contains the authoring-side representation of a tutorial: the
//! nodes and labeled connections an editor draws on the canvas. These types
//! represent a flow before it is compiled into a step document.
//!
//! Graphs arrive as raw JSON snapshots from the editor. Parsing is lenient
//! about optional fields (titles, output labels, ports) and strict about the
//! structure itself:
//! - a missing title or output label is repaired with a default
//! - a `nodes` value that is not an array is a [`GraphError`]
//!
//! Editor-only fields (canvas positions, zoom, id counters) are ignored here.
//! Callers that need exact round-trips keep the raw JSON alongside.

mod connection;
mod error;
mod graph;
mod node;

pub use connection::{Connection, FALLBACK_LABEL};
pub use error::GraphError;
pub use graph::Graph;
pub use node::{DEFAULT_TITLE, Node, NodeId, NodeKind};
