//! Tutorial Document
//!
//! This crate provides the compiled representation of a tutorial: an ordered
//! list of steps, each with content blocks and options pointing at other
//! steps. This is what a reader walks at runtime.
//!
//! Key differences from `tutorial-graph`:
//! - Node ids are replaced by string step ids
//! - Connection labels are resolved into options
//! - `start` nodes are gone; the entry point is an explicit field
//! - Option targets are not checked. A target missing from the document is
//!   allowed and reported by [`Document::dangling_targets`]

mod content;
mod document;
mod step;

pub use content::{ContentBlock, EmbedBlock, ImageBlock};
pub use document::Document;
pub use step::{Step, StepOption};
