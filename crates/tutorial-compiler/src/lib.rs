mod compiler;
mod error;

pub use compiler::{compile, compile_json};
pub use error::CompileError;
