//! Dialogue scripts
//!
//! Parses the line-oriented dialogue script format into a [`DialogueGraph`]
//! and offers an optional validation pass over the result.

pub mod graph;
pub mod parser;
pub mod validate;

pub use graph::{DialogueGraph, DialogueNode, DialogueOption};
pub use parser::{ScriptParser, DialogueError, DialogueResult};
pub use validate::{validate, ValidationIssue};
