//! Edit Engine - Editing session and undo/redo
//!
//! This crate owns all mutable state of a document session: the annotation
//! collection, the linear undo/redo stacks, the tool palette, the pending
//! icon placement and the outgoing action log.

mod error;
mod history;
mod session;
mod tool;
mod undo;

pub use error::*;
pub use history::*;
pub use session::*;
pub use tool::*;
pub use undo::*;
