//! Store - Persistence and the document service
//!
//! This crate handles application settings, DOCX text import, the wire types
//! of the document service, a filesystem-backed implementation of that
//! service, and the recently-used color history.

pub mod api;
pub mod backend;
mod color_history;
pub mod docx;
mod error;
mod file_io;
pub mod local;
mod settings;

pub use api::*;
pub use backend::DocumentBackend;
pub use color_history::*;
pub use error::*;
pub use file_io::*;
pub use local::LocalBackend;
pub use settings::*;

// Re-export DOCX functionality
pub use docx::{extract_content, extract_content_bytes, DocxError, DocxResult};
