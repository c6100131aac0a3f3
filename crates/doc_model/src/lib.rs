//! Document Model - paragraphs and typographic annotations
//!
//! This crate provides the data model for the annotation overlay: the
//! immutable paragraphs of an uploaded document, the annotations layered on
//! top of them, and the insertion-ordered collection that holds them.

mod annotation;
mod annotation_id;
mod annotation_store;
mod color;
mod document;
mod error;
mod paragraph;
mod selection;

pub use annotation::*;
pub use annotation_id::*;
pub use annotation_store::*;
pub use color::*;
pub use document::*;
pub use error::*;
pub use paragraph::*;
pub use selection::*;
