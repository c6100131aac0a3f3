//! Render Model - annotations to segments
//!
//! This crate turns a paragraph and the annotations layered on it into a
//! sequence of disjoint segments, resolves the visual attributes of each
//! segment, and maps between paragraph offsets and the rendered node tree.
//! Presentation targets (currently HTML) sit on top of the segments; the
//! segmenter itself knows nothing about them.

mod caret;
mod error;
pub mod html;
mod segment;
mod segmenter;
mod selection;
mod style;

pub use caret::*;
pub use error::*;
pub use segment::*;
pub use segmenter::*;
pub use selection::*;
pub use style::*;
