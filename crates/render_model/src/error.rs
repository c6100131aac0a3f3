//! Error types for render model

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Invalid node path: {0:?}")]
    InvalidPath(Vec<usize>),

    #[error("Selection spans paragraphs {anchor} and {focus}")]
    CrossParagraphSelection { anchor: usize, focus: usize },

    #[error("Unknown paragraph: {0}")]
    UnknownParagraph(usize),
}

pub type Result<T> = std::result::Result<T, RenderError>;
