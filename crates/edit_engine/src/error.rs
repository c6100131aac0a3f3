//! Error types for editing operations

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Document model error: {0}")]
    DocModel(#[from] doc_model::DocModelError),

    #[error("An icon is waiting to be placed")]
    PlacementPending,

    #[error("No icon is waiting to be placed")]
    NoPendingIcon,
}

impl EditError {
    /// Whether the error is a rejected range
    pub fn is_invalid_range(&self) -> bool {
        matches!(self, EditError::DocModel(e) if e.is_invalid_range())
    }
}

pub type Result<T> = std::result::Result<T, EditError>;
