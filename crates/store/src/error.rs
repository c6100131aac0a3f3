//! Error types for storage operations

use crate::docx::DocxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Document model error: {0}")]
    DocModel(#[from] doc_model::DocModelError),

    #[error("DOCX error: {0}")]
    Docx(#[from] DocxError),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("File too large: {size} bytes (limit {limit})")]
    TooLarge { size: u64, limit: u64 },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Document service error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
