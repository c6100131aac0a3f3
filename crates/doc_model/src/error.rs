//! Error types for document model operations

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocModelError {
    #[error("Invalid range: paragraph {para_index}, offsets {start}..{end} ({reason})")]
    InvalidRange {
        para_index: usize,
        start: usize,
        end: usize,
        reason: String,
    },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid value for {style}: {value}")]
    InvalidStyleValue { style: String, value: String },

    #[error("Unknown annotation type: {0}")]
    UnknownAnnotationType(String),
}

impl DocModelError {
    pub(crate) fn invalid_range(
        para_index: usize,
        start: usize,
        end: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidRange {
            para_index,
            start,
            end,
            reason: reason.into(),
        }
    }

    /// Check whether this is a range rejection
    pub fn is_invalid_range(&self) -> bool {
        matches!(self, Self::InvalidRange { .. })
    }
}

pub type Result<T> = std::result::Result<T, DocModelError>;
