//! Selection model - a user selection expressed in paragraph coordinates

use crate::Document;
use serde::{Deserialize, Serialize};

/// A selected text range inside one paragraph.
///
/// This is what the UI hands the engine after mapping a visual selection
/// back to paragraph offsets. Offsets never count inline icons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSelection {
    /// Paragraph the selection lives in
    pub para_index: usize,
    /// Start char offset
    pub start_offset: usize,
    /// End char offset
    pub end_offset: usize,
    /// The selected text
    pub text: String,
}

impl TextSelection {
    /// Create a new selection, normalizing a backward range
    pub fn new(para_index: usize, start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            para_index,
            start_offset: start.min(end),
            end_offset: start.max(end),
            text: text.into(),
        }
    }

    /// Create a selection whose text is taken from the document
    pub fn in_document(document: &Document, para_index: usize, start: usize, end: usize) -> Self {
        let text = document
            .paragraph(para_index)
            .map(|p| p.slice(start.min(end), start.max(end)).to_string())
            .unwrap_or_default();
        Self::new(para_index, start, end, text)
    }

    /// Check if the selection is collapsed (just a caret)
    pub fn is_collapsed(&self) -> bool {
        self.start_offset == self.end_offset
    }

    /// Check if the selection covers only whitespace
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
