//! Paragraph - a block of plain text extracted from the uploaded document

use serde::{Deserialize, Serialize};

/// A single paragraph of plain text.
///
/// Offsets into a paragraph are counted in Unicode scalar values (chars),
/// never in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Position of the paragraph in reading order
    pub index: usize,
    /// The paragraph text
    pub text: String,
}

impl Paragraph {
    /// Create a new paragraph
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Length of the paragraph in chars; the bound for every offset into it
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if the paragraph has no text
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Extract the text between two char offsets (clamped to the paragraph)
    pub fn slice(&self, start: usize, end: usize) -> &str {
        char_slice(&self.text, start, end)
    }
}

/// Slice a string by char offsets, clamping both ends to the string length
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }
    let byte_at = |offset: usize| {
        text.char_indices()
            .nth(offset)
            .map(|(i, _)| i)
            .unwrap_or(text.len())
    };
    let start_byte = byte_at(start);
    let end_byte = byte_at(end);
    &text[start_byte..end_byte]
}
