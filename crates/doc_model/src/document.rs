//! Document - the ordered paragraphs of one uploaded file

use crate::Paragraph;
use serde::{Deserialize, Serialize};

/// An uploaded document reduced to its plain-text paragraphs.
///
/// A document is loaded wholesale and replaced wholesale; it is never
/// partially mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier assigned by the document service, if any
    doc_id: Option<String>,
    /// Original file name of the upload
    filename: Option<String>,
    /// Paragraphs in reading order
    paragraphs: Vec<Paragraph>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from paragraph texts, indexing them in order
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let paragraphs = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| Paragraph::new(index, text))
            .collect();
        Self {
            doc_id: None,
            filename: None,
            paragraphs,
        }
    }

    /// Attach the service-side identity of the document
    pub fn with_identity(mut self, doc_id: impl Into<String>, filename: impl Into<String>) -> Self {
        self.doc_id = Some(doc_id.into());
        self.filename = Some(filename.into());
        self
    }

    /// Get the document id
    pub fn doc_id(&self) -> Option<&str> {
        self.doc_id.as_deref()
    }

    /// Get the original file name
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Get all paragraphs
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Get a paragraph by index
    pub fn paragraph(&self, index: usize) -> Option<&Paragraph> {
        self.paragraphs.get(index)
    }

    /// Number of paragraphs
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    /// Check if the document has no paragraphs
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_texts_assigns_indices() {
        let doc = Document::from_texts(["First", "Second", "Third"]);
        assert_eq!(doc.len(), 3);
        for (i, para) in doc.paragraphs().iter().enumerate() {
            assert_eq!(para.index, i);
        }
        assert_eq!(doc.paragraph(1).unwrap().text, "Second");
        assert!(doc.paragraph(3).is_none());
    }

    #[test]
    fn test_identity() {
        let doc = Document::from_texts(["a"]).with_identity("doc-1", "report.docx");
        assert_eq!(doc.doc_id(), Some("doc-1"));
        assert_eq!(doc.filename(), Some("report.docx"));
        assert_eq!(Document::new().doc_id(), None);
    }
}
