//! DOCX text import
//!
//! A DOCX file is a ZIP archive of XML parts. Only the main document part
//! (`word/document.xml`) is read: its paragraphs and table cells become the
//! plain-text content blocks the annotation overlay works on.

mod error;
mod extract;
mod reader;

pub use error::{DocxError, DocxResult};
pub use extract::{extract_content, extract_content_bytes, extract_from_xml};
pub use reader::{DocxReader, DOCUMENT_PART};
