//! ZIP archive access for DOCX packages

use crate::docx::error::{DocxError, DocxResult};
use quick_xml::events::BytesStart;
use quick_xml::Reader;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Main document part inside the package
pub const DOCUMENT_PART: &str = "word/document.xml";

/// A wrapper around a ZIP archive for reading DOCX files
pub struct DocxReader<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> DocxReader<R> {
    /// Open a package from a source that implements Read + Seek
    pub fn new(reader: R) -> DocxResult<Self> {
        let archive = ZipArchive::new(reader)?;
        Ok(Self { archive })
    }

    /// Read a part of the package as a string
    pub fn read_file_as_string(&mut self, path: &str) -> DocxResult<String> {
        let mut file = self.archive.by_name(path).map_err(|e| {
            if matches!(e, zip::result::ZipError::FileNotFound) {
                DocxError::MissingPart(path.to_string())
            } else {
                DocxError::from(e)
            }
        })?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Ok(contents)
    }

    /// Check if a part exists in the package
    pub fn file_exists(&self, path: &str) -> bool {
        self.archive.file_names().any(|name| name == path)
    }

    /// A Word package has a content types part and a main document
    pub fn is_valid_docx(&self) -> bool {
        self.file_exists("[Content_Types].xml") && self.file_exists(DOCUMENT_PART)
    }

    /// Read the main document part, checking the package layout first
    pub fn read_document_xml(&mut self) -> DocxResult<String> {
        if !self.is_valid_docx() {
            return Err(DocxError::InvalidStructure(
                "package has no Word document part".to_string(),
            ));
        }
        self.read_file_as_string(DOCUMENT_PART)
    }
}

/// Create an XML reader over document content.
///
/// Text is not trimmed: whitespace inside `w:t` runs is significant.
pub fn xml_reader(content: &str) -> Reader<&[u8]> {
    Reader::from_str(content)
}

/// Get a `w:` namespaced attribute, falling back to the bare name
pub fn w_attribute(event: &BytesStart, name: &str) -> Option<String> {
    let prefixed = format!("w:{}", name);
    event
        .attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == prefixed.as_bytes() || a.key.as_ref() == name.as_bytes())
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_w_attribute() {
        let event = BytesStart::from_content(r#"w:br w:type="page""#, 4);
        assert_eq!(w_attribute(&event, "type").as_deref(), Some("page"));
        assert_eq!(w_attribute(&event, "clear"), None);
    }

    #[test]
    fn test_not_a_zip() {
        let result = DocxReader::new(std::io::Cursor::new(b"plain text".to_vec()));
        assert!(matches!(result, Err(DocxError::Zip(_))));
    }
}
