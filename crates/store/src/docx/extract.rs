//! Plain-text extraction from the main document part
//!
//! Body paragraphs are numbered in document order, blank ones included, and
//! only non-blank paragraphs are returned (`p-<index>`). Table cells of
//! top-level tables follow the body paragraphs (`t-<table>-<row>-<cell>`),
//! with the paragraphs of a cell joined by newlines. Text boxes and nested
//! tables are skipped.

use super::error::DocxResult;
use super::reader::{w_attribute, xml_reader, DocxReader};
use crate::api::{BlockKind, ContentBlock};
use quick_xml::events::{BytesStart, Event};
use std::io::{Cursor, Read, Seek};

#[derive(Debug, Default)]
struct CellCursor {
    table: usize,
    row: Option<usize>,
    cell: Option<usize>,
    text: String,
    paragraphs: usize,
}

#[derive(Debug, Default)]
struct Extractor {
    body_paragraphs: usize,
    tables_seen: usize,
    table_depth: usize,
    textbox_depth: usize,
    cursor: CellCursor,
    paragraph: Option<String>,
    in_props: bool,
    in_text: bool,
    paragraphs: Vec<ContentBlock>,
    cells: Vec<ContentBlock>,
}

impl Extractor {
    fn wants_text(&self) -> bool {
        self.in_text && self.textbox_depth == 0 && self.paragraph.is_some()
    }

    fn push(&mut self, text: &str) {
        if let Some(paragraph) = self.paragraph.as_mut() {
            paragraph.push_str(text);
        }
    }

    fn start(&mut self, event: &BytesStart) {
        let name = event.name();
        if name.as_ref() == b"w:txbxContent" {
            self.textbox_depth += 1;
            return;
        }
        if self.textbox_depth > 0 {
            return;
        }

        match name.as_ref() {
            b"w:tbl" => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.cursor = CellCursor {
                        table: self.tables_seen,
                        ..CellCursor::default()
                    };
                    self.tables_seen += 1;
                }
            }
            b"w:tr" if self.table_depth == 1 => {
                self.cursor.row = Some(self.cursor.row.map_or(0, |r| r + 1));
                self.cursor.cell = None;
            }
            b"w:tc" if self.table_depth == 1 => {
                self.cursor.cell = Some(self.cursor.cell.map_or(0, |c| c + 1));
                self.cursor.text.clear();
                self.cursor.paragraphs = 0;
            }
            b"w:p" => self.paragraph = Some(String::new()),
            b"w:pPr" => self.in_props = true,
            b"w:t" => self.in_text = true,
            b"w:tab" if !self.in_props => self.push("\t"),
            b"w:cr" => self.push("\n"),
            b"w:br" => {
                let kind = w_attribute(event, "type");
                if !matches!(kind.as_deref(), Some("page") | Some("column")) {
                    self.push("\n");
                }
            }
            _ => {}
        }
    }

    fn end(&mut self, name: &[u8]) {
        if name == b"w:txbxContent" {
            self.textbox_depth = self.textbox_depth.saturating_sub(1);
            return;
        }
        if self.textbox_depth > 0 {
            return;
        }

        match name {
            b"w:t" => self.in_text = false,
            b"w:pPr" => self.in_props = false,
            b"w:p" => self.finish_paragraph(),
            b"w:tc" if self.table_depth == 1 => self.finish_cell(),
            b"w:tbl" => self.table_depth = self.table_depth.saturating_sub(1),
            _ => {}
        }
    }

    fn finish_paragraph(&mut self) {
        let Some(text) = self.paragraph.take() else {
            return;
        };
        match self.table_depth {
            0 => {
                let index = self.body_paragraphs;
                self.body_paragraphs += 1;
                if !text.trim().is_empty() {
                    self.paragraphs.push(ContentBlock::new(
                        format!("p-{}", index),
                        BlockKind::Paragraph,
                        text,
                    ));
                }
            }
            1 => {
                if self.cursor.paragraphs > 0 {
                    self.cursor.text.push('\n');
                }
                self.cursor.text.push_str(&text);
                self.cursor.paragraphs += 1;
            }
            _ => {}
        }
    }

    fn finish_cell(&mut self) {
        let text = std::mem::take(&mut self.cursor.text);
        if text.trim().is_empty() {
            return;
        }
        let id = format!(
            "t-{}-{}-{}",
            self.cursor.table,
            self.cursor.row.unwrap_or(0),
            self.cursor.cell.unwrap_or(0)
        );
        self.cells.push(ContentBlock::new(id, BlockKind::TableCell, text));
    }

    fn finish(mut self) -> Vec<ContentBlock> {
        self.paragraphs.append(&mut self.cells);
        self.paragraphs
    }
}

/// Extract the content blocks of a `word/document.xml` part
pub fn extract_from_xml(xml: &str) -> DocxResult<Vec<ContentBlock>> {
    let mut reader = xml_reader(xml);
    let mut extractor = Extractor::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => extractor.start(&e),
            Event::Empty(e) => {
                extractor.start(&e);
                extractor.end(e.name().as_ref());
            }
            Event::End(e) => extractor.end(e.name().as_ref()),
            Event::Text(e) if extractor.wants_text() => {
                let text = e.unescape()?;
                extractor.push(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(extractor.finish())
}

/// Extract the content blocks of a DOCX package
pub fn extract_content<R: Read + Seek>(reader: R) -> DocxResult<Vec<ContentBlock>> {
    let mut docx = DocxReader::new(reader)?;
    let xml = docx.read_document_xml()?;
    let blocks = extract_from_xml(&xml)?;
    tracing::debug!("Extracted {} content blocks", blocks.len());
    Ok(blocks)
}

/// Extract the content blocks of a DOCX package held in memory
pub fn extract_content_bytes(bytes: &[u8]) -> DocxResult<Vec<ContentBlock>> {
    extract_content(Cursor::new(bytes))
}
