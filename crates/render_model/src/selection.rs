//! Mapping between rendered nodes and paragraph offsets
//!
//! A rendered paragraph is a small tree of text runs, styled wrappers and
//! inline icons. Paragraph offsets count only the characters of text nodes,
//! in document order, and never anything inside an icon: an icon may carry
//! its own markup (an SVG title, alt text) but it does not exist as far as
//! offsets are concerned.

use crate::error::{RenderError, Result};
use crate::style::split_first_grapheme;
use crate::{RenderedParagraph, Segment};
use doc_model::{Document, TextSelection};
use serde::{Deserialize, Serialize};

/// A node of a rendered paragraph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderNode {
    /// A run of document text
    Text(String),
    /// A styling wrapper around other nodes
    Span(Vec<RenderNode>),
    /// An inline icon; its contents never count towards offsets
    Icon(Vec<RenderNode>),
}

impl RenderNode {
    /// Children of an element node
    pub fn children(&self) -> Option<&[RenderNode]> {
        match self {
            RenderNode::Span(children) | RenderNode::Icon(children) => Some(children),
            RenderNode::Text(_) => None,
        }
    }

    /// Number of paragraph characters contributed by this subtree
    pub fn text_len(&self) -> usize {
        match self {
            RenderNode::Text(text) => text.chars().count(),
            RenderNode::Span(children) => children.iter().map(RenderNode::text_len).sum(),
            RenderNode::Icon(_) => 0,
        }
    }

    /// Paragraph text contributed by this subtree
    pub fn text(&self) -> String {
        match self {
            RenderNode::Text(text) => text.clone(),
            RenderNode::Span(children) => children.iter().map(RenderNode::text).collect(),
            RenderNode::Icon(_) => String::new(),
        }
    }
}

/// A boundary point inside a rendered paragraph.
///
/// `path` is a list of child indices from the paragraph root. When it ends on
/// a text node, `offset` is a char offset into that node; when it ends on an
/// element, `offset` is a child index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomPoint {
    pub path: Vec<usize>,
    pub offset: usize,
}

impl DomPoint {
    pub fn new(path: Vec<usize>, offset: usize) -> Self {
        Self { path, offset }
    }
}

/// One end of a selection, with the paragraph it was made in
#[derive(Debug, Clone, Copy)]
pub struct SelectionEndpoint<'a> {
    pub para_index: usize,
    pub root: &'a RenderNode,
    pub point: &'a DomPoint,
}

/// Build the node tree the presentation adapter paints for a paragraph
pub fn render_nodes(paragraph: &RenderedParagraph) -> RenderNode {
    let children = paragraph
        .segments
        .iter()
        .map(|segment| match segment {
            Segment::Plain { text, .. } => RenderNode::Text(text.clone()),
            Segment::Styled { text, .. } => {
                let drop_cap = segment.visual_style().and_then(|s| s.drop_cap);
                let (first, rest) = split_first_grapheme(text);
                if drop_cap.is_some() && !rest.is_empty() {
                    RenderNode::Span(vec![
                        RenderNode::Span(vec![RenderNode::Text(first.to_string())]),
                        RenderNode::Text(rest.to_string()),
                    ])
                } else if drop_cap.is_some() {
                    RenderNode::Span(vec![RenderNode::Span(vec![RenderNode::Text(text.clone())])])
                } else {
                    RenderNode::Span(vec![RenderNode::Text(text.clone())])
                }
            }
            Segment::Icon { .. } => RenderNode::Icon(Vec::new()),
        })
        .collect();
    RenderNode::Span(children)
}

/// Convert a boundary point to a paragraph offset.
///
/// A point anywhere inside an icon resolves to the icon's anchor.
pub fn paragraph_offset(root: &RenderNode, point: &DomPoint) -> Result<usize> {
    let invalid = || RenderError::InvalidPath(point.path.clone());

    let mut node = root;
    let mut before = 0;
    for &index in &point.path {
        if let RenderNode::Icon(_) = node {
            return Ok(before);
        }
        let children = node.children().ok_or_else(invalid)?;
        let child = children.get(index).ok_or_else(invalid)?;
        before += children[..index].iter().map(RenderNode::text_len).sum::<usize>();
        node = child;
    }

    match node {
        RenderNode::Text(text) => {
            if point.offset > text.chars().count() {
                return Err(invalid());
            }
            Ok(before + point.offset)
        }
        RenderNode::Span(children) => {
            let preceding = children.get(..point.offset).ok_or_else(invalid)?;
            Ok(before + preceding.iter().map(RenderNode::text_len).sum::<usize>())
        }
        RenderNode::Icon(_) => Ok(before),
    }
}

/// Resolve a selection made on rendered paragraphs into paragraph coordinates.
///
/// Backward selections are normalized. A selection whose ends sit in
/// different paragraphs is rejected.
pub fn resolve_selection(
    document: &Document,
    anchor: SelectionEndpoint<'_>,
    focus: SelectionEndpoint<'_>,
) -> Result<TextSelection> {
    if anchor.para_index != focus.para_index {
        return Err(RenderError::CrossParagraphSelection {
            anchor: anchor.para_index,
            focus: focus.para_index,
        });
    }
    let paragraph = document
        .paragraph(anchor.para_index)
        .ok_or(RenderError::UnknownParagraph(anchor.para_index))?;

    let start = paragraph_offset(anchor.root, anchor.point)?;
    let end = paragraph_offset(focus.root, focus.point)?;
    Ok(TextSelection::in_document(
        document,
        paragraph.index,
        start,
        end,
    ))
}
