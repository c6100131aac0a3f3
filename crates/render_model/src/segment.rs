//! Segment types produced by the segmenter

use crate::VisualStyle;
use doc_model::{Annotation, AnnotationId};
use serde::{Deserialize, Serialize};

/// One piece of a rendered paragraph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    /// Text with no active annotation
    Plain {
        start: usize,
        end: usize,
        text: String,
    },
    /// Text covered by one or more span annotations, in insertion order
    Styled {
        start: usize,
        end: usize,
        text: String,
        annotations: Vec<Annotation>,
    },
    /// An inline icon anchored between two characters
    Icon { offset: usize, annotation: Annotation },
}

impl Segment {
    /// Text of the segment; icons contribute no text
    pub fn text(&self) -> &str {
        match self {
            Segment::Plain { text, .. } | Segment::Styled { text, .. } => text,
            Segment::Icon { .. } => "",
        }
    }

    /// Char range covered by the segment (empty for icons)
    pub fn range(&self) -> std::ops::Range<usize> {
        match self {
            Segment::Plain { start, end, .. } | Segment::Styled { start, end, .. } => *start..*end,
            Segment::Icon { offset, .. } => *offset..*offset,
        }
    }

    /// Whether this is an icon segment
    pub fn is_icon(&self) -> bool {
        matches!(self, Segment::Icon { .. })
    }

    /// Active annotations (empty for plain text)
    pub fn annotations(&self) -> &[Annotation] {
        match self {
            Segment::Styled { annotations, .. } => annotations,
            Segment::Icon { annotation, .. } => std::slice::from_ref(annotation),
            Segment::Plain { .. } => &[],
        }
    }

    /// Resolved visual attributes of a styled segment
    pub fn visual_style(&self) -> Option<VisualStyle> {
        match self {
            Segment::Styled {
                start, annotations, ..
            } => Some(VisualStyle::resolve(annotations, *start)),
            _ => None,
        }
    }
}

/// Paragraph-level decoration contributed by the latest callout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphDecoration {
    /// The callout that won
    pub annotation_id: AnnotationId,
    /// Container border color
    pub border_color: String,
    /// Container background color
    pub background: String,
}

/// A paragraph after segmentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedParagraph {
    /// Paragraph index in the document
    pub index: usize,
    /// Segments in reading order
    pub segments: Vec<Segment>,
    /// Callout decoration, if any callout targets this paragraph
    pub decoration: Option<ParagraphDecoration>,
}

impl RenderedParagraph {
    /// Concatenated text of all segments (icons excluded)
    pub fn text(&self) -> String {
        self.segments.iter().map(Segment::text).collect()
    }

    /// Number of icon segments
    pub fn icon_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_icon()).count()
    }
}
