//! Partition a paragraph into minimal segments of uniform annotation coverage
//!
//! The segmenter is a pure function of the paragraph text and the
//! annotations given for it. Every span edge and icon anchor becomes a
//! boundary; between two consecutive boundaries the set of covering span
//! annotations cannot change, so each gap becomes exactly one segment.
//!
//! Offsets that no longer fit the paragraph are clamped when computing
//! boundaries, so stale annotations degrade instead of failing.

use crate::{ParagraphDecoration, RenderedParagraph, Segment};
use doc_model::{Annotation, AnnotationKind, AnnotationStore, Document, Paragraph};
use std::collections::BTreeSet;

/// Render one paragraph with the annotations that target it
pub fn render_paragraph(paragraph: &Paragraph, annotations: &[&Annotation]) -> RenderedParagraph {
    let text = paragraph.text.as_str();

    // Byte position of every char offset, plus the end of the string
    let byte_at: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let len = byte_at.len() - 1;
    let clamp = |offset: usize| offset.min(len);

    let mut points = Vec::new();
    let mut blocks = Vec::new();
    let mut spans = Vec::new();
    for annotation in annotations {
        match annotation.kind {
            AnnotationKind::InlineIcon(_) => points.push(*annotation),
            AnnotationKind::Callout { .. } => blocks.push(*annotation),
            AnnotationKind::Span { .. } => spans.push(*annotation),
        }
    }

    let mut boundaries = BTreeSet::from([0, len]);
    for span in &spans {
        boundaries.insert(clamp(span.start_offset));
        boundaries.insert(clamp(span.end_offset));
    }
    for point in &points {
        boundaries.insert(clamp(point.start_offset));
    }
    let boundaries: Vec<usize> = boundaries.into_iter().collect();

    let icons_at = |offset: usize| {
        points
            .iter()
            .filter(move |p| clamp(p.start_offset) == offset)
            .map(move |p| Segment::Icon {
                offset,
                annotation: (*p).clone(),
            })
    };

    let mut segments = Vec::new();
    for pair in boundaries.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        segments.extend(icons_at(start));

        let slice = &text[byte_at[start]..byte_at[end]];
        if slice.is_empty() {
            continue;
        }

        let active: Vec<Annotation> = spans
            .iter()
            .filter(|s| s.start_offset <= start && s.end_offset >= end)
            .map(|s| (*s).clone())
            .collect();

        let text = slice.to_string();
        if active.is_empty() {
            segments.push(Segment::Plain { start, end, text });
        } else {
            segments.push(Segment::Styled {
                start,
                end,
                text,
                annotations: active,
            });
        }
    }
    segments.extend(icons_at(len));

    let decoration = blocks.last().and_then(|callout| match &callout.kind {
        AnnotationKind::Callout {
            border_color,
            background,
        } => Some(ParagraphDecoration {
            annotation_id: callout.id.clone(),
            border_color: border_color.clone(),
            background: background.clone(),
        }),
        _ => None,
    });

    RenderedParagraph {
        index: paragraph.index,
        segments,
        decoration,
    }
}

/// Render every paragraph of a document
pub fn render_document(document: &Document, store: &AnnotationStore) -> Vec<RenderedParagraph> {
    document
        .paragraphs()
        .iter()
        .map(|p| render_paragraph(p, &store.by_paragraph(p.index)))
        .collect()
}
