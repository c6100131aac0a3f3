//! Caret placement: paragraph offset to a point in the rendered tree
//!
//! The inverse of [`paragraph_offset`](crate::paragraph_offset). Only text
//! nodes are candidates and icon subtrees are skipped, so an offset next to
//! an icon lands in the text around it, never inside the icon.

use crate::{DomPoint, RenderNode};

/// Which side wins when an offset sits exactly between two text nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaretAffinity {
    /// Start of the following text node
    #[default]
    Leading,
    /// End of the preceding text node
    Trailing,
}

struct TextRun {
    path: Vec<usize>,
    start: usize,
    len: usize,
}

fn collect_runs(node: &RenderNode, path: &mut Vec<usize>, start: &mut usize, runs: &mut Vec<TextRun>) {
    match node {
        RenderNode::Text(text) => {
            let len = text.chars().count();
            runs.push(TextRun {
                path: path.clone(),
                start: *start,
                len,
            });
            *start += len;
        }
        RenderNode::Span(children) => {
            for (i, child) in children.iter().enumerate() {
                path.push(i);
                collect_runs(child, path, start, runs);
                path.pop();
            }
        }
        RenderNode::Icon(_) => {}
    }
}

/// Locate the point for a paragraph offset.
///
/// Returns `None` when the offset lies past the end of the paragraph. A
/// paragraph without text nodes places the caret at the start of the root.
pub fn caret_point(root: &RenderNode, offset: usize, affinity: CaretAffinity) -> Option<DomPoint> {
    let mut runs = Vec::new();
    collect_runs(root, &mut Vec::new(), &mut 0, &mut runs);

    if runs.is_empty() {
        return (offset == 0).then(|| DomPoint::new(Vec::new(), 0));
    }

    let mut candidates = runs
        .iter()
        .filter(|run| offset >= run.start && offset <= run.start + run.len);
    let run = match affinity {
        CaretAffinity::Trailing => candidates.next(),
        CaretAffinity::Leading => candidates.last(),
    }?;

    Some(DomPoint::new(run.path.clone(), offset - run.start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paragraph_offset;
    use proptest::prelude::*;

    fn text(s: &str) -> RenderNode {
        RenderNode::Text(s.to_string())
    }

    fn sample() -> RenderNode {
        RenderNode::Span(vec![
            RenderNode::Span(vec![text("Hello")]),
            RenderNode::Icon(vec![text("icon label")]),
            text(" world"),
        ])
    }

    #[test]
    fn test_caret_affinity_default() {
        assert_eq!(CaretAffinity::default(), CaretAffinity::Leading);
    }

    #[test]
    fn test_caret_inside_text() {
        let root = sample();
        assert_eq!(
            caret_point(&root, 2, CaretAffinity::Leading),
            Some(DomPoint::new(vec![0, 0], 2))
        );
        assert_eq!(
            caret_point(&root, 8, CaretAffinity::Leading),
            Some(DomPoint::new(vec![2], 3))
        );
    }

    #[test]
    fn test_caret_at_icon_boundary() {
        let root = sample();
        assert_eq!(
            caret_point(&root, 5, CaretAffinity::Leading),
            Some(DomPoint::new(vec![2], 0))
        );
        assert_eq!(
            caret_point(&root, 5, CaretAffinity::Trailing),
            Some(DomPoint::new(vec![0, 0], 5))
        );
    }

    #[test]
    fn test_caret_past_end() {
        assert_eq!(caret_point(&sample(), 12, CaretAffinity::Leading), None);
    }

    #[test]
    fn test_caret_in_empty_paragraph() {
        let root = RenderNode::Span(vec![RenderNode::Icon(vec![])]);
        assert_eq!(
            caret_point(&root, 0, CaretAffinity::Leading),
            Some(DomPoint::new(vec![], 0))
        );
        assert_eq!(caret_point(&root, 1, CaretAffinity::Leading), None);
    }

    proptest! {
        #[test]
        fn prop_caret_round_trips_through_offset(offset in 0usize..=11, trailing in any::<bool>()) {
            let root = sample();
            let affinity = if trailing { CaretAffinity::Trailing } else { CaretAffinity::Leading };
            let point = caret_point(&root, offset, affinity).unwrap();
            prop_assert_eq!(paragraph_offset(&root, &point).unwrap(), offset);
        }
    }
}
