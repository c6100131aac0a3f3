//! Integration tests for the editing session
//! Tests the annotation lifecycle end to end: add, delete, clear, undo/redo,
//! rendering of the result, and the action log it produces.

use doc_model::{Annotation, AnnotationId, Document, IconPayload, SpanStyle, TextSelection};
use edit_engine::{EditingSession, HistoryEntry, Tool, ToolOutcome};
use proptest::prelude::*;
use render_model::Segment;
use telemetry::LogAction;

fn hello_session() -> EditingSession {
    let mut session = EditingSession::new();
    session.load_document(
        Document::from_texts(["Hello world", "0123456789", "Third paragraph here"])
            .with_identity("doc-42", "report.docx"),
    );
    session
}

fn segment_types(segment: &Segment) -> Vec<&'static str> {
    segment
        .annotations()
        .iter()
        .map(|a| a.annotation_type().as_str())
        .collect()
}

#[test]
fn test_single_highlight_renders_two_segments() {
    let mut session = hello_session();
    session
        .add(Annotation::span(SpanStyle::Highlight, "#FFEB3B", 0, 0, 5, "Hello"))
        .unwrap();

    let rendered = session.render_paragraph(0).unwrap();
    assert_eq!(rendered.segments.len(), 2);
    assert_eq!(rendered.segments[0].text(), "Hello");
    assert_eq!(segment_types(&rendered.segments[0]), vec!["highlight"]);
    assert!(matches!(&rendered.segments[1], Segment::Plain { text, .. } if text == " world"));
}

#[test]
fn test_overlapping_highlight_and_bold() {
    let mut session = hello_session();
    session
        .add(Annotation::span(SpanStyle::Highlight, "#FFEB3B", 0, 0, 5, "Hello"))
        .unwrap();
    session
        .add(Annotation::span(SpanStyle::Bold, "#000000", 0, 3, 8, "lo wo"))
        .unwrap();

    let rendered = session.render_paragraph(0).unwrap();
    let ranges: Vec<_> = rendered.segments.iter().map(Segment::range).collect();
    assert_eq!(ranges, vec![0..3, 3..5, 5..8, 8..11]);
    assert_eq!(segment_types(&rendered.segments[0]), vec!["highlight"]);
    assert_eq!(segment_types(&rendered.segments[1]), vec!["highlight", "bold"]);
    assert_eq!(segment_types(&rendered.segments[2]), vec!["bold"]);
    assert!(segment_types(&rendered.segments[3]).is_empty());
}

#[test]
fn test_icon_segment_sits_before_its_anchor() {
    let mut session = hello_session();
    session.begin_icon_placement(IconPayload::new("star").with_svg("<svg></svg>"));
    session.place_icon(0, 5).unwrap();

    let rendered = session.render_paragraph(0).unwrap();
    let kinds: Vec<_> = rendered
        .segments
        .iter()
        .map(|s| (s.is_icon(), s.text().to_string()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (false, "Hello".to_string()),
            (true, String::new()),
            (false, " world".to_string()),
        ]
    );
}

#[test]
fn test_clear_then_undo_restores_exact_collection() {
    let mut session = hello_session();
    session
        .add(Annotation::span(SpanStyle::Highlight, "#ffeb3b", 0, 0, 5, "Hello"))
        .unwrap();
    session
        .add(Annotation::callout("#1976d2", "#e3f2fd", 1, 0, 10, "0123456789"))
        .unwrap();
    session
        .add(Annotation::span(SpanStyle::Circle, "#1976d2", 2, 0, 5, "Third"))
        .unwrap();
    let before = session.styles_payload();

    assert_eq!(session.clear(), 3);
    assert!(session.annotations().is_empty());

    assert!(session.undo());
    assert_eq!(session.styles_payload(), before);

    assert!(session.redo());
    assert!(session.annotations().is_empty());
}

#[test]
fn test_out_of_bounds_add_is_rejected() {
    let mut session = hello_session();
    session
        .add(Annotation::span(SpanStyle::Bold, "#000000", 1, 0, 2, "01"))
        .unwrap();
    let before = session.styles_payload();
    let undo_len = session.history().undo_len();

    let err = session
        .add(Annotation::span(SpanStyle::Bold, "#000000", 1, 50, 50, ""))
        .unwrap_err();

    assert!(err.is_invalid_range());
    assert_eq!(session.styles_payload(), before);
    assert_eq!(session.history().undo_len(), undo_len);
}

#[test]
fn test_delete_undo_restores_original_position() {
    let mut session = hello_session();
    let first = session
        .add(Annotation::span(SpanStyle::Bold, "#000000", 0, 0, 5, "Hello"))
        .unwrap();
    let second = session
        .add(Annotation::span(SpanStyle::Italic, "#000000", 0, 6, 11, "world"))
        .unwrap();

    session.remove(&first);
    session.undo();

    let ids: Vec<AnnotationId> = session.styles_payload().into_iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![first, second]);
}

#[test]
fn test_undo_and_redo_are_not_logged() {
    let mut session = hello_session();
    let selection = TextSelection::in_document(session.document(), 0, 0, 5);
    session.apply_tool(&selection, Tool::Span(SpanStyle::Bold)).unwrap();
    session.clear();
    session.undo();
    session.undo();
    session.redo();

    let log = session.drain_action_log();
    let actions: Vec<LogAction> = log.iter().map(|e| e.action).collect();
    assert_eq!(actions, vec![LogAction::Add, LogAction::Clear]);
    assert_eq!(log[1].styles_cleared, Some(1));
}

#[test]
fn test_tool_then_recolor_keeps_one_history_entry() {
    let mut session = hello_session();
    let selection = TextSelection::in_document(session.document(), 2, 0, 5);
    let tool = Tool::Span(SpanStyle::TextColor);

    let first = session.apply_tool(&selection, tool).unwrap();
    session
        .palette_mut()
        .set_color(doc_model::ColorCategory::Text, "#123456");
    let second = session.apply_tool(&selection, tool).unwrap();

    let ToolOutcome::Added(id) = first else {
        panic!("expected an add, got {:?}", first);
    };
    assert_eq!(second, ToolOutcome::Updated(id));
    assert_eq!(session.history().undo_len(), 1);

    session.undo();
    assert!(session.annotations().is_empty());
    assert!(!session.can_undo());
}

#[test]
fn test_recolor_after_undone_remove_survives_redo_and_undo() {
    let mut session = hello_session();
    let selection = TextSelection::in_document(session.document(), 0, 0, 5);
    let tool = Tool::Span(SpanStyle::Highlight);
    let ToolOutcome::Added(id) = session.apply_tool(&selection, tool).unwrap() else {
        panic!("expected an add");
    };
    session.remove(&id);
    assert!(session.undo());

    session
        .palette_mut()
        .set_color(doc_model::ColorCategory::Background, "#00ff00");
    assert_eq!(
        session.apply_tool(&selection, tool).unwrap(),
        ToolOutcome::Updated(id.clone())
    );

    assert!(session.redo());
    assert!(session.annotations().is_empty());
    assert!(session.undo());
    assert_eq!(session.annotations().get(&id).unwrap().value(), "#00ff00");

    assert!(session.undo());
    assert!(session.annotations().is_empty());
    assert!(session.redo());
    assert_eq!(session.annotations().get(&id).unwrap().value(), "#00ff00");
}

#[test]
fn test_recolor_after_undone_clear_survives_redo_and_undo() {
    let mut session = hello_session();
    let selection = TextSelection::in_document(session.document(), 0, 0, 5);
    let tool = Tool::Span(SpanStyle::Highlight);
    let ToolOutcome::Added(id) = session.apply_tool(&selection, tool).unwrap() else {
        panic!("expected an add");
    };
    session
        .add(Annotation::span(SpanStyle::Bold, "#000000", 0, 6, 11, "world"))
        .unwrap();
    assert_eq!(session.clear(), 2);
    assert!(session.undo());

    session
        .palette_mut()
        .set_color(doc_model::ColorCategory::Background, "#00ff00");
    session.apply_tool(&selection, tool).unwrap();
    let recolored = session.styles_payload();

    assert!(session.redo());
    assert!(session.annotations().is_empty());
    assert!(session.undo());
    assert_eq!(session.styles_payload(), recolored);
    assert_eq!(session.annotations().get(&id).unwrap().value(), "#00ff00");
}

#[test]
fn test_callout_recolor_updates_border_and_background() {
    let mut session = hello_session();
    let selection = TextSelection::in_document(session.document(), 1, 0, 10);
    let ToolOutcome::Added(id) = session.apply_tool(&selection, Tool::Callout).unwrap() else {
        panic!("expected an add");
    };
    session.remove(&id);
    session.undo();

    session
        .palette_mut()
        .set_color(doc_model::ColorCategory::Border, "#222222");
    session.palette_mut().set_callout_background("#fafafa");
    session.apply_tool(&selection, Tool::Callout).unwrap();
    session.redo();
    session.undo();

    let callout = session.annotations().get(&id).unwrap();
    assert_eq!(callout.value(), "#222222");
    assert_eq!(callout.background(), Some("#fafafa"));
}

#[test]
fn test_history_entries_serialize() {
    let entry = HistoryEntry::clear(vec![Annotation::span(
        SpanStyle::Bold,
        "#000000",
        0,
        0,
        5,
        "Hello",
    )]);
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["op"], "clear");
    assert_eq!(json["count"], 1);
    assert_eq!(json["snapshot"][0]["type"], "bold");
}

// =============================================================================
// Properties
// =============================================================================

const COLORS: [&str; 3] = ["#ffeb3b", "#00ff00", "#123456"];

#[derive(Debug, Clone)]
enum Op {
    Add { para: usize, start: usize, len: usize, style: usize },
    /// Apply a palette tool; hitting an existing range recolors it
    Tool { para: usize, start: usize, len: usize, tool: usize, color: usize },
    Icon { para: usize, offset: usize },
    Remove(usize),
    Clear,
    Undo,
    Redo,
}

fn tools() -> Vec<Tool> {
    let mut tools: Vec<Tool> = SpanStyle::ALL.iter().copied().map(Tool::Span).collect();
    tools.push(Tool::Callout);
    tools
}

/// Mutations only
fn arb_edit() -> impl Strategy<Value = Op> {
    let tool_count = tools().len();
    prop_oneof![
        3 => (0usize..3, 0usize..12, 0usize..6, 0usize..SpanStyle::ALL.len())
            .prop_map(|(para, start, len, style)| Op::Add { para, start, len, style }),
        4 => (0usize..3, 0usize..4, 1usize..4, 0usize..tool_count, 0usize..COLORS.len())
            .prop_map(|(para, start, len, tool, color)| Op::Tool { para, start, len, tool, color }),
        1 => (0usize..3, 0usize..14).prop_map(|(para, offset)| Op::Icon { para, offset }),
        2 => (0usize..8).prop_map(Op::Remove),
        1 => Just(Op::Clear),
    ]
}

/// Mutations interleaved with undo and redo
fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => arb_edit(),
        2 => Just(Op::Undo),
        1 => Just(Op::Redo),
    ]
}

fn apply(session: &mut EditingSession, op: &Op) {
    match op {
        Op::Add { para, start, len, style } => {
            let style = SpanStyle::ALL[*style];
            let value = if style.takes_size() { "12px" } else { "#000000" };
            let annotation = Annotation::span(
                style,
                value,
                *para,
                *start,
                start + len,
                "",
            );
            // Out-of-range adds are rejected and leave everything untouched
            let _ = session.add(annotation);
        }
        Op::Tool { para, start, len, tool, color } => {
            let tool = tools()[*tool];
            let palette = session.palette_mut();
            palette.set_color(tool.color_category(), COLORS[*color]);
            palette.set_callout_background(COLORS[(*color + 1) % COLORS.len()]);
            let selection = TextSelection::in_document(session.document(), *para, *start, start + len);
            let _ = session.apply_tool(&selection, tool);
        }
        Op::Icon { para, offset } => {
            session.begin_icon_placement(IconPayload::new("star").with_svg("<svg></svg>"));
            if session.place_icon(*para, *offset).is_err() {
                session.cancel_icon_placement();
            }
        }
        Op::Remove(i) => {
            let id = session.styles_payload().get(*i).map(|a| a.id.clone());
            if let Some(id) = id {
                session.remove(&id);
            }
        }
        Op::Clear => {
            session.clear();
        }
        Op::Undo => {
            session.undo();
        }
        Op::Redo => {
            session.redo();
        }
    }
}

/// Copy in-place recolors into recorded collections, the way history does
fn refresh_snapshots(snapshots: &mut [Vec<Annotation>], before: &[Annotation], after: &[Annotation]) {
    for (old, new) in before.iter().zip(after) {
        if old == new {
            continue;
        }
        for recorded in snapshots.iter_mut().flatten().filter(|a| a.id == new.id) {
            *recorded = new.clone();
        }
    }
}

proptest! {
    #[test]
    fn prop_undo_restores_previous_collection(ops in proptest::collection::vec(arb_edit(), 1..20)) {
        let mut session = hello_session();
        for op in &ops {
            let before = session.styles_payload();
            let undo_len = session.history().undo_len();
            apply(&mut session, op);
            let after = session.styles_payload();

            if session.history().undo_len() > undo_len {
                prop_assert!(session.undo());
                prop_assert_eq!(session.styles_payload(), before);
                prop_assert!(session.redo());
                prop_assert_eq!(session.styles_payload(), after);
            } else {
                // At most a recolor: same annotations in the same order
                let ids = |list: &[Annotation]| list.iter().map(|a| a.id.clone()).collect::<Vec<_>>();
                prop_assert_eq!(ids(&after), ids(&before));
            }
        }
    }

    #[test]
    fn prop_history_matches_snapshot_model(ops in proptest::collection::vec(arb_op(), 1..30)) {
        let mut session = hello_session();
        let mut past: Vec<Vec<Annotation>> = Vec::new();
        let mut future: Vec<Vec<Annotation>> = Vec::new();

        for op in &ops {
            let before = session.styles_payload();
            let undo_len = session.history().undo_len();
            match op {
                Op::Undo => {
                    prop_assert_eq!(session.undo(), !past.is_empty());
                    if let Some(previous) = past.pop() {
                        prop_assert_eq!(session.styles_payload(), previous);
                        future.push(before);
                    }
                }
                Op::Redo => {
                    prop_assert_eq!(session.redo(), !future.is_empty());
                    if let Some(next) = future.pop() {
                        prop_assert_eq!(session.styles_payload(), next);
                        past.push(before);
                    }
                }
                edit => {
                    apply(&mut session, edit);
                    let after = session.styles_payload();
                    if session.history().undo_len() > undo_len {
                        past.push(before);
                        future.clear();
                    } else {
                        refresh_snapshots(&mut past, &before, &after);
                        refresh_snapshots(&mut future, &before, &after);
                    }
                }
            }
            prop_assert_eq!(session.history().undo_len(), past.len());
            prop_assert_eq!(session.history().redo_len(), future.len());
        }
    }

    #[test]
    fn prop_mutation_after_undo_clears_redo(ops in proptest::collection::vec(arb_op(), 1..12)) {
        let mut session = hello_session();
        for op in &ops {
            apply(&mut session, op);
        }
        if session.undo() {
            prop_assert!(session.can_redo());
            session
                .add(Annotation::span(SpanStyle::Bold, "#000000", 0, 0, 1, "H"))
                .unwrap();
            prop_assert!(!session.can_redo());
            prop_assert!(!session.redo());
        }
    }

    #[test]
    fn prop_full_undo_returns_to_empty(ops in proptest::collection::vec(arb_edit(), 0..15)) {
        let mut session = hello_session();
        for op in &ops {
            apply(&mut session, op);
        }
        let last = session.styles_payload();
        while session.undo() {}
        prop_assert!(session.annotations().is_empty());
        while session.redo() {}
        prop_assert_eq!(session.styles_payload(), last);
    }
}
