//! Reversible history entries for annotation mutations

use doc_model::{Annotation, AnnotationStore};
use serde::{Deserialize, Serialize};

/// A recorded annotation mutation.
///
/// Each entry knows how to reverse itself and how to re-apply itself. Both
/// directions are total: a missing id or an id that is already present is a
/// silent no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HistoryEntry {
    /// An annotation was appended
    Add { annotation: Annotation },
    /// An annotation was removed from position `index`
    Delete { annotation: Annotation, index: usize },
    /// The whole collection was emptied
    Clear { snapshot: Vec<Annotation>, count: usize },
}

impl HistoryEntry {
    pub fn add(annotation: Annotation) -> Self {
        HistoryEntry::Add { annotation }
    }

    pub fn delete(annotation: Annotation, index: usize) -> Self {
        HistoryEntry::Delete { annotation, index }
    }

    pub fn clear(snapshot: Vec<Annotation>) -> Self {
        let count = snapshot.len();
        HistoryEntry::Clear { snapshot, count }
    }

    /// Apply the inverse of this entry
    pub fn undo(&self, store: &mut AnnotationStore) {
        match self {
            HistoryEntry::Add { annotation } => {
                if store.remove(&annotation.id).is_none() {
                    tracing::debug!("Undo add: annotation {} already gone", annotation.id);
                }
            }
            HistoryEntry::Delete { annotation, index } => {
                if !store.insert_at(*index, annotation.clone()) {
                    tracing::debug!("Undo delete: annotation {} already present", annotation.id);
                }
            }
            HistoryEntry::Clear { snapshot, .. } => store.replace_all(snapshot.clone()),
        }
    }

    /// Re-apply this entry
    pub fn redo(&self, store: &mut AnnotationStore) {
        match self {
            HistoryEntry::Add { annotation } => {
                if !store.insert(annotation.clone()) {
                    tracing::debug!("Redo add: annotation {} already present", annotation.id);
                }
            }
            HistoryEntry::Delete { annotation, .. } => {
                if store.remove(&annotation.id).is_none() {
                    tracing::debug!("Redo delete: annotation {} already gone", annotation.id);
                }
            }
            HistoryEntry::Clear { .. } => store.clear(),
        }
    }

    /// Replace every recorded copy of `current` (matched by id) with it.
    /// Returns whether anything was replaced.
    pub fn refresh(&mut self, current: &Annotation) -> bool {
        let recorded: Vec<&mut Annotation> = match self {
            HistoryEntry::Add { annotation } | HistoryEntry::Delete { annotation, .. } => {
                vec![annotation]
            }
            HistoryEntry::Clear { snapshot, .. } => snapshot.iter_mut().collect(),
        };
        let mut replaced = false;
        for copy in recorded.into_iter().filter(|a| a.id == current.id) {
            *copy = current.clone();
            replaced = true;
        }
        replaced
    }

    /// Get a display name for this entry
    pub fn display_name(&self) -> &str {
        match self {
            HistoryEntry::Add { .. } => "Add Style",
            HistoryEntry::Delete { .. } => "Delete Style",
            HistoryEntry::Clear { .. } => "Clear All Styles",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::SpanStyle;

    fn bold() -> Annotation {
        Annotation::span(SpanStyle::Bold, "#000000", 0, 0, 5, "Hello")
    }

    #[test]
    fn test_add_entry_round_trip() {
        let annotation = bold();
        let entry = HistoryEntry::add(annotation.clone());
        let mut store = AnnotationStore::from_annotations(vec![annotation.clone()]);

        entry.undo(&mut store);
        assert!(store.is_empty());
        entry.redo(&mut store);
        assert_eq!(store.all(), &[annotation]);
    }

    #[test]
    fn test_delete_entry_reinserts_at_original_position() {
        let first = bold();
        let second = Annotation::span(SpanStyle::Italic, "#000000", 0, 6, 11, "world");
        let entry = HistoryEntry::delete(first.clone(), 0);
        let mut store = AnnotationStore::from_annotations(vec![second.clone()]);

        entry.undo(&mut store);
        assert_eq!(store.all(), &[first, second.clone()]);
        entry.redo(&mut store);
        assert_eq!(store.all(), &[second]);
    }

    #[test]
    fn test_clear_entry() {
        let snapshot = vec![bold(), bold()];
        let entry = HistoryEntry::clear(snapshot.clone());
        assert!(matches!(entry, HistoryEntry::Clear { count: 2, .. }));

        let mut store = AnnotationStore::new();
        entry.undo(&mut store);
        assert_eq!(store.all(), snapshot.as_slice());
        entry.redo(&mut store);
        assert!(store.is_empty());
    }

    #[test]
    fn test_missing_ids_are_no_ops() {
        let annotation = bold();
        let mut store = AnnotationStore::new();

        HistoryEntry::add(annotation.clone()).undo(&mut store);
        HistoryEntry::delete(annotation.clone(), 0).redo(&mut store);
        assert!(store.is_empty());

        store.insert(annotation.clone());
        HistoryEntry::add(annotation.clone()).redo(&mut store);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_refresh_replaces_copies_in_every_entry_kind() {
        let target = bold();
        let other = Annotation::span(SpanStyle::Italic, "#000000", 0, 6, 11, "world");
        let mut recolored = target.clone();
        recolored.recolor("#e53935", None);

        let mut delete = HistoryEntry::delete(target.clone(), 0);
        assert!(delete.refresh(&recolored));
        assert_eq!(delete, HistoryEntry::delete(recolored.clone(), 0));

        let mut clear = HistoryEntry::clear(vec![other.clone(), target.clone()]);
        assert!(clear.refresh(&recolored));
        assert_eq!(clear, HistoryEntry::clear(vec![other.clone(), recolored.clone()]));

        let mut unrelated = HistoryEntry::add(other.clone());
        assert!(!unrelated.refresh(&recolored));
        assert_eq!(unrelated, HistoryEntry::add(other));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(HistoryEntry::add(bold()).display_name(), "Add Style");
        assert_eq!(HistoryEntry::clear(vec![]).display_name(), "Clear All Styles");
    }
}
