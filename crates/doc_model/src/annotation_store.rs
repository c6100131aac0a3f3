//! Insertion-ordered collection of the annotations on the current document
//!
//! The store is a plain collection. Range validation and history recording
//! happen one level up, in the editing session; the store only keeps the
//! annotations in the order they were inserted, which is also the layering
//! order used when rendering.

use crate::{Annotation, AnnotationId};
use serde::{Deserialize, Serialize};

/// Store for the annotations of one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
}

impl AnnotationStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            annotations: Vec::new(),
        }
    }

    /// Create a store from annotations already in insertion order
    pub fn from_annotations(annotations: Vec<Annotation>) -> Self {
        Self { annotations }
    }

    /// Append an annotation.
    ///
    /// Returns `false` without inserting when the id is already present.
    pub fn insert(&mut self, annotation: Annotation) -> bool {
        if self.contains(&annotation.id) {
            return false;
        }
        self.annotations.push(annotation);
        true
    }

    /// Insert an annotation at a position, clamped to the end.
    ///
    /// Returns `false` without inserting when the id is already present.
    pub fn insert_at(&mut self, index: usize, annotation: Annotation) -> bool {
        if self.contains(&annotation.id) {
            return false;
        }
        let index = index.min(self.annotations.len());
        self.annotations.insert(index, annotation);
        true
    }

    /// Remove an annotation by id
    pub fn remove(&mut self, id: &AnnotationId) -> Option<Annotation> {
        self.remove_indexed(id).map(|(_, annotation)| annotation)
    }

    /// Remove an annotation by id, also returning where it was
    pub fn remove_indexed(&mut self, id: &AnnotationId) -> Option<(usize, Annotation)> {
        let pos = self.annotations.iter().position(|a| &a.id == id)?;
        Some((pos, self.annotations.remove(pos)))
    }

    /// Get an annotation by id
    pub fn get(&self, id: &AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| &a.id == id)
    }

    /// Get a mutable annotation by id
    pub fn get_mut(&mut self, id: &AnnotationId) -> Option<&mut Annotation> {
        self.annotations.iter_mut().find(|a| &a.id == id)
    }

    /// Check if an annotation exists
    pub fn contains(&self, id: &AnnotationId) -> bool {
        self.annotations.iter().any(|a| &a.id == id)
    }

    /// Find the most recent annotation with the same type and range
    pub fn find_same_target(&self, probe: &Annotation) -> Option<&Annotation> {
        self.annotations.iter().rev().find(|a| a.same_target(probe))
    }

    /// All annotations in insertion order
    pub fn all(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Annotations of one paragraph, in insertion order
    pub fn by_paragraph(&self, index: usize) -> Vec<&Annotation> {
        self.annotations
            .iter()
            .filter(|a| a.para_index == index)
            .collect()
    }

    /// Get the number of annotations
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Remove and return every annotation, leaving the store empty
    pub fn take_all(&mut self) -> Vec<Annotation> {
        std::mem::take(&mut self.annotations)
    }

    /// Replace the contents with a snapshot
    pub fn replace_all(&mut self, snapshot: Vec<Annotation>) {
        self.annotations = snapshot;
    }

    /// Clear all annotations
    pub fn clear(&mut self) {
        self.annotations.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SpanStyle;
    use proptest::prelude::*;

    fn span(para: usize, start: usize, end: usize) -> Annotation {
        Annotation::span(SpanStyle::Bold, "#000000", para, start, end, "")
    }

    #[test]
    fn test_insert_preserves_order() {
        let mut store = AnnotationStore::new();
        let a = span(0, 0, 1);
        let b = span(1, 0, 1);
        let c = span(0, 2, 3);
        let ids = [a.id.clone(), b.id.clone(), c.id.clone()];
        store.insert(a);
        store.insert(b);
        store.insert(c);

        let order: Vec<_> = store.all().iter().map(|a| a.id.clone()).collect();
        assert_eq!(order, ids);
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let mut store = AnnotationStore::new();
        let a = span(0, 0, 1);
        assert!(store.insert(a.clone()));
        assert!(!store.insert(a));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_by_paragraph() {
        let mut store = AnnotationStore::new();
        let first = span(0, 0, 1);
        let second = span(0, 4, 6);
        let first_id = first.id.clone();
        let second_id = second.id.clone();
        store.insert(first);
        store.insert(span(1, 0, 1));
        store.insert(second);

        let para0: Vec<_> = store.by_paragraph(0).iter().map(|a| a.id.clone()).collect();
        assert_eq!(para0, vec![first_id, second_id]);
        assert_eq!(store.by_paragraph(1).len(), 1);
        assert!(store.by_paragraph(2).is_empty());
    }

    #[test]
    fn test_remove_unknown_is_none() {
        let mut store = AnnotationStore::new();
        store.insert(span(0, 0, 1));
        assert!(store.remove(&AnnotationId::from("missing")).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_indexed_and_insert_at() {
        let mut store = AnnotationStore::new();
        let a = span(0, 0, 1);
        let b = span(0, 1, 2);
        let c = span(0, 2, 3);
        store.insert(a.clone());
        store.insert(b.clone());
        store.insert(c.clone());

        let (index, removed) = store.remove_indexed(&b.id).unwrap();
        assert_eq!(index, 1);
        assert!(store.insert_at(index, removed));
        assert_eq!(store.all(), &[a.clone(), b.clone(), c]);

        assert!(!store.insert_at(0, b));
        let d = span(0, 3, 4);
        assert!(store.insert_at(99, d.clone()));
        assert_eq!(store.all().last(), Some(&d));
    }

    #[test]
    fn test_take_and_replace() {
        let mut store = AnnotationStore::new();
        store.insert(span(0, 0, 1));
        store.insert(span(0, 1, 2));
        let snapshot = store.take_all();
        assert!(store.is_empty());
        store.replace_all(snapshot.clone());
        assert_eq!(store.all(), snapshot.as_slice());
    }

    #[test]
    fn test_find_same_target_prefers_latest() {
        let mut store = AnnotationStore::new();
        let older = span(0, 1, 3);
        let newer = span(0, 1, 3);
        let newer_id = newer.id.clone();
        store.insert(older);
        store.insert(newer);
        let probe = span(0, 1, 3);
        assert_eq!(store.find_same_target(&probe).unwrap().id, newer_id);
    }

    proptest! {
        #[test]
        fn prop_remove_then_insert_at_restores_order(count in 1usize..12, pick in 0usize..12) {
            let mut store = AnnotationStore::new();
            for i in 0..count {
                store.insert(span(0, i, i + 1));
            }
            let before = store.clone();
            let id = store.all()[pick % count].id.clone();

            let (index, removed) = store.remove_indexed(&id).unwrap();
            prop_assert_eq!(index, pick % count);
            prop_assert_eq!(store.len(), count - 1);
            prop_assert!(store.insert_at(index, removed));
            prop_assert_eq!(store, before);
        }
    }
}
