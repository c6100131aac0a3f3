//! Linear undo/redo stacks

use crate::HistoryEntry;
use doc_model::Annotation;

/// Manages undo and redo stacks
#[derive(Debug, Default)]
pub struct UndoManager {
    /// Entries that can be undone, oldest first
    undo_stack: Vec<HistoryEntry>,
    /// Entries that can be redone, oldest first
    redo_stack: Vec<HistoryEntry>,
}

impl UndoManager {
    /// Create a new undo manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new mutation
    pub fn push(&mut self, entry: HistoryEntry) {
        // A new mutation abandons the redo branch
        self.redo_stack.clear();
        self.undo_stack.push(entry);
    }

    /// Pop the last entry for undo; it moves to the redo stack
    pub fn pop_undo(&mut self) -> Option<HistoryEntry> {
        let entry = self.undo_stack.pop()?;
        self.redo_stack.push(entry.clone());
        Some(entry)
    }

    /// Pop the last undone entry for redo; it moves back to the undo stack
    pub fn pop_redo(&mut self) -> Option<HistoryEntry> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push(entry.clone());
        Some(entry)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Display name of the entry the next undo would reverse
    pub fn undo_name(&self) -> Option<&str> {
        self.undo_stack.last().map(HistoryEntry::display_name)
    }

    /// Display name of the entry the next redo would re-apply
    pub fn redo_name(&self) -> Option<&str> {
        self.redo_stack.last().map(HistoryEntry::display_name)
    }

    /// Replace every recorded copy of an annotation that was changed in place.
    ///
    /// Add, delete and clear entries in both stacks are refreshed, so any
    /// later undo or redo that brings the annotation back uses its current value.
    pub fn refresh_recorded(&mut self, annotation: &Annotation) {
        let mut refreshed = 0;
        for entry in self.undo_stack.iter_mut().chain(self.redo_stack.iter_mut()) {
            if entry.refresh(annotation) {
                refreshed += 1;
            }
        }
        tracing::trace!("Refreshed {} history entries for {}", refreshed, annotation.id);
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
