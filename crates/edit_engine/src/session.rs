//! The editing session: one document, its annotations and their history

use crate::{EditError, HistoryEntry, Result, Tool, ToolOutcome, ToolPalette, UndoManager};
use doc_model::{Annotation, AnnotationId, AnnotationStore, Document, IconPayload, TextSelection};
use render_model::RenderedParagraph;
use telemetry::ActionLogEntry;

/// All core state for the document being edited.
///
/// Every mutation goes through the session so that the annotation store, the
/// history stacks and the action log stay consistent. Loading a document
/// replaces all of it at once.
#[derive(Debug, Default)]
pub struct EditingSession {
    document: Document,
    store: AnnotationStore,
    history: UndoManager,
    palette: ToolPalette,
    pending_icon: Option<IconPayload>,
    outbox: Vec<ActionLogEntry>,
}

impl EditingSession {
    /// Create a session with an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with a specific tool palette
    pub fn with_palette(palette: ToolPalette) -> Self {
        Self {
            palette,
            ..Self::default()
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn annotations(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn palette(&self) -> &ToolPalette {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut ToolPalette {
        &mut self.palette
    }

    // ========================================================================
    // Document lifecycle
    // ========================================================================

    /// Replace the document, dropping every annotation and all history
    pub fn load_document(&mut self, document: Document) {
        tracing::info!(
            "Loaded document {} ({} paragraphs)",
            document.doc_id().unwrap_or("<unsaved>"),
            document.len()
        );
        self.document = document;
        self.store.clear();
        self.history.clear();
        self.pending_icon = None;
        self.outbox.clear();
    }

    /// Load a document together with previously saved annotations.
    ///
    /// Annotations that do not fit the document, carry a malformed color or
    /// size, or repeat an id, are dropped. History starts empty. Returns the number of annotations kept.
    pub fn restore(&mut self, document: Document, annotations: Vec<Annotation>) -> usize {
        self.load_document(document);
        for annotation in annotations {
            if let Err(e) = annotation.validate(&self.document) {
                tracing::warn!("Dropping saved annotation {}: {}", annotation.id, e);
                continue;
            }
            let id = annotation.id.clone();
            if !self.store.insert(annotation) {
                tracing::warn!("Dropping saved annotation {}: duplicate id", id);
            }
        }
        self.store.len()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Add an annotation.
    ///
    /// Rejects annotations whose paragraph or offsets do not fit the document,
    /// and annotations whose color or size value is malformed.
    pub fn add(&mut self, mut annotation: Annotation) -> Result<AnnotationId> {
        annotation.validate(&self.document)?;
        if self.store.contains(&annotation.id) {
            let fresh = AnnotationId::new();
            tracing::debug!("Annotation id {} already in use, reassigned {}", annotation.id, fresh);
            annotation.id = fresh;
        }

        let id = annotation.id.clone();
        self.log(ActionLogEntry::added(&annotation));
        self.history.push(HistoryEntry::add(annotation.clone()));
        self.store.insert(annotation);
        Ok(id)
    }

    /// Remove an annotation; unknown ids are a no-op
    pub fn remove(&mut self, id: &AnnotationId) -> Option<Annotation> {
        let Some((index, removed)) = self.store.remove_indexed(id) else {
            tracing::debug!("Remove: no annotation {}", id);
            return None;
        };
        self.log(ActionLogEntry::deleted(&removed));
        self.history.push(HistoryEntry::delete(removed.clone(), index));
        Some(removed)
    }

    /// Remove every annotation; returns how many were removed
    pub fn clear(&mut self) -> usize {
        if self.store.is_empty() {
            return 0;
        }
        let snapshot = self.store.take_all();
        let count = snapshot.len();
        self.log(ActionLogEntry::cleared(count));
        self.history.push(HistoryEntry::clear(snapshot));
        count
    }

    /// Annotations of a paragraph, in insertion order
    pub fn by_paragraph(&self, index: usize) -> Vec<&Annotation> {
        self.store.by_paragraph(index)
    }

    /// Apply a tool to a selection.
    ///
    /// If an annotation of the same type already covers exactly this range it
    /// is recolored in place with the palette's current value. That does not
    /// create a history entry and leaves the redo stack alone.
    pub fn apply_tool(&mut self, selection: &TextSelection, tool: Tool) -> Result<ToolOutcome> {
        if self.pending_icon.is_some() {
            return Err(EditError::PlacementPending);
        }
        if selection.is_collapsed() || selection.is_blank() {
            tracing::debug!("Ignoring empty selection for {}", tool);
            return Ok(ToolOutcome::Ignored);
        }

        let candidate = self.palette.annotation_for(tool, selection);
        let existing = self.store.find_same_target(&candidate).map(|a| a.id.clone());
        if let Some(id) = existing {
            let background = candidate.background().map(str::to_string);
            if let Some(annotation) = self.store.get_mut(&id) {
                annotation.recolor(candidate.value(), background);
                let updated = annotation.clone();
                self.history.refresh_recorded(&updated);
            }
            return Ok(ToolOutcome::Updated(id));
        }

        self.add(candidate).map(ToolOutcome::Added)
    }

    // ========================================================================
    // History
    // ========================================================================

    /// Undo the last mutation; returns `false` if there was nothing to undo
    pub fn undo(&mut self) -> bool {
        match self.history.pop_undo() {
            Some(entry) => {
                entry.undo(&mut self.store);
                true
            }
            None => false,
        }
    }

    /// Redo the last undone mutation; returns `false` if there was nothing to redo
    pub fn redo(&mut self) -> bool {
        match self.history.pop_redo() {
            Some(entry) => {
                entry.redo(&mut self.store);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The undo/redo stacks
    pub fn history(&self) -> &UndoManager {
        &self.history
    }

    // ========================================================================
    // Icon placement
    // ========================================================================

    /// Enter placement mode with an icon ready to be anchored.
    ///
    /// Starting a new placement replaces any icon still waiting.
    pub fn begin_icon_placement(&mut self, icon: IconPayload) {
        if let Some(previous) = self.pending_icon.replace(icon) {
            tracing::debug!("Replacing pending icon {}", previous.icon_name);
        }
    }

    /// The icon waiting to be placed, if any
    pub fn pending_icon(&self) -> Option<&IconPayload> {
        self.pending_icon.as_ref()
    }

    /// Anchor the pending icon at a paragraph offset.
    ///
    /// On failure the icon stays pending so the user can try another spot.
    pub fn place_icon(&mut self, para_index: usize, offset: usize) -> Result<AnnotationId> {
        let icon = self.pending_icon.clone().ok_or(EditError::NoPendingIcon)?;
        let id = self.add(Annotation::inline_icon(icon, para_index, offset))?;
        self.pending_icon = None;
        Ok(id)
    }

    /// Leave placement mode without creating anything.
    ///
    /// Returns the abandoned icon.
    pub fn cancel_icon_placement(&mut self) -> Option<IconPayload> {
        self.pending_icon.take()
    }

    /// Escape key: cancels a pending placement. Returns whether anything was cancelled.
    pub fn handle_escape(&mut self) -> bool {
        self.cancel_icon_placement().is_some()
    }

    // ========================================================================
    // Outputs
    // ========================================================================

    /// Segments of one paragraph
    pub fn render_paragraph(&self, index: usize) -> Option<RenderedParagraph> {
        let paragraph = self.document.paragraph(index)?;
        Some(render_model::render_paragraph(
            paragraph,
            &self.store.by_paragraph(index),
        ))
    }

    /// Segments of every paragraph
    pub fn render_document(&self) -> Vec<RenderedParagraph> {
        render_model::render_document(&self.document, &self.store)
    }

    /// Annotations to persist, in insertion order
    pub fn styles_payload(&self) -> Vec<Annotation> {
        self.store.all().to_vec()
    }

    /// Take the action log entries produced since the last drain
    pub fn drain_action_log(&mut self) -> Vec<ActionLogEntry> {
        std::mem::take(&mut self.outbox)
    }

    fn log(&mut self, entry: ActionLogEntry) {
        // Unsaved documents have nowhere to send a log
        if self.document.doc_id().is_some() {
            self.outbox.push(entry);
        }
    }
}
