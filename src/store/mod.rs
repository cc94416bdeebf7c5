//! In-memory note store.
//!
//! Holds the note collection together with the editing state:
//! - the search string used by the sidebar
//! - the editor buffer (note markup) and its color
//! - the index of the note currently being edited
//!
//! All operations are infallible. Blank commits and out-of-range indices
//! are silent no-ops.

mod color;
mod note;

pub use color::{ColorParseError, NoteColor, PALETTE};
pub use note::Note;

use chrono::{DateTime, Utc};

use crate::editor::plain_text;

/// Result of [`NoteStore::commit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new note was appended at this index.
    Created(usize),
    /// The note at this index was replaced.
    Updated(usize),
    /// The buffer was blank; nothing changed.
    Skipped,
}

#[derive(Debug, Clone, Default)]
pub struct NoteStore {
    notes: Vec<Note>,
    search: String,
    editor_content: String,
    note_color: NoteColor,
    current_note_index: Option<usize>,
    default_color: NoteColor,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose editor resets to `color` instead of white.
    pub fn with_default_color(color: NoteColor) -> Self {
        Self {
            note_color: color,
            default_color: color,
            ..Self::default()
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn editor_content(&self) -> &str {
        &self.editor_content
    }

    pub const fn note_color(&self) -> NoteColor {
        self.note_color
    }

    pub const fn default_color(&self) -> NoteColor {
        self.default_color
    }

    pub const fn current_note_index(&self) -> Option<usize> {
        self.current_note_index
    }

    pub fn current_note(&self) -> Option<&Note> {
        self.current_note_index.and_then(|idx| self.notes.get(idx))
    }

    /// Whether an existing note is loaded in the editor.
    pub const fn is_editing(&self) -> bool {
        self.current_note_index.is_some()
    }

    /// Whether the buffer differs from what a commit would leave behind.
    ///
    /// For a selected note this compares against its saved text and color;
    /// for a new note any non-blank buffer counts.
    pub fn has_unsaved_changes(&self) -> bool {
        match self.current_note() {
            Some(note) => note.text != self.editor_content || note.color != self.note_color,
            None => !is_blank_markup(&self.editor_content),
        }
    }

    /// Notes matching the current search, with their collection indices.
    pub fn filtered(&self) -> Vec<(usize, &Note)> {
        crate::search::filter_notes(&self.notes, &self.search)
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub const fn set_color(&mut self, color: NoteColor) {
        self.note_color = color;
    }

    pub fn set_editor_content(&mut self, content: impl Into<String>) {
        self.editor_content = content.into();
    }

    /// Replace the whole collection.
    pub fn set_notes(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        if self
            .current_note_index
            .is_some_and(|idx| idx >= self.notes.len())
        {
            self.clear_editor();
        }
    }

    /// Load the note at `index` into the editor and mark it active.
    ///
    /// Returns `false` (and changes nothing) when `index` is out of range.
    pub fn select_note(&mut self, index: usize) -> bool {
        let Some(note) = self.notes.get(index) else {
            tracing::debug!(index, len = self.notes.len(), "select ignored: out of range");
            return false;
        };
        self.editor_content.clone_from(&note.text);
        self.note_color = note.color;
        self.current_note_index = Some(index);
        true
    }

    /// Reset the buffer, color and active index.
    pub fn clear_editor(&mut self) {
        self.editor_content.clear();
        self.note_color = self.default_color;
        self.current_note_index = None;
    }

    /// Save the buffer, stamping with the current time.
    pub fn commit(&mut self) -> CommitOutcome {
        self.commit_at(Utc::now())
    }

    /// Save the buffer: create a note, or replace the active one.
    ///
    /// A buffer with no visible text is skipped, including markup that is
    /// only escapes or empty block markers. Any other commit clears the
    /// editor.
    pub fn commit_at(&mut self, now: DateTime<Utc>) -> CommitOutcome {
        if is_blank_markup(&self.editor_content) {
            return CommitOutcome::Skipped;
        }

        let text = std::mem::take(&mut self.editor_content);
        let color = self.note_color;
        let outcome = match self
            .current_note_index
            .and_then(|idx| self.notes.get_mut(idx).map(|note| (idx, note)))
        {
            Some((idx, note)) => {
                note.revise(text, color, now);
                tracing::info!(id = note.id(), index = idx, "note updated");
                CommitOutcome::Updated(idx)
            }
            None => {
                let note = Note::new(text, color, now);
                tracing::info!(id = note.id(), "note created");
                self.notes.push(note);
                CommitOutcome::Created(self.notes.len() - 1)
            }
        };
        self.clear_editor();
        outcome
    }

    /// Remove the note at `index`, returning it.
    ///
    /// The active index follows its note: deleting the active note clears
    /// the editor; deleting an earlier note shifts the index down and
    /// reloads the buffer from the same note. Out-of-range is a no-op.
    pub fn delete_note(&mut self, index: usize) -> Option<Note> {
        if index >= self.notes.len() {
            tracing::debug!(index, len = self.notes.len(), "delete ignored: out of range");
            return None;
        }
        let removed = self.notes.remove(index);
        tracing::info!(id = removed.id(), index, "note deleted");

        match self.current_note_index {
            Some(current) if current == index => self.clear_editor(),
            Some(current) if current > index => {
                let shifted = current - 1;
                if !self.select_note(shifted) {
                    self.clear_editor();
                }
            }
            _ => {}
        }
        Some(removed)
    }
}

/// Whether markup renders to nothing but whitespace.
fn is_blank_markup(markup: &str) -> bool {
    markup.trim().is_empty() || plain_text(markup).trim().is_empty()
}
