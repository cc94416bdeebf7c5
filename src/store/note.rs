use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::NoteColor;

/// A saved note.
///
/// `id` is assigned once at creation and never changes. `text` holds the
/// note markup produced by the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    id: String,
    pub text: String,
    pub color: NoteColor,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Note {
    /// Create a note with a fresh id, stamped at `now`.
    pub fn new(text: impl Into<String>, color: NoteColor, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            color,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace text and color, bumping the update time.
    ///
    /// `updated_at` never moves before `created_at`, even with a skewed clock.
    pub(super) fn revise(&mut self, text: String, color: NoteColor, now: DateTime<Utc>) {
        self.text = text;
        self.color = color;
        self.updated_at = now.max(self.created_at);
    }
}
