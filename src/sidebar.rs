//! Sidebar list entries: previews, relative timestamps and empty-state text.

use chrono::{DateTime, Local, Utc};

use crate::editor::plain_text;
use crate::store::{NoteColor, NoteStore};

/// Preview length in characters before truncation.
pub const PREVIEW_CHARS: usize = 80;

/// One row of the note list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    /// Index into the full note collection.
    pub index: usize,
    pub preview: String,
    pub time_label: String,
    pub color: NoteColor,
    /// Whether this note is loaded in the editor.
    pub active: bool,
}

/// Plain-text preview of note markup, one line, at most 80 characters plus
/// an ellipsis.
pub fn note_preview(markup: &str) -> String {
    let plain = plain_text(markup);
    let joined = plain
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if joined.is_empty() {
        return "Empty note".to_string();
    }
    if joined.chars().count() > PREVIEW_CHARS {
        let cut: String = joined.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        joined
    }
}

/// Human label for how long ago `updated` was.
pub fn relative_time_label(updated: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - updated).num_hours();
    if hours < 1 {
        "just now".to_string()
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if hours < 48 {
        "yesterday".to_string()
    } else {
        updated.with_timezone(&Local).format("%x").to_string()
    }
}

/// Rows for the notes matching the store's search.
pub fn entries(store: &NoteStore, now: DateTime<Utc>) -> Vec<SidebarEntry> {
    let active = store.current_note_index();
    store
        .filtered()
        .into_iter()
        .map(|(index, note)| SidebarEntry {
            index,
            preview: note_preview(&note.text),
            time_label: relative_time_label(note.updated_at(), now),
            color: note.color,
            active: active == Some(index),
        })
        .collect()
}

/// Title and optional hint shown when the list has no rows.
pub fn empty_message(search: &str) -> (&'static str, Option<&'static str>) {
    if search.is_empty() {
        ("No notes yet", Some("Create your first note to get started"))
    } else {
        ("No notes found", None)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::store::Note;

    #[test]
    fn test_preview_strips_markup_and_joins_blocks() {
        assert_eq!(note_preview("# Groceries\n\n- **milk**\n- eggs"), "Groceries milk eggs");
    }

    #[test]
    fn test_preview_truncates_long_text() {
        let long = "x".repeat(120);
        let preview = note_preview(&long);
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_preview_exactly_80_is_not_truncated() {
        let text = "y".repeat(PREVIEW_CHARS);
        assert_eq!(note_preview(&text), text);
    }

    #[test]
    fn test_preview_truncates_on_char_boundaries() {
        let long = "é".repeat(100);
        let preview = note_preview(&long);
        assert!(preview.starts_with(&"é".repeat(PREVIEW_CHARS)));
    }

    #[test]
    fn test_empty_preview() {
        assert_eq!(note_preview(""), "Empty note");
        assert_eq!(note_preview("   "), "Empty note");
    }

    #[test]
    fn test_relative_time_labels() {
        let now = Utc::now();
        assert_eq!(relative_time_label(now, now), "just now");
        assert_eq!(relative_time_label(now - Duration::minutes(59), now), "just now");
        assert_eq!(relative_time_label(now - Duration::hours(3), now), "3h ago");
        assert_eq!(relative_time_label(now - Duration::hours(23), now), "23h ago");
        assert_eq!(relative_time_label(now - Duration::hours(30), now), "yesterday");
    }

    #[test]
    fn test_old_notes_show_a_date() {
        let now = Utc::now();
        let label = relative_time_label(now - Duration::days(10), now);
        assert!(!label.contains("ago"));
        assert_ne!(label, "yesterday");
        assert!(!label.is_empty());
    }

    #[test]
    fn test_future_timestamp_is_just_now() {
        let now = Utc::now();
        assert_eq!(relative_time_label(now + Duration::hours(2), now), "just now");
    }

    #[test]
    fn test_entries_follow_search_and_mark_active() {
        let now = Utc::now();
        let mut store = NoteStore::new();
        store.set_notes(vec![
            Note::new("alpha", NoteColor::WHITE, now),
            Note::new("beta", NoteColor::WHITE, now),
        ]);
        store.select_note(1);
        store.set_search("bet");
        let rows = entries(&store, now);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].index, 1);
        assert!(rows[0].active);
        assert_eq!(rows[0].time_label, "just now");
    }

    #[test]
    fn test_empty_messages() {
        assert_eq!(empty_message("").0, "No notes yet");
        assert!(empty_message("").1.is_some());
        assert_eq!(empty_message("zzz"), ("No notes found", None));
    }
}
