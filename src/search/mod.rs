//! Note search.
//!
//! Case-insensitive substring matching of the sidebar query against the
//! visible text of each note, so markup escapes never hide a match. Results
//! keep their collection indices so that selecting or
//! deleting a filtered row targets the right note.

use crate::editor::plain_text;
use crate::store::Note;

/// Notes whose visible text contains `query`, ignoring case, paired with their
/// index in `notes`. An empty query matches everything.
pub fn filter_notes<'a>(notes: &'a [Note], query: &str) -> Vec<(usize, &'a Note)> {
    if query.is_empty() {
        return notes.iter().enumerate().collect();
    }
    let needle = query.to_lowercase();
    notes
        .iter()
        .enumerate()
        .filter(|(_, note)| plain_text(&note.text).to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::store::NoteColor;

    fn notes(texts: &[&str]) -> Vec<Note> {
        texts
            .iter()
            .map(|t| Note::new(*t, NoteColor::WHITE, Utc::now()))
            .collect()
    }

    #[test]
    fn test_empty_query_matches_all() {
        let notes = notes(&["a", "b"]);
        let found = filter_notes(&notes, "");
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_match_ignores_case() {
        let notes = notes(&["Shopping List", "meeting notes", "LIST of books"]);
        let found: Vec<usize> = filter_notes(&notes, "list").iter().map(|(i, _)| *i).collect();
        assert_eq!(found, vec![0, 2]);
    }

    #[test]
    fn test_results_keep_original_indices() {
        let notes = notes(&["alpha", "beta", "gamma"]);
        let found = filter_notes(&notes, "gam");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, 2);
        assert_eq!(found[0].1.text, "gamma");
    }

    #[test]
    fn test_no_match_returns_empty() {
        let notes = notes(&["alpha"]);
        assert!(filter_notes(&notes, "zeta").is_empty());
    }

    #[test]
    fn test_matches_text_the_markup_escapes() {
        let notes = notes(&[r"rename snake\_case vars", r"2 \* 3 \[draft\]"]);
        assert_eq!(filter_notes(&notes, "snake_case").len(), 1);
        assert_eq!(filter_notes(&notes, "2 * 3 [draft]").len(), 1);
    }

    #[test]
    fn test_formatting_delimiters_do_not_match() {
        let notes = notes(&["**bold** move"]);
        assert_eq!(filter_notes(&notes, "bold move").len(), 1);
        assert!(filter_notes(&notes, "**").is_empty());
    }

    #[test]
    fn test_unicode_case_folding() {
        let notes = notes(&["Ärger im Büro"]);
        assert_eq!(filter_notes(&notes, "ärger").len(), 1);
    }
}
