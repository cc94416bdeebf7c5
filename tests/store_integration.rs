use chrono::{Duration, TimeZone, Utc};

use easynotes::editor::{BlockKind, EditorSurface, FormatCommand, Mark};
use easynotes::sidebar::{entries, note_preview};
use easynotes::store::{CommitOutcome, NoteColor, NoteStore};

fn write(store: &mut NoteStore, surface: &mut EditorSurface, text: &str) {
    if let Some(markup) = surface.edit(|buf| buf.insert_str(text)) {
        store.set_editor_content(markup);
    }
}

#[test]
fn test_create_edit_and_delete_flow() {
    let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    let mut store = NoteStore::new();
    let mut surface = EditorSurface::new();

    if let Some(markup) = surface.apply(FormatCommand::Mark(Mark::Bold)) {
        store.set_editor_content(markup);
    }
    write(&mut store, &mut surface, "Plan");
    assert_eq!(store.editor_content(), "**Plan**");
    assert_eq!(store.commit_at(t0), CommitOutcome::Created(0));

    surface.load(store.editor_content());
    assert!(surface.sticky().bold);
    assert_eq!(surface.apply(FormatCommand::Mark(Mark::Bold)), None);
    write(&mut store, &mut surface, "Second");
    store.set_color(NoteColor::rgb(0xbb, 0xf7, 0xd0));
    assert_eq!(store.commit_at(t0), CommitOutcome::Created(1));

    assert!(store.select_note(0));
    surface.load(store.editor_content());
    assert_eq!(surface.buffer().text(), "Plan");

    let later = t0 + Duration::hours(3);
    store.set_editor_content("**Plan** v2");
    assert_eq!(store.commit_at(later), CommitOutcome::Updated(0));
    let note = &store.notes()[0];
    assert_eq!(note.text, "**Plan** v2");
    assert_eq!(note.created_at(), t0);
    assert_eq!(note.updated_at(), later);

    let rows = entries(&store, later + Duration::minutes(5));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].preview, "Plan v2");
    assert_eq!(rows[0].time_label, "just now");
    assert_eq!(rows[1].time_label, "3h ago");
    assert_eq!(rows[1].color.name(), Some("green"));

    assert!(store.select_note(1));
    assert!(store.delete_note(0).is_some());
    assert_eq!(store.current_note_index(), Some(0));
    assert_eq!(store.editor_content(), "Second");
}

#[test]
fn test_search_matches_case_insensitively_and_keeps_indices() {
    let mut store = NoteStore::new();
    for text in ["Buy MILK", "call bob", "milkshake recipe"] {
        store.set_editor_content(text);
        store.commit();
    }
    store.set_search("milk");
    let indices: Vec<usize> = store.filtered().iter().map(|(i, _)| *i).collect();
    assert_eq!(indices, vec![0, 2]);

    store.set_search("");
    assert_eq!(store.filtered().len(), 3);
}

#[test]
fn test_preview_strips_markup() {
    assert_eq!(note_preview("# Title\n\n- **bold** item"), "Title bold item");
}

#[test]
fn test_ids_are_unique_and_stable() {
    let mut store = NoteStore::new();
    store.set_editor_content("one");
    store.commit();
    store.set_editor_content("two");
    store.commit();
    let first_id = store.notes()[0].id().to_string();
    assert_ne!(first_id, store.notes()[1].id());

    store.select_note(0);
    store.set_editor_content("one, edited");
    store.commit();
    assert_eq!(store.notes()[0].id(), first_id);
}

#[test]
fn test_editor_output_without_visible_text_never_commits() {
    let mut store = NoteStore::new();
    let mut surface = EditorSurface::new();

    write(&mut store, &mut surface, "  \n ");
    assert_eq!(store.commit(), CommitOutcome::Skipped);

    if let Some(markup) = surface.edit(|buf| buf.toggle_block(BlockKind::Quote)) {
        store.set_editor_content(markup);
    }
    assert_eq!(store.commit(), CommitOutcome::Skipped);
    assert!(store.notes().is_empty());
}
