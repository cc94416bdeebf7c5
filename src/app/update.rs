use crate::app::Model;
use crate::app::model::{Focus, Prompt, PromptKind, ToastLevel};
use crate::editor::{EditorBuffer, FormatCommand, Motion};
use crate::store::{CommitOutcome, NoteColor};

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editor
    /// Insert a character at the caret
    EditorInsertChar(char),
    /// Insert pasted text at the caret
    EditorPaste(String),
    /// Delete character before the caret (Backspace)
    EditorDeleteBack,
    /// Delete character at the caret (Delete)
    EditorDeleteForward,
    /// Split the line at the caret (Enter)
    EditorSplitLine,
    /// Move the caret; `true` extends the selection
    EditorMotion(Motion, bool),
    /// Move the caret a page up
    EditorPageUp,
    /// Move the caret a page down
    EditorPageDown,
    /// Select the whole note
    EditorSelectAll,
    /// Place the caret at (line, byte column), e.g. from a mouse click
    EditorMoveTo(usize, usize),
    /// Extend the selection to (line, byte column) while dragging
    EditorSelectTo(usize, usize),
    /// Scroll editor viewport up by n lines
    EditorScrollUp(usize),
    /// Scroll editor viewport down by n lines
    EditorScrollDown(usize),

    // Formatting
    /// Run a toolbar formatting command
    Format(FormatCommand),
    /// Ask for a link URL
    StartLinkPrompt,
    /// Ask for a note color
    StartColorPrompt,
    /// Advance the note color through the palette
    CycleColor,
    /// Type into the open prompt
    PromptInput(char),
    /// Erase the last prompt character
    PromptBackspace,
    /// Apply the prompt's answer
    PromptSubmit,
    /// Close the prompt without applying
    PromptCancel,

    // Notes
    /// Commit the buffer (create or update)
    Save,
    /// Start a fresh note
    NewNote,
    /// Collapse the selection, or stop editing the selected note
    CancelEditing,

    // Sidebar
    /// Toggle the notes list
    ToggleSidebar,
    /// Switch focus between editor and notes list
    SwitchFocus,
    /// Move the list selection up
    SidebarUp,
    /// Move the list selection down
    SidebarDown,
    /// Open the highlighted note
    SidebarSelect,
    /// Highlight and open the note on a list row
    SidebarClick(usize),
    /// Scroll the list up
    SidebarScrollUp,
    /// Scroll the list down
    SidebarScrollDown,
    /// Delete the highlighted note, asking first when configured
    RequestDelete,
    /// Confirm a pending delete
    ConfirmDelete,
    /// Abandon a pending delete
    CancelDelete,

    // Search
    /// Focus the search input
    StartSearch,
    /// Type into the search input
    SearchInput(char),
    /// Erase the last search character
    SearchBackspace,
    /// Keep the filter and move to the list
    SearchSubmit,
    /// Clear the filter and move to the list
    SearchCancel,

    // Help
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,
    HelpScrollUp,
    HelpScrollDown,

    // Window
    /// Terminal resized
    Resize(u16, u16),

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// No side effects should occur in this function.
pub fn update(mut model: Model, msg: Message) -> Model {
    // Save preserves the quit flag so Ctrl+S can complete a pending quit.
    if !matches!(msg, Message::Quit | Message::Save) {
        model.quit_confirmed = false;
    }

    let mut follow_cursor = false;
    let mut reveal_selection = false;

    match msg {
        // Editor
        Message::EditorInsertChar(ch) => {
            edit(&mut model, |buf| buf.insert_char(ch));
            follow_cursor = true;
        }
        Message::EditorPaste(text) => {
            edit(&mut model, |buf| buf.insert_str(&text));
            follow_cursor = true;
        }
        Message::EditorDeleteBack => {
            edit(&mut model, |buf| {
                buf.delete_back();
            });
            follow_cursor = true;
        }
        Message::EditorDeleteForward => {
            edit(&mut model, |buf| {
                buf.delete_forward();
            });
            follow_cursor = true;
        }
        Message::EditorSplitLine => {
            edit(&mut model, EditorBuffer::split_line);
            follow_cursor = true;
        }
        Message::EditorMotion(motion, extend) => {
            model.surface.motion(motion, extend);
            follow_cursor = true;
        }
        Message::EditorPageUp => {
            move_by_page(&mut model, false);
            follow_cursor = true;
        }
        Message::EditorPageDown => {
            move_by_page(&mut model, true);
            follow_cursor = true;
        }
        Message::EditorSelectAll => {
            model.surface.select_all();
            follow_cursor = true;
        }
        Message::EditorMoveTo(line, col) => {
            model.focus = Focus::Editor;
            model.surface.move_to(line, col);
            follow_cursor = true;
        }
        Message::EditorSelectTo(line, col) => {
            model.surface.select_to(line, col);
            follow_cursor = true;
        }
        Message::EditorScrollUp(n) => model.editor_viewport.scroll_up(n),
        Message::EditorScrollDown(n) => model.editor_viewport.scroll_down(n),

        // Formatting
        Message::Format(command) => {
            let changed = model.surface.apply(command);
            forward(&mut model, changed);
        }
        Message::StartLinkPrompt => {
            let input = model
                .surface
                .buffer()
                .link_at_caret()
                .map(|href| href.to_string())
                .unwrap_or_default();
            model.prompt = Some(Prompt {
                kind: PromptKind::Link,
                input,
            });
        }
        Message::StartColorPrompt => {
            let color = model.store.note_color();
            let input = color.name().map_or_else(|| color.to_string(), str::to_string);
            model.prompt = Some(Prompt {
                kind: PromptKind::Color,
                input,
            });
        }
        Message::CycleColor => {
            let next = model.store.note_color().next_in_palette();
            model.store.set_color(next);
        }
        Message::PromptInput(ch) => {
            if let Some(prompt) = model.prompt.as_mut() {
                prompt.input.push(ch);
            }
        }
        Message::PromptBackspace => {
            if let Some(prompt) = model.prompt.as_mut() {
                prompt.input.pop();
            }
        }
        Message::PromptSubmit => {
            if let Some(prompt) = model.prompt.take() {
                submit_prompt(&mut model, &prompt);
                follow_cursor = true;
            }
        }
        Message::PromptCancel => model.prompt = None,

        // Notes
        Message::Save => save(&mut model),
        Message::NewNote => {
            model.store.clear_editor();
            model.reload_surface();
            model.focus = Focus::Editor;
        }
        Message::CancelEditing => {
            if model.surface.buffer().has_selection() {
                model.surface.clear_selection();
            } else if model.store.is_editing() {
                model.store.clear_editor();
                model.reload_surface();
            }
        }

        // Sidebar
        Message::ToggleSidebar => {
            model.sidebar_visible = !model.sidebar_visible;
            if !model.sidebar_visible {
                model.focus = Focus::Editor;
            }
        }
        Message::SwitchFocus => {
            model.focus = match model.focus {
                Focus::Editor => {
                    model.sidebar_visible = true;
                    reveal_selection = true;
                    Focus::Sidebar
                }
                Focus::Sidebar | Focus::Search => Focus::Editor,
            };
        }
        Message::SidebarUp => {
            model.sidebar_selected = model.sidebar_selected.saturating_sub(1);
            reveal_selection = true;
        }
        Message::SidebarDown => {
            let last = model.store.filtered().len().saturating_sub(1);
            model.sidebar_selected = (model.sidebar_selected + 1).min(last);
            reveal_selection = true;
        }
        Message::SidebarSelect => open_selected(&mut model),
        Message::SidebarClick(row) => {
            if row < model.store.filtered().len() {
                model.sidebar_selected = row;
                open_selected(&mut model);
            }
        }
        Message::SidebarScrollUp => model.sidebar_viewport.scroll_up(1),
        Message::SidebarScrollDown => model.sidebar_viewport.scroll_down(1),
        Message::RequestDelete => {
            if let Some(index) = model.selected_note_index() {
                if model.confirm_delete {
                    model.pending_delete = Some(index);
                } else {
                    delete(&mut model, index);
                }
            }
        }
        Message::ConfirmDelete => {
            if let Some(index) = model.pending_delete.take() {
                delete(&mut model, index);
            }
        }
        Message::CancelDelete => model.pending_delete = None,

        // Search
        Message::StartSearch => {
            model.sidebar_visible = true;
            model.focus = Focus::Search;
        }
        Message::SearchInput(ch) => {
            let mut query = model.store.search().to_string();
            query.push(ch);
            set_search(&mut model, query);
        }
        Message::SearchBackspace => {
            let mut query = model.store.search().to_string();
            query.pop();
            set_search(&mut model, query);
        }
        Message::SearchSubmit => model.focus = Focus::Sidebar,
        Message::SearchCancel => {
            set_search(&mut model, String::new());
            model.focus = Focus::Sidebar;
        }

        // Help
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
            model.help_scroll_offset = 0;
        }
        Message::HideHelp => model.help_visible = false,
        Message::HelpScrollUp => {
            model.help_scroll_offset = model.help_scroll_offset.saturating_sub(1);
        }
        Message::HelpScrollDown => {
            let max = crate::ui::help_lines(&model).len().saturating_sub(1);
            model.help_scroll_offset = (model.help_scroll_offset + 1).min(max);
        }

        // Window
        Message::Resize(width, height) => {
            model.terminal_size = (width, height);
            follow_cursor = true;
        }

        // Application
        Message::Quit => {
            if model.store.has_unsaved_changes() && !model.quit_confirmed {
                model.quit_confirmed = true;
                model.show_toast(
                    ToastLevel::Warning,
                    "Unsaved changes! Press Ctrl+Q again to quit, or Ctrl+S to save",
                );
            } else {
                tracing::info!(notes = model.store.notes().len(), "quitting");
                model.should_quit = true;
            }
        }
    }

    model.sync_layout();
    if follow_cursor {
        model.follow_cursor();
    }
    if reveal_selection {
        model.sidebar_viewport.ensure_visible(model.sidebar_selected);
    }
    model
}

/// Run a buffer edit and push the new markup into the store.
fn edit(model: &mut Model, f: impl FnOnce(&mut EditorBuffer)) {
    let changed = model.surface.edit(f);
    forward(model, changed);
}

fn move_by_page(model: &mut Model, down: bool) {
    let page = (model.editor_viewport.height() as usize).max(1);
    let cursor = model.surface.buffer().cursor();
    let line = if down {
        cursor.line + page
    } else {
        cursor.line.saturating_sub(page)
    };
    model.surface.move_to(line, cursor.col);
}

fn forward(model: &mut Model, changed: Option<String>) {
    if let Some(markup) = changed {
        model.store.set_editor_content(markup);
    }
}

fn submit_prompt(model: &mut Model, prompt: &Prompt) {
    let answer = prompt.input.trim();
    match prompt.kind {
        PromptKind::Link => {
            if answer.is_empty() {
                return;
            }
            let changed = model.surface.set_link(answer);
            forward(model, changed);
        }
        PromptKind::Color => match answer.parse::<NoteColor>() {
            Ok(color) => model.store.set_color(color),
            Err(err) => model.show_toast(ToastLevel::Warning, err.to_string()),
        },
    }
}

fn save(model: &mut Model) {
    match model.store.commit() {
        CommitOutcome::Created(index) => {
            model.show_toast(ToastLevel::Info, "Note saved");
            after_commit(model, index);
        }
        CommitOutcome::Updated(index) => {
            model.show_toast(ToastLevel::Info, "Note updated");
            after_commit(model, index);
        }
        CommitOutcome::Skipped => {
            model.show_toast(ToastLevel::Info, "Nothing to save: the note is empty");
        }
    }
}

/// The store clears its buffer on commit; mirror that in the editor and
/// highlight the saved note in the list.
fn after_commit(model: &mut Model, index: usize) {
    model.reload_surface();
    if let Some(row) = model.store.filtered().iter().position(|(i, _)| *i == index) {
        model.sidebar_selected = row;
        model.sync_layout();
        model.sidebar_viewport.ensure_visible(row);
    }
}

fn open_selected(model: &mut Model) {
    let Some(index) = model.selected_note_index() else {
        return;
    };
    if model.store.select_note(index) {
        model.reload_surface();
        model.focus = Focus::Editor;
    }
}

/// Delete a note and bring the editor in line with the store: the buffer
/// changes only when the active note was removed or shifted.
fn delete(model: &mut Model, index: usize) {
    let active_before = model.store.current_note_index();
    if model.store.delete_note(index).is_none() {
        return;
    }
    if model.store.current_note_index() != active_before {
        model.reload_surface();
    }
    model.show_toast(ToastLevel::Info, "Note deleted");
}

fn set_search(model: &mut Model, query: String) {
    model.store.set_search(query);
    model.sidebar_selected = 0;
    model.sidebar_viewport.go_to_line(0);
}
