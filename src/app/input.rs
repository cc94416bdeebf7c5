use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;

use crate::app::{App, Focus, Message, Model};
use crate::editor::{BlockKind, Direction, FormatCommand, Mark, Motion};
use crate::ui::{
    AppLayout, EDITOR_LEFT_PADDING, ENTRY_HEIGHT, ToolbarAction, byte_col_for_display,
    cursor_line_scroll, line_prefix, point_in_rect, toolbar_buttons,
};

use super::event_loop::ResizeDebouncer;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Paste(text) if model.focus == Focus::Editor && model.prompt.is_none() => {
                Some(Message::EditorPaste(text.clone()))
            }
            Event::Resize(w, h) => {
                tracing::trace!(width = w, height = h, "resize queued");
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return match key.code {
                KeyCode::Char('j') | KeyCode::Down => Some(Message::HelpScrollDown),
                KeyCode::Char('k') | KeyCode::Up => Some(Message::HelpScrollUp),
                _ => Some(Message::HideHelp),
            };
        }

        if model.pending_delete.is_some() {
            return match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(Message::ConfirmDelete),
                _ => Some(Message::CancelDelete),
            };
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        if model.prompt.is_some() {
            return match key.code {
                KeyCode::Esc => Some(Message::PromptCancel),
                KeyCode::Enter => Some(Message::PromptSubmit),
                KeyCode::Backspace => Some(Message::PromptBackspace),
                KeyCode::Char(c) if !ctrl && !alt => Some(Message::PromptInput(c)),
                _ => None,
            };
        }

        // Global keys
        match key.code {
            KeyCode::Char('q' | 'c') if ctrl => return Some(Message::Quit),
            KeyCode::Char('s') if ctrl => return Some(Message::Save),
            KeyCode::Char('n') if ctrl => return Some(Message::NewNote),
            KeyCode::Char('b') if ctrl => return Some(Message::ToggleSidebar),
            KeyCode::F(1) => return Some(Message::ToggleHelp),
            KeyCode::F(2) => return Some(Message::CycleColor),
            KeyCode::F(3) => return Some(Message::StartColorPrompt),
            KeyCode::Tab | KeyCode::BackTab => return Some(Message::SwitchFocus),
            _ => {}
        }

        match model.focus {
            Focus::Search => Self::handle_search_key(key),
            Focus::Sidebar => Self::handle_sidebar_key(key),
            Focus::Editor => Self::handle_editor_key(key),
        }
    }

    fn handle_search_key(key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Esc => Some(Message::SearchCancel),
            KeyCode::Enter | KeyCode::Down => Some(Message::SearchSubmit),
            KeyCode::Backspace => Some(Message::SearchBackspace),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Message::SearchInput(c))
            }
            _ => None,
        }
    }

    fn handle_sidebar_key(key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Message::SidebarDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Message::SidebarUp),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Message::SidebarSelect),
            KeyCode::Char('d') | KeyCode::Delete => Some(Message::RequestDelete),
            KeyCode::Char('/') => Some(Message::StartSearch),
            KeyCode::Char('n') => Some(Message::NewNote),
            KeyCode::Esc => Some(Message::SwitchFocus),
            _ => None,
        }
    }

    fn handle_editor_key(key: KeyEvent) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        if alt {
            let command = match key.code {
                KeyCode::Char('b') => FormatCommand::Mark(Mark::Bold),
                KeyCode::Char('i') => FormatCommand::Mark(Mark::Italic),
                KeyCode::Char('u') => FormatCommand::Mark(Mark::Underline),
                KeyCode::Char('s') => FormatCommand::Mark(Mark::Strike),
                KeyCode::Char('`') => FormatCommand::Mark(Mark::Code),
                KeyCode::Char('1') => FormatCommand::Block(BlockKind::Heading1),
                KeyCode::Char('2') => FormatCommand::Block(BlockKind::Heading2),
                KeyCode::Char('l') => FormatCommand::Block(BlockKind::BulletItem),
                KeyCode::Char('o') => FormatCommand::Block(BlockKind::OrderedItem),
                KeyCode::Char('q') => FormatCommand::Block(BlockKind::Quote),
                KeyCode::Char('c') => FormatCommand::Block(BlockKind::CodeBlock),
                _ => return None,
            };
            return Some(Message::Format(command));
        }

        let motion = |motion| Some(Message::EditorMotion(motion, shift));
        match key.code {
            KeyCode::Char('k') if ctrl => Some(Message::StartLinkPrompt),
            KeyCode::Char('a') if ctrl => Some(Message::EditorSelectAll),
            KeyCode::Char(c) if !ctrl => Some(Message::EditorInsertChar(c)),
            KeyCode::Enter => Some(Message::EditorSplitLine),
            KeyCode::Backspace => Some(Message::EditorDeleteBack),
            KeyCode::Delete => Some(Message::EditorDeleteForward),
            KeyCode::Esc => Some(Message::CancelEditing),
            KeyCode::Left if ctrl => motion(Motion::WordLeft),
            KeyCode::Right if ctrl => motion(Motion::WordRight),
            KeyCode::Home if ctrl => motion(Motion::BufferStart),
            KeyCode::End if ctrl => motion(Motion::BufferEnd),
            KeyCode::Left => motion(Motion::Step(Direction::Left)),
            KeyCode::Right => motion(Motion::Step(Direction::Right)),
            KeyCode::Up => motion(Motion::Step(Direction::Up)),
            KeyCode::Down => motion(Motion::Step(Direction::Down)),
            KeyCode::Home => motion(Motion::Home),
            KeyCode::End => motion(Motion::End),
            KeyCode::PageUp => Some(Message::EditorPageUp),
            KeyCode::PageDown => Some(Message::EditorPageDown),
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible || model.pending_delete.is_some() || model.prompt.is_some() {
            return None;
        }

        let layout = model.layout();
        let (x, y) = (mouse.column, mouse.row);

        if layout.sidebar.is_some_and(|area| point_in_rect(x, y, area)) {
            return match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) if point_in_rect(x, y, layout.search) => {
                    Some(Message::StartSearch)
                }
                MouseEventKind::Down(MouseButton::Left) if point_in_rect(x, y, layout.list) => {
                    let row = usize::from((y - layout.list.y) / ENTRY_HEIGHT)
                        + model.sidebar_viewport.offset();
                    Some(Message::SidebarClick(row))
                }
                MouseEventKind::ScrollDown => Some(Message::SidebarScrollDown),
                MouseEventKind::ScrollUp => Some(Message::SidebarScrollUp),
                _ => None,
            };
        }

        if point_in_rect(x, y, layout.toolbar) {
            if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
                return None;
            }
            let editing = model.store.is_editing();
            let (_, action) = toolbar_buttons(layout.toolbar, editing)
                .into_iter()
                .find(|(rect, _)| point_in_rect(x, y, *rect))?;
            return Some(match action {
                ToolbarAction::Format(command) => Message::Format(command),
                ToolbarAction::Link => Message::StartLinkPrompt,
                ToolbarAction::Color => Message::CycleColor,
                ToolbarAction::Save => Message::Save,
            });
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if point_in_rect(x, y, layout.editor) => {
                let (line, col) = editor_position(model, &layout, x, y);
                Some(Message::EditorMoveTo(line, col))
            }
            MouseEventKind::Drag(MouseButton::Left)
                if model.focus == Focus::Editor && point_in_rect(x, y, layout.editor) =>
            {
                let (line, col) = editor_position(model, &layout, x, y);
                Some(Message::EditorSelectTo(line, col))
            }
            MouseEventKind::ScrollDown if model.editor_viewport.can_scroll_down() => {
                Some(Message::EditorScrollDown(3))
            }
            MouseEventKind::ScrollUp if model.editor_viewport.can_scroll_up() => {
                Some(Message::EditorScrollUp(3))
            }
            _ => None,
        }
    }

    pub(super) fn view(model: &Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

/// Buffer (line, byte column) under a screen cell of the editor pane.
///
/// Rows below the last line land on the last line's end. Clicks on the
/// caret line account for its horizontal scroll.
fn editor_position(model: &Model, layout: &AppLayout, x: u16, y: u16) -> (usize, usize) {
    let buffer = model.surface.buffer();
    let row = model.editor_viewport.offset() + usize::from(y - layout.editor.y);
    let last = buffer.line_count().saturating_sub(1);
    if row > last {
        return (last, buffer.line_len(last));
    }
    let text = buffer.line_at(row).unwrap_or_default();
    let prefix_width = unicode_width::UnicodeWidthStr::width(line_prefix(buffer, row).as_str());
    let mut display_col = usize::from(x.saturating_sub(layout.editor.x + EDITOR_LEFT_PADDING))
        .saturating_sub(prefix_width);
    if model.focus == Focus::Editor && row == buffer.cursor().line {
        let available = usize::from(layout.editor_text_width()).saturating_sub(prefix_width);
        display_col += cursor_line_scroll(buffer, available).1;
    }
    (row, byte_col_for_display(&text, display_col))
}
