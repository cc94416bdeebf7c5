use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Focus, Model, ToastLevel};

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let theme = &model.theme;
    let buffer = model.surface.buffer();
    let cursor = buffer.cursor();
    let col = buffer
        .line_at(cursor.line)
        .and_then(|line| line.get(..cursor.col).map(|s| s.chars().count()))
        .unwrap_or(0);

    let count = model.store.notes().len();
    let noun = if count == 1 { "note" } else { "notes" };
    let focus = match model.focus {
        Focus::Editor => "editor",
        Focus::Sidebar => "notes",
        Focus::Search => "search",
    };
    let modified = if model.store.has_unsaved_changes() {
        " [modified]"
    } else {
        ""
    };

    let status = format!(
        " NOTES  {count} {noun}  [{focus}]  Ln {}, Col {}{modified}  F1:help",
        cursor.line + 1,
        col + 1
    );
    let status_bar =
        Paragraph::new(status).style(Style::default().bg(theme.status_bg).fg(theme.status_fg));
    frame.render_widget(status_bar, area);
}

/// The row above the status bar: delete confirmation, then an open
/// prompt, then a toast, else a key hint.
pub fn render_message_line(model: &Model, frame: &mut Frame, area: Rect) {
    if model.pending_delete.is_some() {
        let bar = Paragraph::new(" Delete this note? y/n")
            .style(Style::default().bg(Color::Yellow).fg(Color::Black));
        frame.render_widget(bar, area);
        return;
    }
    if let Some(prompt) = &model.prompt {
        let line = Line::from(vec![
            Span::styled(format!(" {}: ", prompt.kind.label()), model.theme.accent),
            Span::raw(prompt.input.clone()),
            Span::styled(" ", model.theme.cursor),
            Span::styled("  Enter: apply  Esc: cancel", model.theme.dim),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }
    if model.active_toast().is_some() {
        render_toast_bar(model, frame, area);
        return;
    }
    let hint = match model.focus {
        Focus::Editor => " Ctrl+S save  Ctrl+N new  Tab notes  Alt+B/I/U bold/italic/underline",
        Focus::Sidebar => " Enter open  d delete  / search  Tab editor",
        Focus::Search => " Enter keep filter  Esc clear",
    };
    frame.render_widget(Paragraph::new(Line::styled(hint, model.theme.dim)), area);
}

fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
