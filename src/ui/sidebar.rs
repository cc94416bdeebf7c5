use chrono::Utc;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::app::{Focus, Model};
use crate::sidebar::{empty_message, entries};

use super::layout::AppLayout;
use super::style::note_color;

pub fn render_sidebar(model: &Model, frame: &mut Frame, area: Rect, layout: &AppLayout) {
    let theme = &model.theme;
    let focused = matches!(model.focus, Focus::Sidebar | Focus::Search);
    let block = Block::default()
        .title(format!(" Notes ({}) ", model.store.notes().len()))
        .borders(Borders::ALL)
        .border_style(if focused { theme.accent } else { Style::default() });
    frame.render_widget(block, area);

    render_search_line(model, frame, layout.search);

    let rows = entries(&model.store, Utc::now());
    let list = layout.list;
    if rows.is_empty() {
        let (title, hint) = empty_message(model.store.search());
        let mut lines = vec![Line::raw(""), Line::styled(format!(" {title}"), theme.dim)];
        if let Some(hint) = hint {
            lines.push(Line::styled(format!(" {hint}"), theme.dim));
        }
        frame.render_widget(Paragraph::new(lines), list);
        return;
    }

    let text_width = list.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line> = Vec::new();
    for (row, entry) in rows
        .iter()
        .enumerate()
        .skip(model.sidebar_viewport.offset())
        .take(model.sidebar_viewport.height() as usize)
    {
        let swatch = Span::styled("▌ ", Style::default().fg(note_color(entry.color)));
        let mut preview_style = Style::default();
        if entry.active {
            preview_style = preview_style.add_modifier(Modifier::BOLD);
        }
        if row == model.sidebar_selected {
            preview_style = if model.focus == Focus::Sidebar {
                preview_style.add_modifier(Modifier::REVERSED)
            } else {
                preview_style.patch(theme.selection)
            };
        }
        lines.push(Line::from(vec![
            swatch.clone(),
            Span::styled(truncate_to_width(&entry.preview, text_width), preview_style),
        ]));
        lines.push(Line::from(vec![
            swatch,
            Span::styled(entry.time_label.clone(), theme.dim),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), list);
}

fn render_search_line(model: &Model, frame: &mut Frame, area: Rect) {
    let theme = &model.theme;
    let query = model.store.search();
    let line = if model.focus == Focus::Search {
        Line::from(vec![
            Span::styled("/ ", theme.accent),
            Span::raw(query.to_string()),
            Span::styled(" ", theme.cursor),
        ])
    } else if query.is_empty() {
        Line::styled("/ Search notes", theme.dim)
    } else {
        Line::from(vec![Span::styled("/ ", theme.dim), Span::raw(query.to_string())])
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Cut `text` to at most `width` display columns.
fn truncate_to_width(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}
