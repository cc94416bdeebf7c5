use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{Focus, Model};
use crate::editor::{BlockKind, EditorBuffer};

use super::EDITOR_LEFT_PADDING;
use super::style::{Theme, swatch_style};

const PLACEHOLDER: &str = "Start typing your note...";

/// The marker drawn before a line's text, by block kind.
///
/// Ordered items are numbered by their position in the run of ordered
/// lines they belong to.
pub fn line_prefix(buffer: &EditorBuffer, line_idx: usize) -> String {
    match buffer.block_at(line_idx) {
        BlockKind::BulletItem => "• ".to_string(),
        BlockKind::OrderedItem => {
            let position = (0..line_idx)
                .rev()
                .take_while(|&idx| buffer.block_at(idx) == BlockKind::OrderedItem)
                .count();
            format!("{}. ", position + 1)
        }
        BlockKind::Quote => "│ ".to_string(),
        BlockKind::CodeBlock => "  ".to_string(),
        BlockKind::Paragraph | BlockKind::Heading1 | BlockKind::Heading2 => String::new(),
    }
}

/// Byte column in `line` for a display column, snapping to the character
/// under it. Columns past the end map to the line end.
pub fn byte_col_for_display(line: &str, display_col: usize) -> usize {
    let mut width = 0;
    for (idx, ch) in line.char_indices() {
        let ch_width = ch.width().unwrap_or(0);
        if display_col < width + ch_width.max(1) {
            return idx;
        }
        width += ch_width;
    }
    line.len()
}

pub fn render_header(model: &Model, frame: &mut Frame, area: Rect) {
    let color = model.store.note_color();
    let title = if model.store.is_editing() {
        "Editing note"
    } else {
        "Create a new note"
    };
    let color_label = color.name().map_or_else(|| color.to_string(), str::to_string);
    let modified = if model.store.has_unsaved_changes() {
        "  [modified]"
    } else {
        ""
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(format!(" {title}"), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("  ● {color_label}{modified}")),
    ]))
    .style(swatch_style(color));
    frame.render_widget(header, area);
}

pub fn render_editor(model: &Model, frame: &mut Frame, area: Rect) {
    let buffer = model.surface.buffer();
    let theme = &model.theme;
    let show_cursor = model.focus == Focus::Editor && model.prompt.is_none();
    let text_width = area.width.saturating_sub(EDITOR_LEFT_PADDING) as usize;

    let start = model.editor_viewport.offset();
    let end = (start + area.height as usize).min(buffer.line_count());
    let padding = " ".repeat(EDITOR_LEFT_PADDING as usize);

    let mut content: Vec<Line> = Vec::new();
    for line_idx in start..end {
        let block = buffer.block_at(line_idx);
        let prefix = line_prefix(buffer, line_idx);
        let prefix_style = match block {
            BlockKind::BulletItem | BlockKind::OrderedItem => theme.list_marker,
            BlockKind::Quote => theme.quote,
            _ => theme.dim,
        };

        let mut cells = line_cells(buffer, line_idx, theme, show_cursor);
        if buffer.is_blank() && line_idx == 0 {
            cells.extend(PLACEHOLDER.chars().map(|ch| (ch, theme.dim)));
        }
        let cursor = buffer.cursor();
        if show_cursor && cursor.line == line_idx {
            let available = text_width.saturating_sub(prefix.width());
            scroll_cells_to_cursor(&mut cells, buffer, available);
        }

        let mut spans = vec![
            Span::raw(padding.clone()),
            Span::styled(prefix, prefix_style),
        ];
        spans.extend(merge_cells(cells));
        content.push(Line::from(spans));
    }

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content), area);
}

/// One styled character per cell, with the caret drawn as a cell of its
/// own (a trailing space when it sits at the end of the line).
fn line_cells(
    buffer: &EditorBuffer,
    line_idx: usize,
    theme: &Theme,
    show_cursor: bool,
) -> Vec<(char, Style)> {
    let base = theme.block_style(buffer.block_at(line_idx));
    let selection = buffer.selection();
    let cursor = buffer.cursor();
    let is_cursor = |col: usize| show_cursor && cursor.line == line_idx && cursor.col == col;
    let is_selected = |col: usize| {
        selection.is_some_and(|(from, to)| {
            (from.line, from.col) <= (line_idx, col) && (line_idx, col) < (to.line, to.col)
        })
    };

    let mut cells = Vec::new();
    let mut col = 0;
    for run in buffer.line_runs(line_idx) {
        let style = theme.attrs_style(base, &run.attrs);
        for ch in run.text.chars() {
            let cell_style = if is_cursor(col) {
                theme.cursor
            } else if is_selected(col) {
                style.patch(theme.selection)
            } else {
                style
            };
            cells.push((ch, cell_style));
            col += ch.len_utf8();
        }
    }
    if is_cursor(col) {
        cells.push((' ', theme.cursor));
    }
    cells
}

/// Leading characters hidden on the caret line so the caret fits in
/// `width` columns, as `(chars, display columns)`.
///
/// Lines whose caret already fits are not scrolled.
pub fn cursor_line_scroll(buffer: &EditorBuffer, width: usize) -> (usize, usize) {
    let cursor = buffer.cursor();
    let line = buffer.line_at(cursor.line).unwrap_or_default();
    let before = line.get(..cursor.col).map_or(0, UnicodeWidthStr::width);
    if width == 0 || before < width {
        return (0, 0);
    }
    let mut overflow = before + 1 - width;
    let (mut chars, mut columns) = (0, 0);
    for ch in line.chars() {
        if overflow == 0 {
            break;
        }
        let ch_width = ch.width().unwrap_or(0).max(1);
        overflow = overflow.saturating_sub(ch_width);
        chars += 1;
        columns += ch_width;
    }
    (chars, columns)
}

/// Drop the cells [`cursor_line_scroll`] hides.
fn scroll_cells_to_cursor(cells: &mut Vec<(char, Style)>, buffer: &EditorBuffer, width: usize) {
    let (skip, _) = cursor_line_scroll(buffer, width);
    cells.drain(..skip.min(cells.len()));
}

fn merge_cells(cells: Vec<(char, Style)>) -> Vec<Span<'static>> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut text = String::new();
    let mut current: Option<Style> = None;
    for (ch, style) in cells {
        if current.is_some_and(|s| s != style) {
            let done = std::mem::take(&mut text);
            spans.push(Span::styled(done, current.unwrap_or_default()));
        }
        current = Some(style);
        text.push(ch);
    }
    if let Some(style) = current {
        spans.push(Span::styled(text, style));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::from_markup;

    #[test]
    fn test_prefixes_by_block_kind() {
        let buffer = from_markup("# Title\n\n- a\n- b\n\n1. x\n2. y\n3. z\n\n> q");
        let prefixes: Vec<String> = (0..buffer.line_count())
            .map(|idx| line_prefix(&buffer, idx))
            .collect();
        assert_eq!(prefixes, vec!["", "• ", "• ", "1. ", "2. ", "3. ", "│ "]);
    }

    #[test]
    fn test_byte_col_for_display_handles_wide_chars() {
        assert_eq!(byte_col_for_display("abc", 1), 1);
        assert_eq!(byte_col_for_display("abc", 10), 3);
        assert_eq!(byte_col_for_display("é!", 1), 2);
        assert_eq!(byte_col_for_display("日本", 1), 0);
        assert_eq!(byte_col_for_display("日本", 2), 3);
    }

    #[test]
    fn test_merge_cells_groups_equal_styles() {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let spans = merge_cells(vec![
            ('a', Style::default()),
            ('b', Style::default()),
            ('c', bold),
        ]);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].content, "ab");
        assert_eq!(spans[1].content, "c");
        assert_eq!(spans[1].style, bold);
    }

    #[test]
    fn test_cursor_cell_at_line_end() {
        let mut buffer = from_markup("hi");
        buffer.move_to(0, 2);
        let theme = Theme::dark();
        let cells = line_cells(&buffer, 0, &theme, true);
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[2], (' ', theme.cursor));
    }

    #[test]
    fn test_long_cursor_line_scrolls_horizontally() {
        let mut buffer = from_markup(&"x".repeat(30));
        buffer.move_to(0, 30);
        let theme = Theme::dark();
        let mut cells = line_cells(&buffer, 0, &theme, true);
        scroll_cells_to_cursor(&mut cells, &buffer, 10);
        assert_eq!(cells.len(), 10);
        assert_eq!(cells.last().map(|c| c.1), Some(theme.cursor));
        assert_eq!(cursor_line_scroll(&buffer, 10), (21, 21));
    }

    #[test]
    fn test_cursor_line_scroll_counts_wide_chars_as_columns() {
        let mut buffer = from_markup(&"日".repeat(10));
        buffer.move_to(0, 30);
        assert_eq!(cursor_line_scroll(&buffer, 10), (6, 12));
    }

    #[test]
    fn test_cursor_line_scroll_is_zero_when_caret_fits() {
        let mut buffer = from_markup("short");
        buffer.move_to(0, 5);
        assert_eq!(cursor_line_scroll(&buffer, 10), (0, 0));
    }
}
