use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;

/// Every line of the help text, before scrolling.
pub fn help_lines(model: &Model) -> Vec<Line<'static>> {
    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut all_lines: Vec<Line> = Vec::new();

    all_lines.push(Line::styled("Notes", section_style));
    all_lines.push(Line::raw("  Ctrl-s              Save / update note"));
    all_lines.push(Line::raw("  Ctrl-n              New note"));
    all_lines.push(Line::raw("  Esc                 Stop editing selected note"));
    all_lines.push(Line::raw("  F2                  Next note color"));
    all_lines.push(Line::raw("  F3                  Enter note color"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Editor", section_style));
    all_lines.push(Line::raw("  Arrows, Home/End    Navigate"));
    all_lines.push(Line::raw("  Ctrl+Left/Right     Word movement"));
    all_lines.push(Line::raw("  Ctrl+Home/End       Note start / end"));
    all_lines.push(Line::raw("  Shift+movement      Extend selection"));
    all_lines.push(Line::raw("  Ctrl-a              Select all"));
    all_lines.push(Line::raw("  PageUp/PageDown     Move by a page"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Formatting", section_style));
    all_lines.push(Line::raw("  Alt-b / Alt-i / Alt-u  Bold / italic / underline mode"));
    all_lines.push(Line::raw("  Alt-s / Alt-`       Strikethrough / inline code"));
    all_lines.push(Line::raw("  Alt-1 / Alt-2       Heading 1 / 2"));
    all_lines.push(Line::raw("  Alt-l / Alt-o       Bullet / numbered list"));
    all_lines.push(Line::raw("  Alt-q / Alt-c       Quote / code block"));
    all_lines.push(Line::raw("  Ctrl-k              Link"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Notes list", section_style));
    all_lines.push(Line::raw("  Tab                 Switch focus"));
    all_lines.push(Line::raw("  Ctrl-b              Toggle notes list"));
    all_lines.push(Line::raw("  j/k or Up/Down      Move"));
    all_lines.push(Line::raw("  Enter, click        Open note"));
    all_lines.push(Line::raw("  d / Delete          Delete note"));
    all_lines.push(Line::raw("  /                   Search"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Other", section_style));
    all_lines.push(Line::raw("  Ctrl-q / Ctrl-c     Quit"));
    all_lines.push(Line::raw("  F1                  Toggle help"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Config", section_style));
    all_lines.push(Line::raw(format!("  Global: {global_cfg}")));
    all_lines.push(Line::raw(format!("  Local override: {local_cfg}")));

    all_lines
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(6).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);
    let dim_style = Style::default().fg(Color::Indexed(245));

    let all_lines = help_lines(model);

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // Inner area: border(1) + padding(1) on each side = 4
    let inner = Rect::new(
        popup.x + 2,
        popup.y + 2,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(4),
    );

    // Reserve 1 row at bottom for footer hint
    let content_height_u16 = inner.height.saturating_sub(1);
    let content_height = content_height_u16 as usize;
    let max_scroll = all_lines.len().saturating_sub(content_height);
    let scroll = model.help_scroll_offset.min(max_scroll);

    let end = (scroll + content_height).min(all_lines.len());
    let visible: Vec<Line> = all_lines[scroll..end].to_vec();

    let content_area = Rect::new(inner.x, inner.y, inner.width, content_height_u16);
    frame.render_widget(Paragraph::new(visible), content_area);

    let footer_area = Rect::new(inner.x, inner.y + content_height_u16, inner.width, 1);
    let footer = Line::styled("j/k scroll \u{2502} Esc closes", dim_style);
    frame.render_widget(Paragraph::new(footer), footer_area);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
