use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::Model;
use crate::editor::{FormatCommand, Mark};

/// What a toolbar button does when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    Format(FormatCommand),
    Link,
    Color,
    Save,
}

impl ToolbarAction {
    fn label(self, editing: bool) -> &'static str {
        match self {
            Self::Format(command) => command.label(),
            Self::Link => "Link",
            Self::Color => "Color",
            Self::Save if editing => "Update",
            Self::Save => "Save",
        }
    }
}

/// Button rectangles in display order, clipped to `area`.
///
/// Each button is its label padded by one space on each side, with one
/// column between buttons.
pub fn toolbar_buttons(area: Rect, editing: bool) -> Vec<(Rect, ToolbarAction)> {
    let actions = FormatCommand::TOOLBAR
        .into_iter()
        .map(ToolbarAction::Format)
        .chain([ToolbarAction::Link, ToolbarAction::Color, ToolbarAction::Save]);

    let right = area.x.saturating_add(area.width);
    let mut x = area.x.saturating_add(1);
    let mut buttons = Vec::new();
    for action in actions {
        #[allow(clippy::cast_possible_truncation)]
        let width = action.label(editing).width() as u16 + 2;
        if x.saturating_add(width) > right {
            break;
        }
        buttons.push((Rect::new(x, area.y, width, 1), action));
        x += width + 1;
    }
    buttons
}

pub fn render_toolbar(model: &Model, frame: &mut Frame, area: Rect) {
    let theme = &model.theme;
    let editing = model.store.is_editing();
    let sticky = model.surface.sticky();

    let mut spans = vec![Span::raw(" ")];
    for (_, action) in toolbar_buttons(area, editing) {
        let label = format!(" {} ", action.label(editing));
        let style = match action {
            ToolbarAction::Format(command) if model.surface.is_active(command) => {
                theme.accent.add_modifier(Modifier::REVERSED)
            }
            ToolbarAction::Format(FormatCommand::Mark(mark)) if sticky.get(mark) => {
                theme.accent.add_modifier(Modifier::BOLD)
            }
            ToolbarAction::Format(FormatCommand::Mark(Mark::Bold)) => {
                Style::default().add_modifier(Modifier::BOLD)
            }
            ToolbarAction::Format(_) | ToolbarAction::Link | ToolbarAction::Color => {
                theme.dim
            }
            ToolbarAction::Save if model.store.has_unsaved_changes() => {
                theme.accent.add_modifier(Modifier::BOLD)
            }
            ToolbarAction::Save => theme.dim,
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::BlockKind;

    #[test]
    fn test_buttons_are_laid_out_left_to_right() {
        let buttons = toolbar_buttons(Rect::new(10, 1, 200, 1), false);
        assert_eq!(buttons.len(), FormatCommand::TOOLBAR.len() + 3);
        assert_eq!(buttons[0].0, Rect::new(11, 1, 3, 1));
        assert_eq!(buttons[1].0.x, 15);
        assert_eq!(buttons[0].1, ToolbarAction::Format(FormatCommand::Mark(Mark::Bold)));
        assert_eq!(
            buttons[5].1,
            ToolbarAction::Format(FormatCommand::Block(BlockKind::Heading1))
        );
        assert_eq!(buttons.last().map(|b| b.1), Some(ToolbarAction::Save));
    }

    #[test]
    fn test_buttons_are_clipped_to_area() {
        let buttons = toolbar_buttons(Rect::new(0, 0, 12, 1), false);
        assert_eq!(buttons.len(), 3);
        assert!(buttons.iter().all(|(rect, _)| rect.x + rect.width <= 12));
    }

    #[test]
    fn test_save_label_follows_editing_state() {
        let wide = Rect::new(0, 0, 200, 1);
        let save = |editing| {
            toolbar_buttons(wide, editing)
                .last()
                .map(|(rect, _)| rect.width)
                .unwrap()
        };
        assert_eq!(save(false), 6);
        assert_eq!(save(true), 8);
    }
}
