use std::rc::Rc;

use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};

use super::{EDITOR_WIDTH_PERCENT, SIDEBAR_WIDTH_PERCENT};

/// Terminal rows used by one note in the sidebar list.
pub const ENTRY_HEIGHT: u16 = 2;

/// Blank columns between the editor pane edge and the text.
pub const EDITOR_LEFT_PADDING: u16 = 1;

pub fn split_main_columns(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(SIDEBAR_WIDTH_PERCENT),
            Constraint::Percentage(EDITOR_WIDTH_PERCENT),
        ])
        .split(area)
}

/// Screen regions for one frame.
///
/// Rendering and mouse hit-testing both derive their rectangles from
/// here so clicks land where things are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    /// The bordered sidebar block, when shown.
    pub sidebar: Option<Rect>,
    /// Search input row inside the sidebar.
    pub search: Rect,
    /// Note rows inside the sidebar.
    pub list: Rect,
    pub header: Rect,
    pub toolbar: Rect,
    pub editor: Rect,
    /// Prompt, confirmation and toast row.
    pub message: Rect,
    pub status: Rect,
}

impl AppLayout {
    pub fn new(area: Rect, sidebar_visible: bool) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);
        let (body, message, status) = (rows[0], rows[1], rows[2]);

        let (sidebar, main) = if sidebar_visible {
            let columns = split_main_columns(body);
            (Some(columns[0]), columns[1])
        } else {
            (None, body)
        };

        let (search, list) = sidebar.map_or((Rect::default(), Rect::default()), |block| {
            let inner = block.inner(Margin::new(1, 1));
            let search = Rect { height: inner.height.min(1), ..inner };
            let list = Rect {
                y: inner.y + search.height,
                height: inner.height.saturating_sub(search.height),
                ..inner
            };
            (search, list)
        });

        let panes = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(main);

        Self {
            sidebar,
            search,
            list,
            header: panes[0],
            toolbar: panes[1],
            editor: panes[2],
            message,
            status,
        }
    }

    /// How many whole note entries fit in the list.
    pub const fn sidebar_rows(&self) -> u16 {
        self.list.height / ENTRY_HEIGHT
    }

    /// Columns available for text in the editor pane.
    pub const fn editor_text_width(&self) -> u16 {
        self.editor.width.saturating_sub(EDITOR_LEFT_PADDING)
    }
}

pub const fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}
