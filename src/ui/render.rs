use ratatui::prelude::*;

use crate::app::Model;

use super::layout::AppLayout;
use super::{editor, overlays, sidebar, status, toolbar};

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let layout = AppLayout::new(area, model.sidebar_visible);

    if let Some(sidebar_area) = layout.sidebar {
        sidebar::render_sidebar(model, frame, sidebar_area, &layout);
    }
    editor::render_header(model, frame, layout.header);
    toolbar::render_toolbar(model, frame, layout.toolbar);
    editor::render_editor(model, frame, layout.editor);
    status::render_message_line(model, frame, layout.message);
    status::render_status_bar(model, frame, layout.status);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}
