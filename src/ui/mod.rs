//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - [`style`]: Theming and colors
//! - the layout shared by rendering and mouse hit-testing

pub mod style;
pub mod viewport;

mod editor;
mod layout;
mod overlays;
mod render;
mod sidebar;
mod status;
mod toolbar;

pub use editor::{byte_col_for_display, cursor_line_scroll, line_prefix};
pub use layout::{AppLayout, EDITOR_LEFT_PADDING, ENTRY_HEIGHT, point_in_rect, split_main_columns};
pub use overlays::help_lines;
pub use render::render;
pub use toolbar::{ToolbarAction, toolbar_buttons};

pub const SIDEBAR_WIDTH_PERCENT: u16 = 30;
pub const EDITOR_WIDTH_PERCENT: u16 = 70;
