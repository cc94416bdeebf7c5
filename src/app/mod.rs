//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Focus, Model, Prompt, PromptKind, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::store::NoteColor;
use crate::ui::style::Theme;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    default_color: NoteColor,
    sidebar_visible: bool,
    confirm_delete: bool,
    theme: Theme,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    pub fn new() -> Self {
        Self {
            default_color: NoteColor::WHITE,
            sidebar_visible: true,
            confirm_delete: true,
            theme: Theme::default(),
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Color given to new notes and restored when the editor is cleared.
    pub const fn with_default_color(mut self, color: NoteColor) -> Self {
        self.default_color = color;
        self
    }

    /// Set initial notes list visibility.
    pub const fn with_sidebar_visible(mut self, visible: bool) -> Self {
        self.sidebar_visible = visible;
        self
    }

    /// Ask "Delete this note? y/n" before deleting.
    pub const fn with_confirm_delete(mut self, confirm: bool) -> Self {
        self.confirm_delete = confirm;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set config paths to show in help.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
