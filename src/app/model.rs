use std::path::PathBuf;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::editor::EditorSurface;
use crate::store::NoteStore;
use crate::ui::AppLayout;
use crate::ui::style::Theme;
use crate::ui::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which pane receives keyboard input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Editor,
    Sidebar,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Link,
    Color,
}

impl PromptKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Link => "Link URL",
            Self::Color => "Note color (#hex or name)",
        }
    }
}

/// A one-line text prompt shown above the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// Notes plus the editing buffer, color and active index
    pub store: NoteStore,
    /// Rich-text editor showing the store's buffer
    pub surface: EditorSurface,
    pub focus: Focus,
    /// Whether the notes list is shown
    pub sidebar_visible: bool,
    /// Ask before deleting a note
    pub confirm_delete: bool,
    /// Highlighted row in the filtered notes list
    pub sidebar_selected: usize,
    /// Scroll window over sidebar entries
    pub sidebar_viewport: Viewport,
    /// Scroll window over editor lines
    pub editor_viewport: Viewport,
    pub terminal_size: (u16, u16),
    /// Open link or color prompt
    pub prompt: Option<Prompt>,
    /// Collection index awaiting delete confirmation
    pub pending_delete: Option<usize>,
    pub help_visible: bool,
    pub help_scroll_offset: usize,
    pub theme: Theme,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    toast: Option<Toast>,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Set after the first quit request with unsaved changes
    pub quit_confirmed: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("notes", &self.store.notes().len())
            .field("current_note_index", &self.store.current_note_index())
            .field("focus", &self.focus)
            .field("sidebar_visible", &self.sidebar_visible)
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a model for a terminal of the given size.
    pub fn new(store: NoteStore, terminal_size: (u16, u16)) -> Self {
        let mut model = Self {
            store,
            terminal_size,
            ..Self::default()
        };
        model.surface.load(model.store.editor_content());
        model.sync_layout();
        model
    }

    /// Screen regions for the current terminal size.
    pub fn layout(&self) -> AppLayout {
        let (width, height) = self.terminal_size;
        AppLayout::new(Rect::new(0, 0, width, height), self.sidebar_visible)
    }

    /// Fit both viewports to the layout and their content, and keep the
    /// sidebar selection inside the filtered list.
    pub fn sync_layout(&mut self) {
        let layout = self.layout();
        self.editor_viewport.resize(layout.editor.height);
        self.editor_viewport
            .set_total_lines(self.surface.buffer().line_count());

        let rows = self.store.filtered().len();
        self.sidebar_selected = self.sidebar_selected.min(rows.saturating_sub(1));
        self.sidebar_viewport.resize(layout.sidebar_rows());
        self.sidebar_viewport.set_total_lines(rows);
    }

    /// Collection index of the highlighted sidebar row.
    pub fn selected_note_index(&self) -> Option<usize> {
        self.store
            .filtered()
            .get(self.sidebar_selected)
            .map(|(index, _)| *index)
    }

    /// Scroll the editor so the caret is on screen.
    pub fn follow_cursor(&mut self) {
        let line = self.surface.buffer().cursor().line;
        self.editor_viewport.ensure_visible(line);
    }

    /// Reload the editor from the store's buffer and scroll to the top.
    pub(super) fn reload_surface(&mut self) {
        self.surface.load(self.store.editor_content());
        self.editor_viewport
            .set_total_lines(self.surface.buffer().line_count());
        self.editor_viewport.go_to_line(0);
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self {
            store: NoteStore::new(),
            surface: EditorSurface::new(),
            focus: Focus::Editor,
            sidebar_visible: true,
            confirm_delete: true,
            sidebar_selected: 0,
            sidebar_viewport: Viewport::new(0, 0),
            editor_viewport: Viewport::new(20, 1),
            terminal_size: (80, 24),
            prompt: None,
            pending_delete: None,
            help_visible: false,
            help_scroll_offset: 0,
            theme: Theme::default(),
            config_global_path: None,
            config_local_path: None,
            toast: None,
            should_quit: false,
            quit_confirmed: false,
        }
    }
}
