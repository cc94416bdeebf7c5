// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. store::NoteStore)
    clippy::module_name_repetitions
)]

//! # easynotes
//!
//! A terminal note-taking app with a rich-text editor.
//!
//! easynotes keeps a list of colored notes in memory and edits them with:
//! - Bold, italic and underline modes that stay on while you type
//! - Headings, lists, quotes, code blocks and links
//! - A searchable sidebar with previews and relative timestamps
//!
//! ## Architecture
//!
//! easynotes uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`store`]: Notes, colors and the commit/select/delete rules
//! - [`editor`]: Rich-text buffer, markup and sticky formatting
//! - [`sidebar`]: List previews and timestamps
//! - [`search`]: Note filtering
//! - [`ui`]: Terminal UI components
//! - [`config`]: Flag files and defaults

pub mod app;
pub mod config;
pub mod editor;
pub mod search;
pub mod sidebar;
pub mod store;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::editor::EditorSurface;
    pub use crate::store::NoteStore;
    pub use crate::ui::viewport::Viewport;
}
