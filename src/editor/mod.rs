//! Rich-text editor for note bodies.
//!
//! A rope-backed buffer with per-character marks and per-line block kinds,
//! a markup serializer for storing notes, and the editing surface that adds
//! sticky formatting modes on top.

mod buffer;
mod markup;
mod marks;
mod surface;

pub use buffer::{CharAttrs, Cursor, Direction, EditorBuffer, Motion, RichLine, StyledRun};
pub use markup::{from_markup, plain_text, to_markup};
pub use marks::{BlockKind, Mark, MarkSet};
pub use surface::{EditorSurface, FormatCommand, StickyModes};
