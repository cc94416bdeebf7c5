use super::buffer::{EditorBuffer, Motion};
use super::markup::{from_markup, to_markup};
use super::marks::{BlockKind, Mark};

/// Sticky formatting modes.
///
/// While a mode is on, the caret keeps receiving its mark after every edit
/// and cursor move, so text typed anywhere picks it up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StickyModes {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl StickyModes {
    /// Whether the mode for `mark` is on. Marks without a mode are never sticky.
    pub const fn get(self, mark: Mark) -> bool {
        match mark {
            Mark::Bold => self.bold,
            Mark::Italic => self.italic,
            Mark::Underline => self.underline,
            Mark::Strike | Mark::Code => false,
        }
    }

    const fn slot(&mut self, mark: Mark) -> Option<&mut bool> {
        match mark {
            Mark::Bold => Some(&mut self.bold),
            Mark::Italic => Some(&mut self.italic),
            Mark::Underline => Some(&mut self.underline),
            Mark::Strike | Mark::Code => None,
        }
    }
}

/// A toolbar formatting command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCommand {
    Mark(Mark),
    Block(BlockKind),
}

impl FormatCommand {
    /// Toolbar buttons in display order.
    pub const TOOLBAR: [Self; 11] = [
        Self::Mark(Mark::Bold),
        Self::Mark(Mark::Italic),
        Self::Mark(Mark::Underline),
        Self::Mark(Mark::Strike),
        Self::Mark(Mark::Code),
        Self::Block(BlockKind::Heading1),
        Self::Block(BlockKind::Heading2),
        Self::Block(BlockKind::BulletItem),
        Self::Block(BlockKind::OrderedItem),
        Self::Block(BlockKind::Quote),
        Self::Block(BlockKind::CodeBlock),
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Mark(Mark::Bold) => "B",
            Self::Mark(Mark::Italic) => "I",
            Self::Mark(Mark::Underline) => "U",
            Self::Mark(Mark::Strike) => "S",
            Self::Mark(Mark::Code) => "`",
            Self::Block(BlockKind::Heading1) => "H1",
            Self::Block(BlockKind::Heading2) => "H2",
            Self::Block(BlockKind::BulletItem) => "•",
            Self::Block(BlockKind::OrderedItem) => "1.",
            Self::Block(BlockKind::Quote) => "❝",
            Self::Block(BlockKind::CodeBlock) => "{}",
            Self::Block(BlockKind::Paragraph) => "¶",
        }
    }
}

/// The rich-text editing surface: a buffer plus the sticky mode flags.
///
/// Every method that can change the document returns `Some(markup)` when it
/// did, so the caller can forward the new content to the note store.
#[derive(Debug, Default)]
pub struct EditorSurface {
    buffer: EditorBuffer,
    sticky: StickyModes,
}

impl EditorSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn buffer(&self) -> &EditorBuffer {
        &self.buffer
    }

    pub const fn sticky(&self) -> StickyModes {
        self.sticky
    }

    /// Replace the document with parsed `markup`. Sticky modes are kept.
    pub fn load(&mut self, markup: &str) {
        self.buffer = from_markup(markup);
        self.reapply_sticky();
    }

    /// The document serialized to markup.
    pub fn markup(&self) -> String {
        to_markup(&self.buffer)
    }

    /// Run an edit against the buffer.
    ///
    /// Returns the new markup if the document changed.
    pub fn edit(&mut self, f: impl FnOnce(&mut EditorBuffer)) -> Option<String> {
        let before = self.buffer.revision();
        f(&mut self.buffer);
        self.after_change(before)
    }

    /// Move the caret or extend the selection.
    pub fn motion(&mut self, motion: Motion, extend: bool) {
        self.buffer.apply_motion(motion, extend);
        self.reapply_sticky();
    }

    pub fn select_all(&mut self) {
        self.buffer.select_all();
    }

    /// Click-to-place the caret.
    pub fn move_to(&mut self, line: usize, col: usize) {
        self.buffer.move_to(line, col);
        self.reapply_sticky();
    }

    /// Drag-select from the current caret to a position.
    pub fn select_to(&mut self, line: usize, col: usize) {
        self.buffer.select_to(line, col);
    }

    pub fn clear_selection(&mut self) {
        self.buffer.clear_selection();
        self.reapply_sticky();
    }

    /// Toggle the sticky mode for `mark`.
    ///
    /// With a selection, the mark is toggled over it and the mode is left
    /// alone. Without one, the mode flips and the caret follows it.
    pub fn toggle_sticky(&mut self, mark: Mark) -> Option<String> {
        if self.buffer.has_selection() {
            return self.edit(|buf| buf.toggle_mark(mark));
        }
        let Some(flag) = self.sticky.slot(mark) else {
            return self.edit(|buf| buf.toggle_mark(mark));
        };
        *flag = !*flag;
        let on = *flag;
        let active = self.buffer.is_active(mark);
        if on && !active {
            self.buffer.set_mark(mark);
        } else if !on && active {
            self.buffer.unset_mark(mark);
        }
        tracing::debug!(?mark, on, "sticky mode toggled");
        None
    }

    /// Dispatch a toolbar command.
    pub fn apply(&mut self, command: FormatCommand) -> Option<String> {
        match command {
            FormatCommand::Mark(mark) if Mark::STICKY.contains(&mark) => self.toggle_sticky(mark),
            FormatCommand::Mark(mark) => self.edit(|buf| buf.toggle_mark(mark)),
            FormatCommand::Block(kind) => self.edit(|buf| buf.toggle_block(kind)),
        }
    }

    /// Link the selection, or insert the URL as a link at the caret.
    pub fn set_link(&mut self, href: &str) -> Option<String> {
        self.edit(|buf| buf.set_link(href))
    }

    /// Whether a toolbar command shows as active at the caret.
    pub fn is_active(&self, command: FormatCommand) -> bool {
        match command {
            FormatCommand::Mark(mark) => self.buffer.is_active(mark),
            FormatCommand::Block(kind) => self.buffer.block_at(self.buffer.cursor().line) == kind,
        }
    }

    fn after_change(&mut self, before: u64) -> Option<String> {
        if self.buffer.revision() == before {
            return None;
        }
        self.reapply_sticky();
        Some(self.markup())
    }

    /// Each sticky mode that is on re-applies its mark when the caret has
    /// no selection and the mark is not already active there.
    fn reapply_sticky(&mut self) {
        if self.buffer.has_selection() {
            return;
        }
        for mark in Mark::STICKY {
            if self.sticky.get(mark) && !self.buffer.is_active(mark) {
                self.buffer.set_mark(mark);
            }
        }
    }
}
