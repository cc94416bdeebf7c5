//! Scroll windows over line-based content.
//!
//! The editor scrolls over buffer lines and the sidebar scrolls over note
//! entries; both use a [`Viewport`].

use std::ops::Range;

/// The visible slice of a list of rows.
///
/// # Example
///
/// ```
/// use easynotes::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(24, 100);
/// assert_eq!(vp.visible_range(), 0..24);
///
/// vp.scroll_down(10);
/// assert_eq!(vp.visible_range(), 10..34);
///
/// vp.ensure_visible(5);
/// assert_eq!(vp.offset(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    /// Create a viewport `height` rows tall over `total_lines` rows.
    pub const fn new(height: u16, total_lines: usize) -> Self {
        Self {
            height,
            offset: 0,
            total_lines,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Rows currently on screen, clamped to the content.
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.offset;
        let end = (self.offset + self.height as usize).min(self.total_lines);
        start..end
    }

    pub const fn can_scroll_up(&self) -> bool {
        self.offset > 0
    }

    pub const fn can_scroll_down(&self) -> bool {
        self.offset < self.max_offset()
    }

    pub const fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max_offset());
    }

    /// Put `line` at the top of the viewport, as far as the content allows.
    pub fn go_to_line(&mut self, line: usize) {
        self.offset = line.min(self.max_offset());
    }

    /// Scroll the least amount needed to bring `line` on screen.
    pub fn ensure_visible(&mut self, line: usize) {
        let height = (self.height as usize).max(1);
        if line < self.offset {
            self.offset = line;
        } else if line >= self.offset + height {
            self.offset = line + 1 - height;
        }
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn resize(&mut self, height: u16) {
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Update the row count, e.g. after an edit or a new search.
    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.offset = self.offset.min(self.max_offset());
    }

    const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}
