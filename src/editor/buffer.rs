use std::ops::Range;
use std::sync::Arc;

use ropey::Rope;

use super::marks::{BlockKind, Mark, MarkSet};

/// Cursor position in the editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column (byte offset within the line).
    pub col: usize,
    /// Remembered column for vertical movement (sticky column).
    col_memory: usize,
}

impl Cursor {
    /// Create a cursor at line 0, column 0.
    pub const fn new() -> Self {
        Self {
            line: 0,
            col: 0,
            col_memory: 0,
        }
    }

    /// Create a cursor at a specific position.
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            col_memory: col,
        }
    }

    /// Update column and reset column memory to match.
    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.col_memory = col;
    }

    const fn pos(self) -> (usize, usize) {
        (self.line, self.col)
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A cursor motion, usable both for moving and for extending the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Step(Direction),
    Home,
    End,
    WordLeft,
    WordRight,
    BufferStart,
    BufferEnd,
}

/// Formatting carried by one character.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharAttrs {
    pub marks: MarkSet,
    pub link: Option<Arc<str>>,
}

impl CharAttrs {
    pub const fn plain() -> Self {
        Self {
            marks: MarkSet::EMPTY,
            link: None,
        }
    }
}

/// A run of consecutive characters sharing the same attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub attrs: CharAttrs,
}

impl StyledRun {
    pub fn new(text: impl Into<String>, attrs: CharAttrs) -> Self {
        Self {
            text: text.into(),
            attrs,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, CharAttrs::plain())
    }
}

/// One editor line with its block kind and styled runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichLine {
    pub block: BlockKind,
    pub runs: Vec<StyledRun>,
}

impl RichLine {
    pub const fn new(block: BlockKind, runs: Vec<StyledRun>) -> Self {
        Self { block, runs }
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A rich-text buffer backed by a rope.
///
/// Alongside the rope it keeps one [`CharAttrs`] per character and one
/// [`BlockKind`] per line; both are kept in step with every edit. Line
/// breaks are always `\n`.
///
/// With an empty selection, "stored marks" decide what the next typed
/// character receives. They are cleared by cursor movement and consumed by
/// typing; otherwise a typed character inherits the marks of its neighbor.
pub struct EditorBuffer {
    rope: Rope,
    attrs: Vec<CharAttrs>,
    blocks: Vec<BlockKind>,
    cursor: Cursor,
    anchor: Option<Cursor>,
    stored_marks: Option<MarkSet>,
    revision: u64,
}

impl EditorBuffer {
    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self {
            rope: Rope::new(),
            attrs: Vec::new(),
            blocks: vec![BlockKind::Paragraph],
            cursor: Cursor::new(),
            anchor: None,
            stored_marks: None,
            revision: 0,
        }
    }

    /// Create an unformatted buffer from a string.
    pub fn from_text(text: &str) -> Self {
        let lines = text
            .split('\n')
            .map(|line| RichLine::new(BlockKind::Paragraph, vec![StyledRun::plain(line)]))
            .collect();
        Self::from_lines(lines)
    }

    /// Create a buffer from styled lines.
    pub fn from_lines(lines: Vec<RichLine>) -> Self {
        if lines.is_empty() {
            return Self::empty();
        }
        let mut text = String::new();
        let mut attrs = Vec::new();
        let mut blocks = Vec::with_capacity(lines.len());
        for (idx, line) in lines.into_iter().enumerate() {
            if idx > 0 {
                text.push('\n');
                attrs.push(CharAttrs::plain());
            }
            for run in line.runs {
                let run_attrs = if line.block.allows_marks() {
                    run.attrs
                } else {
                    CharAttrs::plain()
                };
                for ch in run.text.chars() {
                    push_normalized(&mut text, &mut attrs, ch, &run_attrs);
                }
            }
            blocks.push(line.block);
        }
        Self {
            rope: Rope::from_str(&text),
            attrs,
            blocks,
            cursor: Cursor::new(),
            anchor: None,
            stored_marks: None,
            revision: 0,
        }
    }

    /// The current cursor position.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Counter bumped by every change to text, marks or blocks.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let s = self.rope.line(line_idx).to_string();
        Some(s.trim_end_matches('\n').to_string())
    }

    /// Length of a line in bytes (without trailing newline).
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.len())
    }

    /// The full plain text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Whether the buffer holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.rope.chars().all(char::is_whitespace)
    }

    pub fn block_at(&self, line_idx: usize) -> BlockKind {
        self.blocks.get(line_idx).copied().unwrap_or_default()
    }

    /// Styled runs of a line, merging neighbors with equal attributes.
    pub fn line_runs(&self, line_idx: usize) -> Vec<StyledRun> {
        let mut runs: Vec<StyledRun> = Vec::new();
        if line_idx >= self.line_count() {
            return runs;
        }
        let range = self.line_char_range(line_idx);
        for (offset, ch) in self.rope.slice(range.clone()).chars().enumerate() {
            let attrs = &self.attrs[range.start + offset];
            match runs.last_mut() {
                Some(run) if run.attrs == *attrs => run.text.push(ch),
                _ => runs.push(StyledRun::new(ch.to_string(), attrs.clone())),
            }
        }
        runs
    }

    /// All lines with their blocks and runs.
    pub fn lines(&self) -> Vec<RichLine> {
        (0..self.line_count())
            .map(|idx| RichLine::new(self.block_at(idx), self.line_runs(idx)))
            .collect()
    }

    // --- Selection ---

    /// Ordered (start, end) of the selection, if it is non-empty.
    pub fn selection(&self) -> Option<(Cursor, Cursor)> {
        let anchor = self.anchor?;
        match anchor.pos().cmp(&self.cursor.pos()) {
            std::cmp::Ordering::Less => Some((anchor, self.cursor)),
            std::cmp::Ordering::Greater => Some((self.cursor, anchor)),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn has_selection(&self) -> bool {
        self.selection().is_some()
    }

    pub fn select_all(&mut self) {
        self.anchor = Some(Cursor::new());
        let last = self.line_count().saturating_sub(1);
        self.cursor = Cursor::at(last, self.line_len(last));
        self.stored_marks = None;
    }

    pub const fn clear_selection(&mut self) {
        self.anchor = None;
    }

    // --- Editing ---

    /// Insert a character at the cursor position, replacing any selection.
    pub fn insert_char(&mut self, ch: char) {
        match ch {
            '\n' => self.split_line(),
            '\t' => self.insert_str("    "),
            c if c.is_control() || is_line_break(c) => {}
            c => {
                self.delete_selection();
                let char_idx = self.cursor_char_idx();
                let marks = if self.block_at(self.cursor.line).allows_marks() {
                    self.marks_at_caret()
                } else {
                    MarkSet::EMPTY
                };
                self.rope.insert_char(char_idx, c);
                self.attrs.insert(char_idx, CharAttrs { marks, link: None });
                self.cursor.set_col(self.cursor.col + c.len_utf8());
                self.stored_marks = None;
                self.bump();
            }
        }
    }

    /// Insert a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) {
        for ch in s.chars() {
            self.insert_char(ch);
        }
    }

    /// Insert text that carries a link, replacing any selection.
    pub fn insert_linked(&mut self, text: &str, href: &str) {
        let start = {
            self.delete_selection();
            self.cursor_char_idx()
        };
        self.insert_str(text);
        let end = self.cursor_char_idx();
        let href: Arc<str> = Arc::from(href);
        self.update_attrs(start..end, |attrs| attrs.link = Some(Arc::clone(&href)));
    }

    /// Split the current line at the cursor (Enter key).
    ///
    /// Enter on an empty list item or quote line turns it back into a
    /// paragraph instead of splitting.
    pub fn split_line(&mut self) {
        self.delete_selection();
        let line = self.cursor.line;
        let block = self.block_at(line);
        if self.line_len(line) == 0 && block.exits_on_empty_enter() {
            self.blocks[line] = BlockKind::Paragraph;
            self.bump();
            return;
        }

        let carried = self.marks_at_caret();
        let char_idx = self.cursor_char_idx();
        self.rope.insert_char(char_idx, '\n');
        self.attrs.insert(char_idx, CharAttrs::plain());
        self.blocks.insert(line + 1, block.continuation());
        self.cursor = Cursor::at(line + 1, 0);
        self.stored_marks = (!carried.is_empty()).then_some(carried);
        self.bump();
    }

    /// Delete the character before the cursor (Backspace).
    ///
    /// Backspace at the start of a non-paragraph line turns it into a
    /// paragraph. Returns `true` if anything changed.
    pub fn delete_back(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        if self.cursor.col == 0 && self.block_at(self.cursor.line) != BlockKind::Paragraph {
            self.blocks[self.cursor.line] = BlockKind::Paragraph;
            self.bump();
            return true;
        }
        if self.cursor.col == 0 && self.cursor.line == 0 {
            return false;
        }
        let char_idx = self.cursor_char_idx();
        self.remove_chars(char_idx - 1..char_idx);
        self.cursor = self.cursor_from_char_idx(char_idx - 1);
        true
    }

    /// Delete the character at the cursor (Delete key).
    ///
    /// Returns `true` if anything changed.
    pub fn delete_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let char_idx = self.cursor_char_idx();
        if char_idx >= self.rope.len_chars() {
            return false;
        }
        self.remove_chars(char_idx..=char_idx);
        true
    }

    /// Delete the selected text. Returns `true` if there was a selection.
    pub fn delete_selection(&mut self) -> bool {
        let Some(range) = self.selection_char_range() else {
            self.anchor = None;
            return false;
        };
        let start = range.start;
        self.remove_chars(range);
        self.cursor = self.cursor_from_char_idx(start);
        self.anchor = None;
        true
    }

    // --- Marks and blocks ---

    /// Marks the next typed character would receive.
    pub fn marks_at_caret(&self) -> MarkSet {
        self.stored_marks
            .unwrap_or_else(|| self.inherited_marks(self.cursor_char_idx()))
    }

    /// Whether `mark` is active: across the whole selection, or at the caret.
    pub fn is_active(&self, mark: Mark) -> bool {
        match self.selection_char_range() {
            Some(range) => {
                let mut any = false;
                for idx in range {
                    if self.rope.char(idx) == '\n' {
                        continue;
                    }
                    if !self.attrs[idx].marks.contains(mark) {
                        return false;
                    }
                    any = true;
                }
                any
            }
            None => self.marks_at_caret().contains(mark),
        }
    }

    /// Add `mark` to the selection, or to the stored marks at the caret.
    pub fn set_mark(&mut self, mark: Mark) {
        match self.selection_char_range() {
            Some(range) => self.update_attrs(range, |attrs| attrs.marks = attrs.marks.with(mark)),
            None => self.stored_marks = Some(self.marks_at_caret().with(mark)),
        }
    }

    /// Remove `mark` from the selection, or from the stored marks at the caret.
    pub fn unset_mark(&mut self, mark: Mark) {
        match self.selection_char_range() {
            Some(range) => {
                self.update_attrs(range, |attrs| attrs.marks = attrs.marks.without(mark));
            }
            None => self.stored_marks = Some(self.marks_at_caret().without(mark)),
        }
    }

    pub fn toggle_mark(&mut self, mark: Mark) {
        if self.is_active(mark) {
            self.unset_mark(mark);
        } else {
            self.set_mark(mark);
        }
    }

    /// Link target of the character before the caret, or of the selection start.
    pub fn link_at_caret(&self) -> Option<Arc<str>> {
        let idx = match self.selection_char_range() {
            Some(range) => range.start,
            None => self.cursor_char_idx().checked_sub(1)?,
        };
        self.attrs.get(idx).and_then(|attrs| attrs.link.clone())
    }

    /// Link the selection to `href`; an empty `href` removes links.
    ///
    /// Without a selection the URL itself is inserted as linked text.
    pub fn set_link(&mut self, href: &str) {
        let href = href.trim();
        match self.selection_char_range() {
            Some(range) if href.is_empty() => self.update_attrs(range, |attrs| attrs.link = None),
            Some(range) => {
                let target: Arc<str> = Arc::from(href);
                self.update_attrs(range, |attrs| attrs.link = Some(Arc::clone(&target)));
            }
            None if href.is_empty() => {}
            None => self.insert_linked(href, href),
        }
    }

    /// Set the block kind of every line touched by the selection (or the
    /// cursor line). If they all have it already, they revert to paragraphs.
    pub fn toggle_block(&mut self, kind: BlockKind) {
        let lines = match self.selection() {
            Some((start, end)) => start.line..end.line + 1,
            None => self.cursor.line..self.cursor.line + 1,
        };
        let all_set = lines.clone().all(|line| self.blocks[line] == kind);
        let target = if all_set { BlockKind::Paragraph } else { kind };
        for line in lines {
            self.blocks[line] = target;
            if !target.allows_marks() {
                let range = self.line_char_range(line);
                for attrs in &mut self.attrs[range] {
                    *attrs = CharAttrs::plain();
                }
            }
        }
        if !target.allows_marks() {
            self.stored_marks = None;
        }
        self.bump();
    }

    // --- Cursor movement ---

    /// Apply a motion, either moving the caret or extending the selection.
    pub fn apply_motion(&mut self, motion: Motion, extend: bool) {
        if extend {
            if self.anchor.is_none() {
                self.anchor = Some(self.cursor);
            }
        } else {
            self.anchor = None;
        }
        self.stored_marks = None;
        match motion {
            Motion::Step(Direction::Left) => self.move_left(),
            Motion::Step(Direction::Right) => self.move_right(),
            Motion::Step(Direction::Up) => self.move_up(),
            Motion::Step(Direction::Down) => self.move_down(),
            Motion::Home => self.cursor.set_col(0),
            Motion::End => {
                let len = self.line_len(self.cursor.line);
                self.cursor.set_col(len);
            }
            Motion::WordLeft => self.move_word_left(),
            Motion::WordRight => self.move_word_right(),
            Motion::BufferStart => self.cursor = Cursor::new(),
            Motion::BufferEnd => {
                let last_line = self.line_count().saturating_sub(1);
                self.cursor = Cursor::at(last_line, self.line_len(last_line));
            }
        }
    }

    /// Move the cursor in the given direction, collapsing any selection.
    pub fn move_cursor(&mut self, direction: Direction) {
        self.apply_motion(Motion::Step(direction), false);
    }

    /// Move cursor to a specific line and column.
    pub fn move_to(&mut self, line: usize, col: usize) {
        self.anchor = None;
        self.stored_marks = None;
        let max_line = self.line_count().saturating_sub(1);
        self.cursor.line = line.min(max_line);
        let line_text = self.line_at(self.cursor.line).unwrap_or_default();
        let mut col = col.min(line_text.len());
        while !line_text.is_char_boundary(col) {
            col -= 1;
        }
        self.cursor.set_col(col);
    }

    /// Extend the selection to a position, anchoring at the cursor first.
    pub fn select_to(&mut self, line: usize, col: usize) {
        let anchor = self.anchor.unwrap_or(self.cursor);
        self.move_to(line, col);
        self.anchor = Some(anchor);
    }

    // --- Private helpers ---

    const fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Char range of a line, excluding its newline.
    fn line_char_range(&self, line_idx: usize) -> Range<usize> {
        let start = self.rope.line_to_char(line_idx);
        let slice = self.rope.line(line_idx);
        let mut len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len -= 1;
        }
        start..start + len
    }

    fn char_idx_at(&self, pos: Cursor) -> usize {
        let line_start = self.rope.line_to_char(pos.line);
        let line = self.line_at(pos.line).unwrap_or_default();
        // Convert byte offset to char offset within the line
        let byte_col = pos.col.min(line.len());
        line_start + line[..byte_col].chars().count()
    }

    /// Convert cursor position to a ropey char index.
    fn cursor_char_idx(&self) -> usize {
        self.char_idx_at(self.cursor)
    }

    fn cursor_from_char_idx(&self, char_idx: usize) -> Cursor {
        let line = self.rope.char_to_line(char_idx);
        let offset = char_idx - self.rope.line_to_char(line);
        let col = self
            .rope
            .line(line)
            .chars()
            .take(offset)
            .map(char::len_utf8)
            .sum();
        Cursor::at(line, col)
    }

    fn selection_char_range(&self) -> Option<Range<usize>> {
        let (start, end) = self.selection()?;
        Some(self.char_idx_at(start)..self.char_idx_at(end))
    }

    /// Marks a character typed at `char_idx` inherits: from the character
    /// before it on the same line, else the one after it.
    fn inherited_marks(&self, char_idx: usize) -> MarkSet {
        let range = self.line_char_range(self.cursor.line);
        if char_idx > range.start {
            return self.attrs[char_idx - 1].marks;
        }
        if char_idx < range.end {
            return self.attrs[char_idx].marks;
        }
        MarkSet::EMPTY
    }

    fn remove_chars(&mut self, range: impl std::ops::RangeBounds<usize>) {
        let start = match range.start_bound() {
            std::ops::Bound::Included(&s) => s,
            std::ops::Bound::Excluded(&s) => s + 1,
            std::ops::Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            std::ops::Bound::Included(&e) => e + 1,
            std::ops::Bound::Excluded(&e) => e,
            std::ops::Bound::Unbounded => self.rope.len_chars(),
        };
        if start >= end {
            return;
        }
        let first_line = self.rope.char_to_line(start);
        let joined = self
            .rope
            .slice(start..end)
            .chars()
            .filter(|c| *c == '\n')
            .count();
        if joined > 0 {
            self.blocks.drain(first_line + 1..=first_line + joined);
        }
        self.rope.remove(start..end);
        self.attrs.drain(start..end);
        self.bump();
    }

    fn update_attrs(&mut self, range: Range<usize>, mut f: impl FnMut(&mut CharAttrs)) {
        if range.is_empty() {
            return;
        }
        for idx in range {
            if self.rope.char(idx) == '\n' {
                continue;
            }
            let line = self.rope.char_to_line(idx);
            if self.block_at(line).allows_marks() {
                f(&mut self.attrs[idx]);
            }
        }
        self.bump();
    }

    fn move_word_left(&mut self) {
        if self.cursor.col == 0 {
            if self.cursor.line > 0 {
                self.cursor.line -= 1;
                self.cursor.set_col(self.line_len(self.cursor.line));
            }
            return;
        }

        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let before = &line[..self.cursor.col];
        let trimmed = before.trim_end();

        if trimmed.is_empty() {
            self.cursor.set_col(0);
            return;
        }

        // Find start of previous word
        let pos = trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| !c.is_alphanumeric() && *c != '_')
            .map_or(0, |(i, c)| i + c.len_utf8());
        self.cursor.set_col(pos);
    }

    fn move_word_right(&mut self) {
        let line_len = self.line_len(self.cursor.line);

        if self.cursor.col >= line_len {
            if self.cursor.line + 1 < self.line_count() {
                self.cursor.line += 1;
                self.cursor.set_col(0);
            }
            return;
        }

        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let after = &line[self.cursor.col..];

        // Skip current word characters
        let word_end = after
            .find(|c: char| !c.is_alphanumeric() && c != '_')
            .unwrap_or(after.len());

        // Skip whitespace/punctuation after word
        let rest = &after[word_end..];
        let space_end = rest
            .find(|c: char| c.is_alphanumeric() || c == '_')
            .unwrap_or(rest.len());

        self.cursor.set_col(self.cursor.col + word_end + space_end);
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            let line = self.line_at(self.cursor.line).unwrap_or_default();
            let before = &line[..self.cursor.col];
            let prev_char_len = before.chars().next_back().map_or(1, char::len_utf8);
            self.cursor.set_col(self.cursor.col - prev_char_len);
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.set_col(self.line_len(self.cursor.line));
        }
    }

    fn move_right(&mut self) {
        let line_len = self.line_len(self.cursor.line);
        if self.cursor.col < line_len {
            let line = self.line_at(self.cursor.line).unwrap_or_default();
            let next_char_len = line[self.cursor.col..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            self.cursor.set_col(self.cursor.col + next_char_len);
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.set_col(0);
        }
    }

    fn move_up(&mut self) {
        if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.col = self.clamp_col(self.cursor.line, self.cursor.col_memory);
        }
    }

    fn move_down(&mut self) {
        if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.col = self.clamp_col(self.cursor.line, self.cursor.col_memory);
        }
    }

    /// Clamp a byte column to the line length and a char boundary.
    fn clamp_col(&self, line_idx: usize, col: usize) -> usize {
        let line = self.line_at(line_idx).unwrap_or_default();
        let mut col = col.min(line.len());
        while !line.is_char_boundary(col) {
            col -= 1;
        }
        col
    }
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("cursor", &self.cursor)
            .field("anchor", &self.anchor)
            .field("stored_marks", &self.stored_marks)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

/// Ropey counts more than `\n` as a line break; those would desync the
/// per-line block list, so they are folded into spaces.
const fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn push_normalized(text: &mut String, attrs: &mut Vec<CharAttrs>, ch: char, run_attrs: &CharAttrs) {
    let (replacement, count) = match ch {
        '\t' => (' ', 4),
        '\n' => (' ', 1),
        c if is_line_break(c) => (' ', 1),
        c if c.is_control() => return,
        c => (c, 1),
    };
    for _ in 0..count {
        text.push(replacement);
        attrs.push(run_attrs.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold() -> CharAttrs {
        CharAttrs {
            marks: MarkSet::EMPTY.with(Mark::Bold),
            link: None,
        }
    }

    // --- Construction and basic queries ---

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = EditorBuffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some(String::new()));
        assert_eq!(buf.block_at(0), BlockKind::Paragraph);
        assert!(buf.is_blank());
    }

    #[test]
    fn test_from_text_preserves_content() {
        let buf = EditorBuffer::from_text("hello\nworld");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.line_at(1), Some("world".to_string()));
        assert_eq!(buf.text(), "hello\nworld");
    }

    #[test]
    fn test_from_lines_keeps_blocks_and_runs() {
        let buf = EditorBuffer::from_lines(vec![
            RichLine::new(BlockKind::Heading1, vec![StyledRun::plain("Title")]),
            RichLine::new(
                BlockKind::BulletItem,
                vec![StyledRun::plain("a "), StyledRun::new("b", bold())],
            ),
        ]);
        assert_eq!(buf.block_at(0), BlockKind::Heading1);
        assert_eq!(buf.block_at(1), BlockKind::BulletItem);
        assert_eq!(
            buf.line_runs(1),
            vec![StyledRun::plain("a "), StyledRun::new("b", bold())]
        );
    }

    #[test]
    fn test_from_lines_strips_marks_in_code_blocks() {
        let buf = EditorBuffer::from_lines(vec![RichLine::new(
            BlockKind::CodeBlock,
            vec![StyledRun::new("let x", bold())],
        )]);
        assert_eq!(buf.line_runs(0), vec![StyledRun::plain("let x")]);
    }

    #[test]
    fn test_from_lines_folds_stray_line_breaks() {
        let buf = EditorBuffer::from_lines(vec![RichLine::new(
            BlockKind::Paragraph,
            vec![StyledRun::plain("a\rb\u{2028}c")],
        )]);
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some("a b c".to_string()));
    }

    // --- Character insertion ---

    #[test]
    fn test_insert_char_at_start() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.insert_char('H');
        assert_eq!(buf.line_at(0), Some("Hhello".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 1));
    }

    #[test]
    fn test_insert_multibyte_char() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.apply_motion(Motion::End, false);
        buf.insert_char('é');
        assert_eq!(buf.line_at(0), Some("helloé".to_string()));
        assert_eq!(buf.cursor().col, 7);
    }

    #[test]
    fn test_insert_bumps_revision() {
        let mut buf = EditorBuffer::empty();
        let before = buf.revision();
        buf.insert_char('x');
        assert_ne!(buf.revision(), before);
    }

    #[test]
    fn test_typed_char_inherits_previous_marks() {
        let mut buf = EditorBuffer::from_lines(vec![RichLine::new(
            BlockKind::Paragraph,
            vec![StyledRun::new("ab", bold())],
        )]);
        buf.apply_motion(Motion::End, false);
        buf.insert_char('c');
        assert_eq!(buf.line_runs(0), vec![StyledRun::new("abc", bold())]);
    }

    #[test]
    fn test_typed_char_does_not_inherit_link() {
        let mut buf = EditorBuffer::empty();
        buf.set_link("https://example.com");
        buf.insert_char('!');
        let runs = buf.line_runs(0);
        assert_eq!(runs.len(), 2);
        assert!(runs[0].attrs.link.is_some());
        assert_eq!(runs[1], StyledRun::plain("!"));
    }

    #[test]
    fn test_stored_mark_applies_to_next_char_only_via_inheritance() {
        let mut buf = EditorBuffer::from_text("ab");
        buf.apply_motion(Motion::End, false);
        buf.set_mark(Mark::Italic);
        assert!(buf.is_active(Mark::Italic));
        buf.insert_char('c');
        buf.insert_char('d');
        let runs = buf.line_runs(0);
        assert_eq!(runs[0], StyledRun::plain("ab"));
        assert!(runs[1].attrs.marks.contains(Mark::Italic));
        assert_eq!(runs[1].text, "cd");
    }

    #[test]
    fn test_cursor_motion_clears_stored_marks() {
        let mut buf = EditorBuffer::from_text("ab");
        buf.set_mark(Mark::Bold);
        buf.move_cursor(Direction::Right);
        assert!(!buf.is_active(Mark::Bold));
    }

    #[test]
    fn test_tab_inserts_spaces() {
        let mut buf = EditorBuffer::empty();
        buf.insert_char('\t');
        assert_eq!(buf.line_at(0), Some("    ".to_string()));
    }

    #[test]
    fn test_control_chars_are_ignored() {
        let mut buf = EditorBuffer::empty();
        buf.insert_char('\u{7}');
        buf.insert_char('\r');
        assert_eq!(buf.text(), "");
    }

    // --- Line splitting (Enter) ---

    #[test]
    fn test_split_line_in_middle() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.move_to(0, 5);
        buf.split_line();
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.line_at(1), Some(" world".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
        assert_eq!(buf.line_count(), 2);
    }

    #[test]
    fn test_split_heading_continues_as_paragraph() {
        let mut buf = EditorBuffer::from_text("Title");
        buf.toggle_block(BlockKind::Heading1);
        buf.apply_motion(Motion::End, false);
        buf.split_line();
        assert_eq!(buf.block_at(0), BlockKind::Heading1);
        assert_eq!(buf.block_at(1), BlockKind::Paragraph);
    }

    #[test]
    fn test_split_list_item_continues_list() {
        let mut buf = EditorBuffer::from_text("one");
        buf.toggle_block(BlockKind::BulletItem);
        buf.apply_motion(Motion::End, false);
        buf.split_line();
        assert_eq!(buf.block_at(1), BlockKind::BulletItem);
    }

    #[test]
    fn test_enter_on_empty_list_item_exits_list() {
        let mut buf = EditorBuffer::empty();
        buf.toggle_block(BlockKind::OrderedItem);
        buf.split_line();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.block_at(0), BlockKind::Paragraph);
    }

    #[test]
    fn test_split_carries_marks_to_new_line() {
        let mut buf = EditorBuffer::from_lines(vec![RichLine::new(
            BlockKind::Paragraph,
            vec![StyledRun::new("bold", bold())],
        )]);
        buf.apply_motion(Motion::End, false);
        buf.split_line();
        buf.insert_char('x');
        assert_eq!(buf.line_runs(1), vec![StyledRun::new("x", bold())]);
    }

    // --- Deletion ---

    #[test]
    fn test_delete_back_at_start_is_noop() {
        let mut buf = EditorBuffer::from_text("hello");
        assert!(!buf.delete_back());
        assert_eq!(buf.text(), "hello");
    }

    #[test]
    fn test_delete_back_joins_lines_and_drops_block() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(1, 0);
        buf.toggle_block(BlockKind::Quote);
        // First backspace lifts the quote, second joins.
        assert!(buf.delete_back());
        assert_eq!(buf.block_at(1), BlockKind::Paragraph);
        assert!(buf.delete_back());
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some("helloworld".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_delete_back_multibyte() {
        let mut buf = EditorBuffer::from_text("café");
        buf.apply_motion(Motion::End, false);
        buf.delete_back();
        assert_eq!(buf.line_at(0), Some("caf".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 3));
    }

    #[test]
    fn test_delete_forward_joins_lines() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(0, 5);
        assert!(buf.delete_forward());
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some("helloworld".to_string()));
    }

    #[test]
    fn test_delete_forward_at_end_is_noop() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.apply_motion(Motion::End, false);
        assert!(!buf.delete_forward());
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut buf = EditorBuffer::from_text("hello\nbig\nworld");
        buf.move_to(0, 2);
        buf.apply_motion(Motion::Step(Direction::Down), true);
        buf.apply_motion(Motion::Step(Direction::Down), true);
        buf.insert_char('X');
        assert_eq!(buf.text(), "heXrld");
        assert_eq!(buf.line_count(), 1);
        assert!(!buf.has_selection());
    }

    // --- Selection and marks ---

    #[test]
    fn test_extend_selection_by_word() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.apply_motion(Motion::WordRight, true);
        let (from, to) = buf.selection().expect("selection");
        assert_eq!((from.line, from.col, to.line, to.col), (0, 0, 0, 6));
        buf.apply_motion(Motion::Home, false);
        assert!(!buf.has_selection());
    }

    #[test]
    fn test_toggle_mark_on_selection() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.apply_motion(Motion::WordRight, true);
        buf.toggle_mark(Mark::Bold);
        assert!(buf.is_active(Mark::Bold));
        let runs = buf.line_runs(0);
        assert_eq!(runs[0], StyledRun::new("hello ", bold()));
        assert_eq!(runs[1], StyledRun::plain("world"));

        buf.toggle_mark(Mark::Bold);
        assert_eq!(buf.line_runs(0), vec![StyledRun::plain("hello world")]);
    }

    #[test]
    fn test_partially_marked_selection_is_not_active() {
        let mut buf = EditorBuffer::from_lines(vec![RichLine::new(
            BlockKind::Paragraph,
            vec![StyledRun::new("ab", bold()), StyledRun::plain("cd")],
        )]);
        buf.select_all();
        assert!(!buf.is_active(Mark::Bold));
        buf.toggle_mark(Mark::Bold);
        assert_eq!(buf.line_runs(0), vec![StyledRun::new("abcd", bold())]);
    }

    #[test]
    fn test_set_link_on_selection() {
        let mut buf = EditorBuffer::from_text("docs here");
        buf.apply_motion(Motion::WordRight, true);
        buf.apply_motion(Motion::Step(Direction::Left), true);
        buf.set_link("https://docs.rs");
        assert_eq!(buf.link_at_caret().as_deref(), Some("https://docs.rs"));
        let runs = buf.line_runs(0);
        assert_eq!(runs[0].text, "docs");
        assert_eq!(runs[0].attrs.link.as_deref(), Some("https://docs.rs"));
    }

    #[test]
    fn test_toggle_block_over_selection_and_back() {
        let mut buf = EditorBuffer::from_text("a\nb\nc");
        buf.apply_motion(Motion::Step(Direction::Down), true);
        buf.toggle_block(BlockKind::BulletItem);
        assert_eq!(buf.block_at(0), BlockKind::BulletItem);
        assert_eq!(buf.block_at(1), BlockKind::BulletItem);
        assert_eq!(buf.block_at(2), BlockKind::Paragraph);

        buf.toggle_block(BlockKind::BulletItem);
        assert_eq!(buf.block_at(0), BlockKind::Paragraph);
    }

    #[test]
    fn test_code_block_clears_marks() {
        let mut buf = EditorBuffer::from_lines(vec![RichLine::new(
            BlockKind::Paragraph,
            vec![StyledRun::new("x", bold())],
        )]);
        buf.toggle_block(BlockKind::CodeBlock);
        assert_eq!(buf.line_runs(0), vec![StyledRun::plain("x")]);
    }

    // --- Cursor movement ---

    #[test]
    fn test_move_up_clamps_to_shorter_line() {
        let mut buf = EditorBuffer::from_text("hi\nhello");
        buf.move_to(1, 4);
        buf.move_cursor(Direction::Up);
        assert_eq!(buf.cursor().line, 0);
        assert_eq!(buf.cursor().col, 2);
    }

    #[test]
    fn test_column_memory_across_short_line() {
        let mut buf = EditorBuffer::from_text("hello\nhi\nworld");
        buf.move_to(0, 4);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().col, 2);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().line, 2);
        assert_eq!(buf.cursor().col, 4);
    }

    #[test]
    fn test_vertical_move_respects_char_boundaries() {
        let mut buf = EditorBuffer::from_text("abcd\né");
        buf.move_to(0, 1);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().col, 0);
    }

    #[test]
    fn test_word_movement() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.apply_motion(Motion::WordRight, false);
        assert_eq!(buf.cursor().col, 6);
        buf.move_to(0, 8);
        buf.apply_motion(Motion::WordLeft, false);
        assert_eq!(buf.cursor().col, 6);
    }

    #[test]
    fn test_buffer_start_and_end() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.apply_motion(Motion::BufferEnd, false);
        assert_eq!(buf.cursor(), Cursor::at(1, 5));
        buf.apply_motion(Motion::BufferStart, false);
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
    }

    #[test]
    fn test_move_to_clamps() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_to(100, 100);
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }
}
