//! Conversion between the editor buffer and stored note markup.
//!
//! Notes are stored as CommonMark with two extensions: `~~strike~~` and
//! `__underline__`. Each editor line becomes one block. Paragraph lines
//! are separate paragraphs, consecutive list items form one list, and
//! consecutive quote lines form one quote with a paragraph per line.

use std::sync::Arc;

use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{Arena, Options, parse_document};

use super::buffer::{CharAttrs, EditorBuffer, RichLine, StyledRun};
use super::marks::{BlockKind, Mark, MarkSet};

/// Serialize the buffer to note markup.
///
/// Empty paragraph lines carry no content and are dropped. A buffer with
/// no visible text serializes to the empty string.
pub fn to_markup(buffer: &EditorBuffer) -> String {
    if buffer.is_blank() {
        return String::new();
    }
    let lines = buffer.lines();
    let mut blocks: Vec<String> = Vec::new();
    let mut idx = 0;
    while idx < lines.len() {
        let kind = lines[idx].block;
        let end = if groups(kind) {
            lines[idx..]
                .iter()
                .position(|line| line.block != kind)
                .map_or(lines.len(), |offset| idx + offset)
        } else {
            idx + 1
        };
        let group = &lines[idx..end];
        idx = end;

        match kind {
            BlockKind::Paragraph => {
                if !group[0].runs.is_empty() {
                    blocks.push(write_inline(&group[0].runs));
                }
            }
            BlockKind::Heading1 => blocks.push(heading(1, &group[0].runs)),
            BlockKind::Heading2 => blocks.push(heading(2, &group[0].runs)),
            BlockKind::BulletItem => blocks.push(
                group
                    .iter()
                    .map(|line| prefixed("-", &line.runs))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            BlockKind::OrderedItem => blocks.push(
                group
                    .iter()
                    .enumerate()
                    .map(|(n, line)| prefixed(&format!("{}.", n + 1), &line.runs))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            BlockKind::Quote => blocks.push(
                group
                    .iter()
                    .map(|line| prefixed(">", &line.runs))
                    .collect::<Vec<_>>()
                    .join("\n>\n"),
            ),
            BlockKind::CodeBlock => blocks.push(code_block(group)),
        }
    }
    blocks.join("\n\n")
}

/// Parse note markup into a buffer.
///
/// Anything the editor cannot represent is flattened: deeper headings
/// become level two, nested lists are flattened, images keep their alt text.
pub fn from_markup(markup: &str) -> EditorBuffer {
    EditorBuffer::from_lines(parse_lines(markup))
}

/// The text of a note with formatting removed, one line per editor line.
pub fn plain_text(markup: &str) -> String {
    parse_lines(markup)
        .iter()
        .map(RichLine::text)
        .collect::<Vec<_>>()
        .join("\n")
}

const fn groups(kind: BlockKind) -> bool {
    matches!(
        kind,
        BlockKind::BulletItem | BlockKind::OrderedItem | BlockKind::Quote | BlockKind::CodeBlock
    )
}

fn heading(level: usize, runs: &[StyledRun]) -> String {
    let mut body = write_inline(runs);
    // A trailing `#` run would be read as a closing sequence.
    if body.ends_with('#') {
        body.insert(body.len() - 1, '\\');
    }
    prefixed_str(&"#".repeat(level), &body)
}

fn prefixed(marker: &str, runs: &[StyledRun]) -> String {
    prefixed_str(marker, &write_inline(runs))
}

fn prefixed_str(marker: &str, body: &str) -> String {
    if body.is_empty() {
        marker.to_string()
    } else {
        format!("{marker} {body}")
    }
}

fn code_block(lines: &[RichLine]) -> String {
    let texts: Vec<String> = lines.iter().map(RichLine::text).collect();
    let longest = texts.iter().map(|t| longest_backtick_run(t)).max().unwrap_or(0);
    let fence = "`".repeat((longest + 1).max(3));
    format!("{fence}\n{}\n{fence}", texts.join("\n"))
}

fn longest_backtick_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for ch in text.chars() {
        if ch == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

// --- Inline serialization ---

#[derive(Debug)]
struct Piece {
    text: String,
    marks: MarkSet,
    link: Option<Arc<str>>,
    blank: bool,
}

impl Piece {
    fn new(text: &str, attrs: &CharAttrs) -> Self {
        Self {
            text: text.to_string(),
            marks: attrs.marks,
            link: attrs.link.clone(),
            blank: !attrs.marks.contains(Mark::Code) && text.chars().all(char::is_whitespace),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Delim {
    Mark(Mark),
    Link(Arc<str>),
}

/// Split runs so that whitespace at the edges of formatted text stands on
/// its own, then let whitespace keep only the formatting shared with both
/// neighbors. Delimiters then always touch non-space text.
fn pieces(runs: &[StyledRun]) -> Vec<Piece> {
    let mut pieces = Vec::new();
    for run in runs {
        if run.attrs.marks.contains(Mark::Code) {
            pieces.push(Piece::new(&run.text, &run.attrs));
            continue;
        }
        let core = run.text.trim();
        if core.is_empty() {
            pieces.push(Piece::new(&run.text, &run.attrs));
            continue;
        }
        let lead = &run.text[..run.text.len() - run.text.trim_start().len()];
        let trail = &run.text[run.text.trim_end().len()..];
        for part in [lead, core, trail] {
            if !part.is_empty() {
                pieces.push(Piece::new(part, &run.attrs));
            }
        }
    }

    for idx in 0..pieces.len() {
        if !pieces[idx].blank {
            continue;
        }
        let prev = pieces[..idx].iter().rev().find(|p| !p.blank);
        let next = pieces[idx + 1..].iter().find(|p| !p.blank);
        let marks = pieces[idx]
            .marks
            .intersect(prev.map_or(MarkSet::EMPTY, |p| p.marks))
            .intersect(next.map_or(MarkSet::EMPTY, |p| p.marks));
        let link = pieces[idx].link.clone().filter(|href| {
            prev.and_then(|p| p.link.as_ref()) == Some(href)
                && next.and_then(|p| p.link.as_ref()) == Some(href)
        });
        pieces[idx].marks = marks;
        pieces[idx].link = link;
    }
    pieces
}

const fn delimiter(mark: Mark) -> &'static str {
    match mark {
        Mark::Bold => "**",
        Mark::Italic => "*",
        Mark::Underline => "__",
        Mark::Strike => "~~",
        Mark::Code => "`",
    }
}

/// How many pieces starting at `from` carry `mark`.
fn persistence(pieces: &[Piece], from: usize, mark: Mark) -> usize {
    pieces[from..]
        .iter()
        .take_while(|p| p.marks.contains(mark))
        .count()
}

struct InlineWriter {
    out: String,
    stack: Vec<Delim>,
    at_start: bool,
}

impl InlineWriter {
    fn open(&mut self, delim: Delim) {
        match &delim {
            Delim::Mark(mark) => self.out.push_str(delimiter(*mark)),
            Delim::Link(_) => self.out.push('['),
        }
        self.at_start = false;
        self.stack.push(delim);
    }

    fn close_to(&mut self, depth: usize) {
        while self.stack.len() > depth {
            match self.stack.pop() {
                Some(Delim::Mark(mark)) => self.out.push_str(delimiter(mark)),
                Some(Delim::Link(href)) => {
                    self.out.push_str("](<");
                    for ch in href.chars() {
                        if matches!(ch, '<' | '>' | '\\') {
                            self.out.push('\\');
                        }
                        self.out.push(ch);
                    }
                    self.out.push_str(">)");
                }
                None => break,
            }
        }
    }

    fn text(&mut self, text: &str) {
        let mut rest = text;
        if self.at_start {
            rest = self.escape_line_start(text);
        }
        for ch in rest.chars() {
            if matches!(ch, '\\' | '*' | '_' | '~' | '`' | '[' | ']' | '<' | '>' | '&') {
                self.out.push('\\');
            }
            self.out.push(ch);
        }
        self.at_start = false;
    }

    /// Escape what would start a block if it opened a line. Returns the
    /// part of `text` still to be written.
    fn escape_line_start<'t>(&mut self, text: &'t str) -> &'t str {
        if let Some(rest) = text.strip_prefix(' ') {
            self.out.push_str("&#32;");
            return rest;
        }
        if text.starts_with(['#', '-', '+', '=']) {
            self.out.push('\\');
            return text;
        }
        let digits = text.chars().take_while(char::is_ascii_digit).count();
        if digits > 0 && text[digits..].starts_with(['.', ')']) {
            self.out.push_str(&text[..digits]);
            self.out.push('\\');
            return &text[digits..];
        }
        text
    }

    fn code(&mut self, code: &str) {
        let fence = "`".repeat(longest_backtick_run(code) + 1);
        let pad = code.starts_with('`')
            || code.ends_with('`')
            || (code.starts_with(' ') && code.ends_with(' ') && !code.trim().is_empty());
        let pad = if pad { " " } else { "" };
        self.out.push_str(&format!("{fence}{pad}{code}{pad}{fence}"));
        self.at_start = false;
    }
}

fn write_inline(runs: &[StyledRun]) -> String {
    let pieces = pieces(runs);
    let mut writer = InlineWriter {
        out: String::new(),
        stack: Vec::new(),
        at_start: true,
    };

    for (idx, piece) in pieces.iter().enumerate() {
        let wanted = |delim: &Delim| match delim {
            Delim::Mark(mark) => piece.marks.contains(*mark),
            Delim::Link(href) => piece.link.as_ref() == Some(href),
        };
        let keep = writer.stack.iter().take_while(|d| wanted(d)).count();
        writer.close_to(keep);

        if piece.blank {
            writer.text(&piece.text);
            continue;
        }

        if let Some(href) = &piece.link {
            if !writer.stack.contains(&Delim::Link(Arc::clone(href))) {
                writer.open(Delim::Link(Arc::clone(href)));
            }
        }
        let mut opening: Vec<Mark> = piece
            .marks
            .iter()
            .filter(|m| *m != Mark::Code && !writer.stack.contains(&Delim::Mark(*m)))
            .collect();
        opening.sort_by_key(|m| std::cmp::Reverse(persistence(&pieces, idx, *m)));
        for mark in opening {
            writer.open(Delim::Mark(mark));
        }

        if piece.marks.contains(Mark::Code) {
            writer.code(&piece.text);
        } else {
            writer.text(&piece.text);
        }
    }
    writer.close_to(0);

    let mut out = writer.out;
    if out.ends_with(' ') {
        out.pop();
        out.push_str("&#32;");
    }
    out
}

// --- Parsing ---

fn parse_lines(markup: &str) -> Vec<RichLine> {
    let arena = Arena::new();
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.underline = true;
    let root = parse_document(&arena, markup, &options);
    let mut lines = Vec::new();
    collect_blocks(root, None, &mut lines);
    lines
}

fn collect_blocks<'a>(node: &'a AstNode<'a>, context: Option<BlockKind>, lines: &mut Vec<RichLine>) {
    match &node.data.borrow().value {
        NodeValue::Paragraph => {
            collect_paragraph(node, context.unwrap_or_default(), lines);
        }
        NodeValue::Heading(heading) => {
            let kind = if heading.level <= 1 {
                BlockKind::Heading1
            } else {
                BlockKind::Heading2
            };
            collect_paragraph(node, kind, lines);
        }
        NodeValue::List(list) => {
            let kind = match list.list_type {
                ListType::Bullet => BlockKind::BulletItem,
                ListType::Ordered => BlockKind::OrderedItem,
            };
            for item in node.children() {
                if item.children().next().is_none() {
                    lines.push(RichLine::new(kind, Vec::new()));
                    continue;
                }
                for child in item.children() {
                    collect_blocks(child, Some(kind), lines);
                }
            }
        }
        NodeValue::BlockQuote => {
            for child in node.children() {
                collect_blocks(child, Some(BlockKind::Quote), lines);
            }
        }
        NodeValue::CodeBlock(code) => {
            let literal = code.literal.strip_suffix('\n').unwrap_or(&code.literal);
            for text in literal.split('\n') {
                lines.push(RichLine::new(BlockKind::CodeBlock, vec![StyledRun::plain(text)]));
            }
        }
        NodeValue::HtmlBlock(html) => {
            for text in html.literal.trim_end().split('\n') {
                lines.push(RichLine::new(
                    context.unwrap_or_default(),
                    vec![StyledRun::plain(text)],
                ));
            }
        }
        NodeValue::ThematicBreak => {}
        _ => {
            for child in node.children() {
                collect_blocks(child, context, lines);
            }
        }
    }
}

fn collect_paragraph<'a>(node: &'a AstNode<'a>, kind: BlockKind, lines: &mut Vec<RichLine>) {
    let mut current = RichLine::new(kind, Vec::new());
    for child in node.children() {
        collect_inline(child, &CharAttrs::plain(), &mut current, lines);
    }
    lines.push(current);
}

fn collect_inline<'a>(
    node: &'a AstNode<'a>,
    attrs: &CharAttrs,
    current: &mut RichLine,
    lines: &mut Vec<RichLine>,
) {
    let with_mark = |mark: Mark| CharAttrs {
        marks: attrs.marks.with(mark),
        link: attrs.link.clone(),
    };
    match &node.data.borrow().value {
        NodeValue::Text(text) => push_run(current, text, attrs),
        NodeValue::HtmlInline(html) => push_run(current, html, attrs),
        NodeValue::Code(code) => push_run(current, &code.literal, &with_mark(Mark::Code)),
        NodeValue::SoftBreak | NodeValue::LineBreak => {
            let kind = current.block;
            lines.push(std::mem::replace(current, RichLine::new(kind, Vec::new())));
        }
        value => {
            let next = match value {
                NodeValue::Strong => with_mark(Mark::Bold),
                NodeValue::Emph => with_mark(Mark::Italic),
                NodeValue::Underline => with_mark(Mark::Underline),
                NodeValue::Strikethrough => with_mark(Mark::Strike),
                NodeValue::Link(link) => CharAttrs {
                    marks: attrs.marks,
                    link: Some(Arc::from(link.url.as_str())),
                },
                _ => attrs.clone(),
            };
            for child in node.children() {
                collect_inline(child, &next, current, lines);
            }
        }
    }
}

fn push_run(line: &mut RichLine, text: &str, attrs: &CharAttrs) {
    if text.is_empty() {
        return;
    }
    match line.runs.last_mut() {
        Some(run) if run.attrs == *attrs => run.text.push_str(text),
        _ => line.runs.push(StyledRun::new(text, attrs.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked(text: &str, marks: &[Mark]) -> StyledRun {
        StyledRun::new(
            text,
            CharAttrs {
                marks: marks.iter().copied().collect(),
                link: None,
            },
        )
    }

    fn para(runs: Vec<StyledRun>) -> RichLine {
        RichLine::new(BlockKind::Paragraph, runs)
    }

    fn round_trip(lines: Vec<RichLine>) -> Vec<RichLine> {
        let markup = to_markup(&EditorBuffer::from_lines(lines));
        from_markup(&markup).lines()
    }

    #[test]
    fn test_plain_paragraphs() {
        let buf = EditorBuffer::from_text("first\nsecond");
        assert_eq!(to_markup(&buf), "first\n\nsecond");
    }

    #[test]
    fn test_empty_buffer_is_empty_markup() {
        assert_eq!(to_markup(&EditorBuffer::empty()), "");
        assert_eq!(from_markup("").line_count(), 1);
    }

    #[test]
    fn test_empty_paragraphs_are_dropped() {
        let buf = EditorBuffer::from_text("a\n\n\nb");
        assert_eq!(to_markup(&buf), "a\n\nb");
    }

    #[test]
    fn test_inline_marks() {
        let buf = EditorBuffer::from_lines(vec![para(vec![
            StyledRun::plain("a "),
            marked("bold", &[Mark::Bold]),
            StyledRun::plain(" and "),
            marked("under", &[Mark::Underline]),
            StyledRun::plain(" "),
            marked("gone", &[Mark::Strike]),
        ])]);
        assert_eq!(to_markup(&buf), "a **bold** and __under__ ~~gone~~");
    }

    #[test]
    fn test_whitespace_moves_outside_delimiters() {
        let buf = EditorBuffer::from_lines(vec![para(vec![
            StyledRun::plain("x"),
            marked(" bold ", &[Mark::Bold]),
            StyledRun::plain("y"),
        ])]);
        assert_eq!(to_markup(&buf), "x **bold** y");
    }

    #[test]
    fn test_longer_mark_opens_outermost() {
        let buf = EditorBuffer::from_lines(vec![para(vec![
            marked("ab", &[Mark::Bold, Mark::Italic]),
            marked("cd", &[Mark::Bold]),
        ])]);
        assert_eq!(to_markup(&buf), "***ab*cd**");
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let buf = EditorBuffer::from_text("# not a heading *or* [link]");
        let markup = to_markup(&buf);
        assert_eq!(markup, r"\# not a heading \*or\* \[link\]");
        assert_eq!(plain_text(&markup), "# not a heading *or* [link]");
    }

    #[test]
    fn test_list_marker_text_survives() {
        for text in ["- dash", "1. one", "2) two", "> quoted", "  indented", "trailing  "] {
            let lines = round_trip(vec![para(vec![StyledRun::plain(text)])]);
            assert_eq!(lines[0].text(), text, "text {text:?}");
            assert_eq!(lines[0].block, BlockKind::Paragraph);
        }
    }

    #[test]
    fn test_blocks_serialize() {
        let buf = EditorBuffer::from_lines(vec![
            RichLine::new(BlockKind::Heading1, vec![StyledRun::plain("Title")]),
            RichLine::new(BlockKind::BulletItem, vec![StyledRun::plain("one")]),
            RichLine::new(BlockKind::BulletItem, vec![StyledRun::plain("two")]),
            RichLine::new(BlockKind::OrderedItem, vec![StyledRun::plain("first")]),
            RichLine::new(BlockKind::OrderedItem, vec![StyledRun::plain("second")]),
            RichLine::new(BlockKind::Quote, vec![StyledRun::plain("wise")]),
            RichLine::new(BlockKind::Quote, vec![StyledRun::plain("words")]),
            RichLine::new(BlockKind::CodeBlock, vec![StyledRun::plain("let x = 1;")]),
        ]);
        assert_eq!(
            to_markup(&buf),
            "# Title\n\n- one\n- two\n\n1. first\n2. second\n\n> wise\n>\n> words\n\n```\nlet x = 1;\n```"
        );
    }

    #[test]
    fn test_blocks_round_trip() {
        let lines = vec![
            RichLine::new(BlockKind::Heading2, vec![StyledRun::plain("Sub")]),
            RichLine::new(BlockKind::BulletItem, vec![marked("item", &[Mark::Italic])]),
            RichLine::new(BlockKind::Quote, vec![StyledRun::plain("a")]),
            RichLine::new(BlockKind::Quote, vec![StyledRun::plain("b")]),
            RichLine::new(BlockKind::CodeBlock, vec![StyledRun::plain("```")]),
            RichLine::new(BlockKind::CodeBlock, vec![StyledRun::plain("  x")]),
        ];
        assert_eq!(round_trip(lines.clone()), lines);
    }

    #[test]
    fn test_marks_round_trip() {
        let lines = vec![para(vec![
            StyledRun::plain("see "),
            marked("all", &[Mark::Bold, Mark::Italic, Mark::Underline]),
            StyledRun::plain(" of "),
            marked("it", &[Mark::Code]),
        ])];
        assert_eq!(round_trip(lines.clone()), lines);
    }

    #[test]
    fn test_link_round_trip() {
        let link = CharAttrs {
            marks: MarkSet::EMPTY.with(Mark::Bold),
            link: Some(Arc::from("https://example.com/a?b=1")),
        };
        let lines = vec![para(vec![
            StyledRun::plain("go "),
            StyledRun::new("there", link),
        ])];
        assert_eq!(round_trip(lines.clone()), lines);
    }

    #[test]
    fn test_code_span_with_backticks() {
        let lines = vec![para(vec![marked("a`b", &[Mark::Code])])];
        assert_eq!(round_trip(lines.clone()), lines);
    }

    #[test]
    fn test_foreign_markup_is_flattened() {
        let buf = from_markup("### Deep\n\n- outer\n  - inner\n\n![alt text](pic.png)\n\nline one\nline two");
        let lines = buf.lines();
        assert_eq!(lines[0].block, BlockKind::Heading2);
        assert_eq!(lines[1].text(), "outer");
        assert_eq!(lines[2].text(), "inner");
        assert_eq!(lines[2].block, BlockKind::BulletItem);
        assert_eq!(lines[3].text(), "alt text");
        assert_eq!(lines[4].text(), "line one");
        assert_eq!(lines[5].text(), "line two");
    }

    #[test]
    fn test_plain_text_strips_formatting() {
        assert_eq!(plain_text("**Hi** _there_\n\n- item"), "Hi there\nitem");
    }

    #[test]
    fn test_heading_trailing_hash_is_kept() {
        let lines = vec![RichLine::new(BlockKind::Heading1, vec![StyledRun::plain("C#")])];
        assert_eq!(round_trip(lines.clone()), lines);
    }
}
