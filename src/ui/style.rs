//! Theming and color definitions.
//!
//! Styles for block kinds, character marks and the application chrome,
//! in a dark and a light variant. Note colors are shown as truecolor when
//! the terminal supports it and as the nearest xterm-256 index otherwise.

use ratatui::style::{Color, Modifier, Style};

use crate::config::ThemeMode;
use crate::editor::{BlockKind, CharAttrs, Mark};
use crate::store::NoteColor;

/// Theme configuration for the entire application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Heading level 1 style
    pub h1: Style,
    /// Heading level 2 style
    pub h2: Style,
    /// Code block style
    pub code: Style,
    /// Inline code style
    pub inline_code: Style,
    /// Block quote style
    pub quote: Style,
    /// Link style
    pub link: Style,
    /// List bullet/number style
    pub list_marker: Style,
    /// Selected text in the editor
    pub selection: Style,
    /// The caret cell
    pub cursor: Style,
    /// Focused pane borders and active toolbar buttons
    pub accent: Style,
    /// Secondary text such as timestamps and hints
    pub dim: Style,
    /// Status bar background
    pub status_bg: Color,
    /// Status bar foreground
    pub status_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            h1: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            h2: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            code: Style::default().fg(Color::Indexed(245)),
            inline_code: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            quote: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::ITALIC),
            link: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::UNDERLINED),
            list_marker: Style::default().fg(Color::Yellow),
            selection: Style::default().bg(Color::Indexed(238)),
            cursor: Style::default().bg(Color::White).fg(Color::Black),
            accent: Style::default().fg(Color::Yellow),
            dim: Style::default().fg(Color::Indexed(245)),
            status_bg: Color::Indexed(236), // Dark gray that works on both
            status_fg: Color::Indexed(252), // Light gray
        }
    }
}

impl Theme {
    /// Create a theme optimized for dark terminals.
    pub fn dark() -> Self {
        Self::default()
    }

    /// Create a theme optimized for light terminals.
    pub fn light() -> Self {
        Self {
            h1: Style::default()
                .fg(Color::Indexed(31)) // Darker cyan
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            h2: Style::default()
                .fg(Color::Indexed(28)) // Darker green
                .add_modifier(Modifier::BOLD),
            code: Style::default().fg(Color::Indexed(240)),
            inline_code: Style::default()
                .fg(Color::Indexed(124)) // Darker red
                .add_modifier(Modifier::BOLD),
            quote: Style::default()
                .fg(Color::Indexed(25))
                .add_modifier(Modifier::ITALIC),
            link: Style::default()
                .fg(Color::Indexed(25))
                .add_modifier(Modifier::UNDERLINED),
            list_marker: Style::default().fg(Color::Indexed(136)),
            selection: Style::default().bg(Color::Indexed(153)),
            cursor: Style::default().bg(Color::Black).fg(Color::White),
            accent: Style::default().fg(Color::Indexed(130)),
            dim: Style::default().fg(Color::Indexed(242)),
            status_bg: Color::Indexed(252),
            status_fg: Color::Indexed(235),
        }
    }

    /// Resolve a configured mode, reading `COLORFGBG` for `auto`.
    pub fn for_mode(mode: ThemeMode) -> Self {
        let light = match mode {
            ThemeMode::Light => true,
            ThemeMode::Dark => false,
            ThemeMode::Auto => {
                is_light_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
            }
        };
        if light { Self::light() } else { Self::dark() }
    }

    /// Base style for a line of the given block kind.
    pub fn block_style(&self, kind: BlockKind) -> Style {
        match kind {
            BlockKind::Heading1 => self.h1,
            BlockKind::Heading2 => self.h2,
            BlockKind::Quote => self.quote,
            BlockKind::CodeBlock => self.code,
            BlockKind::Paragraph | BlockKind::BulletItem | BlockKind::OrderedItem => {
                Style::default()
            }
        }
    }

    /// Merge a character's marks and link into a base line style.
    pub fn attrs_style(&self, base: Style, attrs: &CharAttrs) -> Style {
        let mut style = base;
        for mark in attrs.marks.iter() {
            style = match mark {
                Mark::Bold => style.add_modifier(Modifier::BOLD),
                Mark::Italic => style.add_modifier(Modifier::ITALIC),
                Mark::Underline => style.add_modifier(Modifier::UNDERLINED),
                Mark::Strike => style.add_modifier(Modifier::CROSSED_OUT),
                Mark::Code => style.patch(self.inline_code),
            };
        }
        if attrs.link.is_some() {
            style = style.patch(self.link);
        }
        style
    }
}

/// Terminal color for a note's color tag.
pub fn note_color(color: NoteColor) -> Color {
    if supports_truecolor() {
        Color::Rgb(color.r, color.g, color.b)
    } else {
        Color::Indexed(rgb_to_xterm_256(color.r, color.g, color.b))
    }
}

/// Style of a swatch filled with `color`, with readable text on top.
pub fn swatch_style(color: NoteColor) -> Style {
    let fg = if color.luma() >= 140.0 {
        Color::Black
    } else {
        Color::White
    };
    Style::default().bg(note_color(color)).fg(fg)
}

fn supports_truecolor() -> bool {
    if let Ok(force) = std::env::var("EASYNOTES_TRUECOLOR") {
        let value = force.to_ascii_lowercase();
        return matches!(value.as_str(), "1" | "true" | "yes" | "on");
    }
    supports_truecolor_from_env(
        std::env::var("COLORTERM").ok().as_deref(),
        std::env::var("TERM").ok().as_deref(),
    )
}

fn supports_truecolor_from_env(colorterm: Option<&str>, term: Option<&str>) -> bool {
    if let Some(ct) = colorterm {
        let lower = ct.to_ascii_lowercase();
        if lower.contains("truecolor") || lower.contains("24bit") {
            return true;
        }
    }
    if let Some(t) = term {
        let lower = t.to_ascii_lowercase();
        if lower.contains("direct") || lower.contains("truecolor") {
            return true;
        }
    }
    false
}

fn rgb_to_xterm_256(r: u8, g: u8, b: u8) -> u8 {
    // Result is always 0-5, fits in u8
    #[allow(clippy::cast_possible_truncation)]
    let to_cube = |v: u8| ((u16::from(v) * 5) / 255) as u8;
    let ri = to_cube(r);
    let gi = to_cube(g);
    let bi = to_cube(b);
    16 + (36 * ri) + (6 * gi) + bi
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;x;bg`); background indices 7 and
/// up are light.
fn is_light_from_colorfgbg(colorfgbg: Option<&str>) -> bool {
    let Some(value) = colorfgbg else {
        return false;
    };
    let bg_str = value.rsplit(';').next().unwrap_or(value);
    bg_str.parse::<u8>().is_ok_and(|bg| bg >= 7)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::editor::MarkSet;

    #[test]
    fn test_heading_styles_are_bold() {
        let theme = Theme::dark();
        for kind in [BlockKind::Heading1, BlockKind::Heading2] {
            assert!(theme.block_style(kind).add_modifier.contains(Modifier::BOLD));
        }
    }

    #[test]
    fn test_h1_is_underlined() {
        let style = Theme::light().block_style(BlockKind::Heading1);
        assert!(style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_paragraph_is_unstyled() {
        assert_eq!(Theme::dark().block_style(BlockKind::Paragraph), Style::default());
    }

    #[test]
    fn test_marks_map_to_modifiers() {
        let theme = Theme::dark();
        let attrs = CharAttrs {
            marks: MarkSet::EMPTY
                .with(Mark::Bold)
                .with(Mark::Italic)
                .with(Mark::Strike),
            link: None,
        };
        let style = theme.attrs_style(Style::default(), &attrs);
        assert!(style.add_modifier.contains(Modifier::BOLD));
        assert!(style.add_modifier.contains(Modifier::ITALIC));
        assert!(style.add_modifier.contains(Modifier::CROSSED_OUT));
        assert!(!style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_link_uses_link_style() {
        let theme = Theme::dark();
        let attrs = CharAttrs {
            marks: MarkSet::EMPTY,
            link: Some(Arc::from("https://example.com")),
        };
        let style = theme.attrs_style(Style::default(), &attrs);
        assert_eq!(style.fg, theme.link.fg);
        assert!(style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_truecolor_detection_without_colorterm() {
        assert!(!supports_truecolor_from_env(None, Some("xterm-256color")));
    }

    #[test]
    fn test_truecolor_detection_with_colorterm() {
        assert!(supports_truecolor_from_env(
            Some("truecolor"),
            Some("xterm-256color")
        ));
    }

    #[test]
    fn test_fallback_indexed_color_when_not_truecolor() {
        let idx = rgb_to_xterm_256(255, 0, 0);
        assert_eq!(idx, 196);
    }

    #[test]
    fn test_colorfgbg_detection() {
        assert!(!is_light_from_colorfgbg(Some("15;0")));
        assert!(is_light_from_colorfgbg(Some("0;15")));
        assert!(is_light_from_colorfgbg(Some("0;default;15")));
        assert!(!is_light_from_colorfgbg(Some("garbage")));
        assert!(!is_light_from_colorfgbg(None));
    }

    #[test]
    fn test_explicit_modes_ignore_environment() {
        assert_eq!(Theme::for_mode(ThemeMode::Light), Theme::light());
        assert_eq!(Theme::for_mode(ThemeMode::Dark), Theme::dark());
    }

    #[test]
    fn test_swatch_text_contrasts_with_fill() {
        assert_eq!(swatch_style(NoteColor::WHITE).fg, Some(Color::Black));
        assert_eq!(swatch_style(NoteColor::rgb(0x10, 0x10, 0x40)).fg, Some(Color::White));
    }
}
