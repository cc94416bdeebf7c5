use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Color tag attached to a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Named colors offered by the palette, in cycling order.
pub const PALETTE: [(&str, NoteColor); 8] = [
    ("white", NoteColor::rgb(0xff, 0xff, 0xff)),
    ("yellow", NoteColor::rgb(0xfe, 0xf0, 0x8a)),
    ("green", NoteColor::rgb(0xbb, 0xf7, 0xd0)),
    ("blue", NoteColor::rgb(0xbf, 0xdb, 0xfe)),
    ("pink", NoteColor::rgb(0xfb, 0xcf, 0xe8)),
    ("purple", NoteColor::rgb(0xe9, 0xd5, 0xff)),
    ("orange", NoteColor::rgb(0xfe, 0xd7, 0xaa)),
    ("gray", NoteColor::rgb(0xe5, 0xe7, 0xeb)),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("empty color value")]
    Empty,
    #[error("invalid hex color '{0}' (expected #rgb or #rrggbb)")]
    InvalidHex(String),
    #[error("unknown color name '{0}'")]
    UnknownName(String),
}

impl NoteColor {
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Palette name for this color, if it is one of the named entries.
    pub fn name(self) -> Option<&'static str> {
        PALETTE
            .iter()
            .find(|(_, color)| *color == self)
            .map(|(name, _)| *name)
    }

    /// The palette entry after this one, wrapping around.
    ///
    /// Colors outside the palette advance to the first entry.
    pub fn next_in_palette(self) -> Self {
        let next = PALETTE
            .iter()
            .position(|(_, color)| *color == self)
            .map_or(0, |idx| (idx + 1) % PALETTE.len());
        PALETTE[next].1
    }

    /// Relative luminance in 0..=255, used to pick readable text on a swatch.
    pub fn luma(self) -> f32 {
        0.0722_f32.mul_add(
            f32::from(self.b),
            0.2126_f32.mul_add(f32::from(self.r), 0.7152 * f32::from(self.g)),
        )
    }
}

impl Default for NoteColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for NoteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for NoteColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.is_empty() {
            return Err(ColorParseError::Empty);
        }
        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorParseError::InvalidHex(value.to_string()));
        }
        let lower = value.to_ascii_lowercase();
        PALETTE
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, color)| *color)
            .ok_or(ColorParseError::UnknownName(lower))
    }
}

fn parse_hex(hex: &str) -> Option<NoteColor> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let mut parts = hex.chars().map(|c| {
                let v = c.to_digit(16).unwrap_or(0) as u8;
                v * 16 + v
            });
            Some(NoteColor::rgb(parts.next()?, parts.next()?, parts.next()?))
        }
        6 => Some(NoteColor::rgb(
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        )),
        _ => None,
    }
}
