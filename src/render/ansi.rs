//! ANSI truecolor escape sequences and the half-block glyphs.

use std::fmt::{self, Write};
use std::str::FromStr;

/// Reset all SGR attributes
pub const COLOR_RESET: &str = "\x1b[0m";

/// Upper half block: foreground paints the top pixel
pub const UPPER_HALF: char = '\u{2580}';

/// Lower half block: foreground paints the bottom pixel
pub const LOWER_HALF: char = '\u{2584}';

/// A 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

/// Parses `#rrggbb` (the `#` is optional)
impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid color '{}' (expected #rrggbb)", s));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Append a foreground color sequence: `ESC[38;2;R;G;Bm`
pub fn push_fg(out: &mut String, color: Rgb) {
    // Writing to a String cannot fail
    let _ = write!(out, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b);
}

/// Append a background color sequence: `ESC[48;2;R;G;Bm`
pub fn push_bg(out: &mut String, color: Rgb) {
    let _ = write!(out, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b);
}

/// Append the reset sequence
pub fn push_reset(out: &mut String) {
    out.push_str(COLOR_RESET);
}

/// Append `ch` repeated `n` times
pub fn push_repeated(out: &mut String, ch: char, n: usize) {
    out.extend(std::iter::repeat_n(ch, n));
}

/// Remove every CSI sequence from `text`, leaving the printable characters.
pub fn strip_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            // ESC [ params final-byte
            if chars.next() == Some('[') {
                for c in chars.by_ref() {
                    if ('\x40'..='\x7e').contains(&c) {
                        break;
                    }
                }
            }
        } else {
            out.push(ch);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fg_sequence() {
        let mut out = String::new();
        push_fg(&mut out, Rgb::new(255, 0, 10));
        assert_eq!(out, "\x1b[38;2;255;0;10m");
    }

    #[test]
    fn bg_sequence() {
        let mut out = String::new();
        push_bg(&mut out, Rgb::new(0, 128, 255));
        assert_eq!(out, "\x1b[48;2;0;128;255m");
    }

    #[test]
    fn reset_sequence() {
        let mut out = String::new();
        push_reset(&mut out);
        assert_eq!(out, "\x1b[0m");
    }

    #[test]
    fn repeated_glyphs() {
        let mut out = String::new();
        push_repeated(&mut out, UPPER_HALF, 3);
        assert_eq!(out, "▀▀▀");
        push_repeated(&mut out, ' ', 0);
        assert_eq!(out, "▀▀▀");
    }

    #[test]
    fn hex_colors() {
        assert_eq!("#ff8000".parse::<Rgb>(), Ok(Rgb::new(255, 128, 0)));
        assert_eq!("0A0b0C".parse::<Rgb>(), Ok(Rgb::new(10, 11, 12)));
        assert_eq!(Rgb::new(1, 2, 255).to_string(), "#0102ff");
        for bad in ["", "#", "#fff", "#ff80001", "#gg0000", "#ff 000"] {
            assert!(bad.parse::<Rgb>().is_err(), "{:?}", bad);
        }
    }

    #[test]
    fn strip_leaves_text() {
        let text = "\x1b[48;2;1;2;3m\x1b[38;2;4;5;6m▀ \x1b[0m\nx\x1b[0m";
        assert_eq!(strip_escapes(text), "▀ \nx");
    }
}
