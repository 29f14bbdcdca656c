//! RGB colors and the default firework palette
//!
//! Colors are parsed from `#RRGGBB` once (palette load) and kept as bytes so
//! the per-particle draw path never touches strings it did not have to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    #[inline]
    pub fn r(&self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub fn g(&self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub fn b(&self) -> u8 {
        self.0[2]
    }

    /// Parse `#RRGGBB` (the leading `#` is optional)
    pub fn from_hex(s: &str) -> Result<Self, ParseColorError> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ParseColorError(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| ParseColorError(s.to_string()))
        };
        Ok(Self([channel(0)?, channel(2)?, channel(4)?]))
    }

    /// `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())
    }

    /// Write a CSS `rgba(r, g, b, a)` fill style into `out`
    pub fn write_css_rgba(&self, alpha: f32, out: &mut impl fmt::Write) -> fmt::Result {
        write!(out, "rgba({}, {}, {}, {})", self.r(), self.g(), self.b(), alpha)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

/// A string that is not a `#RRGGBB` color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(pub String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color {:?}, expected #RRGGBB", self.0)
    }
}

impl std::error::Error for ParseColorError {}

/// Default rocket/burst colors
pub const DEFAULT_PALETTE: [Rgb; 7] = [
    Rgb::new(0xFF, 0x3D, 0x3D), // Brilliant red
    Rgb::new(0xFF, 0xD7, 0x00), // Gold
    Rgb::new(0xFF, 0x00, 0xFF), // Neon magenta
    Rgb::new(0x00, 0xFF, 0xFF), // Electric cyan
    Rgb::new(0x7F, 0xFF, 0x00), // Chartreuse
    Rgb::new(0xFF, 0xFF, 0xFF), // White
    Rgb::new(0xFF, 0x8C, 0x00), // Dark orange
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgb::from_hex("#FF8C00").unwrap(), Rgb::new(255, 140, 0));
        assert_eq!(Rgb::from_hex("1e1b4b").unwrap(), Rgb::new(0x1e, 0x1b, 0x4b));
        assert!(Rgb::from_hex("#FFF").is_err());
        assert!(Rgb::from_hex("#GG0000").is_err());
        assert!(Rgb::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_css_rgba() {
        let mut out = String::new();
        Rgb::new(255, 61, 61).write_css_rgba(0.5, &mut out).unwrap();
        assert_eq!(out, "rgba(255, 61, 61, 0.5)");
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Rgb::new(0, 255, 255)).unwrap();
        assert_eq!(json, "\"#00ffff\"");

        let parsed: Rgb = serde_json::from_str("\"#7FFF00\"").unwrap();
        assert_eq!(parsed, Rgb::new(0x7F, 0xFF, 0x00));

        assert!(serde_json::from_str::<Rgb>("\"red\"").is_err());
    }

    #[test]
    fn test_default_palette_is_large_enough() {
        assert!(DEFAULT_PALETTE.len() >= crate::consts::MIN_PALETTE_SIZE);
    }
}
