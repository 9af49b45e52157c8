//! RGBA colors with `#hex` parsing.

use std::fmt;
use std::str::FromStr;

use richmark_markup::{BitDigits, Scanner};

use crate::StyleError;

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);

    /// Opaque color from red, green and blue channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    ///
    /// # Example
    ///
    /// ```
    /// use richmark_style::Color;
    ///
    /// assert_eq!(Color::from_hex("#f00").unwrap(), Color::rgb(0xff, 0, 0));
    /// assert_eq!(Color::from_hex("#00ff0080").unwrap(), Color::rgba(0, 0xff, 0, 0x80));
    /// assert!(Color::from_hex("red").is_err());
    /// ```
    pub fn from_hex(s: &str) -> Result<Self, StyleError> {
        let invalid = || StyleError::InvalidColor(s.to_owned());

        let digits = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let normalized = match digits.len() {
            3 => {
                let doubled: String = digits.chars().flat_map(|c| [c, c]).collect();
                format!("#{doubled}ff")
            }
            6 => format!("#{digits}ff"),
            8 => format!("#{digits}"),
            _ => return Err(invalid()),
        };

        let mut scanner = Scanner::new(&normalized);
        let value = scanner
            .scan_hex_int(BitDigits::Bit32)
            .map_err(|_| invalid())?;
        let value = u32::try_from(value).map_err(|_| invalid())?;
        let [r, g, b, a] = value.to_be_bytes();
        Ok(Self { r, g, b, a })
    }

    /// Hex form: `#rrggbb` when opaque, `#rrggbbaa` otherwise.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.a == 0xff {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Color {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_form() {
        assert_eq!(Color::from_hex("#abc").unwrap(), Color::rgb(0xaa, 0xbb, 0xcc));
    }

    #[test]
    fn test_parse_long_forms() {
        assert_eq!(
            Color::from_hex("#102030").unwrap(),
            Color::rgb(0x10, 0x20, 0x30)
        );
        assert_eq!(
            Color::from_hex("#10203040").unwrap(),
            Color::rgba(0x10, 0x20, 0x30, 0x40)
        );
        assert_eq!(Color::from_hex("#FFFFFF").unwrap(), Color::WHITE);
    }

    #[test]
    fn test_rejects_invalid() {
        for bad in ["", "#", "000000", "#12", "#12345", "#ggg", "#1234567", "#ａｂｃ"] {
            assert!(
                matches!(Color::from_hex(bad), Err(StyleError::InvalidColor(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(Color::rgb(1, 2, 255).to_hex(), "#0102ff");
        assert_eq!(Color::rgba(1, 2, 3, 4).to_string(), "#01020304");
    }

    #[test]
    fn test_from_str() {
        let color: Color = "#000".parse().unwrap();
        assert_eq!(color, Color::BLACK);
    }
}
