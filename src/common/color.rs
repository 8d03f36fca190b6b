use phf::phf_map;
use std::fmt;

/// RGB color representation.
///
/// Represents a color using red, green, and blue components, each in the range 0-255.
///
/// # Examples
///
/// ```rust
/// use slidewright::common::RGBColor;
///
/// // Create a red color
/// let red = RGBColor::new(255, 0, 0);
///
/// // Create from hex string
/// let blue = RGBColor::from_hex("0000FF").unwrap();
/// assert_eq!(RGBColor::parse("blue"), Some(blue));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RGBColor {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

static NAMED_COLORS: phf::Map<&'static str, RGBColor> = phf_map! {
    "black" => RGBColor::new(0x00, 0x00, 0x00),
    "white" => RGBColor::new(0xFF, 0xFF, 0xFF),
    "red" => RGBColor::new(0xFF, 0x00, 0x00),
    "green" => RGBColor::new(0x00, 0x80, 0x00),
    "blue" => RGBColor::new(0x00, 0x00, 0xFF),
    "yellow" => RGBColor::new(0xFF, 0xFF, 0x00),
    "cyan" => RGBColor::new(0x00, 0xFF, 0xFF),
    "magenta" => RGBColor::new(0xFF, 0x00, 0xFF),
    "orange" => RGBColor::new(0xFF, 0xA5, 0x00),
    "gray" => RGBColor::new(0x80, 0x80, 0x80),
    "grey" => RGBColor::new(0x80, 0x80, 0x80),
};

impl RGBColor {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create an RGB color from a hex string ("FF0000" or "#FF0000").
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Self::new(r, g, b))
    }

    /// Parse a hex string or one of the basic color names.
    pub fn parse(value: &str) -> Option<Self> {
        NAMED_COLORS
            .get(value.to_ascii_lowercase().as_str())
            .copied()
            .or_else(|| Self::from_hex(value))
    }

    /// Convert to hex string (without # prefix), as written to `a:srgbClr`.
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for RGBColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let c = RGBColor::from_hex("#1A2b3C").unwrap();
        assert_eq!(c, RGBColor::new(0x1A, 0x2B, 0x3C));
        assert_eq!(c.to_hex(), "1A2B3C");
        assert_eq!(RGBColor::from_hex("12345"), None);
        assert_eq!(RGBColor::from_hex("GG0000"), None);
    }

    #[test]
    fn test_named_colors_ignore_case() {
        assert_eq!(RGBColor::parse("Red"), Some(RGBColor::new(255, 0, 0)));
        assert_eq!(RGBColor::parse("00ff00"), Some(RGBColor::new(0, 255, 0)));
        assert_eq!(RGBColor::parse("chartreuse"), None);
    }
}
