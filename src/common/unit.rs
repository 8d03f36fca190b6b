//! Unit conversion utilities.
//!
//! Authoring coordinates are points (1/72 inch). Slide markup uses EMUs.

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_CM: i64 = 360_000;
pub const EMUS_PER_MM: i64 = 36_000;
pub const EMUS_PER_PT: i64 = 12_700;

const PT_PER_INCH: f64 = 72.0;

#[inline]
pub fn pt_to_emu_f64(pt: f64) -> i64 {
    (pt * EMUS_PER_PT as f64).round() as i64
}

#[inline]
pub fn emu_to_pt_f64(emu: i64) -> f64 {
    emu as f64 / EMUS_PER_PT as f64
}

/// Convert seconds to whole milliseconds as used by `p:cTn` attributes.
#[inline]
pub fn secs_to_ms(secs: f64) -> u64 {
    (secs * 1000.0).round().max(0.0) as u64
}

/// Length units accepted in option values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    /// Point (1/72 inch), the default
    Point,
    /// Inch
    Inch,
    /// Centimeter
    Centimeter,
    /// Millimeter
    Millimeter,
    /// Pixel at 96 DPI
    Pixel,
    /// English Metric Unit
    Emu,
}

impl LengthUnit {
    fn from_suffix(s: &str) -> Option<Self> {
        match s {
            "" | "pt" => Some(Self::Point),
            "in" | "inch" => Some(Self::Inch),
            "cm" => Some(Self::Centimeter),
            "mm" => Some(Self::Millimeter),
            "px" => Some(Self::Pixel),
            "emu" => Some(Self::Emu),
            _ => None,
        }
    }

    /// Points per one unit.
    #[inline]
    pub fn points(self) -> f64 {
        match self {
            Self::Point => 1.0,
            Self::Inch => PT_PER_INCH,
            Self::Centimeter => EMUS_PER_CM as f64 / EMUS_PER_PT as f64,
            Self::Millimeter => EMUS_PER_MM as f64 / EMUS_PER_PT as f64,
            Self::Pixel => PT_PER_INCH / 96.0,
            Self::Emu => 1.0 / EMUS_PER_PT as f64,
        }
    }
}

/// Parse a length such as `72`, `1.5in` or `2cm` into points.
///
/// Returns `None` for an unknown suffix or a non-finite number.
pub fn parse_length_pt(s: &str) -> Option<f64> {
    let s = s.trim();
    let split = s
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(s.len());
    let (number, suffix) = s.split_at(split);
    let unit = LengthUnit::from_suffix(suffix)?;
    let value = fast_float2::parse::<f64, _>(number).ok()?;
    value.is_finite().then(|| value * unit.points())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pt_emu_conversion() {
        assert_eq!(pt_to_emu_f64(72.0), EMUS_PER_INCH);
        assert_eq!(emu_to_pt_f64(9_144_000), 720.0);
    }

    #[test]
    fn test_secs_to_ms_rounds() {
        assert_eq!(secs_to_ms(0.5), 500);
        assert_eq!(secs_to_ms(1.0 / 3.0), 333);
        assert_eq!(secs_to_ms(0.0), 0);
    }

    #[test]
    fn test_parse_length() {
        assert_eq!(parse_length_pt("36"), Some(36.0));
        assert_eq!(parse_length_pt("1in"), Some(72.0));
        assert_eq!(parse_length_pt("96px"), Some(72.0));
        assert_eq!(parse_length_pt("12700emu"), Some(1.0));
        assert!((parse_length_pt("2.54cm").unwrap() - 72.0).abs() < 1e-9);
        assert_eq!(parse_length_pt("3furlongs"), None);
        assert_eq!(parse_length_pt("in"), None);
    }
}
