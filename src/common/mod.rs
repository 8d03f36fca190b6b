//! Common types and utilities shared by the presentation writer.

pub mod color;
pub mod unit;
pub mod xml;

// Re-exports for convenience
pub use color::RGBColor;
pub use unit::{EMUS_PER_INCH, EMUS_PER_PT, LengthUnit, parse_length_pt};
