//! Configuration for animation authoring.

use super::animations::Canvas;
use crate::ooxml::error::{OoxmlError, Result};
use serde::{Deserialize, Serialize};

/// Default canvas width in points (10 inches).
pub const DEFAULT_CANVAS_WIDTH: f64 = 720.0;
/// Default canvas height in points (7.5 inches).
pub const DEFAULT_CANVAS_HEIGHT: f64 = 540.0;
/// Default motion speed in points per second.
pub const DEFAULT_SPEED: f64 = 100.0;

/// Holds the canvas size used to normalise motion paths and the default
/// motion speed given to every shape that does not set its own.
///
/// # Examples
///
/// ```rust
/// use slidewright::ooxml::pptx::AnimationOptions;
///
/// // Create with defaults (10in x 7.5in canvas, 100pt/s)
/// let options = AnimationOptions::default();
///
/// // Or customize
/// let options = AnimationOptions::new()
///     .with_canvas_size(960.0, 540.0)
///     .with_default_speed(250.0);
///
/// // Or load from YAML
/// let options = AnimationOptions::from_yaml_str("default_speed: 50").unwrap();
/// assert_eq!(options.default_speed, 50.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationOptions {
    /// Canvas width in points
    pub canvas_width: f64,
    /// Canvas height in points
    pub canvas_height: f64,
    /// Motion speed in points per second for shapes without their own `/speed:`
    pub default_speed: f64,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            default_speed: DEFAULT_SPEED,
        }
    }
}

impl AnimationOptions {
    /// Create options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the canvas size in points.
    #[inline]
    pub fn with_canvas_size(mut self, width: f64, height: f64) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    /// Set the default motion speed in points per second.
    #[inline]
    pub fn with_default_speed(mut self, speed: f64) -> Self {
        self.default_speed = speed;
        self
    }

    /// Load options from YAML. Missing fields keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let options: Self =
            serde_saphyr::from_str(yaml).map_err(|e| OoxmlError::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Check that every dimension and the speed are positive and finite.
    pub fn validate(&self) -> Result<()> {
        Canvas::new(self.canvas_width, self.canvas_height).validate()?;
        if !(self.default_speed.is_finite() && self.default_speed > 0.0) {
            return Err(OoxmlError::Config(format!(
                "default speed must be positive, got {}",
                self.default_speed
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_standard_slide() {
        let options = AnimationOptions::default();
        assert_eq!(options.canvas_width, 720.0);
        assert_eq!(options.canvas_height, 540.0);
        assert_eq!(options.default_speed, 100.0);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_yaml_partial_override() {
        let options =
            AnimationOptions::from_yaml_str("canvas_width: 960\ncanvas_height: 540\n").unwrap();
        assert_eq!(options.canvas_width, 960.0);
        assert_eq!(options.default_speed, DEFAULT_SPEED);
    }

    #[test]
    fn test_yaml_rejects_bad_values() {
        assert!(matches!(
            AnimationOptions::from_yaml_str("default_speed: 0"),
            Err(OoxmlError::Config(_))
        ));
        assert!(matches!(
            AnimationOptions::from_yaml_str("canvas_width: [1, 2]"),
            Err(OoxmlError::Config(_))
        ));
    }
}
