//! Slidewright - PowerPoint slide authoring with animation timing
//!
//! This library writes PresentationML slides whose shapes are animated by
//! effects and motion paths, and builds the nested `p:timing` tree PowerPoint
//! needs to play them.
//!
//! # Features
//!
//! - **Option strings**: configure shapes and effects with `/key:value` strings
//! - **Effects**: entrance, emphasis and exit effects looked up by name
//! - **Motion paths**: chain `move_by`/`move_to`/`curve_to` calls per shape
//! - **Timeline builder**: onClick / afterPrev / withPrev scheduling into any sink
//! - **Rebuildable**: slide markup can be regenerated any number of times
//!
//! # Example - Animating a shape
//!
//! ```rust
//! use slidewright::ooxml::pptx::{AnimationOptions, MutablePresentation};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = AnimationOptions::from_yaml_str("default_speed: 200")?;
//! let mut pres = MutablePresentation::with_options(options)?;
//!
//! let slide = pres.add_slide()?;
//! let box_id = slide.add_rectangle("/x:1in /y:1in /size:1in /fill:4472C4")?;
//! slide.add_animation(box_id, "FadeIn /fast")?;
//! slide.move_by(box_id, 400.0, 0.0, "/afterPrev")?;
//! slide.add_animation(box_id, "Spin /withPrev /angle:-90")?;
//!
//! // Two seconds of motion at 200 points per second
//! assert_eq!(slide.animations()[1].duration(), 2.0);
//!
//! let script = slide.emission_script()?;
//! assert!(script.is_balanced());
//! # Ok(())
//! # }
//! ```

/// Units, colours and XML helpers shared by the writer
pub mod common;

/// OOXML (Office Open XML) writers
///
/// This module provides the PresentationML slide writer and its animation
/// engine.
pub mod ooxml;

// Re-export commonly used types for convenience
pub use ooxml::pptx::{AnimationOptions, MutablePresentation, MutableSlide};
pub use ooxml::{OoxmlError, Result};
