//! Office Open XML (OOXML) writers.
//!
//! Only PresentationML is implemented: slides, shapes and their animation
//! timing (`pptx`).
pub mod error;
pub mod pptx;

// Re-export error types
pub use error::{OoxmlError, Result};
