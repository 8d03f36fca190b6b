//! PowerPoint (.pptx) slide authoring with animations.
//!
//! - `options`: the `/key:value` option strings that configure shapes and effects
//! - `config`: canvas size and default motion speed
//! - `animations`: effects, motion paths and the timeline builder
//! - `writer`: presentations, slides and shapes
//!
//! # Example
//!
//! ```rust
//! use slidewright::ooxml::pptx::MutablePresentation;
//!
//! let mut pres = MutablePresentation::new();
//! let slide = pres.add_slide()?;
//! let title = slide.add_text_box("Hello", "/x:1in /y:1in /width:4in /height:1in")?;
//! let ball = slide.add_ellipse("/x:1in /y:3in /size:0.5in /fill:orange")?;
//!
//! slide.add_animation(title, "FlyIn /fromLeft")?;
//! slide.add_animation(ball, "Appear /afterPrev")?;
//! slide.move_by(ball, 288.0, 0.0, "/afterPrev /speed:144")?;
//!
//! let xml = slide.to_xml()?;
//! assert!(xml.contains("<p:timing>"));
//! # Ok::<(), slidewright::ooxml::OoxmlError>(())
//! ```

pub mod animations;
pub mod config;
pub mod options;
pub mod writer;

pub use animations::{AnimationTrigger, Effect, EffectKind, MotionPathState, Point};
pub use config::AnimationOptions;
pub use options::{OptionTarget, apply_options, tokenize};
pub use writer::{MutablePresentation, MutableShape, MutableSlide, ShapeAnimator};
