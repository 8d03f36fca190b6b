//! Slide animations: effects, motion paths and the slide timeline.
//!
//! Effects are authored in order on a slide. When the slide is written, the
//! [`TimelineBuilder`] walks them once and emits the nested `p:timing` tree
//! through a [`TimingSink`].

mod behaviors;
pub mod effect;
pub mod motion;
pub mod registry;
pub mod timeline;

pub use behaviors::TimeNodeIds;
pub use effect::{
    AnimationDirection, AnimationTrigger, CheckerDirection, Effect, EffectKind, FAST, INSTANT,
    MEDIUM, SLOW, VERY_FAST, VERY_SLOW, duration_word, parse_duration,
};
pub use motion::{Canvas, MotionPathState, Point};
pub use timeline::{
    Emission, EmissionScript, GroupStart, MotionStates, ScheduledEffect, TimeGroup,
    TimelineBuilder, TimingSink, TimingXmlWriter, build_timeline,
};
