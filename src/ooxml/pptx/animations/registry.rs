//! Effect names accepted by `add_animation`.
//!
//! Motion variants are not listed: they are created by the motion calls, which
//! supply the displacement.

use super::effect::{AnimationDirection, CheckerDirection, EffectKind};
use crate::common::RGBColor;
use crate::ooxml::error::{OoxmlError, Result};
use phf::phf_map;

type Constructor = fn() -> EffectKind;

/// Perfect hash map of effect names to their default variant
static EFFECTS: phf::Map<&'static str, Constructor> = phf_map! {
    "Appear" => appear,
    "Disappear" => disappear,
    "FadeIn" => fade_in,
    "FadeOut" => fade_out,
    "FlyIn" => fly_in,
    "FlyOut" => fly_out,
    "Grow" => grow,
    "GrowShrink" => grow,
    "Shrink" => shrink,
    "Spin" => spin,
    "ChangeFillColor" => change_fill_color,
    "CheckerboardIn" => checkerboard_in,
    "WipeIn" => wipe_in,
    "WipeOut" => wipe_out,
    "ZoomOut" => zoom_out,
};

fn appear() -> EffectKind {
    EffectKind::Appear
}

fn disappear() -> EffectKind {
    EffectKind::Disappear
}

fn fade_in() -> EffectKind {
    EffectKind::FadeIn
}

fn fade_out() -> EffectKind {
    EffectKind::FadeOut
}

fn fly_in() -> EffectKind {
    EffectKind::FlyIn {
        direction: AnimationDirection::Bottom,
    }
}

fn fly_out() -> EffectKind {
    EffectKind::FlyOut {
        direction: AnimationDirection::Bottom,
    }
}

fn grow() -> EffectKind {
    EffectKind::GrowShrink {
        scale_x: 150.0,
        scale_y: 150.0,
    }
}

fn shrink() -> EffectKind {
    EffectKind::GrowShrink {
        scale_x: 50.0,
        scale_y: 50.0,
    }
}

fn spin() -> EffectKind {
    EffectKind::Spin { degrees: 360.0 }
}

fn change_fill_color() -> EffectKind {
    EffectKind::ChangeFillColor {
        color: RGBColor::new(0xFF, 0x00, 0x00),
    }
}

fn checkerboard_in() -> EffectKind {
    EffectKind::CheckerboardIn {
        direction: CheckerDirection::Across,
    }
}

fn wipe_in() -> EffectKind {
    EffectKind::WipeIn {
        direction: AnimationDirection::Bottom,
    }
}

fn wipe_out() -> EffectKind {
    EffectKind::WipeOut {
        direction: AnimationDirection::Bottom,
    }
}

fn zoom_out() -> EffectKind {
    EffectKind::ZoomOut
}

/// Default variant for a registered effect name. Names are case-sensitive.
pub fn lookup(name: &str) -> Result<EffectKind> {
    EFFECTS
        .get(name)
        .map(|constructor| constructor())
        .ok_or_else(|| OoxmlError::UnknownEffectKind(name.to_string()))
}

/// Registered effect names.
pub fn names() -> impl Iterator<Item = &'static str> {
    EFFECTS.keys().copied()
}
