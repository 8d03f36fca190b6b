//! Animation effects and their timing attributes.
//!
//! An [`Effect`] pairs a variant ([`EffectKind`]) with the timing shared by all
//! variants: trigger, delay and duration. Effects are configured with option
//! strings (see [`crate::ooxml::pptx::options`]); every option string starts from
//! the variant defaults, so only explicit choices override them.

use super::behaviors::BehaviorWriter;
use super::motion::{Canvas, MotionPathState, Point};
use crate::common::RGBColor;
use crate::common::unit::secs_to_ms;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::pptx::options::{
    OptionHandler, OptionTable, OptionTarget, apply_options, parse_non_negative, parse_number,
};
use phf::phf_map;

/// Duration written for effects that happen at once (one millisecond).
pub const INSTANT: f64 = 0.001;

/// Named durations in seconds.
pub const VERY_FAST: f64 = 0.5;
pub const FAST: f64 = 1.0;
pub const MEDIUM: f64 = 2.0;
pub const SLOW: f64 = 3.0;
pub const VERY_SLOW: f64 = 5.0;

/// Resolve a named duration.
pub fn duration_word(word: &str) -> Option<f64> {
    match word {
        "veryFast" => Some(VERY_FAST),
        "fast" => Some(FAST),
        "medium" => Some(MEDIUM),
        "slow" => Some(SLOW),
        "verySlow" => Some(VERY_SLOW),
        _ => None,
    }
}

/// Parse a duration given as a word or a number of seconds.
pub fn parse_duration(value: &str) -> Result<f64> {
    match duration_word(value) {
        Some(secs) => Ok(secs),
        None => parse_non_negative("duration", value),
    }
}

/// Animation trigger type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationTrigger {
    /// Start on click
    #[default]
    OnClick,
    /// Start after previous animation
    AfterPrevious,
    /// Start with previous animation
    WithPrevious,
}

impl AnimationTrigger {
    /// Parse `onClick`, `afterPrev` or `withPrev`.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "onClick" => Ok(Self::OnClick),
            "afterPrev" => Ok(Self::AfterPrevious),
            "withPrev" => Ok(Self::WithPrevious),
            other => Err(OoxmlError::InvalidTrigger(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OnClick => "onClick",
            Self::AfterPrevious => "afterPrev",
            Self::WithPrevious => "withPrev",
        }
    }

    /// `nodeType` of the effect time node.
    pub(crate) fn node_type(self) -> &'static str {
        match self {
            Self::OnClick => "clickEffect",
            Self::AfterPrevious => "afterEffect",
            Self::WithPrevious => "withEffect",
        }
    }
}

/// Edge of the slide an effect enters from or leaves towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationDirection {
    Bottom,
    Left,
    Right,
    Top,
}

impl AnimationDirection {
    /// Accepts `fromBottom`, `toBottom` and `bottom` style words.
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "fromBottom" | "toBottom" | "bottom" => Some(Self::Bottom),
            "fromLeft" | "toLeft" | "left" => Some(Self::Left),
            "fromRight" | "toRight" | "right" => Some(Self::Right),
            "fromTop" | "toTop" | "top" => Some(Self::Top),
            _ => None,
        }
    }

    fn subtype(self) -> u32 {
        match self {
            Self::Top => 1,
            Self::Right => 2,
            Self::Bottom => 4,
            Self::Left => 8,
        }
    }

    /// Off-slide position of the shape on this edge, as (ppt_x, ppt_y) formulas.
    fn offscreen(self) -> (&'static str, &'static str) {
        match self {
            Self::Bottom => ("#ppt_x", "1+#ppt_h/2"),
            Self::Top => ("#ppt_x", "0-#ppt_h/2"),
            Self::Left => ("0-#ppt_w/2", "#ppt_y"),
            Self::Right => ("1+#ppt_w/2", "#ppt_y"),
        }
    }

    /// Wipe filter revealing from this edge.
    fn wipe_filter(self) -> &'static str {
        match self {
            Self::Bottom => "wipe(up)",
            Self::Top => "wipe(down)",
            Self::Left => "wipe(right)",
            Self::Right => "wipe(left)",
        }
    }
}

/// Checkerboard orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckerDirection {
    Across,
    Down,
}

impl CheckerDirection {
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "across" => Some(Self::Across),
            "down" => Some(Self::Down),
            _ => None,
        }
    }
}

/// Closed set of effect variants with their parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectKind {
    Appear,
    Disappear,
    FadeIn,
    FadeOut,
    FlyIn { direction: AnimationDirection },
    FlyOut { direction: AnimationDirection },
    /// Scale factors in percent
    GrowShrink { scale_x: f64, scale_y: f64 },
    /// Rotation in degrees, clockwise
    Spin { degrees: f64 },
    ChangeFillColor { color: RGBColor },
    CheckerboardIn { direction: CheckerDirection },
    WipeIn { direction: AnimationDirection },
    WipeOut { direction: AnimationDirection },
    ZoomOut,
    /// Straight motion by `delta` points
    LinearMotion { delta: Point },
    /// Cubic motion by `delta`, control points relative to the segment start
    BezierMotion { c1: Point, c2: Point, delta: Point },
}

impl EffectKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Appear => "Appear",
            Self::Disappear => "Disappear",
            Self::FadeIn => "FadeIn",
            Self::FadeOut => "FadeOut",
            Self::FlyIn { .. } => "FlyIn",
            Self::FlyOut { .. } => "FlyOut",
            Self::GrowShrink { .. } => "GrowShrink",
            Self::Spin { .. } => "Spin",
            Self::ChangeFillColor { .. } => "ChangeFillColor",
            Self::CheckerboardIn { .. } => "CheckerboardIn",
            Self::WipeIn { .. } => "WipeIn",
            Self::WipeOut { .. } => "WipeOut",
            Self::ZoomOut => "ZoomOut",
            Self::LinearMotion { .. } => "LinearMotion",
            Self::BezierMotion { .. } => "BezierMotion",
        }
    }

    pub fn is_motion(&self) -> bool {
        matches!(self, Self::LinearMotion { .. } | Self::BezierMotion { .. })
    }

    /// Preset id, preset class and subtype as defined in ECMA-376 Part 1.
    pub fn preset(&self) -> (u32, &'static str, u32) {
        match self {
            Self::Appear => (1, "entr", 0),
            Self::Disappear => (1, "exit", 0),
            Self::FadeIn => (10, "entr", 0),
            Self::FadeOut => (10, "exit", 0),
            Self::FlyIn { direction } => (2, "entr", direction.subtype()),
            Self::FlyOut { direction } => (2, "exit", direction.subtype()),
            Self::GrowShrink { .. } => (6, "emph", 0),
            Self::Spin { .. } => (8, "emph", 0),
            Self::ChangeFillColor { .. } => (1, "emph", 2),
            Self::CheckerboardIn { direction } => (
                5,
                "entr",
                match direction {
                    CheckerDirection::Across => 10,
                    CheckerDirection::Down => 5,
                },
            ),
            Self::WipeIn { direction } => (22, "entr", direction.subtype()),
            Self::WipeOut { direction } => (22, "exit", direction.subtype()),
            Self::ZoomOut => (53, "exit", 16),
            Self::LinearMotion { .. } | Self::BezierMotion { .. } => (0, "path", 0),
        }
    }

    /// Duration used when the option string sets none. `None` derives it from speed.
    fn default_duration(&self) -> Option<f64> {
        match self {
            Self::Appear | Self::Disappear => Some(INSTANT),
            Self::GrowShrink { .. } | Self::Spin { .. } | Self::ChangeFillColor { .. } => {
                Some(MEDIUM)
            },
            Self::LinearMotion { .. } | Self::BezierMotion { .. } => None,
            _ => Some(VERY_FAST),
        }
    }

    /// Displacement of a motion variant.
    pub fn displacement(&self) -> Option<Point> {
        match self {
            Self::LinearMotion { delta } | Self::BezierMotion { delta, .. } => Some(*delta),
            _ => None,
        }
    }

    fn direction_mut(&mut self) -> Option<&mut AnimationDirection> {
        match self {
            Self::FlyIn { direction }
            | Self::FlyOut { direction }
            | Self::WipeIn { direction }
            | Self::WipeOut { direction } => Some(direction),
            _ => None,
        }
    }
}

/// One authored animation or motion segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    shape_id: u32,
    kind: EffectKind,
    defaults: EffectKind,
    trigger: AnimationTrigger,
    delay: f64,
    duration: Option<f64>,
    speed: Option<f64>,
}

impl Effect {
    /// Create an effect with variant defaults. Call [`Effect::configure`] to apply options.
    pub fn new(shape_id: u32, kind: EffectKind) -> Self {
        let mut effect = Self {
            shape_id,
            defaults: kind.clone(),
            kind,
            trigger: AnimationTrigger::OnClick,
            delay: 0.0,
            duration: None,
            speed: None,
        };
        effect.pre_options();
        effect
    }

    /// Look up `name` in the effect registry and apply `options`.
    pub fn from_name(shape_id: u32, name: &str, options: &str) -> Result<Self> {
        let kind = super::registry::lookup(name)?;
        let mut effect = Self::new(shape_id, kind);
        effect.configure(options)?;
        Ok(effect)
    }

    /// Apply an option string, starting again from the variant defaults.
    ///
    /// On error the effect keeps its previous settings.
    pub fn configure(&mut self, options: &str) -> Result<()> {
        apply_options(self, options)
    }

    pub fn shape_id(&self) -> u32 {
        self.shape_id
    }

    pub fn kind(&self) -> &EffectKind {
        &self.kind
    }

    pub fn trigger(&self) -> AnimationTrigger {
        self.trigger
    }

    /// Delay in seconds.
    pub fn delay(&self) -> f64 {
        self.delay
    }

    /// Fill in the speed of a motion effect that did not set one.
    pub(crate) fn resolve_speed(&mut self, default_speed: f64) {
        if self.speed.is_none() {
            self.speed = Some(default_speed);
        }
    }

    /// Duration in seconds.
    ///
    /// Motion effects without `/duration:` take displacement length divided by
    /// speed; a zero-length motion lasts zero seconds.
    pub fn duration(&self) -> f64 {
        if let Some(duration) = self.duration {
            return duration;
        }
        match (self.kind.displacement(), self.speed) {
            (Some(delta), Some(speed)) => delta.norm() / speed,
            _ => 0.0,
        }
    }

    /// Write the behaviours of this effect.
    pub(crate) fn write_body(
        &self,
        w: &mut BehaviorWriter<'_>,
        motion: Option<&mut MotionPathState>,
        canvas: Canvas,
    ) -> Result<()> {
        let dur = secs_to_ms(self.duration()).max(1);
        let hide_at = dur.saturating_sub(1);
        match &self.kind {
            EffectKind::Appear => w.set_visibility(true, 0),
            EffectKind::Disappear => w.set_visibility(false, 0),
            EffectKind::FadeIn => {
                w.set_visibility(true, 0)?;
                w.anim_effect(true, "fade", dur)
            },
            EffectKind::FadeOut => {
                w.anim_effect(false, "fade", dur)?;
                w.set_visibility(false, hide_at)
            },
            EffectKind::FlyIn { direction } => {
                let (x, y) = direction.offscreen();
                w.set_visibility(true, 0)?;
                w.anim_property("ppt_x", x, "#ppt_x", dur)?;
                w.anim_property("ppt_y", y, "#ppt_y", dur)
            },
            EffectKind::FlyOut { direction } => {
                let (x, y) = direction.offscreen();
                w.anim_property("ppt_x", "#ppt_x", x, dur)?;
                w.anim_property("ppt_y", "#ppt_y", y, dur)?;
                w.set_visibility(false, hide_at)
            },
            EffectKind::GrowShrink { scale_x, scale_y } => w.anim_scale(*scale_x, *scale_y, dur),
            EffectKind::Spin { degrees } => w.anim_rotate(*degrees, dur),
            EffectKind::ChangeFillColor { color } => w.anim_fill_color(*color, dur),
            EffectKind::CheckerboardIn { direction } => {
                w.set_visibility(true, 0)?;
                let filter = match direction {
                    CheckerDirection::Across => "checkerboard(across)",
                    CheckerDirection::Down => "checkerboard(down)",
                };
                w.anim_effect(true, filter, dur)
            },
            EffectKind::WipeIn { direction } => {
                w.set_visibility(true, 0)?;
                w.anim_effect(true, direction.wipe_filter(), dur)
            },
            EffectKind::WipeOut { direction } => {
                w.anim_effect(false, direction.wipe_filter(), dur)?;
                w.set_visibility(false, hide_at)
            },
            EffectKind::ZoomOut => {
                w.anim_property("ppt_w", "#ppt_w", "0", dur)?;
                w.anim_property("ppt_h", "#ppt_h", "0", dur)?;
                w.set_visibility(false, hide_at)
            },
            EffectKind::LinearMotion { delta } => {
                let state = motion.ok_or(OoxmlError::NotAttached(self.shape_id))?;
                let path = state.linear_path(*delta, canvas);
                w.anim_motion(&path, dur)
            },
            EffectKind::BezierMotion { c1, c2, delta } => {
                let state = motion.ok_or(OoxmlError::NotAttached(self.shape_id))?;
                let path = state.bezier_path(*c1, *c2, *delta, canvas);
                w.anim_motion(&path, dur)
            },
        }
    }
}

static COMMON_KEYS: OptionTable<Effect> = phf_map! {
    "trigger" => set_trigger,
    "onClick" => set_on_click,
    "afterPrev" => set_after_previous,
    "withPrev" => set_with_previous,
    "delay" => set_delay,
    "duration" => set_duration,
};

static DIRECTION_KEYS: OptionTable<Effect> = phf_map! {
    "direction" => set_direction,
};

static SCALE_KEYS: OptionTable<Effect> = phf_map! {
    "scale" => set_scale,
    "scaleX" => set_scale_x,
    "scaleY" => set_scale_y,
};

static SPIN_KEYS: OptionTable<Effect> = phf_map! {
    "angle" => set_angle,
};

static COLOR_KEYS: OptionTable<Effect> = phf_map! {
    "color" => set_color,
};

static MOTION_KEYS: OptionTable<Effect> = phf_map! {
    "speed" => set_speed,
};

fn set_trigger(effect: &mut Effect, value: &str) -> Result<()> {
    effect.trigger = AnimationTrigger::parse(value)?;
    Ok(())
}

fn set_on_click(effect: &mut Effect, _: &str) -> Result<()> {
    effect.trigger = AnimationTrigger::OnClick;
    Ok(())
}

fn set_after_previous(effect: &mut Effect, _: &str) -> Result<()> {
    effect.trigger = AnimationTrigger::AfterPrevious;
    Ok(())
}

fn set_with_previous(effect: &mut Effect, _: &str) -> Result<()> {
    effect.trigger = AnimationTrigger::WithPrevious;
    Ok(())
}

fn set_delay(effect: &mut Effect, value: &str) -> Result<()> {
    effect.delay = parse_non_negative("delay", value)?;
    Ok(())
}

fn set_duration(effect: &mut Effect, value: &str) -> Result<()> {
    effect.duration = Some(parse_duration(value)?);
    Ok(())
}

fn set_direction(effect: &mut Effect, value: &str) -> Result<()> {
    if let EffectKind::CheckerboardIn { direction } = &mut effect.kind {
        *direction =
            CheckerDirection::parse(value).ok_or_else(|| OoxmlError::invalid_value("direction", value))?;
        return Ok(());
    }
    let parsed =
        AnimationDirection::parse(value).ok_or_else(|| OoxmlError::invalid_value("direction", value))?;
    if let Some(direction) = effect.kind.direction_mut() {
        *direction = parsed;
    }
    Ok(())
}

fn set_scale(effect: &mut Effect, value: &str) -> Result<()> {
    let percent = parse_non_negative("scale", value)?;
    if let EffectKind::GrowShrink { scale_x, scale_y } = &mut effect.kind {
        *scale_x = percent;
        *scale_y = percent;
    }
    Ok(())
}

fn set_scale_x(effect: &mut Effect, value: &str) -> Result<()> {
    let percent = parse_non_negative("scaleX", value)?;
    if let EffectKind::GrowShrink { scale_x, .. } = &mut effect.kind {
        *scale_x = percent;
    }
    Ok(())
}

fn set_scale_y(effect: &mut Effect, value: &str) -> Result<()> {
    let percent = parse_non_negative("scaleY", value)?;
    if let EffectKind::GrowShrink { scale_y, .. } = &mut effect.kind {
        *scale_y = percent;
    }
    Ok(())
}

fn set_angle(effect: &mut Effect, value: &str) -> Result<()> {
    let angle = parse_number("angle", value)?;
    if let EffectKind::Spin { degrees } = &mut effect.kind {
        *degrees = angle;
    }
    Ok(())
}

fn set_color(effect: &mut Effect, value: &str) -> Result<()> {
    let parsed = RGBColor::parse(value).ok_or_else(|| OoxmlError::invalid_value("color", value))?;
    if let EffectKind::ChangeFillColor { color } = &mut effect.kind {
        *color = parsed;
    }
    Ok(())
}

fn set_speed(effect: &mut Effect, value: &str) -> Result<()> {
    let speed = parse_non_negative("speed", value)?;
    if speed == 0.0 {
        return Err(OoxmlError::invalid_value("speed", value));
    }
    effect.speed = Some(speed);
    Ok(())
}

impl OptionTarget for Effect {
    fn handler(&self, key: &str) -> Option<OptionHandler<Self>> {
        if let Some(handler) = COMMON_KEYS.get(key) {
            return Some(*handler);
        }
        let table = match self.kind {
            EffectKind::FlyIn { .. }
            | EffectKind::FlyOut { .. }
            | EffectKind::WipeIn { .. }
            | EffectKind::WipeOut { .. }
            | EffectKind::CheckerboardIn { .. } => &DIRECTION_KEYS,
            EffectKind::GrowShrink { .. } => &SCALE_KEYS,
            EffectKind::Spin { .. } => &SPIN_KEYS,
            EffectKind::ChangeFillColor { .. } => &COLOR_KEYS,
            EffectKind::LinearMotion { .. } | EffectKind::BezierMotion { .. } => &MOTION_KEYS,
            _ => return None,
        };
        table.get(key).copied()
    }

    fn pre_options(&mut self) {
        self.kind = self.defaults.clone();
        self.trigger = AnimationTrigger::OnClick;
        self.delay = 0.0;
        self.duration = self.kind.default_duration();
        self.speed = None;
    }

    /// Bare duration words (`/fast`) and direction words (`/fromLeft`, `/across`).
    fn undefined_key(&mut self, key: &str, value: &str) -> Result<()> {
        if value.is_empty() {
            if let Some(secs) = duration_word(key) {
                self.duration = Some(secs);
                return Ok(());
            }
            if let EffectKind::CheckerboardIn { direction } = &mut self.kind
                && let Some(parsed) = CheckerDirection::parse(key)
            {
                *direction = parsed;
                return Ok(());
            }
            if let Some(parsed) = AnimationDirection::parse(key)
                && let Some(direction) = self.kind.direction_mut()
            {
                *direction = parsed;
                return Ok(());
            }
        }
        Err(OoxmlError::UnknownOption(key.to_string()))
    }
}
