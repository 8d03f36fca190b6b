//! Timeline builder.
//!
//! Walks a slide's effects once, in authoring order, and emits the nested time
//! node structure PowerPoint expects:
//!
//! ```text
//! mainSeq
//! └── click group        (one per onClick effect; the first may start with the slide)
//!     └── chain group    (one per afterPrev effect, offset from the click)
//!         └── effect     (withPrev effects join the open chain group)
//! ```
//!
//! Times are seconds measured from the start of the enclosing click group.
//! The builder only decides structure and times; the markup itself comes from
//! the effects (bodies) and the [`TimingSink`] (groups and effect wrappers).

use super::behaviors::{BehaviorWriter, TimeNodeIds};
use super::effect::{AnimationTrigger, Effect};
use super::motion::{Canvas, MotionPathState};
use crate::common::unit::secs_to_ms;
use crate::ooxml::error::{OoxmlError, Result};
use std::collections::HashMap;
use std::fmt::Write as FmtWrite;
use tracing::{debug, trace};

/// Motion state per shape id.
pub type MotionStates = HashMap<u32, MotionPathState>;

/// Nesting depth with a click group open.
const CLICK_GROUP: usize = 1;

/// Start condition of a group time node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroupStart {
    /// Waits for a click.
    Click,
    /// Starts with the slide; used when the first effect is not `onClick`.
    SlideBegin,
    /// Starts this many seconds into the enclosing click group.
    Offset(f64),
}

/// A group time node being opened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGroup {
    pub id: u32,
    pub start: GroupStart,
}

/// An effect with its resolved schedule and serialised body.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledEffect<'a> {
    /// Id of the effect time node
    pub id: u32,
    pub effect: &'a Effect,
    /// Seconds from the start of the click group
    pub start: f64,
    /// Start condition written on the effect node, relative to its chain group
    pub delay: f64,
    /// Resolved duration in seconds
    pub duration: f64,
    /// Behaviour markup
    pub body: &'a str,
}

/// Receives the timeline in emission order.
///
/// Every `open_group` is matched by a `close_group`; effects are only emitted
/// while a chain group is open.
pub trait TimingSink {
    fn open_group(&mut self, group: TimeGroup) -> Result<()>;
    fn close_group(&mut self) -> Result<()>;
    fn effect(&mut self, scheduled: &ScheduledEffect<'_>) -> Result<()>;
}

/// Builds the timeline for one slide.
#[derive(Debug, Clone, Copy)]
pub struct TimelineBuilder {
    canvas: Canvas,
}

impl TimelineBuilder {
    pub fn new(canvas: Canvas) -> Self {
        Self { canvas }
    }

    /// Check everything that could fail during the walk.
    ///
    /// Runs before the first emission so that a failing build emits nothing.
    pub fn validate(&self, effects: &[Effect], motion: &MotionStates) -> Result<()> {
        self.canvas.validate()?;

        if !effects.is_empty()
            && effects
                .iter()
                .all(|e| e.trigger() == AnimationTrigger::WithPrevious)
        {
            return Err(OoxmlError::InvalidTrigger("withPrev".to_string()));
        }

        if let Some(orphan) = effects
            .iter()
            .find(|e| e.kind().is_motion() && !motion.contains_key(&e.shape_id()))
        {
            return Err(OoxmlError::NotAttached(orphan.shape_id()));
        }

        Ok(())
    }

    /// Walk `effects` and drive `sink`.
    ///
    /// Motion effects advance the walk location of their shape, so every shape
    /// should be rewound with [`MotionPathState::reset_state`] before a rebuild.
    pub fn build<S: TimingSink>(
        &self,
        effects: &[Effect],
        motion: &mut MotionStates,
        sink: &mut S,
    ) -> Result<()> {
        self.validate(effects, motion)?;
        debug!(effects = effects.len(), "building timeline");

        let mut walk = Walk::new(sink);
        for effect in effects {
            let delay = effect.delay();
            let duration = effect.duration();

            let (start, cond_delay) = match (effect.trigger(), walk.depth) {
                (AnimationTrigger::OnClick, _) => {
                    walk.close_to(0)?;
                    walk.open(GroupStart::Click)?;
                    walk.open(GroupStart::Offset(0.0))?;
                    walk.group_start = 0.0;
                    // The delay stays on the leaf; the chain runs from the click.
                    walk.chain_end = duration;
                    (delay, delay)
                },
                (AnimationTrigger::AfterPrevious, 0) => {
                    walk.open(GroupStart::SlideBegin)?;
                    walk.group_start = delay;
                    walk.open(GroupStart::Offset(delay))?;
                    walk.chain_end = delay + duration;
                    (delay, 0.0)
                },
                (AnimationTrigger::AfterPrevious, _) => {
                    walk.close_to(CLICK_GROUP)?;
                    let start = walk.chain_end + delay;
                    walk.group_start = start;
                    walk.open(GroupStart::Offset(start))?;
                    walk.chain_end = start + duration;
                    (start, 0.0)
                },
                (AnimationTrigger::WithPrevious, 0) => {
                    walk.open(GroupStart::SlideBegin)?;
                    walk.open(GroupStart::Offset(0.0))?;
                    walk.group_start = 0.0;
                    walk.chain_end = delay + duration;
                    (delay, delay)
                },
                // Joins the open chain; the chain keeps its own end time.
                (AnimationTrigger::WithPrevious, _) => (walk.group_start + delay, delay),
            };

            trace!(
                shape_id = effect.shape_id(),
                effect = effect.kind().name(),
                trigger = effect.trigger().as_str(),
                start,
                delay = cond_delay,
                duration,
                "scheduled effect"
            );

            let id = walk.ids.next_id();
            let mut body = String::with_capacity(512);
            effect.write_body(
                &mut BehaviorWriter::new(&mut body, &mut walk.ids, effect.shape_id()),
                motion.get_mut(&effect.shape_id()),
                self.canvas,
            )?;
            walk.sink.effect(&ScheduledEffect {
                id,
                effect,
                start,
                delay: cond_delay,
                duration,
                body: &body,
            })?;
        }
        walk.close_to(0)?;

        debug!(groups = walk.groups_opened, "timeline built");
        Ok(())
    }
}

/// State of one walk. Never outlives [`TimelineBuilder::build`].
struct Walk<'s, S: TimingSink> {
    sink: &'s mut S,
    ids: TimeNodeIds,
    /// Open groups: 0 none, 1 click group, 2 click group and chain group
    depth: usize,
    /// Start of the open chain group
    group_start: f64,
    /// End of the last chain, where the next afterPrev effect starts
    chain_end: f64,
    groups_opened: usize,
}

impl<'s, S: TimingSink> Walk<'s, S> {
    fn new(sink: &'s mut S) -> Self {
        Self {
            sink,
            ids: TimeNodeIds::new(),
            depth: 0,
            group_start: 0.0,
            chain_end: 0.0,
            groups_opened: 0,
        }
    }

    fn open(&mut self, start: GroupStart) -> Result<()> {
        let id = self.ids.next_id();
        self.sink.open_group(TimeGroup { id, start })?;
        self.depth += 1;
        self.groups_opened += 1;
        Ok(())
    }

    fn close_to(&mut self, depth: usize) -> Result<()> {
        while self.depth > depth {
            self.sink.close_group()?;
            self.depth -= 1;
        }
        Ok(())
    }
}

/// Writes the `p:timing` element of a slide.
#[derive(Debug, Default)]
pub struct TimingXmlWriter {
    xml: String,
}

impl TimingXmlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish the element. Returns an empty string when nothing was emitted.
    pub fn into_xml(mut self) -> String {
        if self.xml.is_empty() {
            return self.xml;
        }
        self.xml.push_str("</p:childTnLst></p:cTn>");
        self.xml.push_str(r#"<p:prevCondLst><p:cond evt="onPrev" delay="0"><p:tgtEl><p:sldTgt/></p:tgtEl></p:cond></p:prevCondLst>"#);
        self.xml.push_str(r#"<p:nextCondLst><p:cond evt="onNext" delay="0"><p:tgtEl><p:sldTgt/></p:tgtEl></p:cond></p:nextCondLst>"#);
        self.xml.push_str("</p:seq></p:childTnLst></p:cTn></p:par>");
        self.xml.push_str("</p:tnLst>");
        self.xml.push_str("</p:timing>");
        self.xml
    }

    fn start(&mut self) {
        if !self.xml.is_empty() {
            return;
        }
        self.xml.reserve(2048);
        self.xml.push_str("<p:timing>");
        self.xml.push_str("<p:tnLst>");
        self.xml.push_str(r#"<p:par><p:cTn id="1" dur="indefinite" restart="never" nodeType="tmRoot">"#);
        self.xml.push_str(r#"<p:childTnLst><p:seq concurrent="1" nextAc="seek">"#);
        self.xml.push_str(r#"<p:cTn id="2" dur="indefinite" nodeType="mainSeq"><p:childTnLst>"#);
    }
}

impl TimingSink for TimingXmlWriter {
    fn open_group(&mut self, group: TimeGroup) -> Result<()> {
        self.start();
        write!(self.xml, r#"<p:par><p:cTn id="{}" fill="hold"><p:stCondLst>"#, group.id)?;
        match group.start {
            GroupStart::Click => self.xml.push_str(r#"<p:cond delay="indefinite"/>"#),
            GroupStart::SlideBegin => {
                self.xml.push_str(r#"<p:cond delay="indefinite"/>"#);
                write!(
                    self.xml,
                    r#"<p:cond evt="onBegin" delay="0"><p:tn val="{}"/></p:cond>"#,
                    TimeNodeIds::MAIN_SEQUENCE
                )?;
            },
            GroupStart::Offset(secs) => {
                write!(self.xml, r#"<p:cond delay="{}"/>"#, secs_to_ms(secs))?
            },
        }
        self.xml.push_str("</p:stCondLst><p:childTnLst>");
        Ok(())
    }

    fn close_group(&mut self) -> Result<()> {
        self.xml.push_str("</p:childTnLst></p:cTn></p:par>");
        Ok(())
    }

    fn effect(&mut self, scheduled: &ScheduledEffect<'_>) -> Result<()> {
        let (preset_id, preset_class, preset_subtype) = scheduled.effect.kind().preset();
        write!(
            self.xml,
            r#"<p:par><p:cTn id="{}" presetID="{}" presetClass="{}" presetSubtype="{}" fill="hold" nodeType="{}">"#,
            scheduled.id,
            preset_id,
            preset_class,
            preset_subtype,
            scheduled.effect.trigger().node_type()
        )?;
        write!(
            self.xml,
            r#"<p:stCondLst><p:cond delay="{}"/></p:stCondLst>"#,
            secs_to_ms(scheduled.delay)
        )?;
        self.xml.push_str("<p:childTnLst>");
        self.xml.push_str(scheduled.body);
        self.xml.push_str("</p:childTnLst></p:cTn></p:par>");
        Ok(())
    }
}

/// One recorded sink call.
#[derive(Debug, Clone, PartialEq)]
pub enum Emission {
    Open(TimeGroup),
    Effect {
        id: u32,
        shape_id: u32,
        name: &'static str,
        trigger: AnimationTrigger,
        start: f64,
        delay: f64,
        duration: f64,
        /// Number of open groups when the effect was emitted
        depth: usize,
    },
    Close,
}

/// Ordered record of a timeline build, for inspection and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmissionScript {
    emissions: Vec<Emission>,
    depth: usize,
    /// Set by a close with no open group.
    underflow: bool,
}

impl EmissionScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emissions(&self) -> &[Emission] {
        &self.emissions
    }

    /// The emitted effects in order.
    pub fn effects(&self) -> impl Iterator<Item = &Emission> {
        self.emissions
            .iter()
            .filter(|e| matches!(e, Emission::Effect { .. }))
    }

    /// Whether every group opened was closed again.
    pub fn is_balanced(&self) -> bool {
        self.depth == 0 && !self.underflow
    }
}

impl TimingSink for EmissionScript {
    fn open_group(&mut self, group: TimeGroup) -> Result<()> {
        self.depth += 1;
        self.emissions.push(Emission::Open(group));
        Ok(())
    }

    fn close_group(&mut self) -> Result<()> {
        match self.depth.checked_sub(1) {
            Some(depth) => self.depth = depth,
            None => self.underflow = true,
        }
        self.emissions.push(Emission::Close);
        Ok(())
    }

    fn effect(&mut self, scheduled: &ScheduledEffect<'_>) -> Result<()> {
        self.emissions.push(Emission::Effect {
            id: scheduled.id,
            shape_id: scheduled.effect.shape_id(),
            name: scheduled.effect.kind().name(),
            trigger: scheduled.effect.trigger(),
            start: scheduled.start,
            delay: scheduled.delay,
            duration: scheduled.duration,
            depth: self.depth,
        });
        Ok(())
    }
}

/// Build the timeline for `effects` into an [`EmissionScript`].
pub fn build_timeline(
    effects: &[Effect],
    motion: &mut MotionStates,
    canvas: Canvas,
) -> Result<EmissionScript> {
    let mut script = EmissionScript::new();
    TimelineBuilder::new(canvas).build(effects, motion, &mut script)?;
    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::super::effect::{EffectKind, FAST, INSTANT, MEDIUM, VERY_FAST};
    use super::super::motion::Point;
    use super::*;
    use proptest::prelude::*;
    use quick_xml::Reader;
    use quick_xml::events::Event;

    const CANVAS: Canvas = Canvas {
        width: 720.0,
        height: 540.0,
    };

    fn effect(shape_id: u32, name: &str, options: &str) -> Effect {
        Effect::from_name(shape_id, name, options).unwrap()
    }

    fn linear(shape_id: u32, dx: f64, dy: f64, options: &str) -> Effect {
        let mut e = Effect::new(shape_id, EffectKind::LinearMotion { delta: Point::new(dx, dy) });
        e.configure(options).unwrap();
        e.resolve_speed(100.0);
        e
    }

    fn script(effects: &[Effect]) -> EmissionScript {
        build_timeline(effects, &mut MotionStates::new(), CANVAS).unwrap()
    }

    /// (start, delay, duration, depth) of each emitted effect.
    fn schedule(script: &EmissionScript) -> Vec<(f64, f64, f64, usize)> {
        script
            .effects()
            .map(|e| match e {
                Emission::Effect {
                    start,
                    delay,
                    duration,
                    depth,
                    ..
                } => (*start, *delay, *duration, *depth),
                _ => unreachable!(),
            })
            .collect()
    }

    fn timing_xml(effects: &[Effect], motion: &mut MotionStates) -> String {
        let mut writer = TimingXmlWriter::new();
        TimelineBuilder::new(CANVAS)
            .build(effects, motion, &mut writer)
            .unwrap();
        writer.into_xml()
    }

    /// Depth of every `p:cTn` that carries a `nodeType` of `clickEffect` etc.
    fn effect_node_depths(xml: &str) -> Vec<usize> {
        let mut reader = Reader::from_str(xml);
        let mut depth = 0usize;
        let mut found = Vec::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) => {
                    if e.local_name().as_ref() == b"par" {
                        depth += 1;
                    }
                    if e.local_name().as_ref() == b"cTn"
                        && e.attributes().flatten().any(|a| {
                            a.key.as_ref() == b"nodeType" && a.value.ends_with(b"Effect")
                        })
                    {
                        found.push(depth);
                    }
                },
                Event::End(e) => {
                    if e.local_name().as_ref() == b"par" {
                        depth -= 1;
                    }
                },
                Event::Eof => break,
                _ => {},
            }
        }
        assert_eq!(depth, 0);
        found
    }

    #[test]
    fn test_single_appear() {
        let s = script(&[effect(3, "Appear", "")]);
        assert_eq!(
            s.emissions(),
            &[
                Emission::Open(TimeGroup {
                    id: 3,
                    start: GroupStart::Click
                }),
                Emission::Open(TimeGroup {
                    id: 4,
                    start: GroupStart::Offset(0.0)
                }),
                Emission::Effect {
                    id: 5,
                    shape_id: 3,
                    name: "Appear",
                    trigger: AnimationTrigger::OnClick,
                    start: 0.0,
                    delay: 0.0,
                    duration: INSTANT,
                    depth: 2,
                },
                Emission::Close,
                Emission::Close,
            ]
        );
        assert!(s.is_balanced());
    }

    #[test]
    fn test_click_after_with_nesting() {
        let effects = [
            effect(3, "Appear", ""),
            effect(4, "FlyIn", "/afterPrev"),
            effect(5, "Grow", "/withPrev /delay:0.25"),
            effect(6, "FadeIn", "/afterPrev /delay:1"),
        ];
        let s = script(&effects);

        let opens: Vec<GroupStart> = s
            .emissions()
            .iter()
            .filter_map(|e| match e {
                Emission::Open(group) => Some(group.start),
                _ => None,
            })
            .collect();
        assert_eq!(
            opens,
            [
                GroupStart::Click,
                GroupStart::Offset(0.0),
                GroupStart::Offset(INSTANT),
                GroupStart::Offset(INSTANT + VERY_FAST + 1.0),
            ]
        );

        let fly_start = INSTANT;
        assert_eq!(
            schedule(&s),
            [
                (0.0, 0.0, INSTANT, 2),
                (fly_start, 0.0, VERY_FAST, 2),
                (fly_start + 0.25, 0.25, MEDIUM, 2),
                (fly_start + VERY_FAST + 1.0, 0.0, VERY_FAST, 2),
            ]
        );
        assert!(s.is_balanced());
    }

    #[test]
    fn test_after_prev_without_gap() {
        let s = script(&[
            effect(3, "FadeIn", "/duration:fast"),
            effect(3, "Spin", "/afterPrev"),
            effect(3, "FadeOut", "/afterPrev"),
        ]);
        let starts: Vec<f64> = schedule(&s).iter().map(|s| s.0).collect();
        assert_eq!(starts, [0.0, FAST, FAST + MEDIUM]);
    }

    #[test]
    fn test_click_resets_elapsed_time() {
        let s = script(&[
            effect(3, "FadeIn", "/delay:2"),
            effect(3, "Spin", "/afterPrev"),
            effect(4, "Appear", "/delay:0.5"),
            effect(4, "Spin", "/afterPrev /delay:1"),
        ]);
        let starts: Vec<f64> = schedule(&s).iter().map(|s| s.0).collect();
        assert_eq!(starts, [2.0, VERY_FAST, 0.5, INSTANT + 1.0]);
        let clicks = s
            .emissions()
            .iter()
            .filter(|e| matches!(e, Emission::Open(TimeGroup { start: GroupStart::Click, .. })))
            .count();
        assert_eq!(clicks, 2);
    }

    #[test]
    fn test_after_prev_follows_click_duration_not_delay() {
        let s = script(&[effect(3, "FadeIn", "/delay:2"), effect(3, "Spin", "/afterPrev")]);
        assert_eq!(
            schedule(&s),
            [(2.0, 2.0, VERY_FAST, 2), (VERY_FAST, 0.0, MEDIUM, 2)]
        );
    }

    #[test]
    fn test_extra_close_unbalances_script() {
        let mut s = EmissionScript::new();
        assert!(s.is_balanced());
        s.close_group().unwrap();
        assert!(!s.is_balanced());

        s.open_group(TimeGroup {
            id: 3,
            start: GroupStart::Click,
        })
        .unwrap();
        s.close_group().unwrap();
        assert!(!s.is_balanced());
    }

    #[test]
    fn test_degenerate_canvas_fails_before_emission() {
        for canvas in [Canvas::new(0.0, 540.0), Canvas::new(720.0, f64::NAN)] {
            let mut sink = EmissionScript::new();
            let result = TimelineBuilder::new(canvas).build(
                &[effect(3, "Appear", "")],
                &mut MotionStates::new(),
                &mut sink,
            );
            assert!(matches!(result, Err(OoxmlError::Config(_))));
            assert!(sink.emissions().is_empty());
        }
    }

    #[test]
    fn test_first_effect_after_or_with_prev_starts_with_slide() {
        for first in ["/afterPrev", "/withPrev"] {
            let s = script(&[effect(3, "Appear", first), effect(3, "Spin", "/afterPrev")]);
            assert_eq!(
                s.emissions()[0],
                Emission::Open(TimeGroup {
                    id: 3,
                    start: GroupStart::SlideBegin
                })
            );
            assert!(s.is_balanced());
        }

        let s = script(&[effect(3, "Appear", "/afterPrev /delay:1.5")]);
        assert_eq!(schedule(&s), [(1.5, 0.0, INSTANT, 2)]);
        assert_eq!(
            s.emissions()[1],
            Emission::Open(TimeGroup {
                id: 4,
                start: GroupStart::Offset(1.5)
            })
        );
    }

    #[test]
    fn test_only_with_prev_is_rejected() {
        let effects = [effect(3, "Appear", "/withPrev"), effect(4, "Appear", "/withPrev")];
        let mut sink = EmissionScript::new();
        let result = TimelineBuilder::new(CANVAS).build(&effects, &mut MotionStates::new(), &mut sink);
        assert_eq!(result, Err(OoxmlError::InvalidTrigger("withPrev".into())));
        assert!(sink.emissions().is_empty());
    }

    #[test]
    fn test_empty_list_emits_nothing() {
        assert!(script(&[]).emissions().is_empty());
        assert_eq!(timing_xml(&[], &mut MotionStates::new()), "");
    }

    #[test]
    fn test_motion_without_state_fails_before_emission() {
        let effects = [effect(3, "Appear", ""), linear(9, 10.0, 0.0, "")];
        let mut sink = EmissionScript::new();
        let result = TimelineBuilder::new(CANVAS).build(&effects, &mut MotionStates::new(), &mut sink);
        assert_eq!(result, Err(OoxmlError::NotAttached(9)));
        assert!(sink.emissions().is_empty());
    }

    #[test]
    fn test_xml_nesting_and_conditions() {
        let effects = [
            effect(3, "Appear", ""),
            effect(4, "FlyIn", "/afterPrev /direction:fromLeft"),
            effect(5, "Grow", "/withPrev"),
        ];
        let xml = timing_xml(&effects, &mut MotionStates::new());
        assert!(xml.starts_with("<p:timing>"));
        assert!(xml.ends_with("</p:timing>"));
        assert_eq!(effect_node_depths(&xml), [4, 4, 4]);
        assert!(xml.contains(r#"nodeType="clickEffect""#));
        assert!(xml.contains(
            r#"presetID="2" presetClass="entr" presetSubtype="8" fill="hold" nodeType="afterEffect""#
        ));
        assert!(xml.contains(r#"nodeType="withEffect""#));
        assert!(xml.contains(r#"<p:cond delay="indefinite"/></p:stCondLst>"#));
        assert!(xml.contains(r#"<p:cond delay="1"/>"#));
    }

    #[test]
    fn test_slide_begin_condition_markup() {
        let xml = timing_xml(&[effect(3, "Appear", "/afterPrev")], &mut MotionStates::new());
        assert!(xml.contains(
            r#"<p:cond delay="indefinite"/><p:cond evt="onBegin" delay="0"><p:tn val="2"/></p:cond>"#
        ));
    }

    #[test]
    fn test_motion_paths_chain_and_rebuild_identically() {
        let mut motion = MotionStates::new();
        motion.insert(3, MotionPathState::new(Point::new(100.0, 100.0), 100.0));
        let effects = [
            linear(3, 72.0, 0.0, ""),
            linear(3, 0.0, 54.0, "/afterPrev"),
        ];

        let first = timing_xml(&effects, &mut motion);
        assert!(first.contains(r#"path="M 0 0 L 0.1 0 E""#));
        assert!(first.contains(r#"path="M 0.1 0 L 0.1 0.1 E""#));
        assert!(first.contains(r#"presetID="0" presetClass="path""#));

        for state in motion.values_mut() {
            state.reset_state();
        }
        let second = timing_xml(&effects, &mut motion);
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_length_motion_is_instant() {
        let mut motion = MotionStates::new();
        motion.insert(3, MotionPathState::new(Point::ORIGIN, 100.0));
        let effects = [linear(3, 0.0, 0.0, "")];
        let s = build_timeline(&effects, &mut motion, CANVAS).unwrap();
        assert_eq!(schedule(&s), [(0.0, 0.0, 0.0, 2)]);
    }

    fn trigger_strategy() -> impl Strategy<Value = &'static str> {
        prop_oneof![Just("/onClick"), Just("/afterPrev"), Just("/withPrev")]
    }

    proptest! {
        #[test]
        fn prop_after_prev_chain_is_monotonic(
            steps in proptest::collection::vec((trigger_strategy(), 0u32..4, 1u32..6), 1..12)
        ) {
            let mut effects = vec![effect(3, "Appear", "")];
            for (trigger, delay, duration) in &steps {
                effects.push(effect(
                    3,
                    "Spin",
                    &format!("{trigger} /delay:{} /duration:{}", *delay as f64 / 2.0, duration),
                ));
            }
            let s = script(&effects);
            prop_assert!(s.is_balanced());

            let scheduled: Vec<(AnimationTrigger, f64, f64)> = s
                .effects()
                .map(|e| match e {
                    Emission::Effect { trigger, start, duration, .. } => (*trigger, *start, *duration),
                    _ => unreachable!(),
                })
                .collect();
            prop_assert_eq!(scheduled.len(), effects.len());

            // Each afterPrev effect starts no earlier than the end of the chain
            // lead before it. A click lead counts from the click, not its delay.
            let mut lead: Option<(f64, f64)> = None;
            for (trigger, start, duration) in scheduled {
                match trigger {
                    AnimationTrigger::OnClick => lead = Some((0.0, duration)),
                    AnimationTrigger::AfterPrevious => {
                        let (prev_start, prev_duration) = lead.unwrap();
                        prop_assert!(start >= prev_start + prev_duration);
                        lead = Some((start, duration));
                    },
                    AnimationTrigger::WithPrevious => {},
                }
            }
        }

        #[test]
        fn prop_rebuild_after_reset_is_identical(
            moves in proptest::collection::vec((-200i32..200, -200i32..200, trigger_strategy()), 1..8)
        ) {
            let mut motion = MotionStates::new();
            motion.insert(3, MotionPathState::new(Point::new(50.0, 60.0), 100.0));
            let mut effects = vec![effect(3, "Appear", "")];
            for (dx, dy, trigger) in &moves {
                effects.push(linear(3, *dx as f64, *dy as f64, trigger));
            }

            let first = timing_xml(&effects, &mut motion);
            motion.get_mut(&3).unwrap().reset_state();
            let second = timing_xml(&effects, &mut motion);
            prop_assert_eq!(first, second);
        }
    }
}
