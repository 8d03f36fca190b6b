/// Slide types and implementation for PPTX presentations.
use crate::common::xml::escape_xml;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::pptx::animations::{
    Canvas, Effect, EffectKind, EmissionScript, MotionPathState, MotionStates, Point,
    TimelineBuilder, TimingSink, TimingXmlWriter,
};
use crate::ooxml::pptx::config::AnimationOptions;
use std::fmt::Write as FmtWrite;
use tracing::debug;

use super::shape::MutableShape;

/// A mutable slide in a presentation.
///
/// The slide owns its shapes, the ordered list of effects authored on them and
/// the motion state of every shape that has been moved.
#[derive(Debug, Clone)]
pub struct MutableSlide {
    /// Slide ID (unique identifier)
    pub(crate) slide_id: u32,
    /// Slide title (stored in title placeholder)
    pub(crate) title: Option<String>,
    /// Shapes on the slide
    pub(crate) shapes: Vec<MutableShape>,
    /// Effects in authoring order
    pub(crate) effects: Vec<Effect>,
    /// Motion state per shape id, created on the first motion call
    pub(crate) motion: MotionStates,
    options: AnimationOptions,
    /// Whether the slide has been modified
    pub(crate) modified: bool,
}

impl MutableSlide {
    /// Create a new empty slide.
    pub(crate) fn new(slide_id: u32, options: AnimationOptions) -> Self {
        Self {
            slide_id,
            title: None,
            shapes: Vec::new(),
            effects: Vec::new(),
            motion: MotionStates::new(),
            options,
            modified: false,
        }
    }

    /// Get the slide ID.
    pub fn slide_id(&self) -> u32 {
        self.slide_id
    }

    /// Set the slide title.
    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
        self.modified = true;
    }

    /// Get the slide title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn options(&self) -> &AnimationOptions {
        &self.options
    }

    fn canvas(&self) -> Canvas {
        Canvas::new(self.options.canvas_width, self.options.canvas_height)
    }

    // ========================================================================
    // Shapes
    // ========================================================================

    // IDs: 1=group, 2=title, 3+=user shapes
    fn next_shape_id(&self) -> u32 {
        (self.shapes.len() + 3) as u32
    }

    fn push_shape(&mut self, shape: MutableShape) -> u32 {
        let shape_id = shape.shape_id;
        self.shapes.push(shape);
        self.modified = true;
        shape_id
    }

    /// Add a text box to the slide. Returns its shape id.
    pub fn add_text_box(&mut self, text: &str, options: &str) -> Result<u32> {
        let shape = MutableShape::new_text_box(self.next_shape_id(), text, options)?;
        Ok(self.push_shape(shape))
    }

    /// Add a rectangle to the slide. Returns its shape id.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slidewright::ooxml::pptx::MutablePresentation;
    ///
    /// let mut pres = MutablePresentation::new();
    /// let slide = pres.add_slide().unwrap();
    /// let id = slide.add_rectangle("/x:1in /y:1in /size:2in /fill:4472C4").unwrap();
    /// assert_eq!(id, 3);
    /// ```
    pub fn add_rectangle(&mut self, options: &str) -> Result<u32> {
        let shape = MutableShape::new_rectangle(self.next_shape_id(), options)?;
        Ok(self.push_shape(shape))
    }

    /// Add an ellipse (circle/oval) to the slide. Returns its shape id.
    pub fn add_ellipse(&mut self, options: &str) -> Result<u32> {
        let shape = MutableShape::new_ellipse(self.next_shape_id(), options)?;
        Ok(self.push_shape(shape))
    }

    /// Get a shape by id.
    pub fn shape(&self, shape_id: u32) -> Option<&MutableShape> {
        self.shapes.iter().find(|s| s.shape_id == shape_id)
    }

    /// Get the number of shapes on the slide.
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Check if the slide has been modified.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    fn require_shape(&self, shape_id: u32) -> Result<&MutableShape> {
        self.shape(shape_id)
            .ok_or(OoxmlError::NotAttached(shape_id))
    }

    // ========================================================================
    // Animations
    // ========================================================================

    /// Add an effect from a descriptor such as `"FlyIn /fromLeft /afterPrev"`.
    ///
    /// The descriptor starts with a registered effect name, followed by an
    /// option string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slidewright::ooxml::pptx::MutablePresentation;
    ///
    /// let mut pres = MutablePresentation::new();
    /// let slide = pres.add_slide().unwrap();
    /// let id = slide.add_text_box("Animated Text", "/width:3in /height:1in").unwrap();
    /// slide.add_animation(id, "FadeIn /delay:0.5").unwrap();
    /// assert_eq!(slide.animation_count(), 1);
    /// ```
    pub fn add_animation(&mut self, shape_id: u32, descriptor: &str) -> Result<()> {
        self.require_shape(shape_id)?;
        let descriptor = descriptor.trim_start();
        let split = descriptor
            .find(|c: char| c.is_whitespace() || c == '/')
            .unwrap_or(descriptor.len());
        let (name, options) = descriptor.split_at(split);
        let effect = Effect::from_name(shape_id, name, options)?;
        debug!(
            shape_id,
            effect = effect.kind().name(),
            trigger = effect.trigger().as_str(),
            "queued effect"
        );
        self.effects.push(effect);
        self.modified = true;
        Ok(())
    }

    /// Per-shape authoring handle for effects and motion.
    pub fn animate(&mut self, shape_id: u32) -> Result<ShapeAnimator<'_>> {
        self.require_shape(shape_id)?;
        Ok(ShapeAnimator {
            slide: self,
            shape_id,
        })
    }

    /// Get the effects on this slide in authoring order.
    pub fn animations(&self) -> &[Effect] {
        &self.effects
    }

    /// Get the number of effects on this slide.
    pub fn animation_count(&self) -> usize {
        self.effects.len()
    }

    /// Clear all effects and motion state from the slide.
    pub fn clear_animations(&mut self) {
        self.effects.clear();
        self.motion.clear();
        self.modified = true;
    }

    /// Motion state of a shape, created from its bounds on first use.
    fn motion_state(&mut self, shape_id: u32) -> Result<&mut MotionPathState> {
        let default_speed = self.options.default_speed;
        let shape = self.require_shape(shape_id)?;
        let (initial, speed) = (shape.location(), shape.speed().unwrap_or(default_speed));
        Ok(self
            .motion
            .entry(shape_id)
            .or_insert_with(|| MotionPathState::new(initial, speed)))
    }

    /// Get the motion state of a shape that has been moved.
    pub fn motion(&self, shape_id: u32) -> Option<&MotionPathState> {
        self.motion.get(&shape_id)
    }

    fn queue_motion(&mut self, shape_id: u32, kind: EffectKind, options: &str) -> Result<()> {
        let delta = kind.displacement().unwrap_or(Point::ORIGIN);
        let speed = self.motion_state(shape_id)?.speed();

        let mut effect = Effect::new(shape_id, kind);
        effect.configure(options)?;
        effect.resolve_speed(speed);

        if let Some(state) = self.motion.get_mut(&shape_id) {
            state.queue(delta);
        }
        debug!(
            shape_id,
            effect = effect.kind().name(),
            dx = delta.x,
            dy = delta.y,
            duration = effect.duration(),
            "queued motion"
        );
        self.effects.push(effect);
        self.modified = true;
        Ok(())
    }

    /// Move a shape by a displacement in points.
    pub fn move_by(&mut self, shape_id: u32, dx: f64, dy: f64, options: &str) -> Result<()> {
        let kind = EffectKind::LinearMotion {
            delta: Point::new(dx, dy),
        };
        self.queue_motion(shape_id, kind, options)
    }

    /// Move a shape to an absolute location, starting from where queued motion left it.
    pub fn move_to(&mut self, shape_id: u32, x: f64, y: f64, options: &str) -> Result<()> {
        let from = self.location(shape_id)?;
        let kind = EffectKind::LinearMotion {
            delta: Point::new(x, y) - from,
        };
        self.queue_motion(shape_id, kind, options)
    }

    /// Move a shape along a cubic curve. All points are relative to the curve start.
    pub fn curve_by(
        &mut self,
        shape_id: u32,
        c1: Point,
        c2: Point,
        end: Point,
        options: &str,
    ) -> Result<()> {
        let kind = EffectKind::BezierMotion { c1, c2, delta: end };
        self.queue_motion(shape_id, kind, options)
    }

    /// Move a shape along a cubic curve given in absolute slide coordinates.
    pub fn curve_to(
        &mut self,
        shape_id: u32,
        c1: Point,
        c2: Point,
        end: Point,
        options: &str,
    ) -> Result<()> {
        let from = self.location(shape_id)?;
        self.curve_by(shape_id, c1 - from, c2 - from, end - from, options)
    }

    /// Location of a shape once every queued motion has played.
    pub fn location(&mut self, shape_id: u32) -> Result<Point> {
        Ok(self.motion_state(shape_id)?.current())
    }

    /// Set the default motion speed of a shape in points per second.
    ///
    /// Applies to motion queued afterwards without its own `/speed:`.
    pub fn set_speed(&mut self, shape_id: u32, speed: f64) -> Result<()> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(OoxmlError::invalid_value("speed", &speed.to_string()));
        }
        let shape = self
            .shapes
            .iter_mut()
            .find(|s| s.shape_id == shape_id)
            .ok_or(OoxmlError::NotAttached(shape_id))?;
        shape.set_speed(speed);
        if let Some(state) = self.motion.get_mut(&shape_id) {
            state.set_speed(speed);
        }
        Ok(())
    }

    /// Rewind the timeline walk of every moved shape.
    pub fn reset_motion_state(&mut self) {
        for state in self.motion.values_mut() {
            state.reset_state();
        }
    }

    /// Rewind the timeline walk of one shape.
    pub fn reset_shape_motion(&mut self, shape_id: u32) -> Result<()> {
        self.require_shape(shape_id)?;
        if let Some(state) = self.motion.get_mut(&shape_id) {
            state.reset_state();
        }
        Ok(())
    }

    // ========================================================================
    // Timeline
    // ========================================================================

    /// Build the timeline into `sink` from the current motion state.
    ///
    /// Call [`MutableSlide::reset_motion_state`] first when rebuilding.
    pub fn build_timeline<S: TimingSink>(&mut self, sink: &mut S) -> Result<()> {
        TimelineBuilder::new(self.canvas()).build(&self.effects, &mut self.motion, sink)
    }

    /// Record the timeline of this slide.
    pub fn emission_script(&mut self) -> Result<EmissionScript> {
        self.reset_motion_state();
        let mut script = EmissionScript::new();
        self.build_timeline(&mut script)?;
        Ok(script)
    }

    /// The `p:timing` element of this slide; empty without effects.
    pub fn timing_xml(&mut self) -> Result<String> {
        self.reset_motion_state();
        let mut writer = TimingXmlWriter::new();
        self.build_timeline(&mut writer)?;
        Ok(writer.into_xml())
    }

    /// Generate slide XML content.
    ///
    /// Motion state is rewound first, so repeated calls give identical output.
    #[tracing::instrument(skip(self), fields(slide_id = self.slide_id))]
    pub fn to_xml(&mut self) -> Result<String> {
        let timing = self.timing_xml()?;
        let mut xml = String::with_capacity(4096 + timing.len());

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);

        xml.push_str(
            r#"<p:sld xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" "#,
        );
        xml.push_str(r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#);
        xml.push_str(
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );

        xml.push_str("<p:cSld>");
        xml.push_str("<p:spTree>");

        // Write group shape properties (required)
        xml.push_str("<p:nvGrpSpPr>");
        xml.push_str(r#"<p:cNvPr id="1" name=""/>"#);
        xml.push_str("<p:cNvGrpSpPr/>");
        xml.push_str("<p:nvPr/>");
        xml.push_str("</p:nvGrpSpPr>");
        xml.push_str("<p:grpSpPr>");
        xml.push_str("<a:xfrm>");
        xml.push_str(r#"<a:off x="0" y="0"/>"#);
        xml.push_str(r#"<a:ext cx="0" cy="0"/>"#);
        xml.push_str(r#"<a:chOff x="0" y="0"/>"#);
        xml.push_str(r#"<a:chExt cx="0" cy="0"/>"#);
        xml.push_str("</a:xfrm>");
        xml.push_str("</p:grpSpPr>");

        if let Some(ref title) = self.title {
            self.write_title_shape(&mut xml, title)?;
        }

        for shape in &self.shapes {
            shape.to_xml(&mut xml)?;
        }

        xml.push_str("</p:spTree>");
        xml.push_str("</p:cSld>");

        xml.push_str(r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#);
        xml.push_str(&timing);
        xml.push_str("</p:sld>");

        Ok(xml)
    }

    /// Write the title placeholder shape.
    fn write_title_shape(&self, xml: &mut String, title: &str) -> Result<()> {
        xml.push_str("<p:sp>");
        xml.push_str("<p:nvSpPr>");
        // Group shape uses id=1, so title uses id=2.
        xml.push_str(r#"<p:cNvPr id="2" name="Title 1"/>"#);
        xml.push_str("<p:cNvSpPr><a:spLocks noGrp=\"1\"/></p:cNvSpPr>");
        xml.push_str(r#"<p:nvPr><p:ph type="ctrTitle"/></p:nvPr>"#);
        xml.push_str("</p:nvSpPr>");
        xml.push_str("<p:spPr/>");
        xml.push_str("<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r>");
        xml.push_str("<a:rPr lang=\"en-US\" dirty=\"0\"/>");
        write!(xml, "<a:t>{}</a:t>", escape_xml(title))?;
        xml.push_str("</a:r></a:p></p:txBody>");
        xml.push_str("</p:sp>");
        Ok(())
    }
}

/// Authoring handle bound to one shape of a slide.
///
/// ```rust
/// use slidewright::ooxml::pptx::MutablePresentation;
///
/// let mut pres = MutablePresentation::new();
/// let slide = pres.add_slide().unwrap();
/// let id = slide.add_ellipse("/x:100 /y:100 /size:50").unwrap();
///
/// let mut ball = slide.animate(id).unwrap();
/// ball.add_animation("Appear").unwrap();
/// ball.move_by(100.0, 0.0, "/afterPrev /speed:50").unwrap();
/// ball.move_to(100.0, 100.0, "/afterPrev").unwrap();
/// assert_eq!(ball.location().unwrap().x, 100.0);
/// ```
#[derive(Debug)]
pub struct ShapeAnimator<'a> {
    slide: &'a mut MutableSlide,
    shape_id: u32,
}

impl ShapeAnimator<'_> {
    pub fn shape_id(&self) -> u32 {
        self.shape_id
    }

    pub fn add_animation(&mut self, descriptor: &str) -> Result<&mut Self> {
        self.slide.add_animation(self.shape_id, descriptor)?;
        Ok(self)
    }

    pub fn move_by(&mut self, dx: f64, dy: f64, options: &str) -> Result<&mut Self> {
        self.slide.move_by(self.shape_id, dx, dy, options)?;
        Ok(self)
    }

    pub fn move_to(&mut self, x: f64, y: f64, options: &str) -> Result<&mut Self> {
        self.slide.move_to(self.shape_id, x, y, options)?;
        Ok(self)
    }

    pub fn curve_by(&mut self, c1: Point, c2: Point, end: Point, options: &str) -> Result<&mut Self> {
        self.slide.curve_by(self.shape_id, c1, c2, end, options)?;
        Ok(self)
    }

    pub fn curve_to(&mut self, c1: Point, c2: Point, end: Point, options: &str) -> Result<&mut Self> {
        self.slide.curve_to(self.shape_id, c1, c2, end, options)?;
        Ok(self)
    }

    pub fn location(&mut self) -> Result<Point> {
        self.slide.location(self.shape_id)
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<&mut Self> {
        self.slide.set_speed(self.shape_id, speed)?;
        Ok(self)
    }

    pub fn reset_state(&mut self) -> Result<()> {
        self.slide.reset_shape_motion(self.shape_id)
    }
}
