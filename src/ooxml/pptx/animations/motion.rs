//! Motion path state and path geometry.
//!
//! A shape with motion effects tracks three locations:
//!
//! - `initial`: where the shape sits on the slide. Never changes.
//! - `current`: where the shape ends up once every queued motion has played.
//!   Advanced when a motion is queued so that `move_by`/`move_to` calls chain.
//! - `effect`: where the timeline walk has got to. Advanced only while motion
//!   effects are serialised and rewound by [`MotionPathState::reset_state`]
//!   before every rebuild.
//!
//! The two moving locations must stay separate: the authoring API reads
//! `current`, while path markup is expressed relative to `effect`.

use crate::ooxml::error::{OoxmlError, Result};
use std::fmt::Write as FmtWrite;
use std::ops::{Add, Sub};

/// A location or displacement in points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    #[inline]
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// Slide canvas in points. Motion paths are written in units of the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both sides must be positive and finite for paths to normalise.
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.width) || !positive(self.height) {
            return Err(OoxmlError::Config(format!(
                "canvas size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Map a displacement in points into the unit square.
    #[inline]
    pub fn normalize(&self, p: Point) -> Point {
        Point::new(p.x / self.width, p.y / self.height)
    }
}

/// Per-shape motion bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionPathState {
    initial: Point,
    current: Point,
    effect: Point,
    speed: f64,
}

impl MotionPathState {
    /// Start tracking a shape at `initial` with a default speed in points per second.
    pub fn new(initial: Point, speed: f64) -> Self {
        Self {
            initial,
            current: initial,
            effect: initial,
            speed,
        }
    }

    /// Location after every queued motion.
    pub fn current(&self) -> Point {
        self.current
    }

    /// Location reached by the timeline walk so far.
    pub fn effect_location(&self) -> Point {
        self.effect
    }

    /// Default speed for motions queued without `/speed:`.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    /// Record a queued motion. Leaves the walk location alone.
    pub(crate) fn queue(&mut self, delta: Point) {
        self.current = self.current + delta;
    }

    /// Rewind the walk location before the timeline is rebuilt.
    pub fn reset_state(&mut self) {
        self.effect = self.initial;
    }

    /// Path markup for a straight segment starting at the walk location, then
    /// advance the walk location by `delta`.
    pub(crate) fn linear_path(&mut self, delta: Point, canvas: Canvas) -> String {
        let start = self.effect - self.initial;
        let end = start + delta;
        self.effect = self.effect + delta;

        let mut path = String::with_capacity(48);
        push_command(&mut path, 'M', &[canvas.normalize(start)]);
        push_command(&mut path, 'L', &[canvas.normalize(end)]);
        path.push('E');
        path
    }

    /// Path markup for a cubic segment. Control points are displacements from
    /// the segment start.
    pub(crate) fn bezier_path(&mut self, c1: Point, c2: Point, delta: Point, canvas: Canvas) -> String {
        let start = self.effect - self.initial;
        self.effect = self.effect + delta;

        let mut path = String::with_capacity(96);
        push_command(&mut path, 'M', &[canvas.normalize(start)]);
        push_command(
            &mut path,
            'C',
            &[
                canvas.normalize(start + c1),
                canvas.normalize(start + c2),
                canvas.normalize(start + delta),
            ],
        );
        path.push('E');
        path
    }
}

fn push_command(path: &mut String, command: char, points: &[Point]) {
    path.push(command);
    for p in points {
        path.push(' ');
        push_coord(path, p.x);
        path.push(' ');
        push_coord(path, p.y);
    }
    path.push(' ');
}

/// Fixed-point coordinate without trailing zeros.
fn push_coord(path: &mut String, v: f64) {
    let mut buf = String::with_capacity(12);
    let _ = write!(buf, "{v:.6}");
    let trimmed = buf.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => path.push('0'),
        s => path.push_str(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Canvas = Canvas {
        width: 720.0,
        height: 540.0,
    };

    #[test]
    fn test_queue_moves_current_only() {
        let mut state = MotionPathState::new(Point::new(10.0, 20.0), 100.0);
        state.queue(Point::new(10.0, 0.0));
        state.queue(Point::new(0.0, 5.0));
        assert_eq!(state.current(), Point::new(20.0, 25.0));
        assert_eq!(state.effect_location(), Point::new(10.0, 20.0));

        state.reset_state();
        assert_eq!(state.current(), Point::new(20.0, 25.0));
        assert_eq!(state.effect_location(), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_canvas_must_be_positive() {
        assert!(CANVAS.validate().is_ok());
        assert!(matches!(
            Canvas::new(720.0, -1.0).validate(),
            Err(OoxmlError::Config(_))
        ));
        assert!(Canvas::new(f64::INFINITY, 540.0).validate().is_err());
    }

    #[test]
    fn test_paths_are_relative_to_walk_location() {
        let mut state = MotionPathState::new(Point::new(100.0, 100.0), 100.0);
        assert_eq!(
            state.linear_path(Point::new(72.0, 0.0), CANVAS),
            "M 0 0 L 0.1 0 E"
        );
        assert_eq!(
            state.linear_path(Point::new(0.0, -54.0), CANVAS),
            "M 0.1 0 L 0.1 -0.1 E"
        );
        assert_eq!(state.effect_location(), Point::new(172.0, 46.0));

        state.reset_state();
        assert_eq!(state.effect_location(), Point::new(100.0, 100.0));
        assert_eq!(
            state.linear_path(Point::new(72.0, 0.0), CANVAS),
            "M 0 0 L 0.1 0 E"
        );
    }

    #[test]
    fn test_bezier_controls_offset_from_segment_start() {
        let mut state = MotionPathState::new(Point::ORIGIN, 100.0);
        state.linear_path(Point::new(72.0, 0.0), CANVAS);
        let path = state.bezier_path(
            Point::new(0.0, 54.0),
            Point::new(72.0, 54.0),
            Point::new(72.0, 0.0),
            CANVAS,
        );
        assert_eq!(path, "M 0.1 0 C 0.1 0.1 0.2 0.1 0.2 0 E");
    }

    #[test]
    fn test_coord_formatting() {
        let mut s = String::new();
        push_coord(&mut s, -0.0000001);
        s.push(',');
        push_coord(&mut s, 1.0 / 3.0);
        s.push(',');
        push_coord(&mut s, 2.0);
        assert_eq!(s, "0,0.333333,2");
    }
}
