//! Pointer strokes and the shape classifier that reads them.
//!
//! A gesture starts on pointer-down, grows on pointer-move and is finalized on
//! pointer-up / pointer-cancel. [`StrokeCapture`] owns that lifecycle and
//! decimates noisy input; [`StrokeClassifier`] turns the finished [`Stroke`]
//! into a [`ShapeLabel`] (or nothing).
//!
//! Everything here is plain Rust with no browser types so it runs under
//! `cargo test` on the host.

mod classifier;
mod detectors;

pub use classifier::{
    ChevronStrategy, ClassifierConfig, DetectorPriority, ShapeLabel, StrokeClassifier,
    CIRCLE_MAX_SPREAD, CHEVRON_MAX_TURNS, CHEVRON_MIN_SPAN, CHEVRON_MIN_TURNS,
    CHEVRON_SAG_RATIO, CHEVRON_TURN_ANGLE, CHEVRON_WIDTH_RATIO, LINE_MAX_RATIO,
    MIN_STROKE_POINTS,
};
pub use detectors::{
    circle_spread, is_chevron_curvature, is_chevron_endpoints, is_circle, is_line, path_ratio,
    turn_count,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// New samples closer than this (in input pixels) to the last kept sample are dropped.
pub const MIN_POINT_SPACING: f64 = 4.0;

// --- Points -----------------------------------------------------------------

/// A pointer sample in canvas-local pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Vector from `origin` to `self`.
    pub(crate) fn minus(self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }

    pub(crate) fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub(crate) fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

// --- Strokes ----------------------------------------------------------------

/// Ordered samples of one pointer-down-to-up gesture (index order = time order).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Axis-aligned bounds as `(min, max)`; `None` for an empty stroke.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let first = self.first()?;
        let (mut min, mut max) = (first, first);
        for p in &self.points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some((min, max))
    }

    fn push(&mut self, p: Point) {
        self.points.push(p);
    }
}

impl From<Vec<Point>> for Stroke {
    fn from(points: Vec<Point>) -> Self {
        Self { points }
    }
}

impl FromIterator<Point> for Stroke {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Collects pointer samples for the gesture currently being drawn.
#[derive(Debug, Default)]
pub struct StrokeCapture {
    stroke: Stroke,
    drawing: bool,
}

impl StrokeCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh gesture, dropping whatever was collected before.
    pub fn begin(&mut self) {
        self.stroke = Stroke::new();
        self.drawing = true;
    }

    /// Appends `p` unless it lies within [`MIN_POINT_SPACING`] of the last kept
    /// sample. Ignored while no gesture is active. Returns whether it was kept.
    pub fn add_point(&mut self, p: Point) -> bool {
        if !self.drawing {
            return false;
        }
        if let Some(last) = self.stroke.last() {
            if last.distance(p) <= MIN_POINT_SPACING {
                return false;
            }
        }
        self.stroke.push(p);
        true
    }

    /// Ends the gesture and hands over its samples. Finishing while idle
    /// yields an empty stroke.
    pub fn finish(&mut self) -> Stroke {
        self.drawing = false;
        std::mem::take(&mut self.stroke)
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Samples of the in-progress gesture (used to draw the live trail).
    pub fn points(&self) -> &[Point] {
        self.stroke.points()
    }
}

// --- Normalization ----------------------------------------------------------

/// Position- and size-independent copy of a [`Stroke`]: the bounding box is
/// moved to the origin and its larger side scaled to 1.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedStroke {
    points: Vec<Point>,
    degenerate: bool,
}

impl NormalizedStroke {
    pub fn new(stroke: &Stroke) -> Self {
        let Some((min, max)) = stroke.bounds() else {
            return Self {
                points: Vec::new(),
                degenerate: true,
            };
        };
        let extent = (max.x - min.x).max(max.y - min.y);
        let degenerate = extent <= 0.0;
        let scale = if degenerate { 1.0 } else { extent };
        let points = stroke
            .points()
            .iter()
            .map(|p| Point::new((p.x - min.x) / scale, (p.y - min.y) / scale))
            .collect();
        Self { points, degenerate }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// True when every source sample sat on the same spot (zero extent).
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_drops_samples_within_spacing() {
        let mut cap = StrokeCapture::new();
        cap.begin();
        assert!(cap.add_point(Point::new(0.0, 0.0)));
        assert!(!cap.add_point(Point::new(3.0, 0.0)));
        // exactly on the threshold is still too close
        assert!(!cap.add_point(Point::new(4.0, 0.0)));
        assert!(cap.add_point(Point::new(4.5, 0.0)));
        // spacing is measured from the last *kept* point
        assert!(!cap.add_point(Point::new(8.0, 0.0)));
        assert!(cap.add_point(Point::new(9.0, 0.0)));
        assert_eq!(cap.points().len(), 3);
    }

    #[test]
    fn capture_ignores_points_when_idle() {
        let mut cap = StrokeCapture::new();
        assert!(!cap.add_point(Point::new(10.0, 10.0)));
        assert!(cap.finish().is_empty());
    }

    #[test]
    fn finish_resets_capture() {
        let mut cap = StrokeCapture::new();
        cap.begin();
        for i in 0..5 {
            cap.add_point(Point::new(i as f64 * 10.0, 0.0));
        }
        let stroke = cap.finish();
        assert_eq!(stroke.len(), 5);
        assert!(!cap.is_drawing());
        assert!(cap.points().is_empty());
        cap.begin();
        assert!(cap.is_drawing());
        assert!(cap.points().is_empty());
    }

    #[test]
    fn normalize_fits_unit_box() {
        let stroke: Stroke = [(10.0, 20.0), (110.0, 20.0), (60.0, 70.0)]
            .into_iter()
            .map(Point::from)
            .collect();
        let n = NormalizedStroke::new(&stroke);
        assert!(!n.is_degenerate());
        assert_eq!(n.points()[0], Point::new(0.0, 0.0));
        assert_eq!(n.points()[1], Point::new(1.0, 0.0));
        assert_eq!(n.points()[2], Point::new(0.5, 0.5));
        for p in n.points() {
            assert!((0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y));
        }
    }

    #[test]
    fn normalize_single_spot_is_degenerate() {
        let stroke = Stroke::from(vec![Point::new(5.0, 5.0); 9]);
        let n = NormalizedStroke::new(&stroke);
        assert!(n.is_degenerate());
        assert!(n.points().iter().all(|p| *p == Point::new(0.0, 0.0)));
        assert!(NormalizedStroke::new(&Stroke::new()).is_degenerate());
    }
}
