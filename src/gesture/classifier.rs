//! Stroke → shape classification.
//!
//! The classifier normalizes a finished stroke and runs the shape detectors in
//! a fixed priority order, returning the first hit. All tuning values live in
//! [`ClassifierConfig`]; its `Default` uses the constants below.

use std::f64::consts::FRAC_PI_3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::detectors::{is_chevron_curvature, is_chevron_endpoints, is_circle, is_line};
use super::{NormalizedStroke, Stroke};

/// Strokes with fewer samples than this are never classified.
pub const MIN_STROKE_POINTS: usize = 8;
/// Path length over chord length must stay below this for a line.
pub const LINE_MAX_RATIO: f64 = 1.15;
/// Upper bound on the mean absolute deviation of centroid distances for a circle.
pub const CIRCLE_MAX_SPREAD: f64 = 0.12;
/// A sample counts as a sharp turn above this angle (radians).
pub const CHEVRON_TURN_ANGLE: f64 = FRAC_PI_3;
pub const CHEVRON_MIN_TURNS: usize = 1;
/// Exclusive; this many sharp turns or more is a zig-zag.
pub const CHEVRON_MAX_TURNS: usize = 5;
/// Minimum vertical travel in raw input units (endpoint strategy only).
pub const CHEVRON_MIN_SPAN: f64 = 20.0;
pub const CHEVRON_SAG_RATIO: f64 = 0.2;
pub const CHEVRON_WIDTH_RATIO: f64 = 0.3;

/// The gesture classes the game reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ShapeLabel {
    Circle,
    Line,
    Chevron,
}

impl ShapeLabel {
    pub const ALL: [ShapeLabel; 3] = [ShapeLabel::Circle, ShapeLabel::Line, ShapeLabel::Chevron];

    pub fn as_str(self) -> &'static str {
        match self {
            ShapeLabel::Circle => "circle",
            ShapeLabel::Line => "line",
            ShapeLabel::Chevron => "v",
        }
    }
}

impl std::fmt::Display for ShapeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the chevron detector decides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChevronStrategy {
    /// Count sharp turns along the normalized stroke.
    #[default]
    Curvature,
    /// Compare the middle sample against the endpoints in raw coordinates.
    EndpointMidpoint,
}

/// Order in which detectors are tried; the first hit wins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DetectorPriority {
    /// Chevron, then circle, then line. A sharp V can pass the straightness
    /// test and a shallow V can look round, so the corner check goes first.
    #[default]
    ChevronFirst,
    /// Circle, then line, then chevron.
    CircleFirst,
}

impl DetectorPriority {
    pub fn order(self) -> [ShapeLabel; 3] {
        match self {
            DetectorPriority::ChevronFirst => {
                [ShapeLabel::Chevron, ShapeLabel::Circle, ShapeLabel::Line]
            }
            DetectorPriority::CircleFirst => {
                [ShapeLabel::Circle, ShapeLabel::Line, ShapeLabel::Chevron]
            }
        }
    }
}

/// Thresholds and policy for [`StrokeClassifier`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClassifierConfig {
    pub min_points: usize,
    pub line_max_ratio: f64,
    pub circle_max_spread: f64,
    pub chevron_strategy: ChevronStrategy,
    pub chevron_turn_angle: f64,
    pub chevron_min_turns: usize,
    pub chevron_max_turns: usize,
    pub chevron_min_span: f64,
    pub chevron_sag_ratio: f64,
    pub chevron_width_ratio: f64,
    pub priority: DetectorPriority,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_points: MIN_STROKE_POINTS,
            line_max_ratio: LINE_MAX_RATIO,
            circle_max_spread: CIRCLE_MAX_SPREAD,
            chevron_strategy: ChevronStrategy::default(),
            chevron_turn_angle: CHEVRON_TURN_ANGLE,
            chevron_min_turns: CHEVRON_MIN_TURNS,
            chevron_max_turns: CHEVRON_MAX_TURNS,
            chevron_min_span: CHEVRON_MIN_SPAN,
            chevron_sag_ratio: CHEVRON_SAG_RATIO,
            chevron_width_ratio: CHEVRON_WIDTH_RATIO,
            priority: DetectorPriority::default(),
        }
    }
}

/// Stateless stroke classifier; holds only its configuration.
#[derive(Clone, Debug, Default)]
pub struct StrokeClassifier {
    config: ClassifierConfig,
}

impl StrokeClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Returns the first shape (in priority order) the stroke matches, or
    /// `None` for short, degenerate or unrecognized input.
    pub fn classify(&self, stroke: &Stroke) -> Option<ShapeLabel> {
        if stroke.len() < self.config.min_points {
            log::trace!("stroke too short to classify ({} samples)", stroke.len());
            return None;
        }
        let normalized = NormalizedStroke::new(stroke);
        if normalized.is_degenerate() {
            return None;
        }
        let hit = self
            .config
            .priority
            .order()
            .into_iter()
            .find(|&label| self.matches(label, stroke, &normalized));
        log::debug!("classified {} samples as {:?}", stroke.len(), hit);
        hit
    }

    fn matches(&self, label: ShapeLabel, raw: &Stroke, normalized: &NormalizedStroke) -> bool {
        let cfg = &self.config;
        match label {
            ShapeLabel::Chevron => match cfg.chevron_strategy {
                ChevronStrategy::Curvature => is_chevron_curvature(normalized.points(), cfg),
                ChevronStrategy::EndpointMidpoint => is_chevron_endpoints(raw.points(), cfg),
            },
            ShapeLabel::Circle => is_circle(normalized.points(), cfg),
            ShapeLabel::Line => is_line(normalized.points(), cfg),
        }
    }
}
