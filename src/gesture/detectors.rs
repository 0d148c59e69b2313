//! Per-shape heuristics. Each detector answers yes/no for one [`ShapeLabel`]
//! and never panics on degenerate input.
//!
//! Detectors other than [`is_chevron_endpoints`] expect normalized points
//! (see [`NormalizedStroke`]) so their thresholds are scale-free.
//!
//! [`ShapeLabel`]: super::ShapeLabel
//! [`NormalizedStroke`]: super::NormalizedStroke

use super::Point;
use super::classifier::ClassifierConfig;

/// Number of samples where the stroke turns by more than `turn_angle` radians,
/// comparing the segment arriving from two samples back with the one leaving
/// to two samples ahead. Samples with a zero-length segment are skipped.
pub fn turn_count(points: &[Point], turn_angle: f64) -> usize {
    if points.len() < 5 {
        return 0;
    }
    (2..points.len() - 2)
        .filter(|&i| {
            let v1 = points[i].minus(points[i - 2]);
            let v2 = points[i + 2].minus(points[i]);
            let mag = v1.length() * v2.length();
            if mag <= 0.0 {
                return false;
            }
            // rounding can push the cosine a hair outside acos' domain
            let cos = (v1.dot(v2) / mag).clamp(-1.0, 1.0);
            cos.acos() > turn_angle
        })
        .count()
}

/// Single dominant corner: a handful of sharp turns, but not zero and not a zig-zag.
pub fn is_chevron_curvature(points: &[Point], cfg: &ClassifierConfig) -> bool {
    let turns = turn_count(points, cfg.chevron_turn_angle);
    (cfg.chevron_min_turns..cfg.chevron_max_turns).contains(&turns)
}

/// Works on raw (unnormalized) samples: the middle sample must sit clearly
/// above or below both ends, and the ends must be well apart so closed loops
/// do not qualify.
pub fn is_chevron_endpoints(raw: &[Point], cfg: &ClassifierConfig) -> bool {
    let (Some(&start), Some(&end)) = (raw.first(), raw.last()) else {
        return false;
    };
    let mid = raw[raw.len() / 2];
    let (min_y, max_y) = raw
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });
    let span = max_y - min_y;
    if span < cfg.chevron_min_span {
        return false;
    }
    let sag = span * cfg.chevron_sag_ratio;
    let dips = mid.y - start.y >= sag && mid.y - end.y >= sag; // "V" in screen space
    let peaks = start.y - mid.y >= sag && end.y - mid.y >= sag; // "Λ"
    (dips || peaks) && start.distance(end) > span * cfg.chevron_width_ratio
}

/// Ratio of walked path length to the straight chord between the ends.
/// `None` when the ends coincide (closed loop or single spot).
pub fn path_ratio(points: &[Point]) -> Option<f64> {
    let (first, last) = (points.first()?, points.last()?);
    let chord = first.distance(*last);
    if chord <= 0.0 {
        return None;
    }
    let path: f64 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
    Some(path / chord)
}

pub fn is_line(points: &[Point], cfg: &ClassifierConfig) -> bool {
    path_ratio(points).is_some_and(|r| r < cfg.line_max_ratio)
}

/// Mean absolute deviation of the samples' distances to their centroid.
/// `None` for an empty input or when every sample sits on the centroid.
pub fn circle_spread(points: &[Point]) -> Option<f64> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    let center = Point::new(sx / n, sy / n);
    let dists: Vec<f64> = points.iter().map(|p| p.distance(center)).collect();
    let avg = dists.iter().sum::<f64>() / n;
    if avg <= 0.0 {
        return None;
    }
    Some(dists.iter().map(|d| (d - avg).abs()).sum::<f64>() / n)
}

pub fn is_circle(points: &[Point], cfg: &ClassifierConfig) -> bool {
    circle_spread(points).is_some_and(|s| s < cfg.circle_max_spread)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    fn ring(n: usize, r: f64) -> Vec<Point> {
        (0..n)
            .map(|i| {
                let a = TAU * i as f64 / n as f64;
                Point::new(0.5 + r * a.cos(), 0.5 + r * a.sin())
            })
            .collect()
    }

    fn polyline(corners: &[(f64, f64)], per_segment: usize) -> Vec<Point> {
        let mut out = Vec::new();
        for w in corners.windows(2) {
            let (a, b) = (w[0], w[1]);
            for k in 0..per_segment {
                let t = k as f64 / per_segment as f64;
                out.push(Point::new(a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t));
            }
        }
        if let Some(&(x, y)) = corners.last() {
            out.push(Point::new(x, y));
        }
        out
    }

    #[test]
    fn straight_run_has_no_turns() {
        let pts = polyline(&[(0.0, 0.0), (1.0, 0.0)], 10);
        assert_eq!(turn_count(&pts, PI / 3.0), 0);
    }

    #[test]
    fn single_corner_counts_a_few_turns() {
        let pts = polyline(&[(0.0, 1.0), (0.5, 0.0), (1.0, 1.0)], 10);
        let turns = turn_count(&pts, PI / 3.0);
        assert!((1..5).contains(&turns), "turns = {turns}");
    }

    #[test]
    fn zig_zag_has_too_many_turns() {
        let pts = polyline(
            &[(0.0, 0.0), (0.2, 1.0), (0.4, 0.0), (0.6, 1.0), (0.8, 0.0), (1.0, 1.0)],
            3,
        );
        assert!(!is_chevron_curvature(&pts, &ClassifierConfig::default()));
    }

    #[test]
    fn zero_length_segments_are_skipped() {
        let pts = vec![Point::new(0.3, 0.3); 12];
        assert_eq!(turn_count(&pts, PI / 3.0), 0);
        assert_eq!(turn_count(&pts[..3], PI / 3.0), 0);
    }

    #[test]
    fn endpoints_detector_accepts_v_and_inverted_v() {
        let cfg = ClassifierConfig::default();
        let v = polyline(&[(0.0, 0.0), (50.0, 100.0), (100.0, 0.0)], 6);
        let inverted = polyline(&[(0.0, 100.0), (50.0, 0.0), (100.0, 100.0)], 6);
        assert!(is_chevron_endpoints(&v, &cfg));
        assert!(is_chevron_endpoints(&inverted, &cfg));
    }

    #[test]
    fn endpoints_detector_rejects_flat_and_closed_strokes() {
        let cfg = ClassifierConfig::default();
        // too little vertical travel in raw units
        let flat = polyline(&[(0.0, 0.0), (50.0, 10.0), (100.0, 0.0)], 6);
        assert!(!is_chevron_endpoints(&flat, &cfg));
        // ends meet again: looks like a loop, not a V
        let loop_like = polyline(&[(0.0, 0.0), (10.0, 100.0), (0.0, 0.0)], 6);
        assert!(!is_chevron_endpoints(&loop_like, &cfg));
        assert!(!is_chevron_endpoints(&[], &cfg));
    }

    #[test]
    fn closed_loop_is_not_a_line() {
        let mut pts = ring(16, 0.5);
        pts.push(pts[0]);
        assert_eq!(path_ratio(&pts), None);
        assert!(!is_line(&pts, &ClassifierConfig::default()));
    }

    #[test]
    fn ring_spread_is_near_zero() {
        let spread = circle_spread(&ring(32, 0.5)).unwrap_or(f64::MAX);
        assert!(spread < 1e-9, "spread = {spread}");
        assert!(is_circle(&ring(32, 0.5), &ClassifierConfig::default()));
    }

    #[test]
    fn circle_rejects_single_spot() {
        let pts = vec![Point::new(0.0, 0.0); 10];
        assert_eq!(circle_spread(&pts), None);
        assert!(!is_circle(&pts, &ClassifierConfig::default()));
        assert!(!is_circle(&[], &ClassifierConfig::default()));
    }
}
