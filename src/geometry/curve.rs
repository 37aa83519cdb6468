//! Closed-curve fitting from freehand strokes
//!
//! A stroke is cleaned, capped in size, moved into a normalized Y-up frame,
//! interpolated with a closed Catmull-Rom spline and resampled at equal arc
//! length. Fewer than three usable points produce a circle instead.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::config::CurveConfig;
use crate::spatial::{Point2D, Vector2D};
use crate::stroke::Stroke;

/// Dense samples per spline span used to build the arc-length table
const SAMPLES_PER_SPAN: usize = 12;

/// Distances below this are treated as coincident points
const EPSILON: f32 = 1e-5;

/// A closed, uniformly sampled planar curve in a normalized local frame.
///
/// The closing edge from the last point back to the first is implicit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanarCurve {
    pub points: Vec<Point2D>,
    /// Stroke centroid in display coordinates
    pub origin: Point2D,
    /// Display units per local unit
    pub scale: f32,
    /// True when the canonical circle replaced a degenerate stroke
    pub fallback: bool,
}

impl PlanarCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Perimeter including the closing edge
    pub fn perimeter(&self) -> f32 {
        let n = self.points.len();
        (0..n)
            .map(|i| self.points[i].distance(&self.points[(i + 1) % n]))
            .sum()
    }

    /// Shoelace area, positive for counter-clockwise winding
    pub fn signed_area(&self) -> f32 {
        signed_area(&self.points)
    }
}

/// Converts closed strokes into resampled planar curves
#[derive(Debug, Clone)]
pub struct CurveFitter {
    config: CurveConfig,
}

impl CurveFitter {
    pub fn new(config: CurveConfig) -> Self {
        Self { config }
    }

    /// Fit a stroke. Pure and deterministic; never fails.
    pub fn fit(&self, stroke: &Stroke) -> PlanarCurve {
        let origin = stroke.centroid().unwrap_or(Point2D::ORIGIN);
        let points = dedup_closed(&stroke.points);
        if points.len() < 3 {
            return self.fallback(origin);
        }

        let points = subsample(&points, self.config.max_points);
        let Some(centroid) = Point2D::centroid(&points) else {
            return self.fallback(origin);
        };
        let max_radius = points
            .iter()
            .map(|p| p.distance(&centroid))
            .fold(0.0_f32, f32::max);
        if max_radius < EPSILON {
            return self.fallback(origin);
        }

        let factor = self.config.working_unit / max_radius;
        // Display Y grows downward; the local frame is Y-up
        let normalized: Vec<Point2D> = points
            .iter()
            .map(|p| Point2D::new((p.x - centroid.x) * factor, (centroid.y - p.y) * factor))
            .collect();

        let dense = sample_closed_spline(&normalized, self.config.tension, SAMPLES_PER_SPAN);
        let Some(resampled) = resample_closed(&dense, self.config.resample_count) else {
            return self.fallback(origin);
        };

        PlanarCurve {
            points: resampled,
            origin: centroid,
            scale: 1.0 / factor,
            fallback: false,
        }
    }

    /// Canonical circle of radius `working_unit`
    fn fallback(&self, origin: Point2D) -> PlanarCurve {
        tracing::debug!("degenerate stroke, substituting circle");
        let count = self.config.resample_count.max(3);
        let radius = self.config.working_unit;
        let points = (0..count)
            .map(|i| {
                let angle = i as f32 / count as f32 * TAU;
                Point2D::new(radius * angle.cos(), radius * angle.sin())
            })
            .collect();
        PlanarCurve {
            points,
            origin,
            scale: 1.0,
            fallback: true,
        }
    }
}

impl Default for CurveFitter {
    fn default() -> Self {
        Self::new(CurveConfig::default())
    }
}

pub(crate) fn signed_area(points: &[Point2D]) -> f32 {
    let n = points.len();
    let twice: f32 = (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice / 2.0
}

/// Drop consecutive duplicates and a final point that repeats the first
fn dedup_closed(points: &[Point2D]) -> Vec<Point2D> {
    let mut out: Vec<Point2D> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().map_or(true, |last| last.distance(p) > EPSILON) {
            out.push(*p);
        }
    }
    while out.len() > 1 && out[0].distance(&out[out.len() - 1]) <= EPSILON {
        out.pop();
    }
    out
}

/// Uniform-stride subsample down to `cap` points
fn subsample(points: &[Point2D], cap: usize) -> Vec<Point2D> {
    let n = points.len();
    if n <= cap {
        return points.to_vec();
    }
    (0..cap).map(|i| points[i * n / cap]).collect()
}

/// Closed Catmull-Rom spline through `points`, sampled `per_span` times per
/// span. The result does not repeat its first point.
fn sample_closed_spline(points: &[Point2D], tension: f32, per_span: usize) -> Vec<Point2D> {
    let n = points.len();
    let mut out = Vec::with_capacity(n * per_span);

    for i in 0..n {
        let p0 = points[(i + n - 1) % n];
        let p1 = points[i];
        let p2 = points[(i + 1) % n];
        let p3 = points[(i + 2) % n];

        let m1 = (p2 - p0) * tension;
        let m2 = (p3 - p1) * tension;

        for s in 0..per_span {
            let t = s as f32 / per_span as f32;
            out.push(hermite(p1, p2, m1, m2, t));
        }
    }

    out
}

fn hermite(p1: Point2D, p2: Point2D, m1: Vector2D, m2: Vector2D, t: f32) -> Point2D {
    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    let v = p1.to_vector() * h00 + m1 * h10 + p2.to_vector() * h01 + m2 * h11;
    v.to_point()
}

/// Resample a closed polyline at `count` points of equal arc length apart.
/// `None` when the polyline has no length.
fn resample_closed(points: &[Point2D], count: usize) -> Option<Vec<Point2D>> {
    let n = points.len();
    if n < 2 || count == 0 {
        return None;
    }

    // cumulative[i] = length from points[0] to points[i]; the final entry
    // closes the loop back to points[0]
    let mut cumulative = Vec::with_capacity(n + 1);
    cumulative.push(0.0_f32);
    for i in 0..n {
        let step = points[i].distance(&points[(i + 1) % n]);
        cumulative.push(cumulative[i] + step);
    }
    let total = cumulative[n];
    if total < EPSILON {
        return None;
    }

    let mut out = Vec::with_capacity(count);
    let mut segment = 0;
    for k in 0..count {
        let target = total * k as f32 / count as f32;
        while segment + 1 < n && cumulative[segment + 1] < target {
            segment += 1;
        }
        let start = cumulative[segment];
        let span = cumulative[segment + 1] - start;
        let t = if span > 0.0 { (target - start) / span } else { 0.0 };
        out.push(points[segment].lerp(&points[(segment + 1) % n], t));
    }

    Some(out)
}
