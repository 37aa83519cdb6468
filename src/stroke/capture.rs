//! Stroke lifecycle: start, accumulate, pause, close or discard
//!
//! Raw pointer samples pass through the jitter filter, then the moving
//! average. A smoothed sample always becomes the live point; it is committed
//! to the polyline only once it is far enough from the last committed point.

use serde::{Deserialize, Serialize};

use super::model::{Color, Stroke};
use super::smoothing::{JitterFilter, MovingAverage};
use crate::config::CaptureConfig;
use crate::spatial::Point2D;

/// Capture state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureState {
    Idle,
    Drawing,
    Paused,
}

/// Owns the single in-progress stroke
pub struct StrokeCapture {
    config: CaptureConfig,
    state: CaptureState,
    stroke: Option<Stroke>,
    jitter: JitterFilter,
    smoother: MovingAverage,
    live: Option<Point2D>,
}

impl StrokeCapture {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            jitter: JitterFilter::new(config.jitter_floor),
            smoother: MovingAverage::new(config.smoothing_window),
            config,
            state: CaptureState::Idle,
            stroke: None,
            live: None,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Whether a stroke is drawing or paused
    pub fn is_active(&self) -> bool {
        self.stroke.is_some()
    }

    /// The most recent smoothed point, committed or not
    pub fn live_point(&self) -> Option<Point2D> {
        self.live
    }

    /// Read-only view of the in-progress stroke for preview rendering
    pub fn current(&self) -> Option<&Stroke> {
        self.stroke.as_ref()
    }

    /// Begin a new stroke at `point`, dropping any stroke still in progress
    pub fn start(&mut self, point: Point2D, color: Color) {
        if self.stroke.is_some() {
            tracing::debug!("stroke restarted, previous stroke dropped");
        }
        self.reset_filters();

        let smoothed = self.smoother.push(self.jitter.filter(point));
        let mut stroke = Stroke::new(color, self.config.width);
        stroke.points.push(smoothed);

        self.stroke = Some(stroke);
        self.live = Some(smoothed);
        self.state = CaptureState::Drawing;
        tracing::debug!(x = point.x, y = point.y, "stroke started");
    }

    /// Feed one raw pointer sample. Resumes a paused stroke.
    ///
    /// Returns true when the sample committed a new polyline point.
    pub fn add_point(&mut self, raw: Point2D) -> bool {
        match self.state {
            CaptureState::Idle => return false,
            CaptureState::Paused => {
                // The hand may have travelled while paused; stale samples
                // must not drag the resumed line
                self.reset_filters();
                self.state = CaptureState::Drawing;
                tracing::debug!("stroke resumed");
            }
            CaptureState::Drawing => {}
        }

        let smoothed = self.smoother.push(self.jitter.filter(raw));
        self.live = Some(smoothed);

        let Some(stroke) = self.stroke.as_mut() else {
            return false;
        };
        let far_enough = stroke
            .last_point()
            .map_or(true, |last| last.distance(&smoothed) >= self.config.min_spacing);
        if far_enough {
            stroke.points.push(smoothed);
        }
        far_enough
    }

    /// Freeze accumulation without losing points
    pub fn pause(&mut self) {
        if self.state == CaptureState::Drawing {
            self.state = CaptureState::Paused;
            self.live = None;
            tracing::debug!("stroke paused");
        }
    }

    /// Finish the stroke. `None` when nothing was in progress or the shape
    /// is too small, in which case the stroke is discarded.
    pub fn close(&mut self) -> Option<Stroke> {
        let mut stroke = self.stroke.take()?;
        self.clear();

        let arc_length = stroke.arc_length();
        if stroke.len() < self.config.min_points || arc_length < self.config.min_arc_length {
            tracing::debug!(
                points = stroke.len(),
                arc_length,
                "stroke rejected as too small"
            );
            return None;
        }

        stroke.closed = true;
        tracing::debug!(points = stroke.len(), arc_length, "stroke closed");
        Some(stroke)
    }

    /// Drop the in-progress stroke, if any
    pub fn discard(&mut self) {
        if self.stroke.take().is_some() {
            tracing::debug!("stroke discarded");
        }
        self.clear();
    }

    fn clear(&mut self) {
        self.reset_filters();
        self.live = None;
        self.state = CaptureState::Idle;
    }

    fn reset_filters(&mut self) {
        self.jitter.reset();
        self.smoother.clear();
    }
}

impl Default for StrokeCapture {
    fn default() -> Self {
        Self::new(CaptureConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::circle_points;

    fn capture_with(config: CaptureConfig) -> StrokeCapture {
        StrokeCapture::new(config)
    }

    /// Capture with filtering disabled so committed points equal the input
    fn passthrough() -> StrokeCapture {
        capture_with(CaptureConfig {
            jitter_floor: 0.0,
            smoothing_window: 1,
            min_spacing: 0.0,
            ..CaptureConfig::default()
        })
    }

    fn feed(capture: &mut StrokeCapture, points: &[Point2D]) {
        capture.start(points[0], Color::WHITE);
        for p in &points[1..] {
            capture.add_point(*p);
        }
    }

    #[test]
    fn test_small_square_rejected() {
        let mut capture = passthrough();
        let square = [
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(0.0, 10.0),
        ];
        feed(&mut capture, &square);

        assert!(capture.close().is_none());
        assert_eq!(capture.state(), CaptureState::Idle);
        assert!(!capture.is_active());
    }

    #[test]
    fn test_circle_accepted() {
        let mut capture = passthrough();
        feed(&mut capture, &circle_points(Point2D::new(300.0, 300.0), 100.0, 12));

        let stroke = capture.close().expect("circle should close");
        assert!(stroke.closed);
        assert_eq!(stroke.len(), 12);
        assert!(stroke.arc_length() > 500.0);
        assert_eq!(capture.state(), CaptureState::Idle);
        assert!(capture.current().is_none());
    }

    #[test]
    fn test_too_few_points_rejected() {
        let mut capture = passthrough();
        feed(&mut capture, &[Point2D::new(0.0, 0.0), Point2D::new(200.0, 0.0)]);
        assert!(capture.close().is_none());
    }

    #[test]
    fn test_spacing_gate_never_violated() {
        let config = CaptureConfig::default();
        let min_spacing = config.min_spacing;
        let mut capture = capture_with(config);

        // Noisy spiral with frequent tiny steps
        capture.start(Point2D::new(200.0, 200.0), Color::WHITE);
        for i in 1..400 {
            let t = i as f32 * 0.05;
            let wobble = if i % 2 == 0 { 0.7 } else { -0.7 };
            let p = Point2D::new(
                200.0 + t * 8.0 * t.cos() + wobble,
                200.0 + t * 8.0 * t.sin() - wobble,
            );
            capture.add_point(p);
        }

        let stroke = capture.close().expect("spiral is long enough");
        for pair in stroke.points.windows(2) {
            assert!(pair[0].distance(&pair[1]) >= min_spacing);
        }
    }

    #[test]
    fn test_live_point_tracks_uncommitted_motion() {
        let mut capture = capture_with(CaptureConfig {
            jitter_floor: 0.0,
            smoothing_window: 1,
            min_spacing: 10.0,
            ..CaptureConfig::default()
        });
        capture.start(Point2D::new(0.0, 0.0), Color::WHITE);

        let committed = capture.add_point(Point2D::new(3.0, 0.0));
        assert!(!committed);
        assert_eq!(capture.live_point(), Some(Point2D::new(3.0, 0.0)));
        assert_eq!(capture.current().unwrap().len(), 1);

        assert!(capture.add_point(Point2D::new(12.0, 0.0)));
        assert_eq!(capture.current().unwrap().len(), 2);
    }

    #[test]
    fn test_pause_preserves_points_and_resumes() {
        let mut capture = passthrough();
        feed(&mut capture, &[Point2D::new(0.0, 0.0), Point2D::new(30.0, 0.0)]);
        capture.pause();

        assert_eq!(capture.state(), CaptureState::Paused);
        assert_eq!(capture.current().unwrap().len(), 2);
        assert!(capture.live_point().is_none());

        capture.add_point(Point2D::new(30.0, 30.0));
        assert_eq!(capture.state(), CaptureState::Drawing);
        assert_eq!(capture.current().unwrap().len(), 3);

        capture.add_point(Point2D::new(0.0, 30.0));
        assert!(capture.close().is_some());
    }

    #[test]
    fn test_discard_is_safe_in_every_state() {
        let mut capture = passthrough();
        capture.discard();
        assert_eq!(capture.state(), CaptureState::Idle);

        capture.start(Point2D::new(1.0, 1.0), Color::WHITE);
        capture.discard();
        assert!(capture.current().is_none());

        capture.start(Point2D::new(1.0, 1.0), Color::WHITE);
        capture.pause();
        capture.discard();
        assert_eq!(capture.state(), CaptureState::Idle);
        assert!(capture.close().is_none());
    }

    #[test]
    fn test_add_point_when_idle_is_ignored() {
        let mut capture = passthrough();
        assert!(!capture.add_point(Point2D::new(5.0, 5.0)));
        assert!(capture.current().is_none());
    }

    #[test]
    fn test_tremor_is_absorbed() {
        let mut capture = StrokeCapture::default();
        capture.start(Point2D::new(100.0, 100.0), Color::WHITE);
        for i in 0..30 {
            let d = if i % 2 == 0 { 1.0 } else { -1.0 };
            capture.add_point(Point2D::new(100.0 + d, 100.0 - d));
        }
        assert_eq!(capture.current().unwrap().len(), 1);
        assert_eq!(capture.live_point(), Some(Point2D::new(100.0, 100.0)));
    }
}
