//! Freehand stroke capture
//!
//! Provides:
//! - `Stroke` and `Color`, the record shared with CurveFitter and peers
//! - Jitter rejection and moving-average smoothing
//! - `StrokeCapture`, the Idle / Drawing / Paused state machine

mod capture;
mod model;
mod smoothing;

pub use capture::{CaptureState, StrokeCapture};
pub use model::{Color, Stroke};
pub use smoothing::{JitterFilter, MovingAverage};
