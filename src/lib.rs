//! air-sketch: draw in the air, get puffy 3D shapes
//!
//! This crate turns a stream of hand-pose landmark frames into:
//! - a typed gesture signal (draw, pinch, palm, fist, poke, swipe)
//! - jitter-filtered, smoothed freehand strokes
//! - closed planar curves and beveled, inflated 3D solids
//! - a shared scene where solids bob, spin and keep out of each other's way
//!
//! Pose estimation, rendering, tweening and peer transport belong to the
//! host. The crate consumes landmark frames and produces geometry,
//! transforms, target values and serializable peer records.
//!
//! ```no_run
//! use air_sketch::{OrthoBridge, SketchConfig, SketchSession};
//!
//! let mut session = SketchSession::new(SketchConfig::default());
//! let bridge = OrthoBridge::default();
//! let report = session.on_frame(None, 1.0 / 30.0, &bridge);
//! session.tick(1.0 / 60.0);
//! assert!(report.created.is_none());
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod session;
pub mod spatial;
pub mod stroke;
pub mod wire;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used types
pub use config::SketchConfig;
pub use error::{Result, SketchError};
pub use geometry::{BevelParams, CurveFitter, InflatedSolid, MeshInflator, PlanarCurve};
pub use input::{GestureClassifier, GestureKind, GestureState, HandFrame};
pub use layout::{
    ObjectId, OrthoBridge, SceneBridge, SpatialLayoutEngine, TargetUpdate, TweenPlayer,
    WorldObject,
};
pub use session::{FrameReport, Received, SketchSession, StrokeOutcome};
pub use spatial::{Point2D, Point3D, Vector2D, Vector3D};
pub use stroke::{CaptureState, Color, Stroke, StrokeCapture};
pub use wire::PeerMessage;
