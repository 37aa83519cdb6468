//! Hand landmark frames as delivered by the pose-estimation collaborator

use serde::{Deserialize, Serialize};

use crate::spatial::{Point2D, Point3D};

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// The four non-thumb fingers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// Landmark index of the fingertip
    pub fn tip(&self) -> usize {
        match self {
            Finger::Index => INDEX_TIP,
            Finger::Middle => MIDDLE_TIP,
            Finger::Ring => RING_TIP,
            Finger::Pinky => PINKY_TIP,
        }
    }

    /// Landmark index of the middle (PIP) joint
    pub fn pip(&self) -> usize {
        match self {
            Finger::Index => INDEX_PIP,
            Finger::Middle => MIDDLE_PIP,
            Finger::Ring => RING_PIP,
            Finger::Pinky => PINKY_PIP,
        }
    }
}

/// One sampled snapshot of all tracked hand joints.
///
/// `points` are in image space (Y grows downward). `world` carries the
/// matching 3D landmarks when the estimator provides them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandFrame {
    pub points: [Point2D; LANDMARK_COUNT],
    #[serde(default)]
    pub world: Option<[Point3D; LANDMARK_COUNT]>,
    /// Detection score in 0-1
    #[serde(default)]
    pub score: Option<f32>,
}

impl HandFrame {
    /// Create a 2D-only frame
    pub fn new(points: [Point2D; LANDMARK_COUNT]) -> Self {
        Self {
            points,
            world: None,
            score: None,
        }
    }

    /// Build a frame from a slice, `None` unless it holds exactly 21 points
    pub fn from_slice(points: &[Point2D]) -> Option<Self> {
        let points: [Point2D; LANDMARK_COUNT] = points.try_into().ok()?;
        Some(Self::new(points))
    }

    /// Attach 3D landmarks
    pub fn with_world(mut self, world: [Point3D; LANDMARK_COUNT]) -> Self {
        self.world = Some(world);
        self
    }

    /// Attach a detection score
    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }

    pub fn point(&self, index: usize) -> Point2D {
        self.points[index]
    }

    /// Mean of wrist, index base and pinky base
    pub fn palm_center(&self) -> Point2D {
        let sum = self.points[WRIST].to_vector()
            + self.points[INDEX_MCP].to_vector()
            + self.points[PINKY_MCP].to_vector();
        (sum / 3.0).to_point()
    }

    /// A finger is extended when its tip sits above its middle joint.
    ///
    /// Strict `<`: a tip exactly level with the joint counts as curled.
    pub fn is_extended(&self, finger: Finger) -> bool {
        self.points[finger.tip()].y < self.points[finger.pip()].y
    }

    /// Distance between thumb tip and index tip
    pub fn pinch_distance(&self) -> f32 {
        self.points[THUMB_TIP].distance(&self.points[INDEX_TIP])
    }

    /// Midpoint of thumb tip and index tip
    pub fn pinch_point(&self) -> Point2D {
        self.points[THUMB_TIP].midpoint(&self.points[INDEX_TIP])
    }

    /// Index fingertip, the drawing pointer
    pub fn pointer(&self) -> Point2D {
        self.points[INDEX_TIP]
    }
}
