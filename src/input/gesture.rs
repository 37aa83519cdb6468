//! Hand gesture classification
//!
//! One call per landmark frame. The classifier keeps only the previous frame
//! and the time of the last kind change, so its output is a function of the
//! current frame, the previous frame and elapsed time.

use serde::{Deserialize, Serialize};

use super::landmarks::{Finger, HandFrame, INDEX_TIP};
use crate::config::GestureConfig;
use crate::spatial::{Point2D, Vector2D};

/// Types of recognized gestures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    /// No hand, or a hand in no recognized pose
    #[default]
    None,
    /// Index finger extended, other fingers curled
    Draw,
    /// Thumb tip and index tip touching
    Pinch,
    /// All four fingers extended
    Palm,
    /// All four fingers curled
    Fist,
    /// Draw pose with the index tip jabbing toward the camera
    Poke,
    /// Open palm moving fast
    Swipe,
}

impl GestureKind {
    /// Lowercase label used in logs and replay summaries
    pub fn name(&self) -> &'static str {
        match self {
            GestureKind::None => "none",
            GestureKind::Draw => "draw",
            GestureKind::Pinch => "pinch",
            GestureKind::Palm => "palm",
            GestureKind::Fist => "fist",
            GestureKind::Poke => "poke",
            GestureKind::Swipe => "swipe",
        }
    }
}

/// Per-frame gesture result, carrying everything downstream consumers read
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GestureState {
    pub current: GestureKind,
    /// Kind before the most recent change
    pub previous: GestureKind,
    /// Seconds since `current` last changed
    pub duration: f32,
    /// Palm-center velocity in landmark units per second
    pub velocity: Vector2D,
    /// Detection confidence (0.0 - 1.0), zero without a hand
    pub confidence: f32,
    /// Thumb-tip to index-tip distance
    pub pinch_distance: f32,
    /// Index fingertip
    pub pointer: Point2D,
    /// Midpoint of thumb tip and index tip
    pub pinch_point: Point2D,
    pub palm_center: Point2D,
    pub hand_present: bool,
    /// Set on the frame where `current` changed
    pub just_changed: bool,
}

impl GestureState {
    /// Whether this frame entered `kind`
    pub fn entered(&self, kind: GestureKind) -> bool {
        self.just_changed && self.current == kind
    }

    /// Whether this frame left `kind`
    pub fn left(&self, kind: GestureKind) -> bool {
        self.just_changed && self.previous == kind
    }
}

/// Classifies landmark frames into gestures
pub struct GestureClassifier {
    config: GestureConfig,
    previous_frame: Option<HandFrame>,
    state: GestureState,
    /// Seconds accumulated from every `dt` seen
    clock: f32,
    /// Clock value at the last kind change
    transition_at: f32,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            previous_frame: None,
            state: GestureState::default(),
            clock: 0.0,
            transition_at: 0.0,
        }
    }

    /// The state returned by the most recent `classify`
    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Classify one frame. `None` means the hand was lost.
    pub fn classify(&mut self, frame: Option<&HandFrame>, dt: f32) -> GestureState {
        self.clock += dt.max(0.0);

        let Some(frame) = frame else {
            self.previous_frame = None;
            let just_changed = self.transition(GestureKind::None);
            // Losing the hand restarts every hold timer, even when already idle
            self.transition_at = self.clock;
            self.state = GestureState {
                current: self.state.current,
                previous: self.state.previous,
                just_changed,
                ..GestureState::default()
            };
            return self.state;
        };

        let palm_center = frame.palm_center();
        let velocity = match &self.previous_frame {
            Some(prev) if dt > 0.0 => (palm_center - prev.palm_center()) / dt,
            _ => Vector2D::ZERO,
        };

        let kind = self.refine(self.pose_kind(frame), frame, velocity, dt);
        let just_changed = self.transition(kind);

        self.state = GestureState {
            current: self.state.current,
            previous: self.state.previous,
            duration: self.clock - self.transition_at,
            velocity,
            confidence: frame.score.unwrap_or(1.0).clamp(0.0, 1.0),
            pinch_distance: frame.pinch_distance(),
            pointer: frame.pointer(),
            pinch_point: frame.pinch_point(),
            palm_center,
            hand_present: true,
            just_changed,
        };
        self.previous_frame = Some(frame.clone());
        self.state
    }

    /// Static pose classification, first match wins.
    ///
    /// Pinch outranks draw: a hand that is pinching with its index extended
    /// is a pinch.
    fn pose_kind(&self, frame: &HandFrame) -> GestureKind {
        if frame.pinch_distance() < self.config.pinch_threshold {
            return GestureKind::Pinch;
        }

        let [index, middle, ring, pinky] = Finger::ALL.map(|f| frame.is_extended(f));

        if index && !middle && !ring && !pinky {
            GestureKind::Draw
        } else if index && middle && ring && pinky {
            GestureKind::Palm
        } else if !index && !middle && !ring && !pinky {
            GestureKind::Fist
        } else {
            GestureKind::None
        }
    }

    /// Motion-dependent kinds layered on the static pose
    fn refine(
        &self,
        kind: GestureKind,
        frame: &HandFrame,
        velocity: Vector2D,
        dt: f32,
    ) -> GestureKind {
        match kind {
            GestureKind::Palm if velocity.magnitude() >= self.config.swipe_speed => {
                GestureKind::Swipe
            }
            GestureKind::Draw if self.is_poking(frame, dt) => GestureKind::Poke,
            other => other,
        }
    }

    /// Index tip moving toward the camera fast enough; needs 3D landmarks on
    /// both this and the previous frame
    fn is_poking(&self, frame: &HandFrame, dt: f32) -> bool {
        if dt <= 0.0 {
            return false;
        }
        let current = frame.world.as_ref().map(|w| w[INDEX_TIP].z);
        let previous = self
            .previous_frame
            .as_ref()
            .and_then(|f| f.world.as_ref())
            .map(|w| w[INDEX_TIP].z);

        match (current, previous) {
            (Some(z), Some(prev_z)) => (z - prev_z) / dt <= -self.config.poke_speed,
            _ => false,
        }
    }

    fn transition(&mut self, kind: GestureKind) -> bool {
        if kind == self.state.current {
            return false;
        }
        tracing::debug!(
            from = self.state.current.name(),
            to = kind.name(),
            "gesture changed"
        );
        self.state.previous = self.state.current;
        self.state.current = kind;
        self.transition_at = self.clock;
        true
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}
