//! Target values handed to the host's tween engine
//!
//! The layout engine never interpolates on its own. Discrete events (pop-in,
//! grab, release, poke, removal) queue a [`TargetUpdate`]; the host animates
//! it and writes intermediate values back with
//! [`SpatialLayoutEngine::apply_tween`](super::SpatialLayoutEngine::apply_tween).
//! [`TweenPlayer`] is a minimal host-side driver for headless use.

use serde::{Deserialize, Serialize};

use super::engine::SpatialLayoutEngine;
use super::object::ObjectId;
use crate::spatial::Point3D;

/// Easing curve hint for a target update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseOutQuad,
    EaseOutCubic,
    EaseInBack,
    /// Overshoots past the end value before settling
    EaseOutBack,
}

impl Easing {
    /// Map linear progress (clamped to 0-1) onto the curve
    pub fn apply(&self, t: f32) -> f32 {
        const C1: f32 = 1.70158;
        const C3: f32 = C1 + 1.0;
        let t = t.clamp(0.0, 1.0);

        match self {
            Easing::Linear => t,
            Easing::EaseOutQuad => t * (2.0 - t),
            Easing::EaseOutCubic => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Easing::EaseInBack => C3 * t * t * t - C1 * t * t,
            Easing::EaseOutBack => {
                let u = t - 1.0;
                1.0 + C3 * u * u * u + C1 * u * u
            }
        }
    }
}

/// Which property of an object is being animated, and between what values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "property", rename_all = "snake_case")]
pub enum TargetProperty {
    Scale { from: f32, to: f32 },
    Squish { from: f32, to: f32 },
    Position { from: Point3D, to: Point3D },
    /// The object has left the layout; the host shrinks it from `from_scale`
    /// to nothing and frees its geometry
    Dispose { from_scale: f32 },
}

/// A single animation request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetUpdate {
    pub id: ObjectId,
    #[serde(flatten)]
    pub property: TargetProperty,
    /// Seconds
    pub duration: f32,
    pub easing: Easing,
}

impl TargetUpdate {
    pub fn new(id: ObjectId, property: TargetProperty, duration: f32, easing: Easing) -> Self {
        Self {
            id,
            property,
            duration,
            easing,
        }
    }

    /// Eased interpolation factor at linear `progress`
    pub fn factor(&self, progress: f32) -> f32 {
        self.easing.apply(progress)
    }
}

/// In-flight tween
#[derive(Debug, Clone)]
struct Tween {
    update: TargetUpdate,
    elapsed: f32,
}

impl Tween {
    fn progress(&self) -> f32 {
        if self.update.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.update.duration).min(1.0)
        }
    }
}

/// Plays queued target updates against a layout engine on a fixed clock.
///
/// A newer update for the same object and property replaces the older one.
#[derive(Debug, Clone, Default)]
pub struct TweenPlayer {
    active: Vec<Tween>,
}

impl TweenPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Queue updates, superseding any running tween on the same target
    pub fn extend(&mut self, updates: impl IntoIterator<Item = TargetUpdate>) {
        for update in updates {
            self.active.retain(|tween| {
                tween.update.id != update.id
                    || std::mem::discriminant(&tween.update.property)
                        != std::mem::discriminant(&update.property)
            });
            self.active.push(Tween { update, elapsed: 0.0 });
        }
    }

    /// Advance every tween by `dt` seconds and write values into `engine`.
    /// Finished tweens and tweens whose object is gone are dropped.
    pub fn advance(&mut self, dt: f32, engine: &mut SpatialLayoutEngine) {
        self.active.retain_mut(|tween| {
            tween.elapsed += dt;
            let progress = tween.progress();
            let alive = engine.apply_tween(&tween.update, progress);
            alive && progress < 1.0
        });
    }

    /// Jump every tween to its end value
    pub fn finish(&mut self, engine: &mut SpatialLayoutEngine) {
        for tween in self.active.drain(..) {
            engine.apply_tween(&tween.update, 1.0);
        }
    }
}
