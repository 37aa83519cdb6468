//! Shared 3D scene: placement, collision avoidance and interaction
//!
//! The engine only computes positions and target values. Projection and
//! picking are borrowed from the host through [`SceneBridge`]; animation is
//! left to the host's tween engine via [`TargetUpdate`]s.

mod bridge;
mod engine;
mod object;
mod target;

pub use bridge::{OrthoBridge, SceneBridge};
pub use engine::SpatialLayoutEngine;
pub use object::{ObjectId, WorldObject};
pub use target::{Easing, TargetProperty, TargetUpdate, TweenPlayer};
