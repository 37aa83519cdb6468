//! Placement, collision avoidance and ambient motion of world objects

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::object::{ObjectId, WorldObject};
use super::target::{Easing, TargetProperty, TargetUpdate};
use crate::config::LayoutConfig;
use crate::geometry::InflatedSolid;
use crate::spatial::{Bounds, Point3D, Vector3D};
use crate::stroke::Stroke;

/// Centers closer than this have no usable separating axis
const COINCIDENT: f32 = 1e-5;
/// Golden angle, spreads fallback axes for consecutive ids
const GOLDEN_ANGLE: f32 = 2.399_963;
/// Step used for the resolution pass run at placement
const PLACEMENT_STEP: f32 = 1.0 / 60.0;

const GRAB_TWEEN_SECS: f32 = 0.15;
const RELEASE_TWEEN_SECS: f32 = 0.25;
const SQUISH_RECOVER_SECS: f32 = 0.5;
const DISPOSE_SECS: f32 = 0.3;

const BOB_SPEED_RANGE: (f32, f32) = (0.8, 1.6);

/// Owns every active world object
pub struct SpatialLayoutEngine {
    config: LayoutConfig,
    objects: Vec<WorldObject>,
    updates: Vec<TargetUpdate>,
    region: Bounds,
    rng: StdRng,
    next_id: u64,
    clock: f32,
}

impl SpatialLayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let [hx, hy, hz] = config.half_extents;
        Self {
            region: Bounds::aabb_centered(Point3D::ORIGIN, Vector3D::new(hx, hy, hz)),
            config,
            objects: Vec::new(),
            updates: Vec::new(),
            rng,
            next_id: 1,
            clock: 0.0,
        }
    }

    pub fn objects(&self) -> &[WorldObject] {
        &self.objects
    }

    pub fn get(&self, id: ObjectId) -> Option<&WorldObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Region every object is kept inside
    pub fn region(&self) -> Bounds {
        self.region
    }

    /// Seconds of motion applied so far
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Take the target updates queued since the last call
    pub fn drain_updates(&mut self) -> Vec<TargetUpdate> {
        std::mem::take(&mut self.updates)
    }

    /// Build an object for `solid` with randomized spin and bob, anchored at
    /// the unprojected stroke centroid, and place it
    pub fn spawn(&mut self, solid: InflatedSolid, stroke: Stroke, anchor: Point3D) -> ObjectId {
        let mut object = WorldObject::new(solid, stroke, anchor);
        let spin = self.config.max_rotation_speed.abs();
        object.rotation_speed = Vector3D::new(
            self.rng.gen_range(-spin..=spin),
            self.rng.gen_range(-spin..=spin),
            self.rng.gen_range(-spin..=spin),
        );
        object.bob_offset = self.rng.gen_range(0.0..TAU);
        object.bob_speed = self.rng.gen_range(BOB_SPEED_RANGE.0..=BOB_SPEED_RANGE.1);
        self.place(object)
    }

    /// Add `object` at its current position, nudged clear of close
    /// neighbours and clamped to the region. Assigns and returns its id.
    pub fn place(&mut self, mut object: WorldObject) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        object.id = id;
        object.created_at = self.clock;

        let radius = self.config.collision_radius;
        let mut position = object.position;
        for other in &self.objects {
            let offset = position - other.position;
            let distance = offset.magnitude();
            if distance >= radius {
                continue;
            }
            let axis = if distance > COINCIDENT {
                offset * (1.0 / distance)
            } else {
                fallback_axis(id)
            };
            // Push proportional to (r - d) / r, in units of r
            position += axis * ((radius - distance) / radius * radius);
        }
        let position = self.region.clamp(position);
        object.position = position;
        object.target_position = position;

        self.updates.push(TargetUpdate::new(
            id,
            TargetProperty::Scale {
                from: object.scale,
                to: object.target_scale,
            },
            self.config.pop_in_secs,
            Easing::EaseOutBack,
        ));
        tracing::debug!(%id, x = position.x, y = position.y, z = position.z, "object placed");

        self.objects.push(object);
        self.resolve_overlaps(PLACEMENT_STEP);
        id
    }

    /// One relaxation step of pairwise repulsion.
    ///
    /// Every non-grabbed object closer than the comfort distance to another
    /// is pushed along the separating axis. Pushes are gathered first and
    /// applied afterwards so the pass is order independent.
    pub fn resolve_overlaps(&mut self, dt: f32) {
        let n = self.objects.len();
        if n < 2 || dt <= 0.0 {
            return;
        }

        let radius = self.config.collision_radius;
        let comfort = radius * (1.0 + self.config.comfort_margin.max(0.0));
        let gain = self.config.avoidance_strength * dt;
        let mut pushes = vec![Vector3D::ZERO; n];

        for (i, mover) in self.objects.iter().enumerate() {
            if mover.is_grabbed {
                continue;
            }
            for (j, other) in self.objects.iter().enumerate() {
                if i == j {
                    continue;
                }
                let offset = mover.position - other.position;
                let distance = offset.magnitude();
                if distance >= comfort {
                    continue;
                }
                let axis = if distance > COINCIDENT {
                    offset * (1.0 / distance)
                } else {
                    pair_axis(mover.id, other.id)
                };
                pushes[i] += axis * ((comfort - distance) / radius * gain);
            }
        }

        for (object, push) in self.objects.iter_mut().zip(pushes) {
            if push == Vector3D::ZERO {
                continue;
            }
            object.position = self.region.clamp(object.position + push);
            object.target_position = self.region.clamp(object.target_position + push);
        }
    }

    /// Advance spin, bob and drift by `dt`, then relax overlaps.
    ///
    /// `elapsed` is the host's running time in seconds and only feeds the
    /// sinusoids.
    pub fn apply_per_frame_motion(&mut self, dt: f32, elapsed: f32) {
        self.clock += dt;
        let bob = self.config.bob_amplitude;
        let drift = self.config.drift_amplitude;
        let drift_speed = self.config.drift_speed;

        for object in self.objects.iter_mut().filter(|o| !o.is_grabbed) {
            object.rotation += object.rotation_speed * dt;
            let phase = object.bob_offset;
            object.position = Point3D::new(
                object.target_position.x + (elapsed * drift_speed + phase).sin() * drift,
                object.target_position.y + (elapsed * object.bob_speed + phase).sin() * bob,
                object.target_position.z,
            );
        }

        self.resolve_overlaps(dt);
    }

    /// Hold an object: it stops moving on its own but still repels others
    pub fn grab(&mut self, id: ObjectId) -> bool {
        let grab_scale = self.config.grab_scale;
        let Some(object) = self.find_mut(id) else {
            return false;
        };
        if object.is_grabbed {
            return true;
        }
        object.is_grabbed = true;
        object.target_scale = grab_scale;
        let from = object.scale;
        self.queue(
            id,
            TargetProperty::Scale { from, to: grab_scale },
            GRAB_TWEEN_SECS,
            Easing::EaseOutQuad,
        );
        tracing::debug!(%id, "object grabbed");
        true
    }

    /// Move a grabbed object. Objects not held are left alone.
    pub fn drag_to(&mut self, id: ObjectId, world: Point3D) -> bool {
        let region = self.region;
        match self.find_mut(id) {
            Some(object) if object.is_grabbed => {
                let clamped = region.clamp(world);
                object.position = clamped;
                object.target_position = clamped;
                true
            }
            _ => false,
        }
    }

    /// Let go of a held object, restoring its scale and resting position
    pub fn release(&mut self, id: ObjectId) -> bool {
        let region = self.region;
        let Some(object) = self.find_mut(id) else {
            return false;
        };
        if !object.is_grabbed {
            return false;
        }
        object.is_grabbed = false;
        object.target_scale = 1.0;
        object.target_position = region.clamp(object.position);
        let (from_scale, from, to) = (object.scale, object.position, object.target_position);

        self.queue(
            id,
            TargetProperty::Scale { from: from_scale, to: 1.0 },
            RELEASE_TWEEN_SECS,
            Easing::EaseOutBack,
        );
        self.queue(
            id,
            TargetProperty::Position { from, to },
            RELEASE_TWEEN_SECS,
            Easing::EaseOutCubic,
        );
        tracing::debug!(%id, "object released");
        true
    }

    /// Squish an object; it springs back through the tween engine
    pub fn poke(&mut self, id: ObjectId) -> bool {
        let Some(object) = self.find_mut(id) else {
            return false;
        };
        object.squish_amount = 1.0;
        self.queue(
            id,
            TargetProperty::Squish { from: 1.0, to: 0.0 },
            SQUISH_RECOVER_SECS,
            Easing::EaseOutBack,
        );
        tracing::debug!(%id, "object poked");
        true
    }

    /// Drop an object from the active set right away. Its visual disposal
    /// is queued as a target update.
    pub fn remove(&mut self, id: ObjectId) -> Option<WorldObject> {
        let index = self.objects.iter().position(|o| o.id == id)?;
        let object = self.objects.remove(index);
        self.queue(
            id,
            TargetProperty::Dispose { from_scale: object.scale },
            DISPOSE_SECS,
            Easing::EaseInBack,
        );
        tracing::debug!(%id, "object removed");
        Some(object)
    }

    /// Remove every object. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed: Vec<WorldObject> = self.objects.drain(..).collect();
        for object in &removed {
            self.queue(
                object.id,
                TargetProperty::Dispose { from_scale: object.scale },
                DISPOSE_SECS,
                Easing::EaseInBack,
            );
        }
        removed.len()
    }

    /// Write an interpolated tween value back. `progress` is linear 0-1;
    /// easing is applied here. Returns false when the object is gone.
    pub fn apply_tween(&mut self, update: &TargetUpdate, progress: f32) -> bool {
        let t = update.factor(progress);
        let Some(object) = self.find_mut(update.id) else {
            return false;
        };
        match update.property {
            TargetProperty::Scale { from, to } => object.scale = from + (to - from) * t,
            TargetProperty::Squish { from, to } => object.squish_amount = from + (to - from) * t,
            TargetProperty::Position { from, to } => {
                // A re-grab mid-tween wins over the release animation
                if !object.is_grabbed {
                    object.target_position = from.lerp(&to, t);
                }
            }
            TargetProperty::Dispose { .. } => return false,
        }
        true
    }

    fn find_mut(&mut self, id: ObjectId) -> Option<&mut WorldObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    fn queue(&mut self, id: ObjectId, property: TargetProperty, duration: f32, easing: Easing) {
        self.updates.push(TargetUpdate::new(id, property, duration, easing));
    }
}

impl Default for SpatialLayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

/// Deterministic in-plane direction for an object with no separating axis
fn fallback_axis(id: ObjectId) -> Vector3D {
    let angle = id.0 as f32 * GOLDEN_ANGLE;
    Vector3D::new(angle.cos(), angle.sin(), 0.0)
}

/// Opposite directions for the two members of a coincident pair
fn pair_axis(mover: ObjectId, other: ObjectId) -> Vector3D {
    let base = fallback_axis(mover.min(other));
    if mover < other {
        base
    } else {
        -base
    }
}
