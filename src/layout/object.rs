//! Objects living in the shared 3D scene

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::InflatedSolid;
use crate::spatial::{Bounds, Point3D, Quaternion, Transform, Vector3D};
use crate::stroke::{Color, Stroke};

/// Vertical flattening at full squish
const SQUISH_FLATTEN: f32 = 0.3;
/// Horizontal bulge at full squish
const SQUISH_BULGE: f32 = 0.15;

/// Stable handle for a placed object, assigned by the layout engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj-{}", self.0)
    }
}

/// An inflated solid placed in world space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldObject {
    pub id: ObjectId,
    pub solid: InflatedSolid,
    pub color: Color,
    pub original_stroke: Stroke,
    /// Rendered position: target plus cosmetic bob and drift
    pub position: Point3D,
    /// Rest position that collision pushes and drags act on
    pub target_position: Point3D,
    /// Euler angles (radians), applied X then Y then Z
    pub rotation: Vector3D,
    /// Radians per second on each axis
    pub rotation_speed: Vector3D,
    /// Bob phase, also offsets the drift
    pub bob_offset: f32,
    pub bob_speed: f32,
    pub scale: f32,
    pub target_scale: f32,
    /// Layout clock time of placement, in seconds
    pub created_at: f32,
    pub is_grabbed: bool,
    /// 0.0 at rest, 1.0 fully squished
    pub squish_amount: f32,
    /// Bounding radius of the solid at unit scale
    pub local_radius: f32,
}

impl WorldObject {
    /// A motionless object anchored at `anchor`. The id is assigned on
    /// placement.
    pub fn new(solid: InflatedSolid, stroke: Stroke, anchor: Point3D) -> Self {
        let local_radius = solid.bounds().map_or(0.0, |b| b.bounding_radius());
        Self {
            id: ObjectId(0),
            color: stroke.color,
            solid,
            original_stroke: stroke,
            position: anchor,
            target_position: anchor,
            rotation: Vector3D::ZERO,
            rotation_speed: Vector3D::ZERO,
            bob_offset: 0.0,
            bob_speed: 0.0,
            scale: 0.0,
            target_scale: 1.0,
            created_at: 0.0,
            is_grabbed: false,
            squish_amount: 0.0,
            local_radius,
        }
    }

    /// Render transform with squish folded into the scale
    pub fn transform(&self) -> Transform {
        let s = self.squish_amount;
        Transform {
            position: self.position,
            rotation: Quaternion::from_euler_xyz(self.rotation),
            scale: Vector3D::new(
                self.scale * (1.0 + SQUISH_BULGE * s),
                self.scale * (1.0 - SQUISH_FLATTEN * s),
                self.scale * (1.0 + SQUISH_BULGE * s),
            ),
        }
    }

    /// World-space bounding sphere used for hit testing. Sized by the
    /// target scale so picking does not depend on tween progress.
    pub fn bounding_sphere(&self) -> Bounds {
        Bounds::sphere(self.position, self.local_radius * self.target_scale.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{CurveFitter, MeshInflator};
    use crate::spatial::Point2D;
    use crate::test_utils::circle_stroke;

    fn sample_object() -> WorldObject {
        let stroke = circle_stroke(Point2D::new(100.0, 100.0), 50.0, 16);
        let curve = CurveFitter::default().fit(&stroke);
        let solid = MeshInflator::default().inflate_default(&curve);
        WorldObject::new(solid, stroke, Point3D::new(1.0, 2.0, 0.0))
    }

    #[test]
    fn test_new_object_starts_hidden_and_still() {
        let object = sample_object();
        assert_eq!(object.scale, 0.0);
        assert_eq!(object.target_scale, 1.0);
        assert_eq!(object.position, object.target_position);
        assert!(object.local_radius > 1.0);
        assert_eq!(object.color, object.original_stroke.color);
    }

    #[test]
    fn test_squish_flattens_and_bulges() {
        let mut object = sample_object();
        object.scale = 1.0;
        assert_eq!(object.transform().scale, Vector3D::ONE);

        object.squish_amount = 1.0;
        let scale = object.transform().scale;
        assert!((scale.y - 0.7).abs() < 0.0001);
        assert!((scale.x - 1.15).abs() < 0.0001);
        assert_eq!(scale.x, scale.z);
    }

    #[test]
    fn test_bounding_sphere_follows_target_scale() {
        let mut object = sample_object();
        object.target_scale = 2.0;
        let sphere = object.bounding_sphere();
        assert_eq!(sphere.center(), object.position);
        assert!((sphere.bounding_radius() - object.local_radius * 2.0).abs() < 0.0001);
    }
}
