//! Per-object transform handed to the render engine

use serde::{Deserialize, Serialize};

use super::{Point3D, Quaternion, Vector3D};

/// Scale, then rotate, then translate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Point3D,
    pub rotation: Quaternion,
    /// Per-axis scale; squish makes this non-uniform
    pub scale: Vector3D,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Point3D::ORIGIN,
            rotation: Quaternion::IDENTITY,
            scale: Vector3D::ONE,
        }
    }

    /// Map a mesh-local vertex into world space
    pub fn transform_point(&self, local: Point3D) -> Point3D {
        let s = self.scale;
        let scaled = Vector3D::new(local.x * s.x, local.y * s.y, local.z * s.z);
        self.position + self.rotation.rotate_vector(scaled)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
