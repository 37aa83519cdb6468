//! Unit quaternions for object orientation

use std::ops::Mul;

use serde::{Deserialize, Serialize};

use super::Vector3D;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians about `axis` (normalized here)
    pub fn from_axis_angle(axis: Vector3D, angle: f32) -> Self {
        let (sin, cos) = (angle * 0.5).sin_cos();
        let v = axis.normalize() * sin;
        Self::new(v.x, v.y, v.z, cos)
    }

    /// Intrinsic X, then Y, then Z Euler angles in radians, matching how
    /// render engines apply per-object spin
    pub fn from_euler_xyz(angles: Vector3D) -> Self {
        Self::from_axis_angle(Vector3D::RIGHT, angles.x)
            * Self::from_axis_angle(Vector3D::UP, angles.y)
            * Self::from_axis_angle(Vector3D::FORWARD, angles.z)
    }

    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    /// Rotate `v`, using the two-cross-product form of q v q*
    pub fn rotate_vector(&self, v: Vector3D) -> Vector3D {
        let axis = Vector3D::new(self.x, self.y, self.z);
        let t = axis.cross(&v) * 2.0;
        v + t * self.w + axis.cross(&t)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Hamilton product: `a * b` applies `b` first, then `a`
impl Mul for Quaternion {
    type Output = Self;

    fn mul(self, b: Self) -> Self {
        let a = self;
        Self::new(
            a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        )
    }
}
