//! World-space directions, normals and displacements

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use super::Point3D;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3D {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    /// +X
    pub const RIGHT: Self = Self::new(1.0, 0.0, 0.0);
    /// +Y
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);
    /// +Z, toward the viewer
    pub const FORWARD: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn magnitude(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction; the zero vector stays zero
    pub fn normalize(&self) -> Self {
        let length = self.magnitude();
        if length > 0.0 {
            Self::new(self.x / length, self.y / length, self.z / length)
        } else {
            Self::ZERO
        }
    }

    pub fn dot(&self, other: &Vector3D) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Right-handed cross product; its length is twice the area of the
    /// triangle spanned by the two vectors
    pub fn cross(&self, other: &Vector3D) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn to_point(&self) -> Point3D {
        Point3D::new(self.x, self.y, self.z)
    }

    /// Flat `[x, y, z]` layout used by vertex buffers
    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl Add for Vector3D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vector3D {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vector3D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + -rhs
    }
}

impl Mul<f32> for Vector3D {
    type Output = Self;

    fn mul(self, k: f32) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }
}

impl Neg for Vector3D {
    type Output = Self;

    fn neg(self) -> Self {
        self * -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitude() {
        assert!((Vector3D::new(3.0, 4.0, 0.0).magnitude() - 5.0).abs() < 0.0001);
    }

    #[test]
    fn test_normalize_zero_stays_zero() {
        assert_eq!(Vector3D::ZERO.normalize(), Vector3D::ZERO);
        let n = Vector3D::new(0.0, 0.0, 7.0).normalize();
        assert_eq!(n, Vector3D::FORWARD);
    }

    #[test]
    fn test_cross_is_right_handed() {
        assert_eq!(Vector3D::RIGHT.cross(&Vector3D::UP), Vector3D::FORWARD);
        assert_eq!(Vector3D::UP.cross(&Vector3D::RIGHT), -Vector3D::FORWARD);
    }
}
