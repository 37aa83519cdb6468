//! World positions and mesh vertices

use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

use super::Vector3D;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3D {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance(&self, other: &Point3D) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn distance_squared(&self, other: &Point3D) -> f32 {
        let d = *self - *other;
        d.dot(&d)
    }

    /// Point at fraction `t` of the way to `other`
    pub fn lerp(&self, other: &Point3D, t: f32) -> Self {
        *self + (*other - *self) * t
    }

    /// Displacement from the origin
    pub fn to_vector(&self) -> Vector3D {
        Vector3D::new(self.x, self.y, self.z)
    }

    /// Flat `[x, y, z]` layout used by vertex buffers
    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl Add<Vector3D> for Point3D {
    type Output = Self;

    fn add(self, v: Vector3D) -> Self {
        Self::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}

impl AddAssign<Vector3D> for Point3D {
    fn add_assign(&mut self, v: Vector3D) {
        *self = *self + v;
    }
}

impl Sub for Point3D {
    type Output = Vector3D;

    fn sub(self, rhs: Self) -> Vector3D {
        self.to_vector() - rhs.to_vector()
    }
}
