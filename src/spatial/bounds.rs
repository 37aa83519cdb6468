//! Bounding volumes for mesh centering, layout clamping and hit testing

use serde::{Deserialize, Serialize};

use super::{Point3D, Vector3D};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Bounds {
    /// Axis-aligned box, `min <= max` on every axis
    AABB { min: Point3D, max: Point3D },
    Sphere { center: Point3D, radius: f32 },
}

impl Bounds {
    pub fn aabb_centered(center: Point3D, half_extents: Vector3D) -> Self {
        Self::AABB {
            min: center + -half_extents,
            max: center + half_extents,
        }
    }

    /// Tightest box around `points`; `None` when there are none
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3D>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| {
            (
                Point3D::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
                Point3D::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
            )
        });
        Some(Self::AABB { min, max })
    }

    pub fn sphere(center: Point3D, radius: f32) -> Self {
        Self::Sphere { center, radius }
    }

    pub fn center(&self) -> Point3D {
        match *self {
            Self::AABB { min, max } => min.lerp(&max, 0.5),
            Self::Sphere { center, .. } => center,
        }
    }

    /// Radius of the smallest sphere about `center()` that encloses the volume
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            Self::AABB { min, max } => min.distance(&max) * 0.5,
            Self::Sphere { radius, .. } => radius,
        }
    }

    pub fn contains(&self, point: Point3D) -> bool {
        self.clamp(point) == point
    }

    /// Nearest point of the volume to `point`
    pub fn clamp(&self, point: Point3D) -> Point3D {
        match *self {
            Self::AABB { min, max } => Point3D::new(
                point.x.clamp(min.x, max.x),
                point.y.clamp(min.y, max.y),
                point.z.clamp(min.z, max.z),
            ),
            Self::Sphere { center, radius } => {
                if center.distance_squared(&point) <= radius * radius {
                    point
                } else {
                    center + (point - center).normalize() * radius
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_contains_its_faces() {
        let half = Vector3D::new(5.0, 5.0, 5.0);
        let bounds = Bounds::aabb_centered(half.to_point(), half);
        assert!(bounds.contains(Point3D::new(5.0, 5.0, 5.0)));
        assert!(bounds.contains(Point3D::ORIGIN));
        assert!(!bounds.contains(Point3D::new(-1.0, 5.0, 5.0)));
    }

    #[test]
    fn test_from_points_center() {
        let points = [
            Point3D::new(-1.0, 0.0, 2.0),
            Point3D::new(3.0, 4.0, 0.0),
            Point3D::new(1.0, -2.0, 1.0),
        ];
        let bounds = Bounds::from_points(&points).unwrap();
        assert_eq!(bounds.center(), Point3D::new(1.0, 1.0, 1.0));
        assert!(Bounds::from_points(&[]).is_none());
    }

    #[test]
    fn test_clamp_box() {
        let bounds = Bounds::aabb_centered(Point3D::ORIGIN, Vector3D::new(2.0, 1.0, 1.0));
        let clamped = bounds.clamp(Point3D::new(5.0, -3.0, 0.5));
        assert_eq!(clamped, Point3D::new(2.0, -1.0, 0.5));
    }

    #[test]
    fn test_sphere_clamp_and_contains() {
        let bounds = Bounds::sphere(Point3D::ORIGIN, 5.0);
        assert!(bounds.contains(Point3D::new(3.0, 0.0, 0.0)));
        assert!(!bounds.contains(Point3D::new(6.0, 0.0, 0.0)));
        let clamped = bounds.clamp(Point3D::new(10.0, 0.0, 0.0));
        assert!((clamped.x - 5.0).abs() < 0.0001);
    }
}
