//! Spatial primitives shared by every pipeline stage
//!
//! Screen and landmark space is 2D with Y growing downward (image convention).
//! World space is right-handed:
//! - X: Right (+) / Left (-)
//! - Y: Up (+) / Down (-)
//! - Z: Toward the viewer (+) / Away (-)

mod point2d;
mod point3d;
mod vector3d;
mod quaternion;
mod transform;
mod bounds;

pub use point2d::{Point2D, Vector2D};
pub use point3d::Point3D;
pub use vector3d::Vector3D;
pub use quaternion::Quaternion;
pub use transform::Transform;
pub use bounds::Bounds;
