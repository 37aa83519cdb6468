//! Capabilities borrowed from the host's camera and renderer

use serde::{Deserialize, Serialize};

use super::object::{ObjectId, WorldObject};
use crate::spatial::{Point2D, Point3D};

/// What the session needs from the render host
pub trait SceneBridge {
    /// Landmark-frame coordinates to display pixels
    fn to_display(&self, frame_point: Point2D) -> Point2D;

    /// Display pixels to a world point on the plane `z = depth`
    fn unproject(&self, screen: Point2D, depth: f32) -> Point3D;

    /// Front-most object under a display pixel, if any
    fn pick(&self, screen: Point2D, objects: &[WorldObject]) -> Option<ObjectId>;
}

/// Orthographic bridge: the viewport maps linearly onto a world rectangle
/// centered on the origin, and picking casts straight down -Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrthoBridge {
    /// Viewport size in display pixels
    pub viewport: (f32, f32),
    /// World units covered by the viewport
    pub world_size: (f32, f32),
    /// Flip landmark X, for selfie-view cameras
    pub mirror: bool,
}

impl OrthoBridge {
    pub fn new(viewport: (f32, f32), world_size: (f32, f32)) -> Self {
        Self {
            viewport,
            world_size,
            mirror: false,
        }
    }

    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Inverse of `unproject`, ignoring depth
    pub fn project(&self, world: Point3D) -> Point2D {
        let (w, h) = self.viewport;
        let (ww, wh) = self.world_size;
        Point2D::new((world.x / ww + 0.5) * w, (0.5 - world.y / wh) * h)
    }
}

impl Default for OrthoBridge {
    fn default() -> Self {
        Self::new((1280.0, 720.0), (16.0, 9.0))
    }
}

impl SceneBridge for OrthoBridge {
    fn to_display(&self, frame_point: Point2D) -> Point2D {
        let x = if self.mirror {
            1.0 - frame_point.x
        } else {
            frame_point.x
        };
        Point2D::new(x * self.viewport.0, frame_point.y * self.viewport.1)
    }

    fn unproject(&self, screen: Point2D, depth: f32) -> Point3D {
        let (w, h) = self.viewport;
        let (ww, wh) = self.world_size;
        Point3D::new(
            (screen.x / w - 0.5) * ww,
            (0.5 - screen.y / h) * wh,
            depth,
        )
    }

    fn pick(&self, screen: Point2D, objects: &[WorldObject]) -> Option<ObjectId> {
        let ray = self.unproject(screen, 0.0);
        objects
            .iter()
            .filter_map(|object| {
                let sphere = object.bounding_sphere();
                let center = sphere.center();
                let dx = ray.x - center.x;
                let dy = ray.y - center.y;
                let planar = dx * dx + dy * dy;
                let radius = sphere.bounding_radius();
                (planar <= radius * radius).then_some((object.id, center.z, planar))
            })
            .max_by(|a, b| a.1.total_cmp(&b.1).then(b.2.total_cmp(&a.2)))
            .map(|(id, _, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::InflatedSolid;
    use crate::stroke::Stroke;

    fn ball(id: u64, at: Point3D, radius: f32) -> WorldObject {
        let mut object = WorldObject::new(InflatedSolid::default(), Stroke::default(), at);
        object.id = ObjectId(id);
        object.scale = 1.0;
        object.local_radius = radius;
        object
    }

    #[test]
    fn test_unproject_maps_viewport_to_world() {
        let bridge = OrthoBridge::default();
        let center = bridge.unproject(Point2D::new(640.0, 360.0), 0.5);
        assert_eq!(center, Point3D::new(0.0, 0.0, 0.5));

        let top_left = bridge.unproject(Point2D::new(0.0, 0.0), 0.0);
        assert_eq!(top_left, Point3D::new(-8.0, 4.5, 0.0));

        let back = bridge.project(Point3D::new(2.0, -1.0, 0.0));
        let again = bridge.unproject(back, 0.0);
        assert!(again.distance(&Point3D::new(2.0, -1.0, 0.0)) < 0.0001);
    }

    #[test]
    fn test_to_display_scales_and_mirrors() {
        let bridge = OrthoBridge::default();
        assert_eq!(bridge.to_display(Point2D::new(0.25, 0.5)), Point2D::new(320.0, 360.0));

        let mirrored = bridge.with_mirror(true);
        assert_eq!(mirrored.to_display(Point2D::new(0.25, 0.5)), Point2D::new(960.0, 360.0));
    }

    #[test]
    fn test_pick_prefers_front_object() {
        let bridge = OrthoBridge::default();
        let objects = vec![
            ball(1, Point3D::new(0.0, 0.0, -1.0), 1.0),
            ball(2, Point3D::new(0.2, 0.0, 0.5), 1.0),
            ball(3, Point3D::new(5.0, 0.0, 1.0), 1.0),
        ];
        let screen = bridge.project(Point3D::ORIGIN);

        assert_eq!(bridge.pick(screen, &objects), Some(ObjectId(2)));
        assert_eq!(bridge.pick(Point2D::new(0.0, 0.0), &objects), None);
    }
}
