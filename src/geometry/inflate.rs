//! Balloon-style inflation of extruded curves

use super::curve::PlanarCurve;
use super::extrude::{extrude, BevelParams};
use super::mesh::InflatedSolid;
use crate::config::MeshConfig;
use crate::spatial::{Bounds, Point3D};

/// Share of the inflation amount applied as outward displacement
pub const INFLATION_FRACTION: f32 = 0.5;

/// Vertices closer than this to the bounding-box center are left in place
pub const CENTER_EPSILON: f32 = 1e-4;

/// Turns planar curves into puffy solids
#[derive(Debug, Clone)]
pub struct MeshInflator {
    config: MeshConfig,
}

impl MeshInflator {
    pub fn new(config: MeshConfig) -> Self {
        Self { config }
    }

    /// Inflate with the configured depth and bevel
    pub fn inflate_default(&self, curve: &PlanarCurve) -> InflatedSolid {
        self.inflate(curve, self.config.depth, &self.config.bevel())
    }

    /// Extrude, recenter, push every vertex away from the center and
    /// rebuild normals. Deterministic for a given curve and parameters.
    pub fn inflate(&self, curve: &PlanarCurve, depth: f32, bevel: &BevelParams) -> InflatedSolid {
        let mut solid = extrude(&curve.points, depth, bevel);
        solid.recenter();
        inflate_vertices(&mut solid.positions, self.config.inflation);
        solid.recompute_normals();

        tracing::debug!(
            vertices = solid.vertex_count(),
            triangles = solid.triangle_count(),
            "inflated solid"
        );
        solid
    }
}

impl Default for MeshInflator {
    fn default() -> Self {
        Self::new(MeshConfig::default())
    }
}

/// Displace each vertex along the direction from the bounding-box center by
/// `amount * INFLATION_FRACTION`. Vertices at the center do not move.
pub fn inflate_vertices(positions: &mut [Point3D], amount: f32) {
    let Some(bounds) = Bounds::from_points(positions.iter()) else {
        return;
    };
    let center = bounds.center();
    let push = amount * INFLATION_FRACTION;

    for p in positions.iter_mut() {
        let outward = *p - center;
        if outward.magnitude() > CENTER_EPSILON {
            *p += outward.normalize() * push;
        }
    }
}
