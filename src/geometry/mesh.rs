//! Indexed triangle mesh produced by extrusion and inflation

use serde::{Deserialize, Serialize};

use crate::spatial::{Bounds, Point3D, Vector3D};

/// A closed triangle mesh in the object's local frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InflatedSolid {
    pub positions: Vec<Point3D>,
    /// One per position, unit length or zero for isolated vertices
    pub normals: Vec<Vector3D>,
    /// Counter-clockwise triangles, three indices each
    pub indices: Vec<u32>,
}

impl InflatedSolid {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds of every vertex
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.positions)
    }

    /// Triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }

    /// Flat `[x, y, z, ...]` position buffer for GPU upload
    pub fn position_buffer(&self) -> Vec<f32> {
        self.positions.iter().flat_map(|p| p.to_array()).collect()
    }

    /// Flat `[x, y, z, ...]` normal buffer for GPU upload
    pub fn normal_buffer(&self) -> Vec<f32> {
        self.normals.iter().flat_map(|n| n.to_array()).collect()
    }

    /// Rebuild smooth vertex normals from the current positions.
    ///
    /// Face normals are accumulated unnormalized, so larger triangles weigh
    /// more, then each vertex sum is normalized.
    pub fn recompute_normals(&mut self) {
        let mut normals = vec![Vector3D::ZERO; self.positions.len()];

        for [a, b, c] in self.triangles() {
            let (Some(pa), Some(pb), Some(pc)) = (
                self.positions.get(a),
                self.positions.get(b),
                self.positions.get(c),
            ) else {
                continue;
            };
            let face = (*pb - *pa).cross(&(*pc - *pa));
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }

        self.normals = normals.into_iter().map(|n| n.normalize()).collect();
    }

    /// Recenter so the bounding-box center sits at the origin
    pub fn recenter(&mut self) {
        let Some(bounds) = self.bounds() else {
            return;
        };
        let shift = -bounds.center().to_vector();
        for p in self.positions.iter_mut() {
            *p += shift;
        }
    }
}
