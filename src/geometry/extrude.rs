//! Beveled extrusion of a closed planar contour
//!
//! Rings of the contour are stacked from the back bevel tip, through the
//! body, to the front bevel tip. Side walls join consecutive rings and the
//! first and last rings are closed with ear-clipped caps.

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use super::curve::signed_area;
use super::mesh::InflatedSolid;
use crate::spatial::{Point2D, Point3D, Vector2D};

/// Sharp corners would otherwise push miter offsets toward infinity
const MIN_MITER_COS: f32 = 0.25;

/// Bevel profile applied at both ends of the extrusion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BevelParams {
    /// Depth the bevel adds beyond each face of the body
    pub thickness: f32,
    /// Outward offset of the body from the bevel tip
    pub size: f32,
    /// Rings per bevel, excluding the body ring
    pub segments: u32,
}

impl Default for BevelParams {
    fn default() -> Self {
        Self {
            thickness: 0.12,
            size: 0.1,
            segments: 4,
        }
    }
}

/// Extrude `contour` along Z, centered on z = 0.
///
/// The contour is treated as closed and is rewound counter-clockwise if
/// needed. Fewer than three points yield an empty mesh.
pub fn extrude(contour: &[Point2D], depth: f32, bevel: &BevelParams) -> InflatedSolid {
    let n = contour.len();
    if n < 3 {
        return InflatedSolid::default();
    }

    let mut contour = contour.to_vec();
    if signed_area(&contour) < 0.0 {
        contour.reverse();
    }

    let offsets = miter_offsets(&contour);
    let rings = ring_profile(depth, bevel);

    let mut positions = Vec::with_capacity(rings.len() * n);
    for &(offset, z) in &rings {
        for (p, o) in contour.iter().zip(&offsets) {
            let q = *p + *o * offset;
            positions.push(Point3D::new(q.x, q.y, z));
        }
    }

    let mut indices = Vec::with_capacity((rings.len() - 1) * n * 6 + (n - 2) * 6);
    for r in 0..rings.len() - 1 {
        let lower = (r * n) as u32;
        let upper = ((r + 1) * n) as u32;
        for i in 0..n as u32 {
            let j = (i + 1) % n as u32;
            let (a, b, c, d) = (lower + i, lower + j, upper + j, upper + i);
            indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
    }

    let back = 0_u32;
    let front = ((rings.len() - 1) * n) as u32;
    for [a, b, c] in triangulate(&contour) {
        let (a, b, c) = (a as u32, b as u32, c as u32);
        indices.extend_from_slice(&[front + a, front + b, front + c]);
        indices.extend_from_slice(&[back + a, back + c, back + b]);
    }

    let mut solid = InflatedSolid {
        positions,
        normals: Vec::new(),
        indices,
    };
    solid.recompute_normals();
    solid
}

/// `(outward offset, z)` for every ring, back to front
fn ring_profile(depth: f32, bevel: &BevelParams) -> Vec<(f32, f32)> {
    let segments = bevel.segments.max(1);
    let half = depth / 2.0;
    let step = |b: u32| {
        let angle = b as f32 / segments as f32 * FRAC_PI_2;
        (bevel.size * angle.sin(), bevel.thickness * angle.cos())
    };

    let mut rings = Vec::with_capacity(2 * (segments as usize + 1));
    for b in 0..=segments {
        let (offset, extra) = step(b);
        rings.push((offset, -half - extra));
    }
    for b in (0..=segments).rev() {
        let (offset, extra) = step(b);
        rings.push((offset, half + extra));
    }
    rings
}

/// Per-vertex outward miter directions, scaled so parallel edges move by the
/// full offset
fn miter_offsets(contour: &[Point2D]) -> Vec<Vector2D> {
    let n = contour.len();
    (0..n)
        .map(|i| {
            let prev = contour[(i + n - 1) % n];
            let here = contour[i];
            let next = contour[(i + 1) % n];

            let n_in = (here - prev).normalize().perpendicular();
            let n_out = (next - here).normalize().perpendicular();
            let miter = (n_in + n_out).normalize();
            if miter == Vector2D::ZERO {
                return n_out;
            }
            let cos = (miter.x * n_out.x + miter.y * n_out.y).max(MIN_MITER_COS);
            miter / cos
        })
        .collect()
}

/// Ear-clipping triangulation of a counter-clockwise polygon.
///
/// Self-intersecting input can leave no valid ear; the remainder is then
/// fanned so the cap still has `n - 2` triangles.
pub(crate) fn triangulate(polygon: &[Point2D]) -> Vec<[usize; 3]> {
    let mut remaining: Vec<usize> = (0..polygon.len()).collect();
    let mut triangles = Vec::with_capacity(polygon.len().saturating_sub(2));

    while remaining.len() > 3 {
        let m = remaining.len();
        let ear = (0..m).find(|&k| {
            let a = remaining[(k + m - 1) % m];
            let b = remaining[k];
            let c = remaining[(k + 1) % m];
            is_ear(polygon, &remaining, a, b, c)
        });

        let Some(k) = ear else {
            tracing::debug!(left = m, "no ear found, fanning remainder");
            break;
        };
        let a = remaining[(k + m - 1) % m];
        let c = remaining[(k + 1) % m];
        triangles.push([a, remaining[k], c]);
        remaining.remove(k);
    }

    if remaining.len() >= 3 {
        for k in 1..remaining.len() - 1 {
            triangles.push([remaining[0], remaining[k], remaining[k + 1]]);
        }
    }

    triangles
}

fn is_ear(polygon: &[Point2D], remaining: &[usize], a: usize, b: usize, c: usize) -> bool {
    let (pa, pb, pc) = (polygon[a], polygon[b], polygon[c]);
    if (pb - pa).cross(&(pc - pb)) <= 0.0 {
        return false;
    }
    !remaining
        .iter()
        .filter(|&&i| i != a && i != b && i != c)
        .any(|&i| inside_triangle(polygon[i], pa, pb, pc))
}

fn inside_triangle(p: Point2D, a: Point2D, b: Point2D, c: Point2D) -> bool {
    let d1 = (b - a).cross(&(p - a));
    let d2 = (c - b).cross(&(p - b));
    let d3 = (a - c).cross(&(p - c));
    d1 >= 0.0 && d2 >= 0.0 && d3 >= 0.0
}
