//! Stroke-to-solid geometry
//!
//! - [`CurveFitter`]: stroke to closed, uniformly sampled planar curve
//! - [`extrude`]: planar curve to beveled prism
//! - [`MeshInflator`]: prism to recentered, puffed-out solid

mod curve;
mod extrude;
mod inflate;
mod mesh;

pub use curve::{CurveFitter, PlanarCurve};
pub use extrude::{extrude, BevelParams};
pub use inflate::{inflate_vertices, MeshInflator, CENTER_EPSILON, INFLATION_FRACTION};
pub use mesh::InflatedSolid;
