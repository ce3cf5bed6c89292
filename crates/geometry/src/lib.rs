//! Shape-mesh library: procedural geometry for the five base shapes.
//!
//! Every mesh carries positions, normals and texture coordinates and is
//! indexed with `u32` triangle lists.
//!
//! # Invariants
//! - Triangles wind counter-clockwise when seen from outside the shape.
//! - Every index is in range for the vertex list it accompanies.

mod mesh;
mod shapes;

pub use mesh::{MeshData, Vertex};
pub use shapes::{
    CYLINDER_SEGMENTS, SPHERE_RINGS, SPHERE_SEGMENTS, TORUS_RING_SEGMENTS, TORUS_TUBE_RADIUS,
    TORUS_TUBE_SEGMENTS, box_mesh, cylinder_mesh, generate, plane_mesh, sphere_mesh, torus_mesh,
};

pub fn crate_info() -> &'static str {
    "stilllife-geometry v0.1.0"
}
