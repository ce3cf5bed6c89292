use crate::mesh::{MeshData, Vertex};
use glam::Vec3;
use std::f32::consts::{PI, TAU};
use stilllife_common::ShapeKind;

pub const CYLINDER_SEGMENTS: u32 = 36;
pub const TORUS_RING_SEGMENTS: u32 = 48;
pub const TORUS_TUBE_SEGMENTS: u32 = 16;
pub const TORUS_TUBE_RADIUS: f32 = 0.2;
pub const SPHERE_SEGMENTS: u32 = 36;
pub const SPHERE_RINGS: u32 = 18;

/// Build the mesh for a base shape.
pub fn generate(shape: ShapeKind) -> MeshData {
    match shape {
        ShapeKind::Plane => plane_mesh(),
        ShapeKind::Box => box_mesh(),
        ShapeKind::Cylinder => cylinder_mesh(CYLINDER_SEGMENTS),
        ShapeKind::Torus => torus_mesh(TORUS_RING_SEGMENTS, TORUS_TUBE_SEGMENTS, TORUS_TUBE_RADIUS),
        ShapeKind::Sphere => sphere_mesh(SPHERE_SEGMENTS, SPHERE_RINGS),
    }
}

/// Square in the XZ plane at y = 0 spanning -1..1, facing +Y.
pub fn plane_mesh() -> MeshData {
    let mut mesh = MeshData::default();
    let corners = [
        ([-1.0, -1.0], [0.0, 0.0]),
        ([1.0, -1.0], [1.0, 0.0]),
        ([1.0, 1.0], [1.0, 1.0]),
        ([-1.0, 1.0], [0.0, 1.0]),
    ];
    for ([x, z], uv) in corners {
        mesh.vertices
            .push(Vertex::new(Vec3::new(x, 0.0, z), Vec3::Y, uv));
    }
    mesh.push_triangle(0, 2, 1);
    mesh.push_triangle(0, 3, 2);
    mesh
}

/// Unit cube centred on the origin, one quad per face.
pub fn box_mesh() -> MeshData {
    // (outward normal, u axis, v axis) with u × v = normal
    let faces = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];
    let mut mesh = MeshData::default();
    for (normal, u, v) in faces {
        let base = mesh.base();
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = (normal + u * su + v * sv) * 0.5;
            let uv = [(su + 1.0) * 0.5, (sv + 1.0) * 0.5];
            mesh.vertices.push(Vertex::new(position, normal, uv));
        }
        mesh.push_triangle(base, base + 1, base + 2);
        mesh.push_triangle(base + 2, base + 3, base);
    }
    mesh
}

/// Radius-1 cylinder standing on y = 0 with its top cap at y = 1.
pub fn cylinder_mesh(segments: u32) -> MeshData {
    let segs = segments.max(3);
    let mut mesh = MeshData::default();

    // Side wall: a bottom/top vertex pair per column, seam duplicated for UVs.
    for i in 0..=segs {
        let t = i as f32 / segs as f32;
        let (sin, cos) = (t * TAU).sin_cos();
        let normal = Vec3::new(cos, 0.0, sin);
        mesh.vertices
            .push(Vertex::new(Vec3::new(cos, 0.0, sin), normal, [t, 0.0]));
        mesh.vertices
            .push(Vertex::new(Vec3::new(cos, 1.0, sin), normal, [t, 1.0]));
    }
    for i in 0..segs {
        let b0 = i * 2;
        let t0 = b0 + 1;
        let b1 = b0 + 2;
        let t1 = b0 + 3;
        mesh.push_triangle(b0, t0, b1);
        mesh.push_triangle(t0, t1, b1);
    }

    push_cap(&mut mesh, segs, 0.0, Vec3::NEG_Y);
    push_cap(&mut mesh, segs, 1.0, Vec3::Y);
    mesh
}

fn push_cap(mesh: &mut MeshData, segs: u32, y: f32, normal: Vec3) {
    let center = mesh.base();
    mesh.vertices
        .push(Vertex::new(Vec3::new(0.0, y, 0.0), normal, [0.5, 0.5]));
    for i in 0..=segs {
        let (sin, cos) = (i as f32 / segs as f32 * TAU).sin_cos();
        let uv = [0.5 + 0.5 * cos, 0.5 + 0.5 * sin];
        mesh.vertices
            .push(Vertex::new(Vec3::new(cos, y, sin), normal, uv));
    }
    for i in 0..segs {
        let current = center + 1 + i;
        if normal.y > 0.0 {
            mesh.push_triangle(center, current + 1, current);
        } else {
            mesh.push_triangle(center, current, current + 1);
        }
    }
}

/// Torus lying in the XY plane around +Z with a main radius of 1.
pub fn torus_mesh(ring_segments: u32, tube_segments: u32, tube_radius: f32) -> MeshData {
    let rings = ring_segments.max(3);
    let tubes = tube_segments.max(3);
    let mut mesh = MeshData::default();

    for i in 0..=rings {
        let s = i as f32 / rings as f32;
        let (sin_u, cos_u) = (s * TAU).sin_cos();
        let center = Vec3::new(cos_u, sin_u, 0.0);
        for j in 0..=tubes {
            let t = j as f32 / tubes as f32;
            let (sin_v, cos_v) = (t * TAU).sin_cos();
            let normal = Vec3::new(cos_v * cos_u, cos_v * sin_u, sin_v);
            mesh.vertices
                .push(Vertex::new(center + normal * tube_radius, normal, [s, t]));
        }
    }

    let stride = tubes + 1;
    for i in 0..rings {
        for j in 0..tubes {
            let a = i * stride + j;
            let b = a + stride;
            mesh.push_triangle(a, b, a + 1);
            mesh.push_triangle(b, b + 1, a + 1);
        }
    }
    mesh
}

/// UV sphere of radius 1 centred on the origin, poles on the Y axis.
pub fn sphere_mesh(segments: u32, rings: u32) -> MeshData {
    let long_segs = segments.max(3);
    let lat_segs = rings.max(2);
    let mut mesh = MeshData::default();

    for lat in 0..=lat_segs {
        let v = lat as f32 / lat_segs as f32;
        let (sin_theta, cos_theta) = (v * PI).sin_cos();
        for long in 0..=long_segs {
            let u = long as f32 / long_segs as f32;
            let (sin_phi, cos_phi) = (u * TAU).sin_cos();
            let p = Vec3::new(sin_theta * cos_phi, cos_theta, sin_theta * sin_phi);
            mesh.vertices.push(Vertex::new(p, p, [u, 1.0 - v]));
        }
    }

    let stride = long_segs + 1;
    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * stride + long;
            let second = first + stride;
            mesh.push_triangle(first, first + 1, second);
            mesh.push_triangle(second, first + 1, second + 1);
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward(mesh: &MeshData) {
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize]);
            let pa = Vec3::from(a.position);
            let face = (Vec3::from(b.position) - pa).cross(Vec3::from(c.position) - pa);
            let normal = Vec3::from(a.normal) + Vec3::from(b.normal) + Vec3::from(c.normal);
            assert!(face.dot(normal) >= -1e-6, "inward triangle {tri:?}");
        }
    }

    #[test]
    fn every_shape_has_valid_indices() {
        for shape in ShapeKind::ALL {
            let mesh = generate(shape);
            assert!(mesh.triangle_count() > 0, "{shape} is empty");
            assert_eq!(mesh.indices.len() % 3, 0);
            let n = mesh.vertices.len() as u32;
            assert!(mesh.indices.iter().all(|&i| i < n), "{shape} index out of range");
        }
    }

    #[test]
    fn every_shape_winds_outward() {
        for shape in ShapeKind::ALL {
            assert_outward(&generate(shape));
        }
    }

    #[test]
    fn normals_are_unit_length() {
        for shape in ShapeKind::ALL {
            for v in generate(shape).vertices {
                let len = Vec3::from(v.normal).length();
                assert!((len - 1.0).abs() < 1e-4, "{shape} normal length {len}");
            }
        }
    }

    #[test]
    fn plane_spans_xz() {
        let mesh = plane_mesh();
        let (lo, hi) = mesh.bounds().unwrap();
        assert!(lo.abs_diff_eq(Vec3::new(-1.0, 0.0, -1.0), 1e-6));
        assert!(hi.abs_diff_eq(Vec3::new(1.0, 0.0, 1.0), 1e-6));
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn box_is_unit_and_centred() {
        let mesh = box_mesh();
        let (lo, hi) = mesh.bounds().unwrap();
        assert!(lo.abs_diff_eq(Vec3::splat(-0.5), 1e-6));
        assert!(hi.abs_diff_eq(Vec3::splat(0.5), 1e-6));
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn cylinder_stands_on_origin() {
        let mesh = cylinder_mesh(CYLINDER_SEGMENTS);
        let (lo, hi) = mesh.bounds().unwrap();
        assert!((lo.y - 0.0).abs() < 1e-6);
        assert!((hi.y - 1.0).abs() < 1e-6);
        assert!((hi.x - 1.0).abs() < 1e-4);
        assert!((lo.z + 1.0).abs() < 1e-4);
    }

    #[test]
    fn torus_lies_around_z() {
        let mesh = torus_mesh(TORUS_RING_SEGMENTS, TORUS_TUBE_SEGMENTS, TORUS_TUBE_RADIUS);
        let (lo, hi) = mesh.bounds().unwrap();
        assert!((hi.z - TORUS_TUBE_RADIUS).abs() < 1e-4);
        assert!((lo.z + TORUS_TUBE_RADIUS).abs() < 1e-4);
        assert!((hi.x - 1.2).abs() < 1e-4);
        for v in &mesh.vertices {
            let p = Vec3::from(v.position);
            let ring = Vec3::new(p.x, p.y, 0.0).normalize();
            assert!((p.distance(ring) - TORUS_TUBE_RADIUS).abs() < 1e-4);
        }
    }

    #[test]
    fn sphere_is_unit_radius() {
        let mesh = sphere_mesh(SPHERE_SEGMENTS, SPHERE_RINGS);
        for v in &mesh.vertices {
            assert!((Vec3::from(v.position).length() - 1.0).abs() < 1e-5);
        }
        let (lo, hi) = mesh.bounds().unwrap();
        assert!((hi.y - 1.0).abs() < 1e-6);
        assert!((lo.y + 1.0).abs() < 1e-6);
    }
}
