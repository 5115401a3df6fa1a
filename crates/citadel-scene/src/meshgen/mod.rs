//! Procedural primitive meshes.
//!
//! Every generator returns a [`MeshData`] centered on the origin with
//! mesh-local indices. Front faces wind clockwise when viewed from outside
//! (left-handed, +Y up), matching the camera and projection conventions used
//! by the renderer.
//!
//! Adding a primitive:
//! - add a generator file under `meshgen::*`
//! - re-export it here
//! - register it in the castle mesh list if the scene needs it

mod box_mesh;
mod cylinder;
mod faceted;
mod grid;
mod sphere;
mod torus;

pub use box_mesh::create_box;
pub use cylinder::{create_cone, create_cylinder};
pub use faceted::{create_diamond, create_pyramid, create_triangular_prism, create_wedge};
pub use grid::create_grid;
pub use sphere::create_sphere;
pub use torus::create_torus;

use glam::{Vec2, Vec3};

use crate::vertex::{MeshData, Vertex};

/// Upper bound on box subdivision; each level quadruples the triangle count.
pub const MAX_SUBDIVISIONS: u32 = 6;

/// Splits every triangle into four, inserting edge midpoints.
///
/// Vertices are not shared between the generated triangles.
pub fn subdivide(mesh: &MeshData) -> MeshData {
    let mut out = MeshData {
        vertices: Vec::with_capacity(mesh.indices.len() * 2),
        indices: Vec::with_capacity(mesh.indices.len() * 4),
    };

    for tri in mesh.indices.chunks_exact(3) {
        let v0 = mesh.vertices[tri[0] as usize];
        let v1 = mesh.vertices[tri[1] as usize];
        let v2 = mesh.vertices[tri[2] as usize];

        let m0 = midpoint(&v0, &v1);
        let m1 = midpoint(&v1, &v2);
        let m2 = midpoint(&v0, &v2);

        let base = out.vertices.len() as u32;
        out.vertices.extend_from_slice(&[v0, v1, v2, m0, m1, m2]);

        //        v1
        //        *
        //       / \
        //   m0 *---* m1
        //     / \ / \
        // v0 *---*---* v2
        //        m2
        out.push_triangle(base, base + 3, base + 5);
        out.push_triangle(base + 3, base + 4, base + 5);
        out.push_triangle(base + 5, base + 4, base + 2);
        out.push_triangle(base + 3, base + 1, base + 4);
    }

    out
}

fn midpoint(a: &Vertex, b: &Vertex) -> Vertex {
    Vertex::new(
        (a.position() + b.position()) * 0.5,
        (a.normal() + b.normal()).normalize_or_zero(),
        (a.tex_coord() + b.tex_coord()) * 0.5,
    )
}

/// Appends a flat-shaded triangle whose face normal points away from `interior`.
///
/// The winding is swapped when needed so front faces stay clockwise from outside.
/// Only valid for convex shapes where `interior` lies strictly inside.
pub(crate) fn push_flat_triangle(
    mesh: &mut MeshData,
    interior: Vec3,
    corners: [Vec3; 3],
    uvs: [Vec2; 3],
) {
    let [a, mut b, mut c] = corners;
    let [uv_a, mut uv_b, mut uv_c] = uvs;

    let mut normal = (b - a).cross(c - a);
    let centroid = (a + b + c) / 3.0;
    if normal.dot(centroid - interior) < 0.0 {
        normal = -normal;
        std::mem::swap(&mut b, &mut c);
        std::mem::swap(&mut uv_b, &mut uv_c);
    }
    let normal = normal.normalize_or_zero();

    let i0 = mesh.push_vertex(Vertex::new(a, normal, uv_a));
    let i1 = mesh.push_vertex(Vertex::new(b, normal, uv_b));
    let i2 = mesh.push_vertex(Vertex::new(c, normal, uv_c));
    mesh.push_triangle(i0, i1, i2);
}

/// Appends a flat quad given as bottom-left, top-left, top-right, bottom-right.
pub(crate) fn push_flat_quad(mesh: &mut MeshData, interior: Vec3, corners: [Vec3; 4]) {
    let [bl, tl, tr, br] = corners;
    push_flat_triangle(
        mesh,
        interior,
        [bl, tl, tr],
        [Vec2::new(0.0, 1.0), Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)],
    );
    push_flat_triangle(
        mesh,
        interior,
        [bl, tr, br],
        [Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indices_in_range(mesh: &MeshData) {
        let count = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
        assert_eq!(mesh.index_count() % 3, 0);
    }

    #[test]
    fn subdivide_quadruples_triangles() {
        let coarse = create_box(1.0, 1.0, 1.0, 0);
        let fine = subdivide(&coarse);
        assert_eq!(fine.index_count(), coarse.index_count() * 4);
        assert_indices_in_range(&fine);
    }

    #[test]
    fn flat_triangle_normal_faces_outward() {
        let mut mesh = MeshData::new();
        // Deliberately wound the "wrong" way relative to the interior point.
        push_flat_triangle(
            &mut mesh,
            Vec3::ZERO,
            [Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 1.0)],
            [Vec2::ZERO; 3],
        );
        assert!(mesh.vertices.iter().all(|v| v.normal()[1] > 0.99));
    }

    #[test]
    fn every_generator_produces_valid_streams() {
        let meshes = [
            create_box(1.0, 1.0, 1.0, 3),
            create_grid(50.0, 50.0, 60, 40),
            create_sphere(0.5, 20, 20),
            create_cylinder(0.5, 0.5, 2.0, 20, 20),
            create_cone(0.5, 1.0, 20, 1),
            create_triangular_prism(1.0, 1.0, 1.0),
            create_diamond(1.0, 0.7, 0.3, 1.0, 6),
            create_pyramid(1.0, 1.0, 1.0),
            create_torus(0.3, 2.0, 20, 20),
            create_wedge(1.0, 1.0, 2.0),
        ];
        for mesh in &meshes {
            assert!(mesh.vertex_count() > 0);
            assert!(mesh.vertex_count() <= u16::MAX as usize + 1);
            assert_indices_in_range(mesh);
        }
    }
}
