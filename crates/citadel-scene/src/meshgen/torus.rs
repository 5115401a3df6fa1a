use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::vertex::{MeshData, Vertex};

/// Torus lying in the XZ plane.
///
/// `tube_radius` is the radius of the swept circle, `ring_radius` the distance
/// from the origin to the tube center. Both seams are duplicated for texturing.
pub fn create_torus(
    tube_radius: f32,
    ring_radius: f32,
    ring_segments: u32,
    tube_segments: u32,
) -> MeshData {
    let ring_segments = ring_segments.max(3);
    let tube_segments = tube_segments.max(3);

    let mut mesh = MeshData::new();

    for i in 0..=ring_segments {
        let u = i as f32 / ring_segments as f32;
        let (sin_theta, cos_theta) = (u * TAU).sin_cos();
        let center = Vec3::new(ring_radius * cos_theta, 0.0, ring_radius * sin_theta);

        for j in 0..=tube_segments {
            let v = j as f32 / tube_segments as f32;
            let (sin_phi, cos_phi) = (v * TAU).sin_cos();
            let normal = Vec3::new(cos_phi * cos_theta, sin_phi, cos_phi * sin_theta);
            mesh.push_vertex(Vertex::new(
                center + tube_radius * normal,
                normal,
                Vec2::new(u, v),
            ));
        }
    }

    let column = tube_segments + 1;
    for i in 0..ring_segments {
        for j in 0..tube_segments {
            let a = i * column + j;
            let b = (i + 1) * column + j;
            mesh.push_triangle(a, a + 1, b);
            mesh.push_triangle(b, a + 1, b + 1);
        }
    }

    mesh
}
