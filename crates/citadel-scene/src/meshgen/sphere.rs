use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::vertex::{MeshData, Vertex};

/// UV sphere: two poles plus `stacks - 1` rings of `slices + 1` vertices.
///
/// The seam column is duplicated so texture coordinates wrap cleanly.
pub fn create_sphere(radius: f32, slices: u32, stacks: u32) -> MeshData {
    let slices = slices.max(3);
    let stacks = stacks.max(2);

    let mut mesh = MeshData::new();

    let north = mesh.push_vertex(Vertex::new(
        Vec3::new(0.0, radius, 0.0),
        Vec3::Y,
        Vec2::new(0.0, 0.0),
    ));

    let phi_step = PI / stacks as f32;
    let theta_step = TAU / slices as f32;

    for i in 1..stacks {
        let phi = i as f32 * phi_step;
        for j in 0..=slices {
            let theta = j as f32 * theta_step;
            let position = Vec3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.cos(),
                radius * phi.sin() * theta.sin(),
            );
            mesh.push_vertex(Vertex::new(
                position,
                position.normalize_or_zero(),
                Vec2::new(theta / TAU, phi / PI),
            ));
        }
    }

    let south = mesh.push_vertex(Vertex::new(
        Vec3::new(0.0, -radius, 0.0),
        Vec3::NEG_Y,
        Vec2::new(0.0, 1.0),
    ));

    let ring = slices + 1;

    for j in 1..=slices {
        mesh.push_triangle(north, j + 1, j);
    }

    // Offset past the north pole.
    let base = 1;
    for i in 0..stacks - 2 {
        for j in 0..slices {
            let upper = base + i * ring + j;
            let lower = base + (i + 1) * ring + j;
            mesh.push_triangle(upper, upper + 1, lower);
            mesh.push_triangle(lower, upper + 1, lower + 1);
        }
    }

    let last_ring = south - ring;
    for j in 0..slices {
        mesh.push_triangle(south, last_ring + j, last_ring + j + 1);
    }

    mesh
}
