use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::vertex::{MeshData, Vertex};

/// Truncated cone along +Y, centered on the origin, with both end caps.
///
/// `stacks` bands of `slices` quads; the seam column is duplicated.
pub fn create_cylinder(
    bottom_radius: f32,
    top_radius: f32,
    height: f32,
    slices: u32,
    stacks: u32,
) -> MeshData {
    let slices = slices.max(3);
    let stacks = stacks.max(1);

    let mut mesh = MeshData::new();
    push_side(&mut mesh, bottom_radius, top_radius, height, slices, stacks);
    push_cap(&mut mesh, top_radius, 0.5 * height, height, slices, CapFacing::Up);
    push_cap(&mut mesh, bottom_radius, -0.5 * height, height, slices, CapFacing::Down);
    mesh
}

/// Cone along +Y with its apex at `height / 2` and a closed base.
pub fn create_cone(radius: f32, height: f32, slices: u32, stacks: u32) -> MeshData {
    let slices = slices.max(3);
    let stacks = stacks.max(1);

    let mut mesh = MeshData::new();
    push_side(&mut mesh, radius, 0.0, height, slices, stacks);
    push_cap(&mut mesh, radius, -0.5 * height, height, slices, CapFacing::Down);
    mesh
}

fn push_side(
    mesh: &mut MeshData,
    bottom_radius: f32,
    top_radius: f32,
    height: f32,
    slices: u32,
    stacks: u32,
) {
    let base = mesh.vertices.len() as u32;

    let stack_height = height / stacks as f32;
    let radius_step = (top_radius - bottom_radius) / stacks as f32;
    let d_theta = TAU / slices as f32;
    let dr = bottom_radius - top_radius;

    for i in 0..=stacks {
        let y = -0.5 * height + i as f32 * stack_height;
        let r = bottom_radius + i as f32 * radius_step;

        for j in 0..=slices {
            let (s, c) = (j as f32 * d_theta).sin_cos();

            // Surface normal from the tangent around Y and the slant down the side.
            let tangent = Vec3::new(-s, 0.0, c);
            let bitangent = Vec3::new(dr * c, -height, dr * s);
            let normal = tangent.cross(bitangent).normalize_or_zero();

            mesh.push_vertex(Vertex::new(
                Vec3::new(r * c, y, r * s),
                normal,
                Vec2::new(j as f32 / slices as f32, 1.0 - i as f32 / stacks as f32),
            ));
        }
    }

    let ring = slices + 1;
    for i in 0..stacks {
        for j in 0..slices {
            let lower = base + i * ring + j;
            let upper = base + (i + 1) * ring + j;
            mesh.push_triangle(lower, upper, upper + 1);
            mesh.push_triangle(lower, upper + 1, lower + 1);
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CapFacing {
    Up,
    Down,
}

fn push_cap(
    mesh: &mut MeshData,
    radius: f32,
    y: f32,
    height: f32,
    slices: u32,
    facing: CapFacing,
) {
    let normal = match facing {
        CapFacing::Up => Vec3::Y,
        CapFacing::Down => Vec3::NEG_Y,
    };

    let base = mesh.vertices.len() as u32;
    let d_theta = TAU / slices as f32;

    for i in 0..=slices {
        let (s, c) = (i as f32 * d_theta).sin_cos();
        let x = radius * c;
        let z = radius * s;
        // Scale texture coordinates by height so caps match the side texel density.
        let uv = Vec2::new(x / height + 0.5, z / height + 0.5);
        mesh.push_vertex(Vertex::new(Vec3::new(x, y, z), normal, uv));
    }

    let center = mesh.push_vertex(Vertex::new(Vec3::new(0.0, y, 0.0), normal, Vec2::splat(0.5)));

    for i in 0..slices {
        match facing {
            CapFacing::Up => mesh.push_triangle(center, base + i + 1, base + i),
            CapFacing::Down => mesh.push_triangle(center, base + i, base + i + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn winding_normal(mesh: &MeshData, tri: usize) -> Vec3 {
        let [a, b, c] =
            [0, 1, 2].map(|k| mesh.vertices[mesh.indices[tri * 3 + k] as usize].position());
        (b - a).cross(c - a)
    }

    #[test]
    fn side_normals_point_away_from_axis() {
        let mesh = create_cylinder(1.0, 1.0, 2.0, 8, 1);
        for v in mesh.vertices.iter().take(9 * 2) {
            let radial = Vec3::new(v.position[0], 0.0, v.position[2]);
            assert!(v.normal().dot(radial) > 0.0);
        }
    }

    #[test]
    fn caps_wind_outward() {
        let mesh = create_cylinder(0.5, 0.5, 2.0, 8, 2);
        let tris = mesh.index_count() / 3;
        // Last `slices` triangles are the bottom cap, the block before it is the top.
        assert!(winding_normal(&mesh, tris - 1).y < 0.0);
        assert!(winding_normal(&mesh, tris - 9).y > 0.0);
    }

    #[test]
    fn cone_apex_collapses_to_a_point() {
        let mesh = create_cone(0.5, 1.0, 12, 1);
        let apex_ring = &mesh.vertices[13..26];
        assert!(apex_ring.iter().all(|v| v.position() == Vec3::new(0.0, 0.5, 0.0)));
    }
}
