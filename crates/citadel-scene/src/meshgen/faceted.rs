//! Flat-shaded convex solids. Each face gets its own vertices so normals stay sharp.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::vertex::MeshData;

use super::{push_flat_quad, push_flat_triangle};

const TRIANGLE_UVS: [Vec2; 3] = [
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.5, 0.0),
];

/// Prism with a triangular cross-section in XY (apex up), extruded along Z.
pub fn create_triangular_prism(width: f32, height: f32, depth: f32) -> MeshData {
    let w = 0.5 * width;
    let h = 0.5 * height;
    let d = 0.5 * depth;

    let interior = Vec3::ZERO;
    let mut mesh = MeshData::new();

    for z in [-d, d] {
        push_flat_triangle(
            &mut mesh,
            interior,
            [Vec3::new(-w, -h, z), Vec3::new(w, -h, z), Vec3::new(0.0, h, z)],
            TRIANGLE_UVS,
        );
    }

    // bottom
    push_flat_quad(
        &mut mesh,
        interior,
        [
            Vec3::new(-w, -h, -d),
            Vec3::new(-w, -h, d),
            Vec3::new(w, -h, d),
            Vec3::new(w, -h, -d),
        ],
    );
    // left slope
    push_flat_quad(
        &mut mesh,
        interior,
        [
            Vec3::new(-w, -h, d),
            Vec3::new(0.0, h, d),
            Vec3::new(0.0, h, -d),
            Vec3::new(-w, -h, -d),
        ],
    );
    // right slope
    push_flat_quad(
        &mut mesh,
        interior,
        [
            Vec3::new(w, -h, -d),
            Vec3::new(0.0, h, -d),
            Vec3::new(0.0, h, d),
            Vec3::new(w, -h, d),
        ],
    );

    mesh
}

/// Square pyramid: base at `-height / 2`, apex at `+height / 2`.
pub fn create_pyramid(width: f32, height: f32, depth: f32) -> MeshData {
    let w = 0.5 * width;
    let h = 0.5 * height;
    let d = 0.5 * depth;

    let interior = Vec3::ZERO;
    let apex = Vec3::new(0.0, h, 0.0);
    let base = [
        Vec3::new(-w, -h, -d),
        Vec3::new(w, -h, -d),
        Vec3::new(w, -h, d),
        Vec3::new(-w, -h, d),
    ];

    let mut mesh = MeshData::new();
    for k in 0..base.len() {
        let next = base[(k + 1) % base.len()];
        push_flat_triangle(&mut mesh, interior, [base[k], next, apex], TRIANGLE_UVS);
    }
    push_flat_quad(&mut mesh, interior, [base[3], base[0], base[1], base[2]]);

    mesh
}

/// Ramp: full-height back face at `-depth / 2`, sloping down to the front edge at `+depth / 2`.
pub fn create_wedge(width: f32, height: f32, depth: f32) -> MeshData {
    let w = 0.5 * width;
    let h = 0.5 * height;
    let d = 0.5 * depth;

    // Centroid of the right-triangle cross-section; the origin lies on the slope.
    let interior = Vec3::new(0.0, -h / 3.0, -d / 3.0);

    let b0 = Vec3::new(-w, -h, -d);
    let b1 = Vec3::new(w, -h, -d);
    let b2 = Vec3::new(w, -h, d);
    let b3 = Vec3::new(-w, -h, d);
    let t0 = Vec3::new(-w, h, -d);
    let t1 = Vec3::new(w, h, -d);

    let mut mesh = MeshData::new();
    push_flat_quad(&mut mesh, interior, [b3, b0, b1, b2]);
    push_flat_quad(&mut mesh, interior, [b0, t0, t1, b1]);
    push_flat_quad(&mut mesh, interior, [b3, t0, t1, b2]);
    push_flat_triangle(&mut mesh, interior, [b3, b0, t0], TRIANGLE_UVS);
    push_flat_triangle(&mut mesh, interior, [b1, b2, t1], TRIANGLE_UVS);

    mesh
}

/// Cut gem: a flat table on top, a sloped crown down to the girdle at `y = 0`,
/// and a pavilion closing to a point below.
pub fn create_diamond(
    girdle_width: f32,
    table_width: f32,
    crown_height: f32,
    pavilion_height: f32,
    facets: u32,
) -> MeshData {
    let facets = facets.max(3);
    let girdle_radius = 0.5 * girdle_width;
    let table_radius = 0.5 * table_width;

    let ring = |radius: f32, y: f32| -> Vec<Vec3> {
        (0..facets)
            .map(|k| {
                let (s, c) = (k as f32 / facets as f32 * TAU).sin_cos();
                Vec3::new(radius * c, y, radius * s)
            })
            .collect()
    };

    let girdle = ring(girdle_radius, 0.0);
    let table = ring(table_radius, crown_height);
    let table_center = Vec3::new(0.0, crown_height, 0.0);
    let culet = Vec3::new(0.0, -pavilion_height, 0.0);

    let interior = Vec3::ZERO;
    let planar_uv = |p: Vec3| {
        Vec2::new(p.x / girdle_width.max(f32::EPSILON) + 0.5, p.z / girdle_width.max(f32::EPSILON) + 0.5)
    };

    let mut mesh = MeshData::new();
    for k in 0..facets as usize {
        let next = (k + 1) % facets as usize;

        push_flat_triangle(
            &mut mesh,
            interior,
            [table_center, table[k], table[next]],
            [planar_uv(table_center), planar_uv(table[k]), planar_uv(table[next])],
        );
        push_flat_quad(&mut mesh, interior, [girdle[k], table[k], table[next], girdle[next]]);
        push_flat_triangle(&mut mesh, interior, [girdle[k], girdle[next], culet], TRIANGLE_UVS);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward(mesh: &MeshData, interior: Vec3) {
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize]);
            let face = (b.position() - a.position()).cross(c.position() - a.position());
            let centroid = (a.position() + b.position() + c.position()) / 3.0;
            assert!(face.dot(centroid - interior) > 0.0);
            assert!(face.normalize().abs_diff_eq(a.normal(), 1e-5));
        }
    }

    #[test]
    fn prism_has_two_caps_and_three_sides() {
        let mesh = create_triangular_prism(1.0, 1.0, 1.0);
        assert_eq!(mesh.index_count(), (2 + 3 * 2) * 3);
        assert_outward(&mesh, Vec3::ZERO);
    }

    #[test]
    fn pyramid_faces_wind_outward() {
        let mesh = create_pyramid(1.0, 1.0, 1.0);
        assert_eq!(mesh.index_count(), (4 + 2) * 3);
        assert_outward(&mesh, Vec3::ZERO);
    }

    #[test]
    fn wedge_faces_wind_outward() {
        let mesh = create_wedge(1.0, 1.0, 2.0);
        assert_eq!(mesh.index_count(), (3 * 2 + 2) * 3);
        assert_outward(&mesh, Vec3::new(0.0, -1.0 / 6.0, -1.0 / 3.0));
    }

    #[test]
    fn diamond_facets_wind_outward() {
        let mesh = create_diamond(1.0, 0.7, 0.3, 1.0, 6);
        assert_eq!(mesh.index_count(), 6 * 4 * 3);
        assert_outward(&mesh, Vec3::ZERO);
    }
}
