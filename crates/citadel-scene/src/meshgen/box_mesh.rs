use glam::{Vec2, Vec3};

use crate::vertex::{MeshData, Vertex};

use super::{subdivide, MAX_SUBDIVISIONS};

/// Axis-aligned box of the given extents, 4 vertices per face.
///
/// `subdivisions` is clamped to [`MAX_SUBDIVISIONS`].
pub fn create_box(width: f32, height: f32, depth: f32, subdivisions: u32) -> MeshData {
    let w = 0.5 * width;
    let h = 0.5 * height;
    let d = 0.5 * depth;

    let mut mesh = MeshData::new();

    // Corners listed bottom-left, top-left, top-right, bottom-right as seen
    // from outside the face.
    let faces: [([Vec3; 4], Vec3); 6] = [
        // front (-Z)
        (
            [
                Vec3::new(-w, -h, -d),
                Vec3::new(-w, h, -d),
                Vec3::new(w, h, -d),
                Vec3::new(w, -h, -d),
            ],
            Vec3::NEG_Z,
        ),
        // back (+Z)
        (
            [
                Vec3::new(w, -h, d),
                Vec3::new(w, h, d),
                Vec3::new(-w, h, d),
                Vec3::new(-w, -h, d),
            ],
            Vec3::Z,
        ),
        // top (+Y)
        (
            [
                Vec3::new(-w, h, -d),
                Vec3::new(-w, h, d),
                Vec3::new(w, h, d),
                Vec3::new(w, h, -d),
            ],
            Vec3::Y,
        ),
        // bottom (-Y)
        (
            [
                Vec3::new(-w, -h, d),
                Vec3::new(-w, -h, -d),
                Vec3::new(w, -h, -d),
                Vec3::new(w, -h, d),
            ],
            Vec3::NEG_Y,
        ),
        // left (-X)
        (
            [
                Vec3::new(-w, -h, d),
                Vec3::new(-w, h, d),
                Vec3::new(-w, h, -d),
                Vec3::new(-w, -h, -d),
            ],
            Vec3::NEG_X,
        ),
        // right (+X)
        (
            [
                Vec3::new(w, -h, -d),
                Vec3::new(w, h, -d),
                Vec3::new(w, h, d),
                Vec3::new(w, -h, d),
            ],
            Vec3::X,
        ),
    ];

    let uvs = [
        Vec2::new(0.0, 1.0),
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
    ];

    for (corners, normal) in faces {
        let base = mesh.vertices.len() as u32;
        for (corner, uv) in corners.into_iter().zip(uvs) {
            mesh.push_vertex(Vertex::new(corner, normal, uv));
        }
        mesh.push_triangle(base, base + 1, base + 2);
        mesh.push_triangle(base, base + 2, base + 3);
    }

    for _ in 0..subdivisions.min(MAX_SUBDIVISIONS) {
        mesh = subdivide(&mesh);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsubdivided_box_has_24_vertices_and_36_indices() {
        let mesh = create_box(1.0, 1.0, 1.0, 0);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);
    }

    #[test]
    fn front_face_normal_matches_winding() {
        let mesh = create_box(2.0, 2.0, 2.0, 0);
        let [a, b, c] = [0, 1, 2].map(|i| mesh.vertices[mesh.indices[i] as usize].position());
        let winding_normal = (b - a).cross(c - a).normalize();
        assert!(winding_normal.abs_diff_eq(mesh.vertices[0].normal(), 1e-6));
    }

    #[test]
    fn subdivisions_are_clamped() {
        let capped = create_box(1.0, 1.0, 1.0, MAX_SUBDIVISIONS);
        let over = create_box(1.0, 1.0, 1.0, MAX_SUBDIVISIONS + 4);
        assert_eq!(capped.index_count(), over.index_count());
    }
}
