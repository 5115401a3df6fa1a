use glam::{Vec2, Vec3};

use crate::vertex::{MeshData, Vertex};

/// Flat `width` x `depth` grid in the XZ plane with `rows` x `cols` vertices.
///
/// Rows run along -Z, columns along +X. Texture coordinates span [0, 1] over the grid.
pub fn create_grid(width: f32, depth: f32, rows: u32, cols: u32) -> MeshData {
    let rows = rows.max(2);
    let cols = cols.max(2);

    let half_width = 0.5 * width;
    let half_depth = 0.5 * depth;

    let dx = width / (cols - 1) as f32;
    let dz = depth / (rows - 1) as f32;
    let du = 1.0 / (cols - 1) as f32;
    let dv = 1.0 / (rows - 1) as f32;

    let mut mesh = MeshData {
        vertices: Vec::with_capacity((rows * cols) as usize),
        indices: Vec::with_capacity(((rows - 1) * (cols - 1) * 6) as usize),
    };

    for i in 0..rows {
        let z = half_depth - i as f32 * dz;
        for j in 0..cols {
            let x = -half_width + j as f32 * dx;
            mesh.push_vertex(Vertex::new(
                Vec3::new(x, 0.0, z),
                Vec3::Y,
                Vec2::new(j as f32 * du, i as f32 * dv),
            ));
        }
    }

    for i in 0..rows - 1 {
        for j in 0..cols - 1 {
            let top_left = i * cols + j;
            let bottom_left = (i + 1) * cols + j;
            mesh.push_triangle(top_left, top_left + 1, bottom_left);
            mesh.push_triangle(bottom_left, top_left + 1, bottom_left + 1);
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_follow_rows_and_columns() {
        let mesh = create_grid(50.0, 50.0, 60, 40);
        assert_eq!(mesh.vertex_count(), 60 * 40);
        assert_eq!(mesh.index_count(), 59 * 39 * 6);
    }

    #[test]
    fn corners_span_the_requested_extent() {
        let mesh = create_grid(10.0, 4.0, 3, 3);
        let first = mesh.vertices.first().unwrap().position();
        let last = mesh.vertices.last().unwrap().position();
        assert_eq!(first, Vec3::new(-5.0, 0.0, 2.0));
        assert_eq!(last, Vec3::new(5.0, 0.0, -2.0));
    }
}
