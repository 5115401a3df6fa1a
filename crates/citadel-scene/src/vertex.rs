use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Vertex layout shared by every mesh in the geometry batch.
///
/// Byte offsets are fixed: position at 0, normal at 12, texture coordinate at 24.
/// The shader input layout is derived from these offsets.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    pub const POSITION_OFFSET: u64 = 0;
    pub const NORMAL_OFFSET: u64 = 12;
    pub const TEX_COORD_OFFSET: u64 = 24;
    pub const STRIDE: u64 = std::mem::size_of::<Vertex>() as u64;

    #[inline]
    pub fn new(position: Vec3, normal: Vec3, tex_coord: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            tex_coord: tex_coord.to_array(),
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    #[inline]
    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }

    #[inline]
    pub fn tex_coord(&self) -> Vec2 {
        Vec2::from_array(self.tex_coord)
    }
}

/// CPU-side mesh produced by a generator.
///
/// Indices are local to the mesh (they start at 0) and are widened to 32 bits
/// here; the geometry batch narrows them to 16 bits when concatenating.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Appends a vertex and returns its local index.
    #[inline]
    pub fn push_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    #[inline]
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }
}
