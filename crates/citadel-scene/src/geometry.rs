//! Shared vertex/index storage for every shape in the scene.
//!
//! Meshes are concatenated in insertion order. Indices stay mesh-local and are
//! narrowed to `u16`; draws offset them with the submesh's `base_vertex`.

use std::collections::HashMap;

use crate::error::GeometryError;
use crate::vertex::{MeshData, Vertex};

/// Where one shape lives inside the batch.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SubmeshRange {
    pub index_count: u32,
    pub start_index: u32,
    pub base_vertex: i32,
}

/// One vertex buffer, one 16-bit index buffer, and a name -> range map.
///
/// Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct GeometryBatch {
    vertices: Vec<Vertex>,
    indices: Vec<u16>,
    names: Vec<String>,
    ranges: Vec<SubmeshRange>,
    by_name: HashMap<String, usize>,
}

impl GeometryBatch {
    /// Concatenates `meshes` in order, recording prefix-sum offsets for each.
    pub fn build<I, S>(meshes: I) -> Result<Self, GeometryError>
    where
        I: IntoIterator<Item = (S, MeshData)>,
        S: Into<String>,
    {
        let mut batch = Self::default();

        for (name, mesh) in meshes {
            let name = name.into();
            if batch.by_name.contains_key(&name) {
                return Err(GeometryError::DuplicateShape(name));
            }

            if let Some(&index) = mesh.indices.iter().find(|&&i| i > u16::MAX as u32) {
                return Err(GeometryError::IndexOverflow { name, index });
            }

            let range = SubmeshRange {
                index_count: mesh.indices.len() as u32,
                start_index: batch.indices.len() as u32,
                base_vertex: batch.vertices.len() as i32,
            };

            log::trace!(
                "geometry batch: `{name}` -> {} indices at {}, base vertex {}",
                range.index_count,
                range.start_index,
                range.base_vertex
            );

            batch.vertices.extend_from_slice(&mesh.vertices);
            batch.indices.extend(mesh.indices.iter().map(|&i| i as u16));

            batch.by_name.insert(name.clone(), batch.ranges.len());
            batch.names.push(name);
            batch.ranges.push(range);
        }

        log::debug!(
            "geometry batch built: {} shapes, {} vertices, {} indices",
            batch.names.len(),
            batch.vertices.len(),
            batch.indices.len()
        );

        Ok(batch)
    }

    pub fn submesh(&self, name: &str) -> Result<SubmeshRange, GeometryError> {
        self.by_name
            .get(name)
            .map(|&slot| self.ranges[slot])
            .ok_or_else(|| GeometryError::UnknownShape(name.to_owned()))
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    #[inline]
    pub fn shape_count(&self) -> usize {
        self.names.len()
    }

    /// Shapes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, SubmeshRange)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.ranges.iter().copied())
    }
}
