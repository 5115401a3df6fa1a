//! Named shading records.
//!
//! A material's id is its position in the table and doubles as its slot in
//! the per-frame material constant buffer.

use std::collections::HashMap;

use glam::{Mat4, Vec3, Vec4};

use crate::dirty::FramesDirty;
use crate::error::MaterialError;

/// Dense material handle; also the material's constant-buffer slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

impl MaterialId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub albedo: Vec4,
    pub fresnel_r0: Vec3,
    pub roughness: f32,
    pub transform: Mat4,
    /// Entry in the renderer's texture table.
    pub texture_index: u32,
    pub dirty: FramesDirty,
}

/// Registry of materials keyed by name, iterated in id order.
#[derive(Debug, Clone, Default)]
pub struct MaterialTable {
    materials: Vec<Material>,
    by_name: HashMap<String, MaterialId>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a material; ids are handed out sequentially from 0.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        albedo: Vec4,
        fresnel_r0: Vec3,
        roughness: f32,
        texture_index: u32,
    ) -> Result<MaterialId, MaterialError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(MaterialError::Duplicate(name));
        }

        let id = MaterialId(self.materials.len() as u32);
        log::debug!("material `{name}` -> slot {}", id.0);

        self.by_name.insert(name.clone(), id);
        self.materials.push(Material {
            name,
            albedo,
            fresnel_r0,
            roughness,
            transform: Mat4::IDENTITY,
            texture_index,
            dirty: FramesDirty::new(),
        });
        Ok(id)
    }

    pub fn lookup(&self, name: &str) -> Result<MaterialId, MaterialError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| MaterialError::Unknown(name.to_owned()))
    }

    /// Flags a material for re-upload into every frame slot.
    pub fn touch(&mut self, id: MaterialId) {
        if let Some(material) = self.materials.get_mut(id.index()) {
            material.dirty.mark();
        }
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.index())
    }

    /// Mutable access; the material is assumed to change and is re-armed.
    pub fn get_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        let material = self.materials.get_mut(id.index())?;
        material.dirty.mark();
        Some(material)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (MaterialId, &mut Material)> {
        self.materials
            .iter_mut()
            .enumerate()
            .map(|(i, m)| (MaterialId(i as u32), m))
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(i, m)| (MaterialId(i as u32), m))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FRAME_RESOURCE_COUNT;

    fn stone(table: &mut MaterialTable) -> MaterialId {
        table
            .define("stone0", Vec4::ONE, Vec3::splat(0.95), 0.01, 1)
            .unwrap()
    }

    #[test]
    fn ids_are_sequential_and_resolve_by_name() {
        let mut table = MaterialTable::new();
        let bricks = table
            .define("bricks0", Vec4::ONE, Vec3::splat(0.02), 0.1, 0)
            .unwrap();
        let stone = stone(&mut table);

        assert_eq!((bricks, stone), (MaterialId(0), MaterialId(1)));
        assert_eq!(table.lookup("stone0"), Ok(stone));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn redefining_a_name_fails() {
        let mut table = MaterialTable::new();
        stone(&mut table);
        let err = table
            .define("stone0", Vec4::ZERO, Vec3::ZERO, 0.5, 0)
            .unwrap_err();
        assert_eq!(err, MaterialError::Duplicate("stone0".into()));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn unknown_lookup_fails() {
        let table = MaterialTable::new();
        assert_eq!(
            table.lookup("tile0"),
            Err(MaterialError::Unknown("tile0".into()))
        );
    }

    #[test]
    fn touch_and_get_mut_rearm_the_countdown() {
        let mut table = MaterialTable::new();
        let id = stone(&mut table);

        for (_, m) in table.iter_mut() {
            m.dirty = FramesDirty::clean();
        }
        table.touch(id);
        assert_eq!(
            table.get(id).unwrap().dirty.remaining(),
            FRAME_RESOURCE_COUNT as u32
        );

        for (_, m) in table.iter_mut() {
            m.dirty = FramesDirty::clean();
        }
        table.get_mut(id).unwrap().roughness = 0.5;
        assert!(table.get(id).unwrap().dirty.is_dirty());
    }
}
