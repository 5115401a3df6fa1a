//! Scene registries and the per-frame dirty upload pass.

use crate::constants::{MaterialConstants, ObjectConstants};
use crate::geometry::GeometryBatch;
use crate::item::RenderItems;
use crate::material::MaterialTable;

/// Destination for constant records of the frame slot being prepared.
///
/// Slots are element indices (object `obj_cb_index`, material id), not byte
/// offsets; the implementor owns the stride.
pub trait ConstantSink {
    fn write_object(&mut self, slot: u32, constants: &ObjectConstants);
    fn write_material(&mut self, slot: u32, constants: &MaterialConstants);
}

/// Counts of records written by one refresh.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct UploadStats {
    pub objects: usize,
    pub materials: usize,
}

/// Everything the renderer draws: geometry, materials and instanced items.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub batch: GeometryBatch,
    pub materials: MaterialTable,
    pub items: RenderItems,
}

impl Scene {
    pub fn new(batch: GeometryBatch, materials: MaterialTable) -> Self {
        Self {
            batch,
            materials,
            items: RenderItems::new(),
        }
    }

    /// Writes every item that is still stale for some slot, one slot per call.
    pub fn refresh_objects(&mut self, sink: &mut impl ConstantSink) -> usize {
        let mut written = 0;
        for item in self.items.iter_mut() {
            if !item.dirty.is_dirty() {
                continue;
            }
            sink.write_object(item.obj_cb_index(), &ObjectConstants::from_item(item));
            item.dirty.consume();
            written += 1;
        }
        written
    }

    pub fn refresh_materials(&mut self, sink: &mut impl ConstantSink) -> usize {
        let mut written = 0;
        for (id, material) in self.materials.iter_mut() {
            if !material.dirty.is_dirty() {
                continue;
            }
            sink.write_material(id.0, &MaterialConstants::from_material(material));
            material.dirty.consume();
            written += 1;
        }
        written
    }

    /// Object pass then material pass for the slot behind `sink`.
    pub fn refresh(&mut self, sink: &mut impl ConstantSink) -> UploadStats {
        let stats = UploadStats {
            objects: self.refresh_objects(sink),
            materials: self.refresh_materials(sink),
        };
        if stats != UploadStats::default() {
            log::trace!(
                "constant refresh: {} objects, {} materials",
                stats.objects,
                stats.materials
            );
        }
        stats
    }
}
