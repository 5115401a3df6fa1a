use glam::{Mat4, Vec3};

use crate::dirty::FramesDirty;
use crate::error::GeometryError;
use crate::geometry::{GeometryBatch, SubmeshRange};
use crate::material::MaterialId;

/// Composes a world matrix step by step.
///
/// Each call applies after the previous ones, so
/// `Transform::new().scale(..).rotate_y(..).translate(..)` scales first,
/// then rotates, then translates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    matrix: Mat4,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        matrix: Mat4::IDENTITY,
    };

    pub fn new() -> Self {
        Self::IDENTITY
    }

    #[must_use]
    pub fn scale(self, x: f32, y: f32, z: f32) -> Self {
        self.then(Mat4::from_scale(Vec3::new(x, y, z)))
    }

    #[must_use]
    pub fn uniform_scale(self, s: f32) -> Self {
        self.scale(s, s, s)
    }

    #[must_use]
    pub fn rotate_x(self, radians: f32) -> Self {
        self.then(Mat4::from_rotation_x(radians))
    }

    #[must_use]
    pub fn rotate_y(self, radians: f32) -> Self {
        self.then(Mat4::from_rotation_y(radians))
    }

    #[must_use]
    pub fn translate(self, x: f32, y: f32, z: f32) -> Self {
        self.then(Mat4::from_translation(Vec3::new(x, y, z)))
    }

    #[inline]
    pub fn matrix(self) -> Mat4 {
        self.matrix
    }

    fn then(self, step: Mat4) -> Self {
        Self {
            matrix: step * self.matrix,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Transform> for Mat4 {
    fn from(t: Transform) -> Self {
        t.matrix
    }
}

/// One drawable instance: a submesh, a material and a placement.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    pub shape: String,
    pub world: Mat4,
    /// Plain transpose of `world`, kept alongside it. Shading uses the
    /// inverse-transpose computed at upload time instead.
    pub transposed_world: Mat4,
    pub tex_transform: Mat4,
    pub material: MaterialId,
    pub dirty: FramesDirty,
    obj_cb_index: u32,
    pub index_count: u32,
    pub start_index: u32,
    pub base_vertex: i32,
}

impl RenderItem {
    /// Slot in the per-frame object constant buffer. Fixed for the item's lifetime.
    #[inline]
    pub fn obj_cb_index(&self) -> u32 {
        self.obj_cb_index
    }

    /// Moves the item and schedules a re-upload into every frame slot.
    pub fn set_world(&mut self, world: Mat4) {
        self.world = world;
        self.transposed_world = world.transpose();
        self.dirty.mark();
    }

    pub fn set_tex_transform(&mut self, tex_transform: Mat4) {
        self.tex_transform = tex_transform;
        self.dirty.mark();
    }

    /// Flags the item for re-upload without changing it.
    pub fn touch(&mut self) {
        self.dirty.mark();
    }
}

/// Ordered render items. Object constant-buffer slots follow insertion order.
#[derive(Debug, Clone, Default)]
pub struct RenderItems {
    items: Vec<RenderItem>,
}

impl RenderItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instances `shape` with the given material and world transform.
    ///
    /// Draw parameters are copied from the batch; an unknown shape fails.
    pub fn add(
        &mut self,
        batch: &GeometryBatch,
        shape: &str,
        material: MaterialId,
        world: impl Into<Mat4>,
    ) -> Result<&mut RenderItem, GeometryError> {
        let SubmeshRange {
            index_count,
            start_index,
            base_vertex,
        } = batch.submesh(shape)?;
        let world = world.into();

        let obj_cb_index = self.items.len() as u32;
        self.items.push(RenderItem {
            shape: shape.to_owned(),
            world,
            transposed_world: world.transpose(),
            tex_transform: Mat4::IDENTITY,
            material,
            dirty: FramesDirty::new(),
            obj_cb_index,
            index_count,
            start_index,
            base_vertex,
        });

        let last = self.items.len() - 1;
        Ok(&mut self.items[last])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, obj_cb_index: u32) -> Option<&RenderItem> {
        self.items.get(obj_cb_index as usize)
    }

    pub fn get_mut(&mut self, obj_cb_index: u32) -> Option<&mut RenderItem> {
        self.items.get_mut(obj_cb_index as usize)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RenderItem> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, RenderItem> {
        self.items.iter_mut()
    }
}

impl<'a> IntoIterator for &'a RenderItems {
    type Item = &'a RenderItem;
    type IntoIter = std::slice::Iter<'a, RenderItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use glam::Vec4;

    use super::*;
    use crate::meshgen::create_box;

    #[test]
    fn transform_composes_scale_rotate_translate_in_call_order() {
        let composed = Transform::new()
            .scale(2.0, 3.0, 4.0)
            .rotate_y(0.7)
            .translate(1.0, 2.0, 3.0)
            .matrix();

        let expected = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))
            * Mat4::from_rotation_y(0.7)
            * Mat4::from_scale(Vec3::new(2.0, 3.0, 4.0));

        assert!(composed.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn rotate_y_quarter_turn_maps_x_to_negative_z() {
        let m = Transform::new().rotate_y(FRAC_PI_2).matrix();
        let p = m * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!(p.abs_diff_eq(Vec4::new(0.0, 0.0, -1.0, 1.0), 1e-6));
    }

    #[test]
    fn items_get_sequential_slots_and_copied_draw_args() {
        let batch = GeometryBatch::build([
            ("grid", crate::meshgen::create_grid(4.0, 4.0, 3, 3)),
            ("box", create_box(1.0, 1.0, 1.0, 0)),
        ])
        .unwrap();

        let mut items = RenderItems::new();
        items
            .add(&batch, "grid", MaterialId(0), Mat4::IDENTITY)
            .unwrap();
        let world = Transform::new().translate(0.0, 5.0, 0.0);
        let item = items.add(&batch, "box", MaterialId(0), world).unwrap();

        let range = batch.submesh("box").unwrap();
        assert_eq!(item.obj_cb_index(), 1);
        assert_eq!(item.index_count, range.index_count);
        assert_eq!(item.start_index, range.start_index);
        assert_eq!(item.base_vertex, range.base_vertex);
        assert_eq!(item.transposed_world, world.matrix().transpose());
    }

    #[test]
    fn unknown_shape_is_rejected() {
        let batch = GeometryBatch::build([("box", create_box(1.0, 1.0, 1.0, 0))]).unwrap();
        let mut items = RenderItems::new();
        assert!(items
            .add(&batch, "cone", MaterialId(0), Mat4::IDENTITY)
            .is_err());
        assert!(items.is_empty());
    }
}
