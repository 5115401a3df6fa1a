//! Bind group layouts shared by the scene pipeline and the frame resources.
//!
//! | group | contents                                      |
//! |-------|-----------------------------------------------|
//! | 0     | material texture + six static samplers        |
//! | 1     | object constants, dynamic offset per item     |
//! | 2     | pass constants                                |
//! | 3     | material constants, dynamic offset per item   |

use std::num::NonZeroU64;

use citadel_scene::{MaterialConstants, ObjectConstants, PassConstants};

use super::samplers::STATIC_SAMPLER_COUNT;

pub const TEXTURE_GROUP: u32 = 0;
pub const OBJECT_GROUP: u32 = 1;
pub const PASS_GROUP: u32 = 2;
pub const MATERIAL_GROUP: u32 = 3;

pub struct SceneBindLayouts {
    pub texture: wgpu::BindGroupLayout,
    pub object: wgpu::BindGroupLayout,
    pub pass: wgpu::BindGroupLayout,
    pub material: wgpu::BindGroupLayout,
}

impl SceneBindLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let mut texture_entries = vec![wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        }];
        texture_entries.extend((0..STATIC_SAMPLER_COUNT as u32).map(|i| {
            wgpu::BindGroupLayoutEntry {
                binding: 1 + i,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            }
        }));

        let texture = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("citadel texture bgl"),
            entries: &texture_entries,
        });

        let object = uniform_layout::<ObjectConstants>(device, "citadel object bgl", true);
        let pass = uniform_layout::<PassConstants>(device, "citadel pass bgl", false);
        let material = uniform_layout::<MaterialConstants>(device, "citadel material bgl", true);

        Self {
            texture,
            object,
            pass,
            material,
        }
    }

    /// Layouts in group order.
    pub fn ordered(&self) -> [&wgpu::BindGroupLayout; 4] {
        [&self.texture, &self.object, &self.pass, &self.material]
    }
}

fn uniform_layout<T>(device: &wgpu::Device, label: &str, dynamic: bool) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: dynamic,
                min_binding_size: record_size::<T>(),
            },
            count: None,
        }],
    })
}

pub(crate) fn record_size<T>() -> Option<NonZeroU64> {
    NonZeroU64::new(std::mem::size_of::<T>() as u64)
}

/// Byte distance between consecutive records in the dynamic-offset buffers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ConstantStrides {
    pub object: u64,
    pub material: u64,
}

impl ConstantStrides {
    pub fn new(min_uniform_alignment: u32) -> Self {
        let align = u64::from(min_uniform_alignment.max(1));
        Self {
            object: align_up(std::mem::size_of::<ObjectConstants>() as u64, align),
            material: align_up(std::mem::size_of::<MaterialConstants>() as u64, align),
        }
    }

    pub fn for_device(device: &wgpu::Device) -> Self {
        Self::new(device.limits().min_uniform_buffer_offset_alignment)
    }

    #[inline]
    pub fn object_offset(&self, obj_cb_index: u32) -> u64 {
        u64::from(obj_cb_index) * self.object
    }

    #[inline]
    pub fn material_offset(&self, material_slot: u32) -> u64 {
        u64::from(material_slot) * self.material
    }
}

fn align_up(size: u64, align: u64) -> u64 {
    size.div_ceil(align) * align
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_round_records_up_to_the_alignment() {
        let strides = ConstantStrides::new(256);
        assert_eq!(strides.object, 256);
        assert_eq!(strides.material, 256);
        assert_eq!(strides.object_offset(3), 768);
    }

    #[test]
    fn small_alignment_keeps_records_tight() {
        let strides = ConstantStrides::new(64);
        assert_eq!(strides.object, 192);
        assert_eq!(strides.material, 128);
        assert_eq!(strides.material_offset(2), 256);
    }
}
