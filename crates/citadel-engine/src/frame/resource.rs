use citadel_scene::{ConstantSink, MaterialConstants, ObjectConstants, PassConstants};

use crate::render::{record_size, ConstantStrides, SceneBindLayouts};

/// Constant buffers owned by one ring slot.
///
/// Object and material buffers hold one stride-aligned record per item /
/// material; their bind groups are bound with a dynamic offset per draw.
pub struct FrameResource {
    pub object_buffer: wgpu::Buffer,
    pub material_buffer: wgpu::Buffer,
    pub pass_buffer: wgpu::Buffer,

    pub object_bind_group: wgpu::BindGroup,
    pub material_bind_group: wgpu::BindGroup,
    pub pass_bind_group: wgpu::BindGroup,
}

impl FrameResource {
    pub fn new(
        device: &wgpu::Device,
        layouts: &SceneBindLayouts,
        strides: ConstantStrides,
        object_count: usize,
        material_count: usize,
        slot: usize,
    ) -> Self {
        let object_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("citadel object cb [{slot}]")),
            size: strides.object * object_count.max(1) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let material_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("citadel material cb [{slot}]")),
            size: strides.material * material_count.max(1) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let pass_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("citadel pass cb [{slot}]")),
            size: std::mem::size_of::<PassConstants>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let object_bind_group = record_bind_group::<ObjectConstants>(
            device,
            &layouts.object,
            &object_buffer,
            &format!("citadel object bg [{slot}]"),
        );
        let material_bind_group = record_bind_group::<MaterialConstants>(
            device,
            &layouts.material,
            &material_buffer,
            &format!("citadel material bg [{slot}]"),
        );
        let pass_bind_group = record_bind_group::<PassConstants>(
            device,
            &layouts.pass,
            &pass_buffer,
            &format!("citadel pass bg [{slot}]"),
        );

        Self {
            object_buffer,
            material_buffer,
            pass_buffer,
            object_bind_group,
            material_bind_group,
            pass_bind_group,
        }
    }

    /// Fresh encoder for this slot's frame; recorded commands are released on submit.
    pub fn begin_commands(&self, device: &wgpu::Device, slot: usize) -> wgpu::CommandEncoder {
        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some(&format!("citadel frame encoder [{slot}]")),
        })
    }

    pub fn writer<'a>(&'a self, queue: &'a wgpu::Queue, strides: ConstantStrides) -> SlotWriter<'a> {
        SlotWriter {
            queue,
            resource: self,
            strides,
        }
    }
}

/// Binds one record-sized window at offset 0; draws move it with dynamic offsets.
fn record_bind_group<T>(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: record_size::<T>(),
            }),
        }],
    })
}

/// Writes constant records into one slot's buffers through the queue.
pub struct SlotWriter<'a> {
    queue: &'a wgpu::Queue,
    resource: &'a FrameResource,
    strides: ConstantStrides,
}

impl SlotWriter<'_> {
    pub fn write_pass(&mut self, constants: &PassConstants) {
        self.queue
            .write_buffer(&self.resource.pass_buffer, 0, bytemuck::bytes_of(constants));
    }
}

impl ConstantSink for SlotWriter<'_> {
    fn write_object(&mut self, slot: u32, constants: &ObjectConstants) {
        self.queue.write_buffer(
            &self.resource.object_buffer,
            self.strides.object_offset(slot),
            bytemuck::bytes_of(constants),
        );
    }

    fn write_material(&mut self, slot: u32, constants: &MaterialConstants) {
        self.queue.write_buffer(
            &self.resource.material_buffer,
            self.strides.material_offset(slot),
            bytemuck::bytes_of(constants),
        );
    }
}
