use wgpu::util::DeviceExt;

use citadel_scene::{GeometryBatch, Vertex};

/// The geometry batch uploaded once into immutable device buffers.
pub struct GpuGeometry {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
}

impl GpuGeometry {
    pub const INDEX_FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::Uint16;

    pub fn upload(device: &wgpu::Device, batch: &GeometryBatch) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("citadel scene vbo"),
            contents: bytemuck::cast_slice(batch.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // Buffer sizes must be 4-byte aligned; pad odd u16 counts.
        let mut indices = batch.indices().to_vec();
        if indices.len() % 2 == 1 {
            indices.push(0);
        }
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("citadel scene ibo"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "geometry uploaded: {} vertices, {} indices",
            batch.vertices().len(),
            batch.indices().len()
        );

        Self {
            vertex_buffer,
            index_buffer,
        }
    }

    pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: Vertex::POSITION_OFFSET,
                shader_location: 0,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: Vertex::NORMAL_OFFSET,
                shader_location: 1,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: Vertex::TEX_COORD_OFFSET,
                shader_location: 2,
            },
        ];

        wgpu::VertexBufferLayout {
            array_stride: Vertex::STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}
