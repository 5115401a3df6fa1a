use super::depth::DepthTarget;
use super::geometry::GpuGeometry;
use super::layout::SceneBindLayouts;

/// Opaque scene pipelines: solid fill, plus line fill when the device allows it.
pub struct ScenePipelines {
    pub opaque: wgpu::RenderPipeline,
    pub wireframe: Option<wgpu::RenderPipeline>,
}

impl ScenePipelines {
    pub fn new(
        device: &wgpu::Device,
        layouts: &SceneBindLayouts,
        format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("citadel scene shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("citadel scene pipeline layout"),
            bind_group_layouts: &layouts.ordered(),
            immediate_size: 0,
        });

        let opaque = build(
            device,
            &pipeline_layout,
            &shader,
            format,
            wgpu::PolygonMode::Fill,
            "citadel opaque pipeline",
        );

        let wireframe = device
            .features()
            .contains(wgpu::Features::POLYGON_MODE_LINE)
            .then(|| {
                build(
                    device,
                    &pipeline_layout,
                    &shader,
                    format,
                    wgpu::PolygonMode::Line,
                    "citadel wireframe pipeline",
                )
            });

        Self {
            opaque,
            wireframe,
        }
    }
}

fn build(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    polygon_mode: wgpu::PolygonMode,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),

        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[GpuGeometry::vertex_layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        // Meshes wind clockwise from outside. No culling.
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Cw,
            cull_mode: None,
            polygon_mode,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: Some(wgpu::DepthStencilState {
            format: DepthTarget::FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),

        multiview_mask: None,
        cache: None,
    })
}
