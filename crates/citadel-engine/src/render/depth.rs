use winit::dpi::PhysicalSize;

/// Depth/stencil attachment that follows the surface size.
pub struct DepthTarget {
    size: PhysicalSize<u32>,
    view: wgpu::TextureView,
}

impl DepthTarget {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

    pub fn new(device: &wgpu::Device, size: PhysicalSize<u32>) -> Self {
        let size = PhysicalSize::new(size.width.max(1), size.height.max(1));
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("citadel depth"),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { size, view }
    }

    /// Recreates the attachment when the surface size changed.
    pub fn ensure_size(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 || size == self.size {
            return;
        }
        log::debug!("depth target resized to {}x{}", size.width, size.height);
        *self = Self::new(device, size);
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}
