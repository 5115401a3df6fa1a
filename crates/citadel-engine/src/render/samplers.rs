/// Point, linear and anisotropic filtering, each in wrap and clamp flavors.
pub const STATIC_SAMPLER_COUNT: usize = 6;

const ANISOTROPY: u16 = 8;

/// The fixed sampler set bound at group 0, bindings 1..=6, in shader order:
/// point wrap, point clamp, linear wrap, linear clamp, anisotropic wrap,
/// anisotropic clamp.
pub struct StaticSamplers {
    samplers: [wgpu::Sampler; STATIC_SAMPLER_COUNT],
}

impl StaticSamplers {
    pub fn new(device: &wgpu::Device) -> Self {
        let wrap = wgpu::AddressMode::Repeat;
        let clamp = wgpu::AddressMode::ClampToEdge;

        Self {
            samplers: [
                sampler(device, "citadel point wrap", wrap, Filter::Point),
                sampler(device, "citadel point clamp", clamp, Filter::Point),
                sampler(device, "citadel linear wrap", wrap, Filter::Linear),
                sampler(device, "citadel linear clamp", clamp, Filter::Linear),
                sampler(device, "citadel anisotropic wrap", wrap, Filter::Anisotropic),
                sampler(device, "citadel anisotropic clamp", clamp, Filter::Anisotropic),
            ],
        }
    }

    /// Bind group entries starting at binding 1.
    pub fn entries(&self) -> impl Iterator<Item = wgpu::BindGroupEntry<'_>> {
        self.samplers
            .iter()
            .enumerate()
            .map(|(i, s)| wgpu::BindGroupEntry {
                binding: 1 + i as u32,
                resource: wgpu::BindingResource::Sampler(s),
            })
    }
}

#[derive(Clone, Copy)]
enum Filter {
    Point,
    Linear,
    Anisotropic,
}

fn sampler(
    device: &wgpu::Device,
    label: &str,
    address: wgpu::AddressMode,
    filter: Filter,
) -> wgpu::Sampler {
    let (mode, mipmap, anisotropy_clamp) = match filter {
        Filter::Point => (
            wgpu::FilterMode::Nearest,
            wgpu::MipmapFilterMode::Nearest,
            1,
        ),
        Filter::Linear => (wgpu::FilterMode::Linear, wgpu::MipmapFilterMode::Linear, 1),
        // Anisotropy requires linear filtering on every axis.
        Filter::Anisotropic => (
            wgpu::FilterMode::Linear,
            wgpu::MipmapFilterMode::Linear,
            ANISOTROPY,
        ),
    };

    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: address,
        address_mode_v: address,
        address_mode_w: address,
        mag_filter: mode,
        min_filter: mode,
        mipmap_filter: mipmap,
        anisotropy_clamp,
        ..Default::default()
    })
}
