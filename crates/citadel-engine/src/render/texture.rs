use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::samplers::StaticSamplers;

/// A named texture file to load at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureSource {
    pub name: String,
    pub path: PathBuf,
}

impl TextureSource {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

struct SceneTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Fixed texture table indexed by a material's texture index.
///
/// Every entry carries a complete group 0 bind group (texture + static samplers).
pub struct TextureTable {
    entries: Vec<SceneTexture>,
}

impl TextureTable {
    pub fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        samplers: &StaticSamplers,
        sources: &[TextureSource],
    ) -> Result<Self> {
        let mut entries = Vec::with_capacity(sources.len());

        for source in sources {
            let image = load_rgba(&source.path)
                .with_context(|| format!("failed to load texture `{}`", source.name))?;
            let (width, height) = image.dimensions();

            let size = wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            };
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some(&source.name),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });

            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &image,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * width),
                    rows_per_image: Some(height),
                },
                size,
            );

            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

            let mut group_entries = vec![wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            }];
            group_entries.extend(samplers.entries());

            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{} bg", source.name)),
                layout,
                entries: &group_entries,
            });

            log::debug!("texture `{}` loaded ({width}x{height})", source.name);
            entries.push(SceneTexture {
                _texture: texture,
                bind_group,
            });
        }

        Ok(Self { entries })
    }

    pub fn bind_group(&self, index: u32) -> Option<&wgpu::BindGroup> {
        self.entries.get(index as usize).map(|t| &t.bind_group)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decodes an image file into tightly packed RGBA8.
pub fn load_rgba(path: &Path) -> Result<image::RgbaImage> {
    let image = image::open(path).with_context(|| format!("cannot read {}", path.display()))?;
    Ok(image.to_rgba8())
}
