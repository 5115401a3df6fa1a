use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;

use citadel_scene::{PassConstants, Scene, UploadStats, FRAME_RESOURCE_COUNT};

use crate::core::{AppControl, FrameCtx};
use crate::device::{Gpu, SurfaceErrorAction};
use crate::frame::{FrameResource, FrameRing, QueueFence};

use super::depth::DepthTarget;
use super::geometry::GpuGeometry;
use super::layout::{
    ConstantStrides, SceneBindLayouts, MATERIAL_GROUP, OBJECT_GROUP, PASS_GROUP, TEXTURE_GROUP,
};
use super::pipeline::ScenePipelines;
use super::samplers::StaticSamplers;
use super::texture::{TextureSource, TextureTable};

/// Renderer settings.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub clear_color: wgpu::Color,
    /// Texture table, indexed by material texture index.
    pub textures: Vec<TextureSource>,
}

impl RendererConfig {
    /// CSS "LightSteelBlue".
    pub const LIGHT_STEEL_BLUE: wgpu::Color = wgpu::Color {
        r: 0.690_196,
        g: 0.768_627,
        b: 0.870_588,
        a: 1.0,
    };
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: Self::LIGHT_STEEL_BLUE,
            textures: Vec::new(),
        }
    }
}

/// Draws a [`Scene`] through a ring of [`FRAME_RESOURCE_COUNT`] frame resources.
///
/// Per frame: [`update`](Self::update) claims the next slot (waiting on its
/// fence if the device is behind) and refreshes its constants, then
/// [`draw`](Self::draw) records, submits, presents and signals.
pub struct SceneRenderer {
    strides: ConstantStrides,
    pipelines: ScenePipelines,
    textures: TextureTable,
    geometry: GpuGeometry,
    depth: DepthTarget,
    ring: FrameRing<FrameResource, QueueFence>,
    clear_color: wgpu::Color,

    warned_wireframe: bool,
}

impl SceneRenderer {
    pub fn new(gpu: &Gpu<'_>, scene: &Scene, config: &RendererConfig) -> Result<Self> {
        Self::with_device(
            gpu.device(),
            gpu.queue(),
            gpu.surface_format(),
            gpu.size(),
            scene,
            config,
        )
    }

    /// Builds every device resource for `scene`, rendering into `format` targets.
    pub fn with_device(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        scene: &Scene,
        config: &RendererConfig,
    ) -> Result<Self> {
        if let Some((_, material)) = scene
            .materials
            .iter()
            .find(|(_, m)| m.texture_index as usize >= config.textures.len())
        {
            anyhow::bail!(
                "material `{}` uses texture {} but only {} textures are configured",
                material.name,
                material.texture_index,
                config.textures.len()
            );
        }

        let layouts = SceneBindLayouts::new(device);
        let strides = ConstantStrides::for_device(device);
        let samplers = StaticSamplers::new(device);

        let textures = TextureTable::load(device, queue, &layouts.texture, &samplers, &config.textures)
            .context("failed to load scene textures")?;
        let geometry = GpuGeometry::upload(device, &scene.batch);
        let pipelines = ScenePipelines::new(device, &layouts, format);
        let depth = DepthTarget::new(device, size);

        let object_count = scene.items.len();
        let material_count = scene.materials.len();
        let resources: [FrameResource; FRAME_RESOURCE_COUNT] = std::array::from_fn(|slot| {
            FrameResource::new(device, &layouts, strides, object_count, material_count, slot)
        });
        let ring = FrameRing::new(QueueFence::new(device, queue), resources);

        log::info!(
            "scene renderer ready: {object_count} items, {material_count} materials, {} textures, {FRAME_RESOURCE_COUNT} frame resources",
            textures.len()
        );

        Ok(Self {
            strides,
            pipelines,
            textures,
            geometry,
            depth,
            ring,
            clear_color: config.clear_color,
            warned_wireframe: false,
        })
    }

    /// Claims the next frame resource and refreshes its constant buffers.
    ///
    /// Blocks if the device has not yet finished the frame that last used the
    /// slot. Returns `None`, leaving the ring and the scene untouched, while the
    /// target has no area.
    pub fn update(
        &mut self,
        queue: &wgpu::Queue,
        target_size: PhysicalSize<u32>,
        scene: &mut Scene,
        pass: &PassConstants,
    ) -> Result<Option<UploadStats>> {
        if target_size.width == 0 || target_size.height == 0 {
            return Ok(None);
        }

        self.ring.advance().context("failed to reclaim frame resource")?;

        let mut writer = self.ring.current().writer(queue, self.strides);
        let stats = scene.refresh(&mut writer);
        writer.write_pass(pass);

        Ok(Some(stats))
    }

    /// Records the scene into the current frame resource, submits and presents.
    pub fn draw(
        &mut self,
        ctx: &mut FrameCtx<'_, '_>,
        scene: &Scene,
        wireframe: bool,
    ) -> Result<AppControl> {
        let size = ctx.gpu.size();
        if size.width == 0 || size.height == 0 {
            self.ring.abandon();
            return Ok(AppControl::Continue);
        }

        let frame = match ctx.gpu.acquire_frame() {
            Ok(frame) => frame,
            Err(err) => {
                self.ring.abandon();
                return match ctx.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => {
                        Err(anyhow::anyhow!("surface acquisition failed fatally"))
                    }
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        Ok(AppControl::Continue)
                    }
                };
            }
        };

        self.depth.ensure_size(ctx.gpu.device(), size);
        let use_wireframe = self.wireframe_available(wireframe);

        let slot = self.ring.current_index();
        let resource = self.ring.current();
        let pipeline = match (&self.pipelines.wireframe, use_wireframe) {
            (Some(line), true) => line,
            _ => &self.pipelines.opaque,
        };

        let mut encoder = resource.begin_commands(ctx.gpu.device(), slot);
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("citadel scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.depth.view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(0),
                        store: wgpu::StoreOp::Store,
                    }),
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(pipeline);
            rpass.set_vertex_buffer(0, self.geometry.vertex_buffer.slice(..));
            rpass.set_index_buffer(self.geometry.index_buffer.slice(..), GpuGeometry::INDEX_FORMAT);
            rpass.set_bind_group(PASS_GROUP, &resource.pass_bind_group, &[]);

            for item in &scene.items {
                let material = scene
                    .materials
                    .get(item.material)
                    .with_context(|| format!("item `{}` has no material", item.shape))?;
                let texture = self
                    .textures
                    .bind_group(material.texture_index)
                    .with_context(|| format!("material `{}` has no texture", material.name))?;

                rpass.set_bind_group(TEXTURE_GROUP, texture, &[]);
                rpass.set_bind_group(
                    OBJECT_GROUP,
                    &resource.object_bind_group,
                    &[self.strides.object_offset(item.obj_cb_index()) as wgpu::DynamicOffset],
                );
                rpass.set_bind_group(
                    MATERIAL_GROUP,
                    &resource.material_bind_group,
                    &[self.strides.material_offset(item.material.0) as wgpu::DynamicOffset],
                );
                rpass.draw_indexed(
                    item.start_index..item.start_index + item.index_count,
                    item.base_vertex,
                    0..1,
                );
            }
        }

        ctx.window.window.pre_present_notify();
        let submission = ctx.gpu.submit(encoder, frame);
        let fence = self.ring.submit(submission);
        log::trace!("frame slot {slot} submitted with fence {fence}");

        Ok(AppControl::Continue)
    }

    /// Blocks until the device has finished every submitted frame.
    pub fn flush(&mut self) -> Result<()> {
        self.ring.flush()
    }

    pub fn frames_submitted(&self) -> u64 {
        self.ring.last_signaled()
    }

    fn wireframe_available(&mut self, requested: bool) -> bool {
        if !requested {
            return false;
        }
        if self.pipelines.wireframe.is_none() {
            if !self.warned_wireframe {
                log::warn!("wireframe requested but POLYGON_MODE_LINE is unavailable; drawing solid");
                self.warned_wireframe = true;
            }
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use bytemuck::Zeroable;
    use citadel_scene::meshgen::create_box;
    use citadel_scene::{GeometryBatch, MaterialTable, Transform};

    use super::*;
    use crate::device::noop_device;

    fn one_box_scene() -> Scene {
        let batch = GeometryBatch::build([("box", create_box(1.0, 1.0, 1.0, 0))]).unwrap();
        let mut materials = MaterialTable::new();
        let stone = materials
            .define("stone0", Default::default(), Default::default(), 0.5, 0)
            .unwrap();
        let mut scene = Scene::new(batch, materials);
        scene
            .items
            .add(&scene.batch, "box", stone, Transform::new())
            .unwrap();
        scene
    }

    fn config(name: &str) -> RendererConfig {
        let path = std::env::temp_dir().join(format!("citadel-renderer-{name}.png"));
        image::RgbaImage::new(2, 2).save(&path).unwrap();
        RendererConfig {
            textures: vec![TextureSource::new("stone", path)],
            ..Default::default()
        }
    }

    fn renderer(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: &Scene,
        name: &str,
    ) -> SceneRenderer {
        SceneRenderer::with_device(
            device,
            queue,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            PhysicalSize::new(64, 64),
            scene,
            &config(name),
        )
        .unwrap()
    }

    #[test]
    fn zero_sized_target_skips_the_frame() {
        let (device, queue) = noop_device();
        let mut scene = one_box_scene();
        let mut renderer = renderer(&device, &queue, &scene, "skip");
        let pass = PassConstants::zeroed();

        for _ in 0..10 {
            let stats = renderer
                .update(&queue, PhysicalSize::new(0, 0), &mut scene, &pass)
                .unwrap();
            assert!(stats.is_none());
        }

        assert_eq!(renderer.ring.current_index(), FRAME_RESOURCE_COUNT - 1);
        assert_eq!(renderer.frames_submitted(), 0);
        let item = scene.items.get(0).unwrap();
        assert_eq!(item.dirty.remaining(), FRAME_RESOURCE_COUNT as u32);
    }

    #[test]
    fn drawable_target_claims_the_first_slot() {
        let (device, queue) = noop_device();
        let mut scene = one_box_scene();
        let mut renderer = renderer(&device, &queue, &scene, "draw");
        let pass = PassConstants::zeroed();

        let stats = renderer
            .update(&queue, PhysicalSize::new(64, 64), &mut scene, &pass)
            .unwrap()
            .unwrap();

        assert_eq!(renderer.ring.current_index(), 0);
        assert_eq!(stats.objects, 1);
        assert_eq!(stats.materials, 1);
    }

    #[test]
    fn missing_texture_slot_is_rejected() {
        let (device, queue) = noop_device();
        let scene = one_box_scene();

        let err = SceneRenderer::with_device(
            &device,
            &queue,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            PhysicalSize::new(64, 64),
            &scene,
            &RendererConfig::default(),
        )
        .err()
        .unwrap();
        assert!(err.to_string().contains("stone0"));
    }
}
