use anyhow::Result;
use glam::Vec2;

use citadel_engine::core::{App, AppControl, FrameCtx};
use citadel_engine::input::{Key, MouseButton};
use citadel_engine::render::{RendererConfig, SceneRenderer};
use citadel_scene::{LightRig, OrbitCamera, PassConstants, PassInputs, Projection, Scene};

/// Castle viewer: orbit camera, wireframe toggle, one renderer.
pub struct CastleApp {
    scene: Scene,
    config: RendererConfig,
    // Created on the first frame, once a device exists.
    renderer: Option<SceneRenderer>,

    camera: OrbitCamera,
    projection: Projection,
    lights: LightRig,
}

impl CastleApp {
    pub fn new(scene: Scene, config: RendererConfig) -> Self {
        Self {
            scene,
            config,
            renderer: None,
            camera: OrbitCamera::default(),
            projection: Projection::default(),
            lights: LightRig::default(),
        }
    }

    fn handle_input(&mut self, ctx: &FrameCtx<'_, '_>) {
        let (dx, dy) = ctx.input_frame.pointer_delta;
        if dx == 0.0 && dy == 0.0 {
            return;
        }

        if ctx.input.button_down(MouseButton::Left) {
            self.camera.orbit(dx, dy);
        } else if ctx.input.button_down(MouseButton::Right) {
            self.camera.zoom(dx, dy);
        }
    }

    fn pass_constants(&self, ctx: &FrameCtx<'_, '_>) -> PassConstants {
        let size = ctx.gpu.size();
        PassConstants::new(&PassInputs {
            view: self.camera.view(),
            proj: self.projection.matrix(ctx.window.aspect_ratio()),
            eye: self.camera.eye(),
            render_target_size: Vec2::new(size.width as f32, size.height as f32),
            near_z: self.projection.near,
            far_z: self.projection.far,
            total_time: ctx.time.total,
            delta_time: ctx.time.dt,
            lights: self.lights,
        })
    }
}

impl App for CastleApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return Ok(AppControl::Exit);
        }

        self.handle_input(ctx);
        let wireframe = ctx.input.key_down(Key::Digit1);
        let pass = self.pass_constants(ctx);

        let renderer = match &mut self.renderer {
            Some(renderer) => renderer,
            slot => slot.insert(SceneRenderer::new(ctx.gpu, &self.scene, &self.config)?),
        };

        let Some(stats) = renderer.update(ctx.gpu.queue(), ctx.gpu.size(), &mut self.scene, &pass)?
        else {
            // Minimized.
            return Ok(AppControl::Continue);
        };
        if stats.objects > 0 || stats.materials > 0 {
            log::trace!(
                "frame {}: uploaded {} objects, {} materials",
                ctx.time.frame_index,
                stats.objects,
                stats.materials
            );
        }

        renderer.draw(ctx, &self.scene, wireframe)
    }

    fn on_exit(&mut self) -> Result<()> {
        if let Some(renderer) = &mut self.renderer {
            renderer.flush()?;
            log::info!("{} frames submitted", renderer.frames_submitted());
        }
        Ok(())
    }
}
