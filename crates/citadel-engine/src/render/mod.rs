//! GPU rendering of a [`citadel_scene::Scene`].
//!
//! The renderer owns every device resource it draws with: pipelines, the
//! uploaded geometry batch, textures, the depth target and the frame ring.
//!
//! Convention:
//! - left-handed world, +Y up, clip depth in [0, 1]
//! - matrices are column-major and multiply column vectors in the shader

mod depth;
mod geometry;
mod layout;
mod pipeline;
mod renderer;
mod samplers;
mod texture;

pub use depth::DepthTarget;
pub use geometry::GpuGeometry;
pub use layout::{
    ConstantStrides, SceneBindLayouts, MATERIAL_GROUP, OBJECT_GROUP, PASS_GROUP, TEXTURE_GROUP,
};
pub(crate) use layout::record_size;
pub use renderer::{RendererConfig, SceneRenderer};
pub use samplers::{StaticSamplers, STATIC_SAMPLER_COUNT};
pub use texture::{load_rgba, TextureSource, TextureTable};
