//! Citadel scene crate.
//!
//! GPU-agnostic scene data: vertex layout, procedural meshes, the shared
//! geometry batch, materials, render items, the castle builder, the orbit
//! camera and the constant records uploaded each frame.

pub mod camera;
pub mod castle;
pub mod constants;
pub mod dirty;
pub mod error;
pub mod geometry;
pub mod item;
pub mod material;
pub mod meshgen;
pub mod scene;
pub mod vertex;

/// Depth of the frame-resource ring. Dirty countdowns start at this value.
pub const FRAME_RESOURCE_COUNT: usize = 3;

pub use camera::{OrbitCamera, Projection};
pub use castle::CastleLayout;
pub use constants::{LightRig, MaterialConstants, ObjectConstants, PassConstants, PassInputs};
pub use error::{GeometryError, MaterialError, SceneError};
pub use geometry::{GeometryBatch, SubmeshRange};
pub use item::{RenderItem, RenderItems, Transform};
pub use material::{Material, MaterialId, MaterialTable};
pub use scene::{ConstantSink, Scene, UploadStats};
pub use vertex::{MeshData, Vertex};
