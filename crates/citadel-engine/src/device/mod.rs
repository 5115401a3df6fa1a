//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - acquiring surface textures and submitting recorded frames

mod error;
mod gpu;
mod surface;

pub use error::SurfaceErrorAction;
pub use gpu::{Gpu, GpuFrame, GpuInit};

#[cfg(test)]
mod noop;
#[cfg(test)]
pub(crate) use noop::noop_device;
