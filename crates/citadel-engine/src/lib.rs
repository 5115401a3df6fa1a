//! Citadel engine crate.
//!
//! Platform and GPU runtime for the castle viewer: device and surface
//! management, the fence-synchronized frame-resource ring and the scene
//! renderer built on them.

pub mod core;
pub mod device;
pub mod frame;
pub mod input;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
