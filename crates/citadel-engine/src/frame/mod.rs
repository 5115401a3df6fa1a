//! Frame pipelining.
//!
//! A fixed ring of per-frame resources lets the CPU prepare frame K+1 while the
//! device may still read the buffers of earlier frames. A monotonically
//! increasing fence value per submission decides when a slot can be reused.

mod fence;
mod resource;
mod ring;

pub use fence::{Fence, QueueFence};
pub use resource::{FrameResource, SlotWriter};
pub use ring::{FrameRing, SlotState};
