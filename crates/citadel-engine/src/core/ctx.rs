use winit::window::{Window, WindowId};

use crate::device::Gpu;
use crate::input::{InputFrame, InputState};
use crate::time::FrameTime;

/// Window handle plus its aspect ratio.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Width over height of the drawable area; 1.0 while minimized.
    pub fn aspect_ratio(&self) -> f32 {
        let size = self.window.inner_size();
        if size.width == 0 || size.height == 0 {
            return 1.0;
        }
        size.width as f32 / size.height as f32
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// `'a` is the callback duration; `'w` is the window borrow held by `Gpu<'w>`.
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
}
