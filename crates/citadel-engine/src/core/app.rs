use anyhow::Result;
use winit::event::WindowEvent;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the binary.
pub trait App {
    /// Called for every window event before the runtime handles it.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per redraw. An error stops the event loop and is
    /// returned from `Runtime::run`.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl>;

    /// Called once on shutdown while the GPU context is still alive.
    fn on_exit(&mut self) -> Result<()> {
        Ok(())
    }
}
