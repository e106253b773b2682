/// Viewport context - the host view's scale factors and viewport reset
///
/// Clipping and scissor code in the host reads a global pair of scale
/// factors mapping logical window points to framebuffer pixels. A render
/// texture rewrites them for the duration of a capture so scissor
/// rectangles land on the offscreen target's real pixel grid.

use glam::{UVec2, Vec2};
use winit::dpi::LogicalSize;
use winit::window::Window;

use crate::device::{GraphicsDevice, Rect};

/// Host view state a render texture saves, overrides, and restores
pub trait ViewportContext {
    /// Current horizontal/vertical scale (pixels per logical point)
    fn scale(&self) -> Vec2;

    fn set_scale(&mut self, scale: Vec2);

    /// Logical window size in points
    fn win_size(&self) -> LogicalSize<f32>;

    /// Recompute the GPU viewport from the current window state
    fn refresh_viewport(&mut self, device: &mut dyn GraphicsDevice);
}

/// Plain director/view pair for hosts that do not already expose one
///
/// The viewport covers the whole window: `win_size * scale` pixels,
/// anchored at the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectorView {
    win_size: LogicalSize<f32>,
    scale: Vec2,
}

impl DirectorView {
    pub fn new(win_size: LogicalSize<f32>, scale: Vec2) -> Self {
        Self { win_size, scale }
    }

    /// Build from a window, mapping `design_size` points onto its inner size
    pub fn from_window(window: &Window, design_size: LogicalSize<f32>) -> Self {
        let frame = window.inner_size();
        let scale = Vec2::new(
            frame.width as f32 / design_size.width,
            frame.height as f32 / design_size.height,
        );
        Self::new(design_size, scale)
    }

    /// Framebuffer size implied by the current scale
    pub fn frame_size(&self) -> UVec2 {
        let size = Vec2::new(self.win_size.width, self.win_size.height) * self.scale;
        size.round().as_uvec2()
    }
}

impl ViewportContext for DirectorView {
    fn scale(&self) -> Vec2 {
        self.scale
    }

    fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
    }

    fn win_size(&self) -> LogicalSize<f32> {
        self.win_size
    }

    fn refresh_viewport(&mut self, device: &mut dyn GraphicsDevice) {
        let frame = self.frame_size();
        device.set_viewport(Rect::from_size(frame.x, frame.y));
    }
}

#[cfg(test)]
#[path = "viewport_tests.rs"]
mod tests;
