/// CaptureScope - guard pairing `RenderTexture::begin` with `end`

use std::cell::RefMut;

use crate::device::{borrow_device, GraphicsDevice, PixelFormat};
use crate::error::Result;
use crate::host::{Node, ViewportContext};
use crate::target::{PixelBuffer, RenderTexture};

/// Active capture on a render texture
///
/// Created by `RenderTexture::scope`, which has already called `begin`.
/// Dropping the scope calls `end`, so the caller's framebuffer, renderbuffer,
/// and view scale come back on every exit path, including `?` returns and
/// panics during draw work. Use `finish` to observe errors from `end`.
pub struct CaptureScope<'a> {
    target: &'a mut RenderTexture,
    view: &'a mut dyn ViewportContext,
    finished: bool,
}

impl<'a> CaptureScope<'a> {
    pub(crate) fn new(target: &'a mut RenderTexture, view: &'a mut dyn ViewportContext) -> Self {
        Self {
            target,
            view,
            finished: false,
        }
    }

    pub fn target(&self) -> &RenderTexture {
        &*self.target
    }

    /// Device for issuing draw calls into the render texture
    pub fn device(&self) -> Result<RefMut<'_, dyn GraphicsDevice + 'static>> {
        borrow_device(self.target.device())
    }

    /// Draw a node into the render texture
    ///
    /// The device is not borrowed while the node runs, so the node may
    /// capture into another render texture on the same device.
    pub fn visit(&mut self, node: &dyn Node) -> Result<()> {
        node.visit(self.target.device())
    }

    /// Read back what has been drawn so far
    pub fn read_pixels(&mut self, format: PixelFormat) -> Result<PixelBuffer> {
        self.target.read_pixels(format)
    }

    /// End the capture, reporting errors from `end`
    pub fn finish(mut self) -> Result<()> {
        self.finished = true;
        self.target.end(&mut *self.view)
    }
}

impl Drop for CaptureScope<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(err) = self.target.end(&mut *self.view) {
            crate::capture_warn!("offscreen::CaptureScope", "end() failed while unwinding capture: {}", err);
        }
    }
}
