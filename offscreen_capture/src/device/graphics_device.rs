/// GraphicsDevice trait - GL-style device primitives used by render textures
///
/// The device is the thin layer between a render texture and the driver:
/// object creation/deletion, binding, binding queries, viewport, clear, and
/// readback. A backend crate implements it over a real context; tests use
/// the mock device.

use std::cell::{RefCell, RefMut};
use std::num::NonZeroU32;
use std::rc::Rc;
use bitflags::bitflags;

use crate::device::{PixelFormat, RenderbufferDesc, TextureDesc};
use crate::error::{Error, Result};

// ============================================================================
// Handles
// ============================================================================

macro_rules! gpu_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Wrap a raw driver name; 0 (the default object) yields None
            pub fn from_raw(raw: u32) -> Option<Self> {
                NonZeroU32::new(raw).map(Self)
            }

            /// Raw driver name
            pub fn raw(self) -> u32 {
                self.0.get()
            }

            pub fn from_non_zero(raw: NonZeroU32) -> Self {
                Self(raw)
            }

            pub fn non_zero(self) -> NonZeroU32 {
                self.0
            }
        }
    };
}

gpu_handle! {
    /// GPU texture object name
    TextureId
}

gpu_handle! {
    /// GPU framebuffer object name (`None` where used means the default framebuffer)
    FramebufferId
}

gpu_handle! {
    /// GPU renderbuffer object name
    RenderbufferId
}

// ============================================================================
// Common types
// ============================================================================

/// Integer rectangle in framebuffer pixels (origin bottom-left)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Rectangle anchored at the origin
    pub fn from_size(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }

    /// Number of pixels covered
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// GPU viewport (same layout as `glViewport`)
pub type Viewport = Rect;

bitflags! {
    /// Buffers cleared by `GraphicsDevice::clear`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearFlags: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

/// Result of a framebuffer completeness check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramebufferStatus {
    Complete,
    IncompleteAttachment,
    MissingAttachment,
    Unsupported,
    /// Backend-specific status code
    Other(u32),
}

/// Framebuffer attachment points used by render textures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    Color0,
    DepthStencil,
}

// ============================================================================
// GraphicsDevice trait
// ============================================================================

/// Device primitives consumed by `RenderTexture`
///
/// All calls run on the thread owning the graphics context. Bindings are
/// global device state: whatever a caller binds stays bound until someone
/// binds something else, which is why render textures snapshot and restore
/// them.
pub trait GraphicsDevice {
    /// Create a 2D texture with storage allocated and no initial data
    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureId>;

    fn delete_texture(&mut self, texture: TextureId);

    fn bind_texture(&mut self, texture: Option<TextureId>);

    /// Currently bound 2D texture
    fn texture_binding(&self) -> Option<TextureId>;

    /// Create a renderbuffer and allocate its storage
    ///
    /// Leaves the new renderbuffer bound.
    fn create_renderbuffer(&mut self, desc: &RenderbufferDesc) -> Result<RenderbufferId>;

    fn delete_renderbuffer(&mut self, renderbuffer: RenderbufferId);

    fn bind_renderbuffer(&mut self, renderbuffer: Option<RenderbufferId>);

    /// Currently bound renderbuffer
    fn renderbuffer_binding(&self) -> Option<RenderbufferId>;

    fn create_framebuffer(&mut self) -> Result<FramebufferId>;

    fn delete_framebuffer(&mut self, framebuffer: FramebufferId);

    /// Bind a framebuffer for both drawing and reading; `None` is the default framebuffer
    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferId>);

    /// Currently bound framebuffer
    fn framebuffer_binding(&self) -> Option<FramebufferId>;

    /// Attach a texture to the currently bound framebuffer
    fn attach_texture(&mut self, attachment: Attachment, texture: TextureId);

    /// Attach a renderbuffer to the currently bound framebuffer
    fn attach_renderbuffer(&mut self, attachment: Attachment, renderbuffer: RenderbufferId);

    /// Completeness of the currently bound framebuffer
    fn framebuffer_status(&self) -> FramebufferStatus;

    fn set_viewport(&mut self, viewport: Viewport);

    fn viewport(&self) -> Viewport;

    fn set_clear_color(&mut self, rgba: [f32; 4]);

    /// Clear the selected buffers of the currently bound framebuffer
    fn clear(&mut self, flags: ClearFlags);

    /// Row alignment used by `read_pixels` (1 = byte-packed rows)
    fn set_pack_alignment(&mut self, alignment: u32);

    /// Read a rectangle of the currently bound framebuffer into `out`
    ///
    /// `out` must hold `rect.area() * format.bytes_per_pixel()` bytes.
    fn read_pixels(&mut self, rect: Rect, format: PixelFormat, out: &mut [u8]) -> Result<()>;
}

/// Device shared by every object that must release GPU resources on drop
///
/// Not `Send`: a graphics context belongs to one thread.
pub type SharedDevice = Rc<RefCell<dyn GraphicsDevice>>;

/// Borrow the shared device for a batch of calls
///
/// Keep the guard short: a capture nested inside a node's `visit` borrows
/// the same device.
///
/// # Errors
///
/// `Error::InvalidState` when the device is already borrowed.
pub fn borrow_device(device: &SharedDevice) -> Result<RefMut<'_, dyn GraphicsDevice + 'static>> {
    device.try_borrow_mut().map_err(|_| {
        crate::capture_error!("offscreen::device", "Graphics device is already borrowed");
        Error::InvalidState("graphics device is already borrowed".to_string())
    })
}

#[cfg(test)]
#[path = "graphics_device_tests.rs"]
mod tests;
