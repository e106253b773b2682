/// RenderTexture - offscreen framebuffer that captures scene-graph nodes
///
/// Owns a color texture, a depth/stencil renderbuffer, and a framebuffer
/// tying them together. Between `begin` and `end` every draw call lands in
/// the texture; the caller's framebuffer/renderbuffer bindings and the
/// view's scale factors are saved on `begin` and restored on `end`.

use std::cell::RefCell;
use std::rc::Rc;
use glam::{UVec2, Vec2};

use crate::device::{
    borrow_device, Attachment, ClearFlags, FramebufferId, FramebufferStatus, GraphicsDevice,
    PixelFormat, Rect, RenderbufferDesc, RenderbufferId, SharedDevice, TextureDesc, TextureId,
};
use crate::error::{Error, Result};
use crate::host::{EngineTexture, Node, ViewportContext};
use crate::target::{CaptureScope, ManagedSprite, PixelBuffer, RenderTextureConfig};

const SOURCE: &str = "offscreen::RenderTexture";

/// Ownership state of the color texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot {
    /// The render texture deletes this texture when dropped
    Owned(TextureId),
    /// Ownership moved to an engine texture or sprite
    Released,
}

/// Caller state snapshotted by `begin`, restored by `end`
#[derive(Debug, Clone, Copy, PartialEq)]
struct SavedState {
    framebuffer: Option<FramebufferId>,
    renderbuffer: Option<RenderbufferId>,
    scale: Vec2,
}

/// Bindings touched while allocating attachments
struct Bindings {
    texture: Option<TextureId>,
    renderbuffer: Option<RenderbufferId>,
    framebuffer: Option<FramebufferId>,
}

impl Bindings {
    fn snapshot(device: &dyn GraphicsDevice) -> Self {
        Self {
            texture: device.texture_binding(),
            renderbuffer: device.renderbuffer_binding(),
            framebuffer: device.framebuffer_binding(),
        }
    }

    fn restore(&self, device: &mut dyn GraphicsDevice) {
        device.bind_texture(self.texture);
        device.bind_renderbuffer(self.renderbuffer);
        device.bind_framebuffer(self.framebuffer);
    }
}

fn release_attachments(
    device: &mut dyn GraphicsDevice,
    framebuffer: FramebufferId,
    texture: Option<TextureId>,
    depth_stencil: Option<RenderbufferId>,
) {
    device.delete_framebuffer(framebuffer);
    if let Some(texture) = texture {
        device.delete_texture(texture);
    }
    if let Some(renderbuffer) = depth_stencil {
        device.delete_renderbuffer(renderbuffer);
    }
}

/// Offscreen render target
pub struct RenderTexture {
    device: SharedDevice,
    width: u32,
    height: u32,
    color: TextureSlot,
    framebuffer: FramebufferId,
    depth_stencil: Option<RenderbufferId>,
    saved: Option<SavedState>,
}

impl RenderTexture {
    /// Create a render texture with the default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero, if the device fails to
    /// allocate an attachment, or if the framebuffer is incomplete. Nothing
    /// is leaked and the caller's bindings are restored in every case.
    pub fn new(device: SharedDevice, width: u32, height: u32) -> Result<Self> {
        Self::with_config(device, width, height, RenderTextureConfig::default())
    }

    pub fn with_config(
        device: SharedDevice,
        width: u32,
        height: u32,
        config: RenderTextureConfig,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            crate::capture_bail!(InvalidResource: SOURCE,
                "Render texture size must be positive, got {}x{}", width, height);
        }

        let (texture, framebuffer, depth_stencil) = {
            let mut dev = borrow_device(&device)?;
            let previous = Bindings::snapshot(&*dev);
            let result = Self::allocate(&mut *dev, width, height, &config);
            previous.restore(&mut *dev);
            result?
        };

        crate::capture_debug!(SOURCE,
            "Created {}x{} render texture (framebuffer {}, texture {})",
            width, height, framebuffer.raw(), texture.raw());

        Ok(Self {
            device,
            width,
            height,
            color: TextureSlot::Owned(texture),
            framebuffer,
            depth_stencil,
            saved: None,
        })
    }

    fn allocate(
        device: &mut dyn GraphicsDevice,
        width: u32,
        height: u32,
        config: &RenderTextureConfig,
    ) -> Result<(TextureId, FramebufferId, Option<RenderbufferId>)> {
        let texture = device.create_texture(&TextureDesc {
            width,
            height,
            format: config.color_format,
            min_filter: config.filter,
            mag_filter: config.filter,
            mipmaps: false,
        })?;

        let framebuffer = match device.create_framebuffer() {
            Ok(framebuffer) => framebuffer,
            Err(err) => {
                device.delete_texture(texture);
                return Err(err);
            }
        };

        let depth_stencil = match config.depth_stencil {
            Some(format) => {
                let desc = RenderbufferDesc { width, height, format };
                match device.create_renderbuffer(&desc) {
                    Ok(renderbuffer) => Some(renderbuffer),
                    Err(err) => {
                        release_attachments(device, framebuffer, Some(texture), None);
                        return Err(err);
                    }
                }
            }
            None => None,
        };

        device.bind_framebuffer(Some(framebuffer));
        if let Some(renderbuffer) = depth_stencil {
            device.attach_renderbuffer(Attachment::DepthStencil, renderbuffer);
        }
        device.attach_texture(Attachment::Color0, texture);

        let status = device.framebuffer_status();
        if status != FramebufferStatus::Complete {
            release_attachments(device, framebuffer, Some(texture), depth_stencil);
            crate::capture_error!(SOURCE,
                "Framebuffer for {}x{} render texture is incomplete: {:?}", width, height, status);
            return Err(Error::IncompleteFramebuffer(status));
        }

        Ok((texture, framebuffer, depth_stencil))
    }

    // ===== ACCESSORS =====

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    pub fn device(&self) -> &SharedDevice {
        &self.device
    }

    pub fn framebuffer(&self) -> FramebufferId {
        self.framebuffer
    }

    pub fn depth_stencil(&self) -> Option<RenderbufferId> {
        self.depth_stencil
    }

    pub fn texture_slot(&self) -> TextureSlot {
        self.color
    }

    /// Color texture, if this render texture still owns it
    pub fn texture(&self) -> Option<TextureId> {
        match self.color {
            TextureSlot::Owned(texture) => Some(texture),
            TextureSlot::Released => None,
        }
    }

    pub fn owns_texture(&self) -> bool {
        matches!(self.color, TextureSlot::Owned(_))
    }

    /// True strictly between `begin` and `end`
    pub fn is_active(&self) -> bool {
        self.saved.is_some()
    }

    // ===== BEGIN / END =====

    /// Redirect rendering into this texture
    ///
    /// Saves the bound framebuffer and renderbuffer and the view's scale,
    /// points the scale at this texture's pixel grid (scissor-based clipping
    /// reads it), sets the viewport to the whole texture, binds the
    /// framebuffer, and clears color and depth.
    ///
    /// The view scale stays overridden until `end`. A target dropped while
    /// active restores its bindings but not the scale, since it holds no
    /// view; prefer `scope` or `capture`, which always call `end`.
    ///
    /// # Errors
    ///
    /// `Error::InvalidState` if already active or if the view reports an
    /// empty or NaN window size. Device state is untouched on error.
    pub fn begin(&mut self, view: &mut dyn ViewportContext) -> Result<()> {
        if self.saved.is_some() {
            crate::capture_bail!(InvalidState: SOURCE,
                "begin() called while framebuffer {} is already active", self.framebuffer.raw());
        }

        let win_size = view.win_size();
        if !(win_size.width > 0.0 && win_size.height > 0.0) {
            crate::capture_bail!(InvalidState: SOURCE,
                "Cannot compute view scale for window size {}x{}", win_size.width, win_size.height);
        }

        let mut device = borrow_device(&self.device)?;
        let saved = SavedState {
            framebuffer: device.framebuffer_binding(),
            renderbuffer: device.renderbuffer_binding(),
            scale: view.scale(),
        };

        view.set_scale(Vec2::new(
            self.width as f32 / win_size.width,
            self.height as f32 / win_size.height,
        ));

        device.set_viewport(Rect::from_size(self.width, self.height));
        device.bind_framebuffer(Some(self.framebuffer));
        self.saved = Some(saved);

        device.clear(ClearFlags::COLOR | ClearFlags::DEPTH);

        crate::capture_trace!(SOURCE, "Begin capture into framebuffer {}", self.framebuffer.raw());
        Ok(())
    }

    /// Restore the state saved by `begin`
    ///
    /// Rebinds the previous renderbuffer and framebuffer, clears that
    /// target, restores the view scale, and lets the view recompute its
    /// viewport.
    ///
    /// # Errors
    ///
    /// `Error::InvalidState` when there is no matching `begin`.
    pub fn end(&mut self, view: &mut dyn ViewportContext) -> Result<()> {
        if self.saved.is_none() {
            crate::capture_bail!(InvalidState: SOURCE,
                "end() called without a matching begin() on framebuffer {}", self.framebuffer.raw());
        }

        let mut device = borrow_device(&self.device)?;
        let Some(saved) = self.saved.take() else {
            return Err(Error::InvalidState("render texture is not active".to_string()));
        };

        device.bind_renderbuffer(saved.renderbuffer);
        device.bind_framebuffer(saved.framebuffer);
        device.clear(ClearFlags::COLOR | ClearFlags::DEPTH | ClearFlags::STENCIL);

        view.set_scale(saved.scale);
        view.refresh_viewport(&mut *device);

        crate::capture_trace!(SOURCE, "End capture into framebuffer {}", self.framebuffer.raw());
        Ok(())
    }

    /// `begin`, returning a guard that runs `end` when dropped
    pub fn scope<'a>(&'a mut self, view: &'a mut dyn ViewportContext) -> Result<CaptureScope<'a>> {
        self.begin(view)?;
        Ok(CaptureScope::new(self, view))
    }

    // ===== CAPTURE =====

    /// Render `node` into this texture
    pub fn capture(&mut self, node: &dyn Node, view: &mut dyn ViewportContext) -> Result<()> {
        let mut scope = self.scope(view)?;
        scope.visit(node)?;
        scope.finish()
    }

    /// Render `node` into this texture and read the result back
    ///
    /// `end` runs whether or not the visit or the readback fails.
    pub fn capture_with_pixels(
        &mut self,
        node: &dyn Node,
        view: &mut dyn ViewportContext,
        format: PixelFormat,
    ) -> Result<PixelBuffer> {
        let mut scope = self.scope(view)?;
        scope.visit(node)?;
        let pixels = scope.read_pixels(format)?;
        scope.finish()?;
        Ok(pixels)
    }

    /// Read the whole texture back in `format`
    ///
    /// While active this reads from the already bound framebuffer. Otherwise
    /// the framebuffer is bound for the read and the previous binding is
    /// restored afterwards.
    pub fn read_pixels(&mut self, format: PixelFormat) -> Result<PixelBuffer> {
        let mut pixels = PixelBuffer::new(self.width, self.height, format);
        let mut device = borrow_device(&self.device)?;

        let previous = if self.saved.is_some() {
            None
        } else {
            let previous = device.framebuffer_binding();
            device.bind_framebuffer(Some(self.framebuffer));
            Some(previous)
        };

        device.set_pack_alignment(1);
        let result = device.read_pixels(
            Rect::from_size(self.width, self.height),
            format,
            pixels.as_bytes_mut(),
        );

        if let Some(previous) = previous {
            device.bind_framebuffer(previous);
        }

        result?;
        Ok(pixels)
    }

    // ===== ENGINE TEXTURE HAND-OFF =====

    /// Wrap the color texture in an engine texture without giving it away
    ///
    /// The engine texture and this render texture share the GPU texture;
    /// this render texture still deletes it.
    pub fn export_as_texture(&self) -> Result<EngineTexture> {
        let TextureSlot::Owned(texture) = self.color else {
            crate::capture_bail!(InvalidState: SOURCE,
                "Color texture of framebuffer {} was already released", self.framebuffer.raw());
        };
        Ok(EngineTexture::from_external_gpu_texture(texture, self.size(), self.size().as_vec2()))
    }

    /// Wrap the color texture in an engine texture that owns it
    ///
    /// Afterwards this render texture no longer deletes the texture.
    pub fn take_as_texture(&mut self) -> Result<EngineTexture> {
        let texture = self.export_as_texture()?.adopt(self.device.clone());
        self.color = TextureSlot::Released;
        crate::capture_debug!(SOURCE,
            "Texture {} handed over to an engine texture", texture.name().raw());
        Ok(texture)
    }

    /// Convert into a sprite that shares this render texture
    pub fn into_managed_sprite(self) -> Result<Rc<RefCell<ManagedSprite>>> {
        ManagedSprite::new(self).map(|sprite| Rc::new(RefCell::new(sprite)))
    }

    /// Stop deleting the color texture on drop
    pub(crate) fn release_texture(&mut self) {
        self.color = TextureSlot::Released;
    }
}

/// Releases the framebuffer, renderbuffer, and owned texture
///
/// Dropping an active target rebinds the saved framebuffer and renderbuffer
/// but leaves the view scale set by `begin` in place.
impl Drop for RenderTexture {
    fn drop(&mut self) {
        let mut device = match self.device.try_borrow_mut() {
            Ok(device) => device,
            Err(_) => {
                crate::capture_warn!(SOURCE,
                    "Device busy while dropping framebuffer {}, GPU resources leaked",
                    self.framebuffer.raw());
                return;
            }
        };

        if let Some(saved) = self.saved.take() {
            crate::capture_warn!(SOURCE,
                "Framebuffer {} dropped while active, restoring bindings; view scale stays overridden",
                self.framebuffer.raw());
            device.bind_renderbuffer(saved.renderbuffer);
            device.bind_framebuffer(saved.framebuffer);
        }

        release_attachments(&mut *device, self.framebuffer, self.texture(), self.depth_stencil);
        crate::capture_debug!(SOURCE, "Released framebuffer {}", self.framebuffer.raw());
    }
}

#[cfg(test)]
#[path = "render_texture_tests.rs"]
mod tests;
