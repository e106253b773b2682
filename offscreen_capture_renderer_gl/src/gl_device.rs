/// GlDevice - OpenGL implementation of the GraphicsDevice trait

use std::cell::RefCell;
use rustc_hash::FxHashMap;
use std::rc::Rc;
use glow::HasContext;

use offscreen_capture::capture::device::{
    Attachment, ClearFlags, FramebufferId, FramebufferStatus, GraphicsDevice, PixelFormat, Rect,
    RenderbufferDesc, RenderbufferId, SharedDevice, TextureDesc, TextureId, Viewport,
    DepthStencilFormat,
};
use offscreen_capture::capture::{Error, Result};

use crate::gl_format::{
    attachment_to_gl, clear_flags_to_gl, color_format_to_gl, depth_stencil_to_gl, filter_to_gl,
    pixel_format_to_gl, renderbuffer_attachment_to_gl, status_from_gl, swap_red_blue,
};

const SOURCE: &str = "offscreen::gl";
const MAX_QUEUED_ERRORS: usize = 16;

/// Initial pixel-store state and driver capabilities
#[derive(Debug, Clone, PartialEq)]
pub struct GlDeviceConfig {
    /// `GL_PACK_ALIGNMENT` set when the device is created
    pub pack_alignment: u32,
    /// `GL_UNPACK_ALIGNMENT` set when the device is created
    pub unpack_alignment: u32,
    /// Driver accepts `GL_BGR`/`GL_BGRA` in `glReadPixels` (desktop GL).
    /// When false, BGR readbacks are swizzled on the CPU.
    pub native_bgr: bool,
}

impl Default for GlDeviceConfig {
    fn default() -> Self {
        Self {
            pack_alignment: 1,
            unpack_alignment: 8,
            native_bgr: true,
        }
    }
}

/// OpenGL device over a `glow` context
///
/// The context must be current on the calling thread for every call.
pub struct GlDevice {
    gl: Rc<glow::Context>,
    config: GlDeviceConfig,
    /// Storage format per live renderbuffer, to pick the attachment point
    renderbuffer_formats: FxHashMap<RenderbufferId, DepthStencilFormat>,
}

fn native_texture(texture: TextureId) -> glow::NativeTexture {
    glow::NativeTexture(texture.non_zero())
}

fn native_renderbuffer(renderbuffer: RenderbufferId) -> glow::NativeRenderbuffer {
    glow::NativeRenderbuffer(renderbuffer.non_zero())
}

fn native_framebuffer(framebuffer: FramebufferId) -> glow::NativeFramebuffer {
    glow::NativeFramebuffer(framebuffer.non_zero())
}

impl GlDeviceConfig {
    /// Check the pixel-store values before they reach the driver
    ///
    /// # Errors
    ///
    /// `Error::InitializationFailed` when an alignment is not 1, 2, 4, or 8.
    pub fn validate(&self) -> Result<()> {
        for (name, alignment) in [
            ("pack", self.pack_alignment),
            ("unpack", self.unpack_alignment),
        ] {
            if !matches!(alignment, 1 | 2 | 4 | 8) {
                offscreen_capture::capture_error!(SOURCE,
                    "Invalid {} alignment {} (expected 1, 2, 4 or 8)", name, alignment);
                return Err(Error::InitializationFailed(format!(
                    "{} alignment must be 1, 2, 4 or 8, got {}", name, alignment
                )));
            }
        }
        Ok(())
    }
}

impl GlDevice {
    /// Apply `config` to the current context
    ///
    /// # Errors
    ///
    /// `Error::InitializationFailed` when the config is invalid or the driver
    /// rejects the pixel-store state.
    pub fn new(gl: Rc<glow::Context>, config: GlDeviceConfig) -> Result<Self> {
        config.validate()?;

        // SAFETY: the caller made the context current on this thread.
        unsafe {
            gl.pixel_store_i32(glow::PACK_ALIGNMENT, config.pack_alignment as i32);
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, config.unpack_alignment as i32);
        }
        let device = Self {
            gl,
            config,
            renderbuffer_formats: FxHashMap::default(),
        };
        if let Some(code) = device.take_error() {
            offscreen_capture::capture_error!(SOURCE,
                "GL device setup failed with error 0x{:04X}", code);
            return Err(Error::InitializationFailed(format!(
                "pixel-store setup raised GL error 0x{:04X}", code
            )));
        }

        offscreen_capture::capture_debug!(SOURCE,
            "GL device ready (pack alignment {}, unpack alignment {}, native BGR {})",
            device.config.pack_alignment, device.config.unpack_alignment, device.config.native_bgr);
        Ok(device)
    }

    /// Wrap into the shared handle render textures hold
    pub fn into_shared(self) -> SharedDevice {
        Rc::new(RefCell::new(self))
    }

    pub fn context(&self) -> &Rc<glow::Context> {
        &self.gl
    }

    pub fn config(&self) -> &GlDeviceConfig {
        &self.config
    }

    /// Drain the GL error queue, returning the first error code
    fn take_error(&self) -> Option<u32> {
        let mut first = None;
        // a lost context keeps reporting errors, so the drain is bounded
        for _ in 0..MAX_QUEUED_ERRORS {
            // SAFETY: glGetError has no preconditions beyond a current context.
            let code = unsafe { self.gl.get_error() };
            if code == glow::NO_ERROR {
                break;
            }
            if first.is_none() {
                first = Some(code);
            }
        }
        first
    }

    fn check_error(&self, operation: &str) -> Result<()> {
        match self.take_error() {
            None => Ok(()),
            Some(glow::OUT_OF_MEMORY) => {
                offscreen_capture::capture_error!(SOURCE, "{} ran out of GPU memory", operation);
                Err(Error::OutOfMemory)
            }
            Some(code) => {
                offscreen_capture::capture_error!(SOURCE, "{} failed: GL error 0x{:04X}", operation, code);
                Err(Error::BackendError(format!("{} failed: GL error 0x{:04X}", operation, code)))
            }
        }
    }

    fn binding(&self, parameter: u32) -> u32 {
        // SAFETY: binding queries are plain state reads.
        let name = unsafe { self.gl.get_parameter_i32(parameter) };
        name as u32
    }
}

impl GraphicsDevice for GlDevice {
    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureId> {
        let (internal_format, format, ty) = color_format_to_gl(desc.format);
        if let Some(code) = self.take_error() {
            offscreen_capture::capture_warn!(SOURCE, "Discarding stale GL error 0x{:04X}", code);
        }

        // SAFETY: the new texture is bound before any call that targets
        // TEXTURE_2D, and `pixels` is None so no client memory is read.
        let texture = unsafe {
            let texture = self.gl.create_texture().map_err(|e| {
                offscreen_capture::capture_error!(SOURCE, "Failed to create texture: {}", e);
                Error::BackendError(format!("Failed to create texture: {}", e))
            })?;

            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                internal_format,
                desc.width as i32,
                desc.height as i32,
                0,
                format,
                ty,
                None,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                filter_to_gl(desc.min_filter, desc.mipmaps),
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                filter_to_gl(desc.mag_filter, false),
            );
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
            if desc.mipmaps {
                self.gl.generate_mipmap(glow::TEXTURE_2D);
            }
            texture
        };

        if let Err(err) = self.check_error("glTexImage2D") {
            // SAFETY: texture was created above and is not shared yet.
            unsafe { self.gl.delete_texture(texture) };
            return Err(err);
        }

        offscreen_capture::capture_trace!(SOURCE,
            "Texture {} allocated ({}x{} {:?})", texture.0, desc.width, desc.height, desc.format);
        Ok(TextureId::from_non_zero(texture.0))
    }

    fn delete_texture(&mut self, texture: TextureId) {
        // SAFETY: deleting a name unknown to GL is silently ignored.
        unsafe { self.gl.delete_texture(native_texture(texture)) };
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        // SAFETY: binding a live name or 0 is always valid.
        unsafe { self.gl.bind_texture(glow::TEXTURE_2D, texture.map(native_texture)) };
    }

    fn texture_binding(&self) -> Option<TextureId> {
        TextureId::from_raw(self.binding(glow::TEXTURE_BINDING_2D))
    }

    fn create_renderbuffer(&mut self, desc: &RenderbufferDesc) -> Result<RenderbufferId> {
        // SAFETY: storage is allocated on the renderbuffer bound just before.
        let renderbuffer = unsafe {
            let renderbuffer = self.gl.create_renderbuffer().map_err(|e| {
                offscreen_capture::capture_error!(SOURCE, "Failed to create renderbuffer: {}", e);
                Error::BackendError(format!("Failed to create renderbuffer: {}", e))
            })?;
            self.gl.bind_renderbuffer(glow::RENDERBUFFER, Some(renderbuffer));
            self.gl.renderbuffer_storage(
                glow::RENDERBUFFER,
                depth_stencil_to_gl(desc.format),
                desc.width as i32,
                desc.height as i32,
            );
            renderbuffer
        };

        if let Err(err) = self.check_error("glRenderbufferStorage") {
            // SAFETY: renderbuffer was created above and is not shared yet.
            unsafe { self.gl.delete_renderbuffer(renderbuffer) };
            return Err(err);
        }

        let id = RenderbufferId::from_non_zero(renderbuffer.0);
        self.renderbuffer_formats.insert(id, desc.format);
        Ok(id)
    }

    fn delete_renderbuffer(&mut self, renderbuffer: RenderbufferId) {
        self.renderbuffer_formats.remove(&renderbuffer);
        // SAFETY: deleting a name unknown to GL is silently ignored.
        unsafe { self.gl.delete_renderbuffer(native_renderbuffer(renderbuffer)) };
    }

    fn bind_renderbuffer(&mut self, renderbuffer: Option<RenderbufferId>) {
        // SAFETY: binding a live name or 0 is always valid.
        unsafe { self.gl.bind_renderbuffer(glow::RENDERBUFFER, renderbuffer.map(native_renderbuffer)) };
    }

    fn renderbuffer_binding(&self) -> Option<RenderbufferId> {
        RenderbufferId::from_raw(self.binding(glow::RENDERBUFFER_BINDING))
    }

    fn create_framebuffer(&mut self) -> Result<FramebufferId> {
        // SAFETY: creating a name has no preconditions.
        let framebuffer = unsafe { self.gl.create_framebuffer() }.map_err(|e| {
            offscreen_capture::capture_error!(SOURCE, "Failed to create framebuffer: {}", e);
            Error::BackendError(format!("Failed to create framebuffer: {}", e))
        })?;
        Ok(FramebufferId::from_non_zero(framebuffer.0))
    }

    fn delete_framebuffer(&mut self, framebuffer: FramebufferId) {
        // SAFETY: deleting a name unknown to GL is silently ignored; deleting
        // the bound framebuffer reverts the binding to the default one.
        unsafe { self.gl.delete_framebuffer(native_framebuffer(framebuffer)) };
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferId>) {
        // SAFETY: binding a live name or 0 is always valid.
        unsafe { self.gl.bind_framebuffer(glow::FRAMEBUFFER, framebuffer.map(native_framebuffer)) };
    }

    fn framebuffer_binding(&self) -> Option<FramebufferId> {
        FramebufferId::from_raw(self.binding(glow::FRAMEBUFFER_BINDING))
    }

    fn attach_texture(&mut self, attachment: Attachment, texture: TextureId) {
        // SAFETY: attaches to the currently bound framebuffer.
        unsafe {
            self.gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                attachment_to_gl(attachment),
                glow::TEXTURE_2D,
                Some(native_texture(texture)),
                0,
            );
        }
    }

    fn attach_renderbuffer(&mut self, attachment: Attachment, renderbuffer: RenderbufferId) {
        let format = self.renderbuffer_formats.get(&renderbuffer).copied();
        // SAFETY: attaches to the currently bound framebuffer.
        unsafe {
            self.gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                renderbuffer_attachment_to_gl(attachment, format),
                glow::RENDERBUFFER,
                Some(native_renderbuffer(renderbuffer)),
            );
        }
    }

    fn framebuffer_status(&self) -> FramebufferStatus {
        // SAFETY: status query on the currently bound framebuffer.
        status_from_gl(unsafe { self.gl.check_framebuffer_status(glow::FRAMEBUFFER) })
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        // SAFETY: plain state change.
        unsafe {
            self.gl.viewport(viewport.x, viewport.y, viewport.width as i32, viewport.height as i32);
        }
    }

    fn viewport(&self) -> Viewport {
        let mut values = [0i32; 4];
        // SAFETY: GL_VIEWPORT writes exactly four integers.
        unsafe { self.gl.get_parameter_i32_slice(glow::VIEWPORT, &mut values) };
        Rect {
            x: values[0],
            y: values[1],
            width: values[2].max(0) as u32,
            height: values[3].max(0) as u32,
        }
    }

    fn set_clear_color(&mut self, rgba: [f32; 4]) {
        // SAFETY: plain state change.
        unsafe { self.gl.clear_color(rgba[0], rgba[1], rgba[2], rgba[3]) };
    }

    fn clear(&mut self, flags: ClearFlags) {
        let mask = clear_flags_to_gl(flags);
        if mask != 0 {
            // SAFETY: clears the currently bound framebuffer.
            unsafe { self.gl.clear(mask) };
        }
    }

    fn set_pack_alignment(&mut self, alignment: u32) {
        // SAFETY: plain state change; GL rejects values other than 1, 2, 4, 8.
        unsafe { self.gl.pixel_store_i32(glow::PACK_ALIGNMENT, alignment as i32) };
    }

    fn read_pixels(&mut self, rect: Rect, format: PixelFormat, out: &mut [u8]) -> Result<()> {
        let bytes_per_pixel = format.bytes_per_pixel();
        let expected = rect.area() * bytes_per_pixel;
        if out.len() != expected {
            offscreen_capture::capture_bail!(InvalidResource: SOURCE,
                "Readback buffer is {} bytes, expected {}", out.len(), expected);
        }

        let gl_format = pixel_format_to_gl(format, self.config.native_bgr);
        if let Some(code) = self.take_error() {
            offscreen_capture::capture_warn!(SOURCE, "Discarding stale GL error 0x{:04X}", code);
        }
        // SAFETY: `out` holds exactly width * height * bpp bytes; the caller
        // sets a pack alignment that keeps rows tightly packed.
        unsafe {
            self.gl.read_pixels(
                rect.x,
                rect.y,
                rect.width as i32,
                rect.height as i32,
                gl_format,
                glow::UNSIGNED_BYTE,
                glow::PixelPackData::Slice(out),
            );
        }
        self.check_error("glReadPixels")?;

        if format.is_bgr_order() && !self.config.native_bgr {
            swap_red_blue(out, bytes_per_pixel);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "gl_device_tests.rs"]
mod tests;
