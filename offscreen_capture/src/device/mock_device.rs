/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Tracks live objects, bindings, and per-texture pixels so render texture
/// behavior (state restoration, ownership, readback) can be verified
/// without a graphics context. Every call is recorded in `calls`.

use std::cell::RefCell;
use std::rc::Rc;
use rustc_hash::FxHashMap;

use crate::device::{
    Attachment, ClearFlags, ColorFormat, FramebufferId, FramebufferStatus, GraphicsDevice,
    PixelFormat, Rect, RenderbufferDesc, RenderbufferId, SharedDevice, TextureDesc, TextureId,
    Viewport,
};
use crate::error::{Error, Result};

// ============================================================================
// Mock objects
// ============================================================================

#[derive(Debug)]
pub struct MockTexture {
    pub desc: TextureDesc,
    /// RGBA pixels, rows bottom-up like a GL texture
    pub pixels: Vec<[u8; 4]>,
}

#[derive(Debug, Default)]
pub struct MockFramebuffer {
    pub color: Option<TextureId>,
    pub depth_stencil: Option<RenderbufferId>,
}

// ============================================================================
// Mock device
// ============================================================================

#[derive(Debug)]
pub struct MockDevice {
    next_name: u32,
    pub textures: FxHashMap<TextureId, MockTexture>,
    pub renderbuffers: FxHashMap<RenderbufferId, RenderbufferDesc>,
    pub framebuffers: FxHashMap<FramebufferId, MockFramebuffer>,

    pub bound_texture: Option<TextureId>,
    pub bound_renderbuffer: Option<RenderbufferId>,
    pub bound_framebuffer: Option<FramebufferId>,
    pub current_viewport: Viewport,
    pub clear_color: [f32; 4],
    pub pack_alignment: u32,

    pub deleted_textures: Vec<TextureId>,
    pub deleted_renderbuffers: Vec<RenderbufferId>,
    pub deleted_framebuffers: Vec<FramebufferId>,
    /// Deletes of names that were not live (double free)
    pub invalid_deletes: usize,
    pub calls: Vec<String>,

    // Failure injection
    pub fail_texture_creation: bool,
    pub fail_renderbuffer_creation: bool,
    pub fail_framebuffer_creation: bool,
    pub forced_status: Option<FramebufferStatus>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self {
            next_name: 1,
            textures: FxHashMap::default(),
            renderbuffers: FxHashMap::default(),
            framebuffers: FxHashMap::default(),
            bound_texture: None,
            bound_renderbuffer: None,
            bound_framebuffer: None,
            current_viewport: Rect::from_size(800, 600),
            clear_color: [0.0, 0.0, 0.0, 0.0],
            pack_alignment: 4,
            deleted_textures: Vec::new(),
            deleted_renderbuffers: Vec::new(),
            deleted_framebuffers: Vec::new(),
            invalid_deletes: 0,
            calls: Vec::new(),
            fail_texture_creation: false,
            fail_renderbuffer_creation: false,
            fail_framebuffer_creation: false,
            forced_status: None,
        }
    }

    /// Create a device plus a type-erased handle to the same device
    pub fn shared() -> (Rc<RefCell<MockDevice>>, SharedDevice) {
        let mock = Rc::new(RefCell::new(MockDevice::new()));
        let shared: SharedDevice = mock.clone();
        (mock, shared)
    }

    /// Create a framebuffer not owned by any render texture (e.g. the host's scene FBO)
    pub fn create_host_framebuffer(&mut self) -> FramebufferId {
        let id = FramebufferId::from_raw(self.alloc_name()).unwrap();
        self.framebuffers.insert(id, MockFramebuffer::default());
        id
    }

    /// Number of live GPU objects of every kind
    pub fn live_object_count(&self) -> usize {
        self.textures.len() + self.renderbuffers.len() + self.framebuffers.len()
    }

    /// Overwrite one texel of a texture (test setup)
    pub fn paint(&mut self, texture: TextureId, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(tex) = self.textures.get_mut(&texture) {
            let index = (y * tex.desc.width + x) as usize;
            tex.pixels[index] = store_texel(tex.desc.format, rgba);
        }
    }

    pub fn called(&self, name: &str) -> usize {
        self.calls.iter().filter(|c| c.as_str() == name).count()
    }

    fn alloc_name(&mut self) -> u32 {
        let name = self.next_name;
        self.next_name += 1;
        name
    }

    fn bound_color_texture(&self) -> Option<TextureId> {
        self.bound_framebuffer
            .and_then(|fb| self.framebuffers.get(&fb))
            .and_then(|fb| fb.color)
    }
}

/// Texels of an RGB texture read back with full alpha
fn store_texel(format: ColorFormat, rgba: [u8; 4]) -> [u8; 4] {
    match format {
        ColorFormat::Rgb8 => [rgba[0], rgba[1], rgba[2], 255],
        ColorFormat::Rgba8 => rgba,
    }
}

fn to_unorm8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl GraphicsDevice for MockDevice {
    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureId> {
        self.calls.push("create_texture".to_string());
        if self.fail_texture_creation {
            return Err(Error::OutOfMemory);
        }
        let id = TextureId::from_raw(self.alloc_name()).unwrap();
        let texel = store_texel(desc.format, [0, 0, 0, 0]);
        self.textures.insert(id, MockTexture {
            desc: desc.clone(),
            pixels: vec![texel; desc.width as usize * desc.height as usize],
        });
        // glTexImage2D needs the texture bound
        self.bound_texture = Some(id);
        Ok(id)
    }

    fn delete_texture(&mut self, texture: TextureId) {
        self.calls.push("delete_texture".to_string());
        if self.textures.remove(&texture).is_none() {
            self.invalid_deletes += 1;
        }
        if self.bound_texture == Some(texture) {
            self.bound_texture = None;
        }
        self.deleted_textures.push(texture);
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        self.calls.push("bind_texture".to_string());
        self.bound_texture = texture;
    }

    fn texture_binding(&self) -> Option<TextureId> {
        self.bound_texture
    }

    fn create_renderbuffer(&mut self, desc: &RenderbufferDesc) -> Result<RenderbufferId> {
        self.calls.push("create_renderbuffer".to_string());
        if self.fail_renderbuffer_creation {
            return Err(Error::OutOfMemory);
        }
        let id = RenderbufferId::from_raw(self.alloc_name()).unwrap();
        self.renderbuffers.insert(id, desc.clone());
        self.bound_renderbuffer = Some(id);
        Ok(id)
    }

    fn delete_renderbuffer(&mut self, renderbuffer: RenderbufferId) {
        self.calls.push("delete_renderbuffer".to_string());
        if self.renderbuffers.remove(&renderbuffer).is_none() {
            self.invalid_deletes += 1;
        }
        if self.bound_renderbuffer == Some(renderbuffer) {
            self.bound_renderbuffer = None;
        }
        self.deleted_renderbuffers.push(renderbuffer);
    }

    fn bind_renderbuffer(&mut self, renderbuffer: Option<RenderbufferId>) {
        self.calls.push("bind_renderbuffer".to_string());
        self.bound_renderbuffer = renderbuffer;
    }

    fn renderbuffer_binding(&self) -> Option<RenderbufferId> {
        self.bound_renderbuffer
    }

    fn create_framebuffer(&mut self) -> Result<FramebufferId> {
        self.calls.push("create_framebuffer".to_string());
        if self.fail_framebuffer_creation {
            return Err(Error::BackendError("framebuffer creation failed".to_string()));
        }
        let id = FramebufferId::from_raw(self.alloc_name()).unwrap();
        self.framebuffers.insert(id, MockFramebuffer::default());
        Ok(id)
    }

    fn delete_framebuffer(&mut self, framebuffer: FramebufferId) {
        self.calls.push("delete_framebuffer".to_string());
        if self.framebuffers.remove(&framebuffer).is_none() {
            self.invalid_deletes += 1;
        }
        if self.bound_framebuffer == Some(framebuffer) {
            self.bound_framebuffer = None;
        }
        self.deleted_framebuffers.push(framebuffer);
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferId>) {
        self.calls.push("bind_framebuffer".to_string());
        self.bound_framebuffer = framebuffer;
    }

    fn framebuffer_binding(&self) -> Option<FramebufferId> {
        self.bound_framebuffer
    }

    fn attach_texture(&mut self, attachment: Attachment, texture: TextureId) {
        self.calls.push("attach_texture".to_string());
        if let Some(fb) = self.bound_framebuffer.and_then(|id| self.framebuffers.get_mut(&id)) {
            if attachment == Attachment::Color0 {
                fb.color = Some(texture);
            }
        }
    }

    fn attach_renderbuffer(&mut self, attachment: Attachment, renderbuffer: RenderbufferId) {
        self.calls.push("attach_renderbuffer".to_string());
        if let Some(fb) = self.bound_framebuffer.and_then(|id| self.framebuffers.get_mut(&id)) {
            if attachment == Attachment::DepthStencil {
                fb.depth_stencil = Some(renderbuffer);
            }
        }
    }

    fn framebuffer_status(&self) -> FramebufferStatus {
        if let Some(status) = self.forced_status {
            return status;
        }
        match self.bound_framebuffer.and_then(|id| self.framebuffers.get(&id)) {
            Some(fb) if fb.color.is_some() => FramebufferStatus::Complete,
            Some(_) => FramebufferStatus::MissingAttachment,
            None => FramebufferStatus::Complete,
        }
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.calls.push("set_viewport".to_string());
        self.current_viewport = viewport;
    }

    fn viewport(&self) -> Viewport {
        self.current_viewport
    }

    fn set_clear_color(&mut self, rgba: [f32; 4]) {
        self.calls.push("set_clear_color".to_string());
        self.clear_color = rgba;
    }

    fn clear(&mut self, flags: ClearFlags) {
        self.calls.push(format!("clear({:?})", flags));
        if !flags.contains(ClearFlags::COLOR) {
            return;
        }
        let color = self.clear_color.map(to_unorm8);
        if let Some(tex) = self.bound_color_texture().and_then(|id| self.textures.get_mut(&id)) {
            let texel = store_texel(tex.desc.format, color);
            tex.pixels.fill(texel);
        }
    }

    fn set_pack_alignment(&mut self, alignment: u32) {
        self.calls.push("set_pack_alignment".to_string());
        self.pack_alignment = alignment;
    }

    fn read_pixels(&mut self, rect: Rect, format: PixelFormat, out: &mut [u8]) -> Result<()> {
        self.calls.push("read_pixels".to_string());
        let bpp = format.bytes_per_pixel();
        if out.len() != rect.area() * bpp {
            return Err(Error::InvalidResource(format!(
                "read_pixels: buffer is {} bytes, expected {}", out.len(), rect.area() * bpp
            )));
        }
        if (rect.width as usize * bpp) % self.pack_alignment as usize != 0 {
            return Err(Error::BackendError(format!(
                "read_pixels: rows of {} bytes with pack alignment {}",
                rect.width as usize * bpp, self.pack_alignment
            )));
        }
        let texture = self.bound_color_texture()
            .and_then(|id| self.textures.get(&id))
            .ok_or_else(|| Error::BackendError(
                "read_pixels: no color attachment on the bound framebuffer".to_string()
            ))?;

        let tex_width = texture.desc.width as i32;
        let mut chunks = out.chunks_exact_mut(bpp);
        for row in 0..rect.height as i32 {
            for col in 0..rect.width as i32 {
                let index = ((rect.y + row) * tex_width + rect.x + col) as usize;
                if let Some(chunk) = chunks.next() {
                    format.encode(texture.pixels[index], chunk);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "mock_device_tests.rs"]
mod tests;
