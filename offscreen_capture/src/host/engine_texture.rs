/// EngineTexture - the host engine's texture object wrapping a GPU texture
///
/// Host engines keep their own texture objects (pixel size, content size,
/// logical format, shader) on top of raw GPU names. A render texture hands
/// its color attachment to the engine through
/// `EngineTexture::from_external_gpu_texture`, with an explicit ownership
/// tag deciding who deletes the GPU texture.

use std::fmt;
use glam::{UVec2, Vec2};

use crate::device::{SharedDevice, TextureId};

/// Logical pixel format reported to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePixelFormat {
    Rgba8888,
    Rgb888,
}

/// Built-in shader programs a texture can be drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderProgram {
    /// Position + texture coordinates, no vertex color
    PositionTexture,
    PositionTextureColor,
}

/// Who deletes the GPU texture
pub enum TextureOwnership {
    /// This object deletes the texture when dropped
    Owned(SharedDevice),
    /// Someone else (usually a `RenderTexture`) keeps the texture alive
    External,
}

impl fmt::Debug for TextureOwnership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureOwnership::Owned(_) => write!(f, "Owned"),
            TextureOwnership::External => write!(f, "External"),
        }
    }
}

/// Engine-native texture object
#[derive(Debug)]
pub struct EngineTexture {
    name: TextureId,
    pixel_size: UVec2,
    content_size: Vec2,
    pixel_format: EnginePixelFormat,
    max_s: f32,
    max_t: f32,
    premultiplied_alpha: bool,
    has_mipmaps: bool,
    shader: ShaderProgram,
    ownership: TextureOwnership,
}

impl EngineTexture {
    /// Construct from an externally-owned GPU resource
    ///
    /// The result references `name` without owning it. Texture coordinates
    /// cover `content_size / pixel_size` of the storage; the logical format is
    /// RGBA8888 drawn with the position+texture shader, no premultiplied
    /// alpha, no mipmaps.
    pub fn from_external_gpu_texture(name: TextureId, pixel_size: UVec2, content_size: Vec2) -> Self {
        Self {
            name,
            pixel_size,
            content_size,
            pixel_format: EnginePixelFormat::Rgba8888,
            max_s: content_size.x / pixel_size.x as f32,
            max_t: content_size.y / pixel_size.y as f32,
            premultiplied_alpha: false,
            has_mipmaps: false,
            shader: ShaderProgram::PositionTexture,
            ownership: TextureOwnership::External,
        }
    }

    /// Make this object responsible for deleting the GPU texture
    pub fn adopt(mut self, device: SharedDevice) -> Self {
        self.ownership = TextureOwnership::Owned(device);
        self
    }

    pub fn name(&self) -> TextureId {
        self.name
    }

    pub fn pixel_size(&self) -> UVec2 {
        self.pixel_size
    }

    pub fn content_size(&self) -> Vec2 {
        self.content_size
    }

    pub fn pixel_format(&self) -> EnginePixelFormat {
        self.pixel_format
    }

    /// Maximum (s, t) texture coordinates covering the content
    pub fn max_st(&self) -> Vec2 {
        Vec2::new(self.max_s, self.max_t)
    }

    pub fn has_premultiplied_alpha(&self) -> bool {
        self.premultiplied_alpha
    }

    pub fn has_mipmaps(&self) -> bool {
        self.has_mipmaps
    }

    pub fn shader(&self) -> ShaderProgram {
        self.shader
    }

    pub fn set_shader(&mut self, shader: ShaderProgram) {
        self.shader = shader;
    }

    pub fn ownership(&self) -> &TextureOwnership {
        &self.ownership
    }

    pub fn is_owned(&self) -> bool {
        matches!(self.ownership, TextureOwnership::Owned(_))
    }
}

impl Drop for EngineTexture {
    fn drop(&mut self) {
        let TextureOwnership::Owned(device) = &self.ownership else {
            return;
        };
        match device.try_borrow_mut() {
            Ok(mut device) => {
                device.delete_texture(self.name);
                crate::capture_debug!("offscreen::EngineTexture", "Deleted texture {}", self.name.raw());
            }
            Err(_) => {
                crate::capture_warn!("offscreen::EngineTexture",
                    "Device busy while dropping texture {}, GPU texture leaked", self.name.raw());
            }
        }
    }
}

#[cfg(test)]
#[path = "engine_texture_tests.rs"]
mod tests;
