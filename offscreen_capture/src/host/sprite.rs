/// Sprite - the host engine's drawable built from a texture

use glam::Vec2;

use crate::device::Rect;
use crate::host::EngineTexture;

/// Engine sprite object
///
/// Holds its texture for its whole lifetime; when the texture is owned the
/// GPU texture is deleted together with the last reference to the sprite.
#[derive(Debug)]
pub struct Sprite {
    texture: EngineTexture,
    texture_rect: Rect,
    content_size: Vec2,
}

impl Sprite {
    /// Sprite showing the whole texture content
    pub fn with_texture(texture: EngineTexture) -> Self {
        let content_size = texture.content_size();
        let texture_rect = Rect::from_size(content_size.x as u32, content_size.y as u32);
        Self {
            texture,
            texture_rect,
            content_size,
        }
    }

    pub fn texture(&self) -> &EngineTexture {
        &self.texture
    }

    /// Region of the texture displayed, in pixels
    pub fn texture_rect(&self) -> Rect {
        self.texture_rect
    }

    pub fn content_size(&self) -> Vec2 {
        self.content_size
    }
}
