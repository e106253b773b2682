/// ManagedSprite - a render texture bundled with a sprite showing it
///
/// The sprite's texture object is responsible for the GPU texture; the
/// render texture keeps drawing into it while the bundle is alive. On drop
/// the render texture gives up its claim first so the texture is deleted
/// once, by the sprite.

use std::rc::Rc;

use crate::device::PixelFormat;
use crate::error::Result;
use crate::host::{Node, Sprite, ViewportContext};
use crate::target::{PixelBuffer, RenderTexture};

pub struct ManagedSprite {
    render: RenderTexture,
    sprite: Rc<Sprite>,
}

impl ManagedSprite {
    /// Build a sprite over the render texture's color texture
    pub fn new(render: RenderTexture) -> Result<Self> {
        let texture = render.export_as_texture()?.adopt(render.device().clone());
        let sprite = Rc::new(Sprite::with_texture(texture));
        crate::capture_debug!("offscreen::ManagedSprite",
            "Sprite created over framebuffer {}", render.framebuffer().raw());
        Ok(Self { render, sprite })
    }

    /// The sprite; clones keep the texture alive after the bundle is gone
    pub fn sprite(&self) -> Rc<Sprite> {
        self.sprite.clone()
    }

    pub fn render_texture(&self) -> &RenderTexture {
        &self.render
    }

    /// Re-render `node` into the sprite's texture
    pub fn capture(&mut self, node: &dyn Node, view: &mut dyn ViewportContext) -> Result<()> {
        self.render.capture(node, view)
    }

    pub fn capture_with_pixels(
        &mut self,
        node: &dyn Node,
        view: &mut dyn ViewportContext,
        format: PixelFormat,
    ) -> Result<PixelBuffer> {
        self.render.capture_with_pixels(node, view, format)
    }

    pub fn read_pixels(&mut self, format: PixelFormat) -> Result<PixelBuffer> {
        self.render.read_pixels(format)
    }
}

impl Drop for ManagedSprite {
    fn drop(&mut self) {
        // the sprite deletes the texture
        self.render.release_texture();
    }
}

#[cfg(test)]
#[path = "managed_sprite_tests.rs"]
mod tests;
