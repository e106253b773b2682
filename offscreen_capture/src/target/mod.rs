//! Render target module
//!
//! Provides the offscreen render texture, its scoped capture guard,
//! readback buffers, and the sprite bundle built on top of it.

mod capture_scope;
mod config;
mod managed_sprite;
mod pixel_buffer;
mod render_texture;

pub use capture_scope::CaptureScope;
pub use config::RenderTextureConfig;
pub use managed_sprite::ManagedSprite;
pub use pixel_buffer::PixelBuffer;
pub use render_texture::{RenderTexture, TextureSlot};
