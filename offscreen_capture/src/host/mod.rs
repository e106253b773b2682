//! Host engine module: capabilities a render texture consumes from the
//! engine it runs inside.
//!
//! The engine's view singletons, scene-graph nodes, and texture/sprite
//! object model are modelled as small traits and types so a render
//! texture can be driven by a real engine or by tests alike.

mod engine_texture;
mod node;
mod sprite;
mod viewport;

pub use engine_texture::{EnginePixelFormat, EngineTexture, ShaderProgram, TextureOwnership};
pub use node::Node;
pub use sprite::Sprite;
pub use viewport::{DirectorView, ViewportContext};
