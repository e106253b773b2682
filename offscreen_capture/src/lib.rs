/*!
# Offscreen Capture

Render-to-texture capture for a 2D scene-graph engine.

A [`RenderTexture`](capture::target::RenderTexture) owns an offscreen
framebuffer with a color texture and a depth/stencil renderbuffer. Between
`begin` and `end` every draw call issued by a scene-graph node lands in that
texture; the host's framebuffer binding, renderbuffer binding, and view scale
factors are saved and restored around the capture.

## Architecture

- **GraphicsDevice**: GL-style device trait the render texture drives
- **ViewportContext**: host view scale factors and viewport reset
- **Node**: anything in the scene graph that can draw itself
- **EngineTexture / Sprite**: the host texture object model captures are handed to
- **RenderTexture**: offscreen target with capture, readback, and texture hand-off

Backends (e.g. `offscreen_capture_renderer_gl`) provide the concrete device.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod device;
pub mod host;
pub mod target;

// Main capture namespace module
pub mod capture {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging singleton
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger, format_entry};
    }

    // Device primitives and formats
    pub mod device {
        pub use crate::device::*;
    }

    // Host engine capabilities
    pub mod host {
        pub use crate::host::*;
    }

    // Render textures
    pub mod target {
        pub use crate::target::*;
    }
}

// Re-export math library at crate root
pub use glam;
