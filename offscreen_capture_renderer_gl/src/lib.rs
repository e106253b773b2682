/*!
# Offscreen Capture - OpenGL Backend

OpenGL implementation of the offscreen_capture `GraphicsDevice` trait,
built on the `glow` bindings.

The host creates the GL context (windowing is out of scope here), wraps it
in a [`GlDevice`], and hands the shared device to its render textures.

```no_run
use std::rc::Rc;
use offscreen_capture::capture::target::RenderTexture;
use offscreen_capture_renderer_gl::{GlDevice, GlDeviceConfig};

# fn example(gl: glow::Context) -> offscreen_capture::capture::Result<()> {
let device = GlDevice::new(Rc::new(gl), GlDeviceConfig::default())?.into_shared();
let thumbnail = RenderTexture::new(device, 256, 256)?;
# Ok(())
# }
```
*/

mod gl_device;
mod gl_format;

pub use gl_device::{GlDevice, GlDeviceConfig};
