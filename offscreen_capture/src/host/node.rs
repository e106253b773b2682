/// Node trait - anything in the host scene graph that can draw itself

use crate::device::{borrow_device, GraphicsDevice, SharedDevice};
use crate::error::Result;

/// Scene-graph node that renders into whatever framebuffer is bound
///
/// A render texture binds its own framebuffer, calls `visit`, and restores
/// the previous target afterwards; the node never needs to know it is
/// being captured.
///
/// The device arrives unborrowed. Borrow it with `borrow_device` for each
/// batch of draw calls and drop the guard before capturing into another
/// render texture on the same device.
pub trait Node {
    fn visit(&self, device: &SharedDevice) -> Result<()>;
}

/// Closures draw with the device borrowed for the whole call
impl<F> Node for F
where
    F: Fn(&mut dyn GraphicsDevice) -> Result<()>,
{
    fn visit(&self, device: &SharedDevice) -> Result<()> {
        let mut device = borrow_device(device)?;
        self(&mut *device)
    }
}
