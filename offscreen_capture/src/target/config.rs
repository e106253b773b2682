/// Render texture configuration

use crate::device::{ColorFormat, DepthStencilFormat, TextureFilter};

/// Storage options for a render texture's attachments
///
/// The default matches what thumbnails and screenshots need: an RGB color
/// texture sampled with nearest filtering and a combined 24/8 depth-stencil
/// renderbuffer so clipping nodes work while capturing.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTextureConfig {
    pub color_format: ColorFormat,
    /// Used for both minification and magnification
    pub filter: TextureFilter,
    /// `None` skips the renderbuffer (no depth test, no stencil clipping)
    pub depth_stencil: Option<DepthStencilFormat>,
}

impl Default for RenderTextureConfig {
    fn default() -> Self {
        Self {
            color_format: ColorFormat::Rgb8,
            filter: TextureFilter::Nearest,
            depth_stencil: Some(DepthStencilFormat::Depth24Stencil8),
        }
    }
}
