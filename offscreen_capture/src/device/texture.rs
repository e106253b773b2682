/// Texture, renderbuffer, and readback pixel formats

/// Storage format of a color texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFormat {
    /// 3 channels, unsigned byte each
    Rgb8,
    /// 4 channels, unsigned byte each
    Rgba8,
}

impl ColorFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            ColorFormat::Rgb8 => 3,
            ColorFormat::Rgba8 => 4,
        }
    }
}

/// Sampling filter for minification and magnification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

/// Descriptor for creating a texture
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Storage format
    pub format: ColorFormat,
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
    /// Allocate a mipmap chain (render textures never do)
    pub mipmaps: bool,
}

/// Storage format of a renderbuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthStencilFormat {
    /// 24-bit depth + 8-bit stencil, combined
    Depth24Stencil8,
    /// 16-bit depth, no stencil
    Depth16,
}

/// Descriptor for creating a renderbuffer
#[derive(Debug, Clone, PartialEq)]
pub struct RenderbufferDesc {
    pub width: u32,
    pub height: u32,
    pub format: DepthStencilFormat,
}

/// Channel layout requested from the device on readback
///
/// The format decides both the byte stride per pixel and the channel
/// order written into the output buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    Bgr,
    Rgb,
    Bgra,
    #[default]
    Rgba,
}

impl PixelFormat {
    /// Bytes written per pixel
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Bgr | PixelFormat::Rgb => 3,
            PixelFormat::Bgra | PixelFormat::Rgba => 4,
        }
    }

    pub fn has_alpha(self) -> bool {
        self.bytes_per_pixel() == 4
    }

    /// Blue comes first in memory
    pub fn is_bgr_order(self) -> bool {
        matches!(self, PixelFormat::Bgr | PixelFormat::Bgra)
    }

    /// Write one pixel given as RGBA into `out` using this layout
    ///
    /// `out` must be exactly `bytes_per_pixel()` long.
    pub fn encode(self, rgba: [u8; 4], out: &mut [u8]) {
        let [r, g, b, a] = rgba;
        match self {
            PixelFormat::Rgb => out.copy_from_slice(&[r, g, b]),
            PixelFormat::Bgr => out.copy_from_slice(&[b, g, r]),
            PixelFormat::Rgba => out.copy_from_slice(&[r, g, b, a]),
            PixelFormat::Bgra => out.copy_from_slice(&[b, g, r, a]),
        }
    }

    /// Read one pixel in this layout back to RGBA (alpha is 255 when absent)
    pub fn decode(self, pixel: &[u8]) -> [u8; 4] {
        match self {
            PixelFormat::Rgb => [pixel[0], pixel[1], pixel[2], 255],
            PixelFormat::Bgr => [pixel[2], pixel[1], pixel[0], 255],
            PixelFormat::Rgba => [pixel[0], pixel[1], pixel[2], pixel[3]],
            PixelFormat::Bgra => [pixel[2], pixel[1], pixel[0], pixel[3]],
        }
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
