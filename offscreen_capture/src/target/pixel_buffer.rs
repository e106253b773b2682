/// PixelBuffer - owned result of a render texture readback

use bytemuck::Pod;

use crate::device::PixelFormat;
use crate::error::{Error, Result};

/// Tightly packed pixels read back from a render texture
///
/// Rows are stored bottom-up, the order the GPU returns them in; use
/// `flipped_vertically` to get top-down rows for image encoders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Zero-filled buffer of `width * height * bytes_per_pixel` bytes
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let len = width as usize * height as usize * format.bytes_per_pixel();
        Self {
            width,
            height,
            format,
            data: vec![0; len],
        }
    }

    /// Wrap existing bytes, checking the length matches the dimensions
    pub fn from_raw(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if data.len() != expected {
            return Err(Error::InvalidResource(format!(
                "pixel buffer {}x{} {:?} needs {} bytes, got {}",
                width, height, format, expected, data.len()
            )));
        }
        Ok(Self { width, height, format, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    /// Bytes per row (rows are never padded)
    pub fn stride(&self) -> usize {
        self.width as usize * self.bytes_per_pixel()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// One row, counted from the bottom
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.stride();
        Some(&self.data[start..start + self.stride()])
    }

    /// Raw bytes of one pixel in this buffer's format
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width {
            return None;
        }
        let bpp = self.bytes_per_pixel();
        let start = x as usize * bpp;
        self.row(y).map(|row| &row[start..start + bpp])
    }

    /// One pixel converted to RGBA (alpha 255 for 3-channel formats)
    pub fn rgba(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixel(x, y).map(|p| self.format.decode(p))
    }

    /// Typed view of the pixels, e.g. `[u8; 4]` for RGBA/BGRA
    ///
    /// Returns `None` when `P` is not exactly one pixel wide.
    pub fn texels<P: Pod>(&self) -> Option<&[P]> {
        if std::mem::size_of::<P>() != self.bytes_per_pixel() {
            return None;
        }
        bytemuck::try_cast_slice(&self.data).ok()
    }

    /// Copy with the row order reversed (bottom-up <-> top-down)
    pub fn flipped_vertically(&self) -> Self {
        let stride = self.stride();
        let mut data = Vec::with_capacity(self.data.len());
        if stride > 0 {
            for row in self.data.chunks_exact(stride).rev() {
                data.extend_from_slice(row);
            }
        }
        Self {
            width: self.width,
            height: self.height,
            format: self.format,
            data,
        }
    }
}

#[cfg(test)]
#[path = "pixel_buffer_tests.rs"]
mod tests;
