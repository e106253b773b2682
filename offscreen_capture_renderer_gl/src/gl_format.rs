/// Conversions between device enums and GL constants

use offscreen_capture::capture::device::{
    Attachment, ClearFlags, ColorFormat, DepthStencilFormat, FramebufferStatus, PixelFormat,
    TextureFilter,
};

/// Internal format, pixel format, and component type for `glTexImage2D`
pub(crate) fn color_format_to_gl(format: ColorFormat) -> (i32, u32, u32) {
    match format {
        ColorFormat::Rgb8 => (glow::RGB8 as i32, glow::RGB, glow::UNSIGNED_BYTE),
        ColorFormat::Rgba8 => (glow::RGBA8 as i32, glow::RGBA, glow::UNSIGNED_BYTE),
    }
}

/// Renderbuffer storage format
pub(crate) fn depth_stencil_to_gl(format: DepthStencilFormat) -> u32 {
    match format {
        DepthStencilFormat::Depth24Stencil8 => glow::DEPTH24_STENCIL8,
        DepthStencilFormat::Depth16 => glow::DEPTH_COMPONENT16,
    }
}

/// Attachment point for a renderbuffer of the given format
///
/// A depth-only renderbuffer cannot sit on the combined depth-stencil
/// attachment, so `Attachment::DepthStencil` narrows to the depth
/// attachment for `Depth16`.
pub(crate) fn renderbuffer_attachment_to_gl(
    attachment: Attachment,
    format: Option<DepthStencilFormat>,
) -> u32 {
    match (attachment, format) {
        (Attachment::Color0, _) => glow::COLOR_ATTACHMENT0,
        (Attachment::DepthStencil, Some(DepthStencilFormat::Depth16)) => glow::DEPTH_ATTACHMENT,
        (Attachment::DepthStencil, _) => glow::DEPTH_STENCIL_ATTACHMENT,
    }
}

pub(crate) fn attachment_to_gl(attachment: Attachment) -> u32 {
    renderbuffer_attachment_to_gl(attachment, None)
}

/// Minification filter (with mipmaps) or magnification filter (without)
pub(crate) fn filter_to_gl(filter: TextureFilter, mipmaps: bool) -> i32 {
    let value = match (filter, mipmaps) {
        (TextureFilter::Nearest, false) => glow::NEAREST,
        (TextureFilter::Linear, false) => glow::LINEAR,
        (TextureFilter::Nearest, true) => glow::NEAREST_MIPMAP_NEAREST,
        (TextureFilter::Linear, true) => glow::LINEAR_MIPMAP_LINEAR,
    };
    value as i32
}

/// Readback format passed to `glReadPixels`
///
/// Without native BGR support the BGR formats are read in RGB order and
/// swizzled on the CPU.
pub(crate) fn pixel_format_to_gl(format: PixelFormat, native_bgr: bool) -> u32 {
    match (format, native_bgr) {
        (PixelFormat::Bgr, true) => glow::BGR,
        (PixelFormat::Bgra, true) => glow::BGRA,
        (PixelFormat::Rgb, _) | (PixelFormat::Bgr, false) => glow::RGB,
        (PixelFormat::Rgba, _) | (PixelFormat::Bgra, false) => glow::RGBA,
    }
}

pub(crate) fn clear_flags_to_gl(flags: ClearFlags) -> u32 {
    let mut mask = 0;
    if flags.contains(ClearFlags::COLOR) {
        mask |= glow::COLOR_BUFFER_BIT;
    }
    if flags.contains(ClearFlags::DEPTH) {
        mask |= glow::DEPTH_BUFFER_BIT;
    }
    if flags.contains(ClearFlags::STENCIL) {
        mask |= glow::STENCIL_BUFFER_BIT;
    }
    mask
}

pub(crate) fn status_from_gl(status: u32) -> FramebufferStatus {
    match status {
        glow::FRAMEBUFFER_COMPLETE => FramebufferStatus::Complete,
        glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => FramebufferStatus::IncompleteAttachment,
        glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => FramebufferStatus::MissingAttachment,
        glow::FRAMEBUFFER_UNSUPPORTED => FramebufferStatus::Unsupported,
        other => FramebufferStatus::Other(other),
    }
}

/// Swap the red and blue channel of every pixel in place
pub(crate) fn swap_red_blue(pixels: &mut [u8], bytes_per_pixel: usize) {
    for pixel in pixels.chunks_exact_mut(bytes_per_pixel) {
        pixel.swap(0, 2);
    }
}

#[cfg(test)]
#[path = "gl_format_tests.rs"]
mod tests;
