/// Device module - GPU primitives consumed by render textures

// Module declarations
pub mod graphics_device;
pub mod texture;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export formats and descriptors
pub use texture::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_device;
