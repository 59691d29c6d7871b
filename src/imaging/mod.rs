//! Image processing, pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Resize → WebP/PNG/JPEG/AVIF** | Lanczos3 + `image` encoders |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use rust_backend::{RustBackend, is_raster_extension};
// Re-exported for tests (assets.rs, operations.rs tests use this)
#[cfg(test)]
pub use backend::Dimensions;
pub use calculations::target_dimensions;
pub use operations::{GeneratedImage, RequestedSize, ResizeConfig, create_resized_image};
pub use params::{OutputFormat, Quality};
