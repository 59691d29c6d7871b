//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::target_dimensions;
use super::params::{OutputFormat, Quality, ResizeParams};
use crate::config::ImagesConfig;
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Configuration for resized image generation.
#[derive(Debug, Clone)]
pub struct ResizeConfig {
    pub format: OutputFormat,
    pub max_width: u32,
    pub quality: Quality,
}

impl From<&ImagesConfig> for ResizeConfig {
    fn from(images: &ImagesConfig) -> Self {
        Self {
            format: images.format,
            max_width: images.max_width,
            quality: Quality::new(images.quality),
        }
    }
}

/// Requested output size, as written in the embed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestedSize {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// An image written by [`create_resized_image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

/// Plan a resize without executing it.
pub fn plan_resize(
    source: &Path,
    output_dir: &Path,
    resized_name: &str,
    original_dims: (u32, u32),
    requested: RequestedSize,
    config: &ResizeConfig,
) -> ResizeParams {
    let (width, height) = target_dimensions(
        original_dims,
        requested.width,
        requested.height,
        config.max_width,
    );
    ResizeParams {
        source: source.to_path_buf(),
        output: output_dir.join(format!("{}.{}", resized_name, config.format.extension())),
        width,
        height,
        quality: config.quality,
    }
}

/// Identify `source`, then resize it to `{output_dir}/{resized_name}.{format}`.
pub fn create_resized_image(
    backend: &impl ImageBackend,
    source: &Path,
    output_dir: &Path,
    resized_name: &str,
    requested: RequestedSize,
    config: &ResizeConfig,
) -> Result<GeneratedImage> {
    let original = get_dimensions(backend, source)?;
    let params = plan_resize(source, output_dir, resized_name, original, requested, config);
    backend.resize(&params)?;

    Ok(GeneratedImage {
        file_name: format!("{}.{}", resized_name, config.format.extension()),
        width: params.width,
        height: params.height,
    })
}
