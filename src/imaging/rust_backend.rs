//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image` crate (pure Rust decoders) |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → WebP | `image::codecs::webp::WebPEncoder` (lossless) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (quality) |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e, speed 6, quality) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::ResizeParams;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::LazyLock;

/// Raster extensions that embeds may resize.
const RASTER_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    RASTER_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the raster extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Whether `ext` (without the dot, any case) is a resizable raster format.
pub fn is_raster_extension(ext: &str) -> bool {
    supported_input_extensions()
        .iter()
        .any(|e| e.eq_ignore_ascii_case(ext))
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

fn create_writer(path: &Path) -> Result<BufWriter<File>, BackendError> {
    Ok(BufWriter::new(File::create(path).map_err(BackendError::Io)?))
}

/// Save a DynamicImage to the given path, inferring format from extension.
fn save_image(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let result = match ext.as_str() {
        "webp" => {
            let encoder = image::codecs::webp::WebPEncoder::new_lossless(create_writer(path)?);
            DynamicImage::ImageRgba8(img.to_rgba8()).write_with_encoder(encoder)
        }
        "png" => {
            let encoder = image::codecs::png::PngEncoder::new(create_writer(path)?);
            img.write_with_encoder(encoder)
        }
        "jpg" | "jpeg" => {
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                create_writer(path)?,
                quality as u8,
            );
            DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)
        }
        "avif" => return save_avif(img, path, quality),
        other => {
            return Err(BackendError::ProcessingFailed(format!(
                "Unsupported output format: {}",
                other
            )));
        }
    };
    result.map_err(|e| {
        BackendError::ProcessingFailed(format!("{} encode failed: {}", ext.to_uppercase(), e))
    })
}

/// Encode and save as AVIF using rav1e (speed=6 for reasonable throughput).
fn save_avif(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let encoder = image::codecs::avif::AvifEncoder::new_with_speed_quality(
        create_writer(path)?,
        6,
        quality as u8,
    );
    DynamicImage::ImageRgba8(img.to_rgba8())
        .write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("AVIF encode failed: {}", e)))
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let resized = img.resize_exact(params.width, params.height, FilterType::Lanczos3);
        save_image(&resized, &params.output, params.quality.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::Quality;
    use crate::test_helpers::create_test_jpeg;

    #[test]
    fn supported_extensions_match_decodable_formats() {
        let exts = supported_input_extensions();
        for expected in &["jpg", "jpeg", "png"] {
            assert!(
                exts.contains(expected),
                "expected {expected} in supported extensions"
            );
        }
    }

    #[test]
    fn raster_extension_check_ignores_case() {
        assert!(is_raster_extension("PNG"));
        assert!(is_raster_extension("Jpeg"));
        assert!(!is_raster_extension("svg"));
        assert!(!is_raster_extension("pdf"));
    }

    #[test]
    fn identify_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        create_test_jpeg(&path, 200, 150);

        let backend = RustBackend::new();
        let dims = backend.identify(&path).unwrap();
        assert_eq!(dims.width, 200);
        assert_eq!(dims.height, 150);
    }

    #[test]
    fn identify_nonexistent_file_errors() {
        let backend = RustBackend::new();
        let result = backend.identify(Path::new("/nonexistent/image.jpg"));
        assert!(result.is_err());
    }

    fn resize_to(tmp: &tempfile::TempDir, ext: &str) -> std::path::PathBuf {
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 120, 80);

        let output = tmp.path().join(format!("resized.{ext}"));
        RustBackend::new()
            .resize(&ResizeParams {
                source,
                output: output.clone(),
                width: 60,
                height: 40,
                quality: Quality::new(85),
            })
            .unwrap();
        output
    }

    #[test]
    fn resize_synthetic_to_webp() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = resize_to(&tmp, "webp");
        assert_eq!(image::image_dimensions(&output).unwrap(), (60, 40));
    }

    #[test]
    fn resize_synthetic_to_png() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = resize_to(&tmp, "png");
        assert_eq!(image::image_dimensions(&output).unwrap(), (60, 40));
    }

    #[test]
    fn resize_synthetic_to_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = resize_to(&tmp, "jpg");
        assert_eq!(image::image_dimensions(&output).unwrap(), (60, 40));
    }

    #[test]
    fn resize_synthetic_to_avif() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = resize_to(&tmp, "avif");
        assert!(std::fs::metadata(&output).unwrap().len() > 0);
    }

    #[test]
    fn resize_unsupported_format_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 100, 100);

        let result = RustBackend::new().resize(&ResizeParams {
            source,
            output: tmp.path().join("output.bmp"),
            width: 50,
            height: 50,
            quality: Quality::new(85),
        });
        assert!(result.is_err());
    }
}
