//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Output size for a raster embed.
///
/// # Arguments
/// * `original` - Source image dimensions (width, height)
/// * `width` / `height` - Size requested in the embed (`|300` or `|300x200`)
/// * `max_width` - Cap applied only when no width was requested
///
/// # Rules
/// - A requested width is used as-is, even above `max_width`.
/// - Without a requested width, images wider than `max_width` shrink to it.
/// - A missing height follows the source aspect ratio; a missing width too.
/// - Nothing requested and narrow enough → original size.
///
/// Both edges are at least 1px.
pub fn target_dimensions(
    original: (u32, u32),
    width: Option<u32>,
    height: Option<u32>,
    max_width: u32,
) -> (u32, u32) {
    let (orig_w, orig_h) = (original.0.max(1), original.1.max(1));
    let width = width.or((orig_w > max_width).then_some(max_width));

    let (w, h) = match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, scale(w, orig_h, orig_w)),
        (None, Some(h)) => (scale(h, orig_w, orig_h), h),
        (None, None) => (orig_w, orig_h),
    };
    (w.max(1), h.max(1))
}

/// `value * numerator / denominator`, rounded.
fn scale(value: u32, numerator: u32, denominator: u32) -> u32 {
    (value as f64 * numerator as f64 / denominator as f64).round() as u32
}
