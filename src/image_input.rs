//! Turning encoded images into the flat pixel lists the clustering code eats.

use image::{DynamicImage, GenericImageView, RgbImage, imageops::FilterType};
use palette::Srgb;
use tracing::debug;

use crate::error::Result;

/// Decode `input`, shrink it to fit `thumbnail`×`thumbnail` and return its
/// pixels in row-major order.
pub fn load_pixels(input: &[u8], thumbnail: Option<u32>) -> Result<Vec<Srgb<u8>>> {
    let img = image::load_from_memory(input)?;
    let img = match thumbnail {
        Some(max_side) => fit_within(img, max_side),
        None => img,
    };
    Ok(rgb_pixels(&img.to_rgb8()))
}

/// Shrink (never enlarge) so neither side exceeds `max_side`, keeping the
/// aspect ratio.
pub fn fit_within(img: DynamicImage, max_side: u32) -> DynamicImage {
    let (w, h) = img.dimensions();
    if w <= max_side && h <= max_side {
        return img;
    }
    let thumb = img.thumbnail(max_side.max(1), max_side.max(1));
    debug!(from = ?(w, h), to = ?thumb.dimensions(), "thumbnailed input image");
    thumb
}

/// Flatten an RGB buffer. Callers holding RGBA should go through
/// `DynamicImage::to_rgb8`, which drops alpha without blending.
pub fn rgb_pixels(img: &RgbImage) -> Vec<Srgb<u8>> {
    img.pixels().map(|p| Srgb::new(p[0], p[1], p[2])).collect()
}

/// Scale an image to `percent` (clamped to 1..=100) of its size, at least
/// one pixel per side. Resampling is bicubic (Catmull-Rom), so picked colors
/// on a shrunk image are filtered ones, not raw source pixels.
pub fn resize_percent(img: &DynamicImage, percent: u32) -> DynamicImage {
    let percent = percent.clamp(1, 100);
    if percent == 100 {
        return img.clone();
    }
    let (w, h) = img.dimensions();
    let scale = |side: u32| ((side as f32 * percent as f32 / 100.0).round() as u32).max(1);
    img.resize_exact(scale(w), scale(h), FilterType::CatmullRom)
}
