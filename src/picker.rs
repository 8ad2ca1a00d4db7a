//! Single-pixel color picking.

use image::{DynamicImage, GenericImageView};
use palette::Srgb;
use serde::Serialize;
use tracing::debug;

use crate::hex::to_hex;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PickedColor {
    pub rgb: [u8; 3],
    pub hex: String,
}

/// Color under `(x, y)`, or `None` when the point lies outside the image.
///
/// Selections go stale when the image is resized under them; those are
/// ignored rather than treated as errors.
pub fn pick_color(img: &DynamicImage, x: u32, y: u32) -> Option<PickedColor> {
    if !img.in_bounds(x, y) {
        debug!(x, y, dimensions = ?img.dimensions(), "ignoring out-of-bounds pick");
        return None;
    }
    let p = img.get_pixel(x, y);
    let rgb = [p[0], p[1], p[2]];
    Some(PickedColor {
        rgb,
        hex: to_hex(Srgb::new(rgb[0], rgb[1], rgb[2])),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn picks_and_ignores_stale_points() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_fn(3, 2, |x, y| {
            Rgba([x as u8 * 100, y as u8 * 7, 0, 255])
        }));
        assert_eq!(
            pick_color(&img, 2, 1),
            Some(PickedColor {
                rgb: [200, 7, 0],
                hex: "#C80700".to_string()
            })
        );
        assert_eq!(pick_color(&img, 3, 0), None);
        assert_eq!(pick_color(&img, 0, 2), None);
    }
}
