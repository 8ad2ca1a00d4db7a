//! RGB <-> HSV conversion on quantized integer ranges.
//!
//! HSV here is hue in `0..=360` degrees and saturation/value in `0..=255`.
//! The forward transform truncates and the inverse rounds, so
//! `hsv_to_rgb(rgb_to_hsv(x))` drifts slightly. Whole-degree hue costs up to
//! ~4 units on the middle channel of a saturated color, and the truncated
//! saturation/value add one unit each, so a round trip stays within 6.
//! That loss is expected.

use palette::{FromColor, Hsv, Srgb};
use serde::{Deserialize, Serialize};

/// Quantized HSV triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HsvColor {
    pub hue: u16,
    pub saturation: u8,
    pub value: u8,
}

impl HsvColor {
    pub const fn new(hue: u16, saturation: u8, value: u8) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }
}

/// Real-valued RGB cluster center on the 0-255 scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Centroid {
    pub fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    /// Round each component to the nearest integer channel.
    pub fn round(self) -> Srgb<u8> {
        let channel = |c: f32| c.round().clamp(0.0, 255.0) as u8;
        Srgb::new(channel(self.red), channel(self.green), channel(self.blue))
    }
}

impl From<Srgb<u8>> for Centroid {
    fn from(c: Srgb<u8>) -> Self {
        Self::new(c.red as f32, c.green as f32, c.blue as f32)
    }
}

// Slack for float noise, so 119.99999 truncates to 120 and not 119.
const TRUNCATE_EPSILON: f32 = 1e-3;

fn truncate(x: f32, max: f32) -> f32 {
    (x + TRUNCATE_EPSILON).floor().clamp(0.0, max)
}

/// Convert one RGB pixel to quantized HSV (truncating).
pub fn rgb_pixel_to_hsv(rgb: Srgb<u8>) -> HsvColor {
    let hsv: Hsv = Hsv::from_color(rgb.into_format::<f32>());
    HsvColor {
        hue: truncate(hsv.hue.into_positive_degrees(), 360.0) as u16 % 360,
        saturation: truncate(hsv.saturation * 255.0, 255.0) as u8,
        value: truncate(hsv.value * 255.0, 255.0) as u8,
    }
}

/// Convert one quantized HSV triple back to RGB (rounding).
pub fn hsv_pixel_to_rgb(hsv: HsvColor) -> Srgb<u8> {
    let hue = f32::from(hsv.hue % 360);
    let color: Hsv = Hsv::new(
        hue,
        f32::from(hsv.saturation) / 255.0,
        f32::from(hsv.value) / 255.0,
    );
    let rgb: Srgb = Srgb::from_color(color);
    let channel = |c: f32| (c * 255.0).round().clamp(0.0, 255.0) as u8;
    Srgb::new(channel(rgb.red), channel(rgb.green), channel(rgb.blue))
}

/// Cluster centers are rounded to integer channels before converting.
pub fn rgb_to_hsv(colors: &[Centroid]) -> Vec<HsvColor> {
    colors
        .iter()
        .map(|c| rgb_pixel_to_hsv(c.round()))
        .collect()
}

pub fn hsv_to_rgb(colors: &[HsvColor]) -> Vec<Srgb<u8>> {
    colors.iter().copied().map(hsv_pixel_to_rgb).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn primaries() {
        assert_eq!(rgb_pixel_to_hsv(Srgb::new(255, 0, 0)), HsvColor::new(0, 255, 255));
        assert_eq!(rgb_pixel_to_hsv(Srgb::new(0, 255, 0)), HsvColor::new(120, 255, 255));
        assert_eq!(rgb_pixel_to_hsv(Srgb::new(0, 0, 255)), HsvColor::new(240, 255, 255));
        assert_eq!(rgb_pixel_to_hsv(Srgb::new(0, 0, 0)), HsvColor::new(0, 0, 0));
        assert_eq!(rgb_pixel_to_hsv(Srgb::new(128, 128, 128)), HsvColor::new(0, 0, 128));
    }

    #[test]
    fn inverse_primaries() {
        assert_eq!(hsv_pixel_to_rgb(HsvColor::new(0, 255, 255)), Srgb::new(255, 0, 0));
        assert_eq!(hsv_pixel_to_rgb(HsvColor::new(360, 255, 255)), Srgb::new(255, 0, 0));
        assert_eq!(hsv_pixel_to_rgb(HsvColor::new(240, 255, 255)), Srgb::new(0, 0, 255));
        assert_eq!(hsv_pixel_to_rgb(HsvColor::new(0, 0, 0)), Srgb::new(0, 0, 0));
    }

    #[test]
    fn centroids_round_first() {
        let hsv = rgb_to_hsv(&[Centroid::new(254.6, 0.4, 0.2)]);
        assert_eq!(hsv, vec![HsvColor::new(0, 255, 255)]);
    }

    proptest! {
        #[test]
        fn round_trip_within_tolerance(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let back = hsv_pixel_to_rgb(rgb_pixel_to_hsv(Srgb::new(r, g, b)));
            for (orig, got) in [(r, back.red), (g, back.green), (b, back.blue)] {
                prop_assert!((orig as i16 - got as i16).abs() <= 6, "{:?} -> {:?}", (r, g, b), back);
            }
        }
    }
}
