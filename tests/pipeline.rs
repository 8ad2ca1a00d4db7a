//! End-to-end tests through the public API: encoded image -> palette and
//! training data -> frame classification.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use image_colors_wasm::frame::rgb_to_bgr_bytes;
use image_colors_wasm::image_input::load_pixels;
use image_colors_wasm::{
    BgrFrame, ColorClassifier, ColorError, ColorLabel, Config, PaletteExtractor, extract_feature,
};
use palette::Srgb;
use std::io::Cursor;
use std::path::Path;

fn encode(img: DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
    buf
}

fn extractor() -> PaletteExtractor {
    let config = Config::default();
    PaletteExtractor::new(config.clustering, &config.cache)
}

fn shipped_classifier() -> ColorClassifier {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/training.csv");
    ColorClassifier::from_csv_path(&path, 4).unwrap()
}

fn frame_of(color: [u8; 3]) -> Vec<u8> {
    rgb_to_bgr_bytes(&RgbImage::from_pixel(8, 6, Rgb(color)))
}

#[test]
fn two_pixel_image_palette() {
    let img = RgbaImage::from_fn(2, 1, |x, _| {
        if x == 0 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 10])
        }
    });
    let pixels = load_pixels(&encode(DynamicImage::ImageRgba8(img)), Some(500)).unwrap();
    let palette = extractor().extract_fixed_k(&pixels, 2).unwrap();

    let mut hex = palette.hex();
    hex.sort();
    assert_eq!(hex, vec!["#0000FF", "#FF0000"]);
}

#[test]
fn solid_image_cannot_fill_a_palette() {
    let img = RgbImage::from_pixel(10, 10, Rgb([30, 60, 90]));
    let pixels = load_pixels(&encode(DynamicImage::ImageRgb8(img)), None).unwrap();
    assert!(matches!(
        extractor().extract_auto(&pixels),
        Err(ColorError::InsufficientColors { requested: 24, distinct: 1 })
    ));
}

#[test]
fn auto_palette_is_bounded_by_hue_families() {
    // 16x16 hue/brightness sweep, plenty of distinct colors
    let img = RgbImage::from_fn(16, 16, |x, y| {
        let hue = x as u16 * 22;
        let value = 100 + y as u8 * 9;
        let rgb = image_colors_wasm::convert::hsv_pixel_to_rgb(image_colors_wasm::HsvColor::new(hue, 220, value));
        Rgb([rgb.red, rgb.green, rgb.blue])
    });
    let pixels = load_pixels(&encode(DynamicImage::ImageRgb8(img)), None).unwrap();
    let palette = extractor().extract_auto(&pixels).unwrap();
    assert!(!palette.is_empty());
    assert!(palette.len() <= 12);
}

#[test]
fn classifier_from_minimal_training_set() {
    let mut csv = String::new();
    for row in ["0,0,0,black", "255,255,255,white", "255,0,0,red", "0,0,255,blue"] {
        for _ in 0..4 {
            csv.push_str(row);
            csv.push('\n');
        }
    }
    let classifier = ColorClassifier::from_csv_str(&csv, 4).unwrap();
    assert_eq!(classifier.classify([10.0, 10.0, 10.0]), ColorLabel::Black);
    assert_eq!(classifier.classify([250.0, 5.0, 5.0]), ColorLabel::Red);
}

#[test]
fn frames_are_named_with_shipped_training_data() {
    let classifier = shipped_classifier();
    assert_eq!(classifier.sample_count(), 64);

    for (color, expected) in [
        ([250, 5, 5], ColorLabel::Red),
        ([10, 10, 10], ColorLabel::Black),
        ([250, 250, 250], ColorLabel::White),
        ([0, 0, 250], ColorLabel::Blue),
        ([0, 200, 0], ColorLabel::Green),
    ] {
        let bytes = frame_of(color);
        let frame = BgrFrame::new(8, 6, &bytes).unwrap();
        let feature = extract_feature(&frame);
        assert_eq!(feature, color);
        assert_eq!(classifier.classify_rgb(feature), expected, "{color:?}");
    }
}

#[test]
fn shipped_training_data_covers_every_label() {
    let data = std::fs::read_to_string(Path::new(env!("CARGO_MANIFEST_DIR")).join("data/training.csv")).unwrap();
    let samples = image_colors_wasm::parse_training_csv(&data).unwrap();
    for label in ColorLabel::ALL {
        assert!(samples.iter().filter(|s| s.label == label).count() >= 4, "{label}");
    }
}

#[test]
fn palette_colors_are_valid_hex() {
    let pixels = [Srgb::new(0, 0, 0), Srgb::new(9, 200, 17), Srgb::new(255, 255, 255)];
    let palette = extractor().extract_fixed_k(&pixels, 3).unwrap();
    for hex in palette.hex() {
        assert_eq!(hex.len(), 7);
        assert!(image_colors_wasm::parse_hex_color(&hex).is_ok());
    }
}
