use wasm_bindgen::prelude::*;
use js_sys::{Array, Object, Reflect};
use palette::Srgb;

pub mod category;
pub mod classifier;
pub mod config;
pub mod convert;
pub mod error;
pub mod extract;
pub mod frame;
pub mod hex;
pub mod image_input;
#[cfg(not(target_arch = "wasm32"))]
pub mod live;
pub mod picker;
pub mod reduce;

pub use category::{HueCategory, categorize};
pub use classifier::{ColorClassifier, ColorLabel, TrainingSample, parse_training_csv};
pub use config::Config;
pub use convert::{Centroid, HsvColor, hsv_to_rgb, rgb_to_hsv};
pub use error::{ColorError, Result};
pub use extract::{Palette, PaletteExtractor, PaletteModel};
pub use frame::{BgrFrame, extract_feature};
pub use hex::{parse_hex_color, to_hex};
#[cfg(not(target_arch = "wasm32"))]
pub use live::LiveDetector;
pub use picker::{PickedColor, pick_color};
pub use reduce::reduce_palette;

fn js_err(e: ColorError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn rgb_array(c: Srgb<u8>) -> Array {
    let rgb = Array::new();
    for channel in [c.red, c.green, c.blue] {
        rgb.push(&JsValue::from(channel));
    }
    rgb
}

// ------------------------------------------------------------
// Palette page
// ------------------------------------------------------------

/// Palette extraction for the browser. Keep one instance alive so repeated
/// requests for the same image hit the cache.
#[wasm_bindgen]
pub struct PaletteService {
    extractor: PaletteExtractor,
    thumbnail: Option<u32>,
}

#[wasm_bindgen]
impl PaletteService {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PaletteService {
        let config = Config::default();
        PaletteService {
            extractor: PaletteExtractor::new(config.clustering, &config.cache),
            thumbnail: config.image.thumbnail,
        }
    }

    /// Build a palette from an encoded image.
    ///
    /// `model` 1 clusters into `n_colors` colors; model 2 picks one color per
    /// hue family and ignores `n_colors`. Returns `{ palette: [hex], rgb: [[r, g, b]] }`.
    pub fn extract(&self, input: Vec<u8>, model: u8, n_colors: usize) -> Result<Object, JsValue> {
        let pixels = image_input::load_pixels(&input, self.thumbnail).map_err(js_err)?;
        let model = match model {
            1 => PaletteModel::FixedK(n_colors),
            2 => PaletteModel::Auto,
            other => return Err(JsValue::from_str(&format!("Unknown palette model {other}"))),
        };
        let palette = self.extractor.extract(&pixels, model).map_err(js_err)?;

        let hex_js = Array::new();
        let rgb_js = Array::new();
        for &color in &palette.colors {
            hex_js.push(&JsValue::from_str(&to_hex(color)));
            rgb_js.push(&rgb_array(color));
        }

        let result = Object::new();
        Reflect::set(&result, &JsValue::from_str("palette"), &hex_js)?;
        Reflect::set(&result, &JsValue::from_str("rgb"), &rgb_js)?;
        Ok(result)
    }
}

impl Default for PaletteService {
    fn default() -> Self {
        Self::new()
    }
}

// ------------------------------------------------------------
// Picker page
// ------------------------------------------------------------

/// Color of one pixel after scaling the image to `percent` of its size.
/// Returns `null` for points outside the scaled image.
#[wasm_bindgen]
pub fn pick_pixel(input: Vec<u8>, x: u32, y: u32, percent: u32) -> Result<JsValue, JsValue> {
    let img = image::load_from_memory(&input)
        .map_err(|e| JsValue::from_str(&format!("Unable to decode image: {e}")))?;
    let img = image_input::resize_percent(&img, percent);
    let Some(picked) = pick_color(&img, x, y) else {
        return Ok(JsValue::NULL);
    };

    let result = Object::new();
    Reflect::set(
        &result,
        &JsValue::from_str("rgb"),
        &rgb_array(Srgb::new(picked.rgb[0], picked.rgb[1], picked.rgb[2])),
    )?;
    Reflect::set(&result, &JsValue::from_str("hex"), &JsValue::from_str(&picked.hex))?;
    Ok(result.into())
}

// ------------------------------------------------------------
// Detector page
// ------------------------------------------------------------

/// Trained color classifier for webcam frames.
#[wasm_bindgen]
pub struct ColorDetector {
    classifier: ColorClassifier,
}

#[wasm_bindgen]
impl ColorDetector {
    /// Train from `R,G,B,label` CSV text.
    #[wasm_bindgen(constructor)]
    pub fn new(training_csv: &str) -> Result<ColorDetector, JsValue> {
        let neighbors = Config::default().classifier.neighbors;
        let classifier = ColorClassifier::from_csv_str(training_csv, neighbors).map_err(js_err)?;
        Ok(ColorDetector { classifier })
    }

    /// Label for a packed BGR frame.
    pub fn classify_frame(&self, bgr: &[u8], width: u32, height: u32) -> Result<String, JsValue> {
        let frame = BgrFrame::new(width, height, bgr).map_err(js_err)?;
        let feature = extract_feature(&frame);
        Ok(self.classifier.classify_rgb(feature).to_string())
    }
}
