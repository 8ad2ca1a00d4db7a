//! Reduce a video frame to one RGB feature for the color classifier.

use image::RgbImage;

use crate::error::{ColorError, Result};

/// Borrowed view of a packed 8-bit frame in **B, G, R** byte order, the
/// layout most capture libraries hand out.
#[derive(Clone, Copy, Debug)]
pub struct BgrFrame<'a> {
    width: u32,
    height: u32,
    data: &'a [u8],
}

impl<'a> BgrFrame<'a> {
    pub fn new(width: u32, height: u32, data: &'a [u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(ColorError::FrameShape {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }
}

/// Repack an RGB image into BGR byte order, e.g. to feed a still image
/// through the frame path.
pub fn rgb_to_bgr_bytes(img: &RgbImage) -> Vec<u8> {
    img.pixels()
        .flat_map(|p| [p[2], p[1], p[0]])
        .collect()
}

/// Dominant intensity per channel.
///
/// Each channel gets its own 256-bin histogram and contributes the index of
/// its fullest bin (lowest index on ties). The result is ordered
/// **`[red, green, blue]`**: the reverse of the frame's B, G, R byte order.
/// An empty frame yields `[0, 0, 0]`.
pub fn extract_feature(frame: &BgrFrame<'_>) -> [u8; 3] {
    let mut histograms = [[0u32; 256]; 3];
    for px in frame.data.chunks_exact(3) {
        histograms[0][px[0] as usize] += 1;
        histograms[1][px[1] as usize] += 1;
        histograms[2][px[2] as usize] += 1;
    }

    let [blue, green, red] = histograms.map(|hist| peak(&hist));
    [red, green, blue]
}

fn peak(hist: &[u32; 256]) -> u8 {
    let mut best = 0;
    for (bin, &count) in hist.iter().enumerate() {
        if count > hist[best] {
            best = bin;
        }
    }
    best as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_order_is_reversed() {
        // every pixel is B=10, G=20, R=30
        let data = [10u8, 20, 30].repeat(6);
        let frame = BgrFrame::new(3, 2, &data).unwrap();
        assert_eq!(extract_feature(&frame), [30, 20, 10]);
    }

    #[test]
    fn peaks_are_per_channel() {
        let data = [
            0, 0, 200, //
            0, 50, 200, //
            9, 50, 1, //
            9, 50, 1, //
            9, 0, 3, //
        ];
        let frame = BgrFrame::new(5, 1, &data).unwrap();
        assert_eq!(extract_feature(&frame), [1, 50, 9]);
    }

    #[test]
    fn tie_prefers_lower_intensity() {
        let data = [200, 0, 0, 100, 0, 0];
        let frame = BgrFrame::new(2, 1, &data).unwrap();
        assert_eq!(extract_feature(&frame), [0, 0, 100]);
    }

    #[test]
    fn shape_mismatch() {
        let err = BgrFrame::new(2, 2, &[0; 11]).unwrap_err();
        assert!(matches!(
            err,
            ColorError::FrameShape {
                expected: 12,
                actual: 11,
                ..
            }
        ));
    }

    #[test]
    fn still_image_to_bgr() {
        let img = RgbImage::from_pixel(2, 1, image::Rgb([1, 2, 3]));
        let bytes = rgb_to_bgr_bytes(&img);
        assert_eq!(bytes, vec![3, 2, 1, 3, 2, 1]);
        let frame = BgrFrame::new(2, 1, &bytes).unwrap();
        assert_eq!(extract_feature(&frame), [1, 2, 3]);
    }
}
