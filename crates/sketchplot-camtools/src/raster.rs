//! Raster Normalizer
//!
//! Decodes an arbitrary raster image and reduces it to the canonical binary
//! raster the skeleton extractor works on: a square single-channel image whose
//! pixels are either foreground (line, 255) or background (0).
//!
//! The generator produces dark line art on a light background, so the
//! threshold is inverted: dark pixels become foreground.

use image::{imageops, DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use sketchplot_core::RasterError;
use sketchplot_settings::RasterSettings;
use std::io::Cursor;

/// Two-valued single channel raster
///
/// Every pixel is either [`BinaryRaster::FOREGROUND`] or
/// [`BinaryRaster::BACKGROUND`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryRaster {
    image: GrayImage,
}

impl BinaryRaster {
    /// Value of a line pixel
    pub const FOREGROUND: u8 = 255;
    /// Value of a background pixel
    pub const BACKGROUND: u8 = 0;

    /// Create an all-background raster
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: GrayImage::from_pixel(width, height, Luma([Self::BACKGROUND])),
        }
    }

    /// Wrap a grayscale image, treating any non-zero pixel as foreground
    pub fn from_gray(mut image: GrayImage) -> Self {
        for pixel in image.pixels_mut() {
            pixel.0[0] = if pixel.0[0] != 0 {
                Self::FOREGROUND
            } else {
                Self::BACKGROUND
            };
        }
        Self { image }
    }

    /// Build a raster from a predicate over pixel coordinates
    pub fn from_fn<F>(width: u32, height: u32, mut foreground: F) -> Self
    where
        F: FnMut(u32, u32) -> bool,
    {
        let image = GrayImage::from_fn(width, height, |x, y| {
            Luma([if foreground(x, y) {
                Self::FOREGROUND
            } else {
                Self::BACKGROUND
            }])
        });
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Whether the pixel at `(x, y)` is foreground; out-of-range is background
    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        x < self.width()
            && y < self.height()
            && self.image.get_pixel(x, y).0[0] == Self::FOREGROUND
    }

    pub fn set(&mut self, x: u32, y: u32, foreground: bool) {
        let value = if foreground {
            Self::FOREGROUND
        } else {
            Self::BACKGROUND
        };
        self.image.put_pixel(x, y, Luma([value]));
    }

    /// Number of foreground pixels
    pub fn foreground_count(&self) -> usize {
        self.image
            .as_raw()
            .iter()
            .filter(|&&v| v == Self::FOREGROUND)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.image
            .as_raw()
            .iter()
            .all(|&v| v == Self::BACKGROUND)
    }

    /// Raw row-major pixel values
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub(crate) fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut *self.image
    }

    /// Dark-on-light rendering (foreground black, background white)
    pub fn to_line_art(&self) -> GrayImage {
        let mut inverted = self.image.clone();
        imageops::invert(&mut inverted);
        inverted
    }

    /// Encode the dark-on-light rendering in the given format
    pub fn encode_line_art(&self, format: ImageFormat) -> Result<Vec<u8>, RasterError> {
        encode_gray(self.to_line_art(), format)
    }
}

/// Encode a grayscale image into an in-memory file
pub fn encode_gray(image: GrayImage, format: ImageFormat) -> Result<Vec<u8>, RasterError> {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(image)
        .write_to(&mut buffer, format)
        .map_err(|e| RasterError::Encode {
            reason: e.to_string(),
        })?;
    Ok(buffer.into_inner())
}

/// Decode image bytes and normalize them into the canonical binary raster
///
/// Order: decode, area resize to `canonical_size` squared, grayscale,
/// inverted threshold.
pub fn normalize(bytes: &[u8], settings: &RasterSettings) -> Result<BinaryRaster, RasterError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| RasterError::Decode {
        reason: e.to_string(),
    })?;

    if decoded.width() == 0 || decoded.height() == 0 || settings.canonical_size == 0 {
        return Err(RasterError::InvalidDimensions {
            width: decoded.width(),
            height: decoded.height(),
        });
    }

    tracing::debug!(
        "Decoded {}x{} image, normalizing to {}px",
        decoded.width(),
        decoded.height(),
        settings.canonical_size
    );

    let size = settings.canonical_size;
    let resized = resize_area(&decoded.to_rgb8(), size, size);
    let gray = to_luma(&resized);

    Ok(threshold_inverted(&gray, settings.threshold))
}

/// Inverted binary threshold: `value <= threshold` becomes foreground
pub fn threshold_inverted(gray: &GrayImage, threshold: u8) -> BinaryRaster {
    BinaryRaster::from_fn(gray.width(), gray.height(), |x, y| {
        gray.get_pixel(x, y).0[0] <= threshold
    })
}

/// ITU-R BT.601 luma
fn to_luma(rgb: &RgbImage) -> GrayImage {
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let Rgb([r, g, b]) = *rgb.get_pixel(x, y);
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        Luma([luma.round().clamp(0.0, 255.0) as u8])
    })
}

/// Resize by pixel-area averaging
///
/// Each output pixel is the coverage-weighted mean of the source pixels it
/// overlaps. Enlarging along either axis falls back to bilinear filtering.
pub fn resize_area(src: &RgbImage, width: u32, height: u32) -> RgbImage {
    let (src_w, src_h) = src.dimensions();
    if (src_w, src_h) == (width, height) {
        return src.clone();
    }
    if width > src_w || height > src_h {
        return imageops::resize(src, width, height, imageops::FilterType::Triangle);
    }

    let x_weights = coverage(src_w, width);
    let y_weights = coverage(src_h, height);

    let mut out = RgbImage::new(width, height);
    for (dy, row_weights) in y_weights.iter().enumerate() {
        for (dx, col_weights) in x_weights.iter().enumerate() {
            let mut acc = [0.0f64; 3];
            for &(sy, wy) in row_weights {
                for &(sx, wx) in col_weights {
                    let pixel = src.get_pixel(sx, sy);
                    let w = wx * wy;
                    for (channel, value) in acc.iter_mut().zip(pixel.0.iter()) {
                        *channel += *value as f64 * w;
                    }
                }
            }
            let rgb = acc.map(|v| v.round().clamp(0.0, 255.0) as u8);
            out.put_pixel(dx as u32, dy as u32, Rgb(rgb));
        }
    }
    out
}

/// Source indices and normalized weights covered by each destination index
fn coverage(src_len: u32, dst_len: u32) -> Vec<Vec<(u32, f64)>> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| {
            let start = d as f64 * scale;
            let end = ((d + 1) as f64 * scale).min(src_len as f64);
            let first = start.floor() as u32;
            let last = (end.ceil() as u32).min(src_len);
            (first..last)
                .filter_map(|s| {
                    let overlap = end.min(s as f64 + 1.0) - start.max(s as f64);
                    (overlap > 1e-12).then_some((s, overlap / scale))
                })
                .collect()
        })
        .collect()
}
