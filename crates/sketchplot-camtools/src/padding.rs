//! Border Padder
//!
//! Surrounds the skeleton with a uniform background margin so traced paths
//! never touch the image edge.

use crate::raster::BinaryRaster;
use image::ImageFormat;
use sketchplot_core::RasterError;

/// A skeleton raster with a background border on every side
///
/// This is the only raster type handed to a tracer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedRaster {
    raster: BinaryRaster,
    pad: u32,
}

impl PaddedRaster {
    pub fn raster(&self) -> &BinaryRaster {
        &self.raster
    }

    /// Border width in pixels
    pub fn pad(&self) -> u32 {
        self.pad
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.raster.dimensions()
    }

    /// Dark-on-light BMP, the format handed to the tracer and offered as preview
    pub fn to_bmp(&self) -> Result<Vec<u8>, RasterError> {
        self.raster.encode_line_art(ImageFormat::Bmp)
    }
}

/// Add `pad` background pixels on every side of `skeleton`
pub fn pad(skeleton: BinaryRaster, pad: u32) -> PaddedRaster {
    let (width, height) = skeleton.dimensions();
    let mut raster = BinaryRaster::new(width + 2 * pad, height + 2 * pad);

    for y in 0..height {
        for x in 0..width {
            if skeleton.is_foreground(x, y) {
                raster.set(x + pad, y + pad, true);
            }
        }
    }

    tracing::debug!(
        "Padded {}x{} raster to {}x{}",
        width,
        height,
        raster.width(),
        raster.height()
    );

    PaddedRaster { raster, pad }
}
