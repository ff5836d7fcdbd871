//! Skeleton Extractor
//!
//! Reduces a binary raster to its morphological skeleton by iterative
//! erosion: each pass keeps the pixels that an opening removes from the
//! working raster, then continues with the eroded raster until nothing is
//! left.
//!
//! Border handling matches the usual image-processing convention: neighbours
//! outside the raster are ignored for both erosion and dilation.

use crate::raster::BinaryRaster;
use sketchplot_core::SkeletonError;
use sketchplot_settings::StructuringElement;

/// Result of a skeleton extraction
#[derive(Debug, Clone)]
pub struct Skeletonization {
    /// The accumulated skeleton
    pub skeleton: BinaryRaster,
    /// Erosion passes performed
    pub iterations: usize,
    /// Foreground count of the working raster after each pass
    pub working_counts: Vec<usize>,
}

/// Morphological erosion: a pixel survives when every in-bounds pixel under
/// the element is foreground
pub fn erode(src: &BinaryRaster, element: StructuringElement) -> BinaryRaster {
    apply(src, element, true)
}

/// Morphological dilation: a pixel is set when any in-bounds pixel under the
/// element is foreground
pub fn dilate(src: &BinaryRaster, element: StructuringElement) -> BinaryRaster {
    apply(src, element, false)
}

fn apply(src: &BinaryRaster, element: StructuringElement, erosion: bool) -> BinaryRaster {
    let (width, height) = src.dimensions();
    let mut out = BinaryRaster::new(width, height);
    if width == 0 || height == 0 {
        return out;
    }

    let (w, h) = (width as i64, height as i64);
    let data = src.as_raw();
    let offsets = element.offsets();
    let dst = out.as_raw_mut();

    for y in 0..h {
        for x in 0..w {
            let mut hit = erosion;
            for &(dx, dy) in offsets {
                let nx = x + dx as i64;
                let ny = y + dy as i64;
                if nx < 0 || ny < 0 || nx >= w || ny >= h {
                    continue;
                }
                let set = data[(ny * w + nx) as usize] == BinaryRaster::FOREGROUND;
                if erosion && !set {
                    hit = false;
                    break;
                }
                if !erosion && set {
                    hit = true;
                    break;
                }
            }
            if hit {
                dst[(y * w + x) as usize] = BinaryRaster::FOREGROUND;
            }
        }
    }

    out
}

/// Extract the morphological skeleton of `input`
///
/// `max_iterations` bounds the erosion loop; `None` uses `width + height`,
/// enough for erosion seeded at a single background pixel to cross the
/// raster. A working raster that stops shrinking while foreground remains, or
/// that is still non-empty at the bound, is reported as
/// [`SkeletonError::NonTermination`].
pub fn skeletonize(
    input: BinaryRaster,
    element: StructuringElement,
    max_iterations: Option<usize>,
) -> Result<Skeletonization, SkeletonError> {
    let (width, height) = input.dimensions();
    let limit = max_iterations.unwrap_or(width as usize + height as usize).max(1);

    let mut skeleton = BinaryRaster::new(width, height);
    let mut working = input;
    let mut working_counts = Vec::new();
    let mut iterations = 0;

    loop {
        let eroded = erode(&working, element);
        if eroded == working && !working.is_empty() {
            let remaining = working.foreground_count();
            tracing::error!(
                "Skeletonization stalled after {} iterations with {} pixels left",
                iterations,
                remaining
            );
            return Err(SkeletonError::NonTermination {
                iterations,
                remaining,
            });
        }

        let opened = dilate(&eroded, element);

        for ((acc, &w), &o) in skeleton
            .as_raw_mut()
            .iter_mut()
            .zip(working.as_raw())
            .zip(opened.as_raw())
        {
            if w == BinaryRaster::FOREGROUND && o != BinaryRaster::FOREGROUND {
                *acc = BinaryRaster::FOREGROUND;
            }
        }

        working = eroded;
        iterations += 1;

        let remaining = working.foreground_count();
        working_counts.push(remaining);

        if remaining == 0 {
            break;
        }
        if iterations >= limit {
            tracing::error!(
                "Skeletonization exceeded {} iterations with {} pixels left",
                limit,
                remaining
            );
            return Err(SkeletonError::NonTermination {
                iterations,
                remaining,
            });
        }
    }

    tracing::debug!(
        "Skeleton extracted in {} iterations ({} pixels)",
        iterations,
        skeleton.foreground_count()
    );

    Ok(Skeletonization {
        skeleton,
        iterations,
        working_counts,
    })
}
