//! Geometry Normalizer & Scaler
//!
//! Derives one [`ScaleTransform`] from the whole path set: the bounding box
//! is estimated from a few samples per path, its lower-left corner becomes
//! the origin, and its width is scaled to the target drawing width.
//!
//! The bounding box is an estimate. Extreme curvature between samples can
//! make it slightly smaller than the true extent.

use crate::path::PathSet;
use sketchplot_core::Point2;
use std::fmt;

/// Bounding box of sampled path points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl SampledBounds {
    /// Sample every path at `samples` evenly spaced fractions; `None` for an
    /// empty path set
    pub fn from_paths(paths: &PathSet, samples: usize) -> Option<Self> {
        let mut bounds: Option<Self> = None;
        for point in paths.iter().flat_map(|path| path.sample(samples)) {
            let b = bounds.get_or_insert(Self {
                min_x: point.x,
                min_y: point.y,
                max_x: point.x,
                max_y: point.y,
            });
            b.min_x = b.min_x.min(point.x);
            b.min_y = b.min_y.min(point.y);
            b.max_x = b.max_x.max(point.x);
            b.max_y = b.max_y.max(point.y);
        }
        bounds
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// A point after translation and scaling, in machine units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedPoint(Point2);

impl NormalizedPoint {
    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }

    pub fn into_inner(self) -> Point2 {
        self.0
    }

    #[cfg(test)]
    pub(crate) fn from_xy(x: f64, y: f64) -> Self {
        Self(Point2::new(x, y))
    }
}

/// Uniform scale plus offset shared by every path of one drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleTransform {
    pub min_x: f64,
    pub min_y: f64,
    pub scale: f64,
}

impl ScaleTransform {
    /// Derive the transform for a path set
    ///
    /// Returns `None` when there are no paths. A zero-width bounding box
    /// keeps a scale of 1.0.
    pub fn from_paths(paths: &PathSet, samples: usize, target_width: f64) -> Option<Self> {
        let bounds = SampledBounds::from_paths(paths, samples)?;
        let transform = Self::from_bounds(&bounds, target_width);

        tracing::debug!(
            "Bounds {:.3}x{:.3} at ({:.3}, {:.3}), scale {:.6}",
            bounds.width(),
            bounds.height(),
            bounds.min_x,
            bounds.min_y,
            transform.scale
        );

        Some(transform)
    }

    pub fn from_bounds(bounds: &SampledBounds, target_width: f64) -> Self {
        let width = bounds.width();
        let scale = if width == 0.0 { 1.0 } else { target_width / width };
        Self {
            min_x: bounds.min_x,
            min_y: bounds.min_y,
            scale,
        }
    }

    /// `((x - min_x) * scale, (y - min_y) * scale)`
    pub fn apply(&self, point: Point2) -> NormalizedPoint {
        NormalizedPoint(Point2::new(
            (point.x - self.min_x) * self.scale,
            (point.y - self.min_y) * self.scale,
        ))
    }
}

impl fmt::Display for ScaleTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "offset ({:.3}, {:.3}), scale {:.6}",
            self.min_x, self.min_y, self.scale
        )
    }
}
