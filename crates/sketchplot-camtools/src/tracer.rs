//! Vector tracing
//!
//! A [`Tracer`] turns a padded binary raster into an ordered set of
//! continuous paths in raster-pixel space. The production implementation
//! shells out to potrace; tests and embedders can substitute any closure.

mod potrace;
pub mod svg;

pub use potrace::PotraceTracer;
pub use svg::parse_svg;

use crate::padding::PaddedRaster;
use crate::path::PathSet;
use sketchplot_core::TracerError;

/// Converts a padded raster into paths
pub trait Tracer {
    fn trace(&self, raster: &PaddedRaster) -> Result<PathSet, TracerError>;
}

impl<F> Tracer for F
where
    F: Fn(&PaddedRaster) -> Result<PathSet, TracerError>,
{
    fn trace(&self, raster: &PaddedRaster) -> Result<PathSet, TracerError> {
        self(raster)
    }
}
