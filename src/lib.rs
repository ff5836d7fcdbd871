//! # Sketchplot
//!
//! Turns generated line-art images into motion programs for a CoreXY pen
//! plotter.
//!
//! ## Architecture
//!
//! Sketchplot is organized as a workspace with multiple crates:
//!
//! 1. **sketchplot-core** - Error taxonomy, geometry primitives, units
//! 2. **sketchplot-settings** - Pipeline configuration and persistence
//! 3. **sketchplot-camtools** - Raster preprocessing, tracing, scaling, G-code
//! 4. **sketchplot** - CLI binary that integrates all crates
//!
//! ## Pipeline
//!
//! normalize → skeletonize → pad → trace → scale → CoreXY transform → emit

pub use sketchplot_core::{
    Error, MeasurementSystem, MotorPosition, PipelineError, Point2, RasterError, Result,
    SkeletonError, SourceError, Stage, TracerError,
};

pub use sketchplot_settings::{
    GeometrySettings, PipelineConfig, ProgramSettings, RasterSettings, SettingsError,
    StructuringElement, TracerSettings,
};

pub use sketchplot_camtools::{
    compose_prompt, normalize, pad, skeletonize, BinaryRaster, FileImageSource, ImageSource,
    Instruction, MotionProgram, PaddedRaster, PathSet, PotraceTracer, ProgramEmitter,
    ScaleTransform, SketchOutcome, SketchPipeline, SketchResult, TracedPath, Tracer,
    DEFAULT_STYLE,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, so G-code written to stdout stays clean
/// - RUST_LOG environment variable support (default `info`)
/// - Target and line number on every event
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
