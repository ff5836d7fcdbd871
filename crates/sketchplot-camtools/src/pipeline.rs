//! Image-to-toolpath pipeline
//!
//! Runs the stages in order: normalize, skeletonize, pad, trace, scale,
//! transform and emit. Each stage consumes its input and hands a new artifact
//! to the next; failures are attributed to the stage that raised them.

use crate::padding::{pad, PaddedRaster};
use crate::program::{MotionProgram, ProgramEmitter};
use crate::raster::normalize;
use crate::scaling::ScaleTransform;
use crate::skeleton::skeletonize;
use crate::source::ImageSource;
use crate::tracer::Tracer;
use sketchplot_core::{PipelineError, Stage};
use sketchplot_settings::PipelineConfig;

/// A completed drawing
#[derive(Debug, Clone)]
pub struct SketchResult {
    /// Dark-on-light BMP of the padded skeleton
    pub preview_bmp: Vec<u8>,
    pub program: MotionProgram,
    pub transform: ScaleTransform,
    /// Paths returned by the tracer, before noise filtering
    pub path_count: usize,
}

/// Pipeline result: either a program or the signal that the image held no lines
#[derive(Debug, Clone)]
pub enum SketchOutcome {
    Drawn(SketchResult),
    /// The tracer found nothing to draw. This reflects the image content, not
    /// a broken pipeline.
    NoDrawableContent { preview_bmp: Vec<u8> },
}

impl SketchOutcome {
    pub fn preview_bmp(&self) -> &[u8] {
        match self {
            Self::Drawn(result) => &result.preview_bmp,
            Self::NoDrawableContent { preview_bmp } => preview_bmp,
        }
    }

    pub fn program(&self) -> Option<&MotionProgram> {
        match self {
            Self::Drawn(result) => Some(&result.program),
            Self::NoDrawableContent { .. } => None,
        }
    }

    pub fn is_drawn(&self) -> bool {
        matches!(self, Self::Drawn(_))
    }
}

/// The configured pipeline with its tracer
pub struct SketchPipeline<T: Tracer> {
    config: PipelineConfig,
    tracer: T,
}

impl<T: Tracer> SketchPipeline<T> {
    pub fn new(config: PipelineConfig, tracer: T) -> Self {
        Self { config, tracer }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Decode, skeletonize and pad an image
    pub fn preprocess(&self, image_bytes: &[u8]) -> Result<PaddedRaster, PipelineError> {
        let raster_settings = &self.config.raster;

        let binary = normalize(image_bytes, raster_settings)
            .map_err(|e| PipelineError::new(Stage::Decode, e))?;
        tracing::debug!("Binary raster has {} foreground pixels", binary.foreground_count());

        let result = skeletonize(
            binary,
            raster_settings.structuring_element,
            raster_settings.max_skeleton_iterations,
        )
        .map_err(|e| PipelineError::new(Stage::Skeletonize, e))?;
        tracing::info!(
            "Skeletonized in {} iterations, {} pixels",
            result.iterations,
            result.skeleton.foreground_count()
        );

        Ok(pad(result.skeleton, raster_settings.border_pad))
    }

    /// Run the full pipeline on image bytes
    pub fn run(&self, image_bytes: &[u8]) -> Result<SketchOutcome, PipelineError> {
        let padded = self.preprocess(image_bytes)?;
        let preview_bmp = padded
            .to_bmp()
            .map_err(|e| PipelineError::new(Stage::Pad, e))?;

        let paths = self
            .tracer
            .trace(&padded)
            .map_err(|e| PipelineError::new(Stage::Trace, e))?;

        tracing::info!(
            "Traced {} paths, total length {:.1} px",
            paths.len(),
            paths.total_length()
        );

        let geometry = &self.config.geometry;
        let Some(transform) =
            ScaleTransform::from_paths(&paths, geometry.bbox_samples, geometry.target_width)
        else {
            tracing::warn!("Tracer returned no paths, nothing to draw");
            return Ok(SketchOutcome::NoDrawableContent { preview_bmp });
        };
        tracing::info!("Scale transform: {}", transform);

        let emitter = ProgramEmitter::new(self.config.program.clone(), geometry);
        let program = emitter.emit(&paths, &transform);
        if program.drawn_paths() == 0 {
            tracing::warn!(
                "All {} traced paths are shorter than {}, nothing to draw",
                paths.len(),
                geometry.min_path_length
            );
            return Ok(SketchOutcome::NoDrawableContent { preview_bmp });
        }

        Ok(SketchOutcome::Drawn(SketchResult {
            preview_bmp,
            program,
            transform,
            path_count: paths.len(),
        }))
    }

    /// Fetch an image for `prompt` from `source` and run the pipeline on it
    pub fn run_from_source<S: ImageSource + ?Sized>(
        &self,
        source: &S,
        prompt: &str,
    ) -> Result<SketchOutcome, PipelineError> {
        let bytes = source
            .fetch(prompt)
            .map_err(|e| PipelineError::new(Stage::Source, e))?;
        self.run(&bytes)
    }
}
