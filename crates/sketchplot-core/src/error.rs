//! Error handling for Sketchplot
//!
//! Provides error types for every stage of the image-to-toolpath pipeline:
//! - Raster errors (decoding/encoding input and preview images)
//! - Skeleton errors (internal invariant violations of the thinning loop)
//! - Tracer errors (the external raster-to-vector tool)
//! - Source errors (external image generation services)
//!
//! All error types use `thiserror` for ergonomic error handling.

use std::fmt;
use thiserror::Error;

/// Raster error type
///
/// Represents failures to read or write raster images.
#[derive(Error, Debug, Clone)]
pub enum RasterError {
    /// The input bytes could not be parsed as an image
    #[error("Failed to decode image: {reason}")]
    Decode {
        /// The decoder's description of the failure.
        reason: String,
    },

    /// A raster could not be encoded
    #[error("Failed to encode image: {reason}")]
    Encode {
        /// The encoder's description of the failure.
        reason: String,
    },

    /// The raster has unusable dimensions
    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Raster width in pixels.
        width: u32,
        /// Raster height in pixels.
        height: u32,
    },
}

/// Skeleton extraction error type
///
/// These indicate a defect in the thinning algorithm or a raster it cannot
/// reduce, never a problem with the caller's input encoding.
#[derive(Error, Debug, Clone)]
pub enum SkeletonError {
    /// The erosion loop did not reach an empty raster within its bound
    #[error("Skeletonization did not terminate after {iterations} iterations ({remaining} foreground pixels left)")]
    NonTermination {
        /// Number of iterations performed before giving up.
        iterations: usize,
        /// Foreground pixels still present in the working raster.
        remaining: usize,
    },
}

/// Vector tracer error type
///
/// Distinguishes an environment problem (tool missing) from a run that
/// failed or produced output we cannot use.
#[derive(Error, Debug, Clone)]
pub enum TracerError {
    /// The tracer executable could not be found
    #[error("Tracer executable not found: {binary}")]
    ToolMissing {
        /// The binary name or path that was looked up.
        binary: String,
    },

    /// The tracer ran and exited unsuccessfully
    #[error("Tracer exited with status {}: {stderr}", describe_status(.status))]
    ToolFailed {
        /// Exit code, if the process exited normally.
        status: Option<i32>,
        /// Captured standard error output.
        stderr: String,
    },

    /// The tracer did not finish within the configured timeout
    #[error("Tracer timed out after {timeout_secs}s")]
    Timeout {
        /// The timeout that elapsed.
        timeout_secs: u64,
    },

    /// The tracer output could not be parsed
    #[error("Failed to parse tracer output: {reason}")]
    ParseFailed {
        /// Why parsing failed.
        reason: String,
    },

    /// Scratch file handling failed
    #[error("Tracer I/O error: {reason}")]
    Io {
        /// The underlying I/O failure.
        reason: String,
    },
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

/// External image source error type
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    /// The service or resource could not be reached
    #[error("Image source unavailable: {reason}")]
    Unavailable {
        /// Why the source is unavailable.
        reason: String,
    },

    /// The service answered with something that is not an image
    #[error("Invalid response from image source: {reason}")]
    InvalidResponse {
        /// What was wrong with the response.
        reason: String,
    },

    /// Local I/O failed while reading the source
    #[error("Image source I/O error: {reason}")]
    Io {
        /// The underlying I/O failure.
        reason: String,
    },
}

/// Main error type for Sketchplot
///
/// Aggregates the stage-specific errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Raster error
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// Skeleton error
    #[error(transparent)]
    Skeleton(#[from] SkeletonError),

    /// Tracer error
    #[error(transparent)]
    Tracer(#[from] TracerError),

    /// Source error
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl Error {
    /// Check if this error signals an algorithmic defect rather than bad input
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::Skeleton(_))
    }

    /// Check if this error comes from the environment (missing tooling)
    pub fn is_environment(&self) -> bool {
        matches!(self, Error::Tracer(TracerError::ToolMissing { .. }))
    }

    /// Check if this is an input decoding error
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Raster(RasterError::Decode { .. }))
    }
}

/// Pipeline stage names, used to attribute failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Image source lookup
    Source,
    /// Decoding and normalizing the input raster
    Decode,
    /// Morphological skeleton extraction
    Skeletonize,
    /// Border padding and preview encoding
    Pad,
    /// External vector tracing
    Trace,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Decode => write!(f, "decode"),
            Self::Skeletonize => write!(f, "skeletonize"),
            Self::Pad => write!(f, "pad"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// A failure attributed to the pipeline stage that produced it
#[derive(Error, Debug)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    /// The stage that failed.
    pub stage: Stage,
    /// The underlying error.
    #[source]
    pub source: Error,
}

impl PipelineError {
    /// Attribute an error to a stage
    pub fn new(stage: Stage, source: impl Into<Error>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}

/// Result type for Sketchplot operations
pub type Result<T> = std::result::Result<T, Error>;
