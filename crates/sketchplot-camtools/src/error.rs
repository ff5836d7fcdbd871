//! Error types for the CAM tools crate.
//!
//! Stage errors shared across crates live in `sketchplot_core::error`; this
//! module holds the file format errors raised while reading tracer output.

use sketchplot_core::TracerError;
use thiserror::Error;

/// Errors related to vector file parsing.
#[derive(Error, Debug)]
pub enum FileFormatError {
    /// The SVG document could not be parsed.
    #[error("SVG parse error: {0}")]
    SvgParseError(String),

    /// Path data used a command we do not interpret.
    #[error("Unsupported path command '{0}'")]
    UnsupportedCommand(char),

    /// A path data token is not a valid number.
    #[error("Invalid number in path data: {0}")]
    InvalidNumber(String),

    /// The file is empty or is not a vector document.
    #[error("Empty file: {0}")]
    EmptyFile(String),
}

impl From<FileFormatError> for TracerError {
    fn from(err: FileFormatError) -> Self {
        TracerError::ParseFailed {
            reason: err.to_string(),
        }
    }
}

/// Result type alias for file format operations.
pub type FileFormatResult<T> = Result<T, FileFormatError>;
