//! Image sources
//!
//! The pipeline starts from raster bytes. Where they come from (an image
//! generation service, a file on disk, a test fixture) is hidden behind
//! [`ImageSource`].

use sketchplot_core::SourceError;
use std::path::{Path, PathBuf};

/// Style suffix appended to every generation prompt so the generator returns
/// clean subjects on a white background
pub const DEFAULT_STYLE: &str = ", photorealistic photograph, detailed, sharp focus, white background.";

/// Produces raster image bytes for a prompt
pub trait ImageSource {
    fn fetch(&self, prompt: &str) -> Result<Vec<u8>, SourceError>;
}

impl<F> ImageSource for F
where
    F: Fn(&str) -> Result<Vec<u8>, SourceError>,
{
    fn fetch(&self, prompt: &str) -> Result<Vec<u8>, SourceError> {
        self(prompt)
    }
}

/// Build a generation prompt from a subject description and a style suffix
pub fn compose_prompt(subject: &str, style: &str) -> String {
    format!("{}{}", subject.trim(), style)
}

/// Reads a fixed image file, ignoring the prompt
#[derive(Debug, Clone)]
pub struct FileImageSource {
    path: PathBuf,
}

impl FileImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSource for FileImageSource {
    fn fetch(&self, _prompt: &str) -> Result<Vec<u8>, SourceError> {
        let bytes = std::fs::read(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::Unavailable {
                    reason: format!("{} does not exist", self.path.display()),
                }
            } else {
                SourceError::Io {
                    reason: format!("{}: {}", self.path.display(), e),
                }
            }
        })?;

        if image::guess_format(&bytes).is_err() {
            return Err(SourceError::InvalidResponse {
                reason: format!("{} is not a recognized image", self.path.display()),
            });
        }

        tracing::debug!("Read {} bytes from {}", bytes.len(), self.path.display());
        Ok(bytes)
    }
}
