//! Potrace adapter
//!
//! Writes the padded raster as a BMP into a private scratch directory, runs
//! `potrace <in.bmp> -s -o <out.svg>` and parses the SVG it produces. The
//! scratch directory is removed on every exit path, so concurrent runs never
//! share files.

use super::svg::parse_svg;
use super::Tracer;
use crate::padding::PaddedRaster;
use crate::path::PathSet;
use sketchplot_core::TracerError;
use sketchplot_settings::TracerSettings;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const INPUT_NAME: &str = "input.bmp";
const OUTPUT_NAME: &str = "output.svg";
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Tracer backed by the potrace executable
#[derive(Debug, Clone)]
pub struct PotraceTracer {
    binary: PathBuf,
    timeout: Option<Duration>,
    extra_args: Vec<String>,
    flatten_tolerance: f32,
}

impl PotraceTracer {
    /// Create a tracer for the given executable
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
            extra_args: Vec::new(),
            flatten_tolerance: 0.05,
        }
    }

    /// Build from settings, resolving the default executable when unset
    pub fn from_settings(settings: &TracerSettings, flatten_tolerance: f64) -> Self {
        let binary = settings.binary.clone().unwrap_or_else(default_binary);
        Self {
            binary,
            timeout: settings.timeout_secs.map(Duration::from_secs),
            extra_args: settings.extra_args.clone(),
            flatten_tolerance: flatten_tolerance as f32,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn command(&self, workdir: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.current_dir(workdir)
            .arg(INPUT_NAME)
            .arg("-s")
            .arg("-o")
            .arg(OUTPUT_NAME)
            .args(&self.extra_args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }

    fn wait(&self, child: &mut Child) -> Result<ExitStatus, TracerError> {
        let Some(timeout) = self.timeout else {
            return child.wait().map_err(io_error);
        };

        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait().map_err(io_error)? {
                return Ok(status);
            }
            if started.elapsed() >= timeout {
                tracing::warn!("potrace exceeded {:?}, killing", timeout);
                // the process may have exited between polls
                let _ = child.kill();
                let _ = child.wait();
                return Err(TracerError::Timeout {
                    timeout_secs: timeout.as_secs(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Default for PotraceTracer {
    fn default() -> Self {
        Self::new(default_binary())
    }
}

impl Tracer for PotraceTracer {
    fn trace(&self, raster: &PaddedRaster) -> Result<PathSet, TracerError> {
        let bmp = raster.to_bmp().map_err(|e| TracerError::Io {
            reason: e.to_string(),
        })?;

        let workdir = tempfile::Builder::new()
            .prefix("sketchplot-trace-")
            .tempdir()
            .map_err(io_error)?;
        std::fs::write(workdir.path().join(INPUT_NAME), bmp).map_err(io_error)?;

        tracing::debug!(
            "Running {} in {}",
            self.binary.display(),
            workdir.path().display()
        );

        let mut child = self.command(workdir.path()).spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TracerError::ToolMissing {
                    binary: self.binary.display().to_string(),
                }
            } else {
                io_error(e)
            }
        })?;

        // drain stderr concurrently so a chatty tracer cannot block on the pipe
        let stderr_reader = child.stderr.take().map(|mut pipe| {
            thread::spawn(move || {
                let mut text = String::new();
                let _ = pipe.read_to_string(&mut text);
                text
            })
        });

        let status = self.wait(&mut child)?;
        let stderr = stderr_reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        if !status.success() {
            tracing::error!("potrace failed: {}", stderr.trim());
            return Err(TracerError::ToolFailed {
                status: status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        let svg = std::fs::read_to_string(workdir.path().join(OUTPUT_NAME)).map_err(|e| {
            TracerError::ParseFailed {
                reason: format!("tracer produced no readable output: {}", e),
            }
        })?;

        let paths = parse_svg(&svg, self.flatten_tolerance)?;
        tracing::debug!("potrace produced {} paths", paths.len());
        Ok(paths)
    }
}

/// `potrace.exe` beside the working directory on Windows, `potrace` on PATH elsewhere
fn default_binary() -> PathBuf {
    if cfg!(windows) {
        let local = PathBuf::from("potrace.exe");
        if local.exists() {
            return std::env::current_dir()
                .map(|dir| dir.join(&local))
                .unwrap_or(local);
        }
    }
    PathBuf::from("potrace")
}

fn io_error(e: std::io::Error) -> TracerError {
    TracerError::Io {
        reason: e.to_string(),
    }
}
