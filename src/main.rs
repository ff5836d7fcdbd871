//! sketchplot CLI: line-art image to CoreXY plotter G-code.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use sketchplot::{
    init_logging, FileImageSource, ImageSource, PipelineConfig, PotraceTracer, SketchOutcome,
    SketchPipeline, BUILD_DATE, VERSION,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sketchplot")]
#[command(about = "Convert line-art images into CoreXY pen plotter G-code")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and write a motion program.
    Convert(ConvertArgs),

    /// Normalize, skeletonize and pad an image; write the tracer input bitmap.
    Preprocess(PreprocessArgs),

    /// Work with configuration files.
    Config {
        /// Write the default configuration (.toml or .json); the user config
        /// file when no path is given.
        #[arg(long, num_args = 0..=1)]
        write: Option<Option<PathBuf>>,
    },
}

#[derive(Debug, Clone, Args)]
struct ConvertArgs {
    /// Path to the input image.
    image: PathBuf,

    /// Where to write the G-code (stdout when omitted).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the padded skeleton bitmap here.
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Pipeline configuration file (.toml or .json).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tracer executable, overriding the configuration.
    #[arg(long)]
    potrace: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct PreprocessArgs {
    /// Path to the input image.
    image: PathBuf,

    /// Where to write the BMP.
    #[arg(short, long)]
    output: PathBuf,

    /// Pipeline configuration file (.toml or .json).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::debug!("sketchplot {} (built {})", VERSION, BUILD_DATE);

    let cli = Cli::parse();
    match cli.command {
        Commands::Convert(args) => run_convert(&args),
        Commands::Preprocess(args) => run_preprocess(&args),
        Commands::Config { write: Some(path) } => run_write_config(path),
        Commands::Config { write: None } => {
            let path = PipelineConfig::default_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

/// Explicit `--config`, else the user config file if present, else defaults
fn load_config(path: Option<&Path>) -> anyhow::Result<PipelineConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match PipelineConfig::default_path() {
            Ok(path) if path.exists() => path,
            _ => return Ok(PipelineConfig::default()),
        },
    };

    tracing::debug!("Loading configuration from {}", path.display());
    PipelineConfig::load_from_file(&path)
        .with_context(|| format!("loading configuration from {}", path.display()))
}

fn read_image(path: &Path) -> anyhow::Result<Vec<u8>> {
    FileImageSource::new(path)
        .fetch("")
        .with_context(|| format!("reading image {}", path.display()))
}

fn run_convert(args: &ConvertArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(potrace) = &args.potrace {
        config.tracer.binary = Some(potrace.clone());
    }

    let tracer = PotraceTracer::from_settings(&config.tracer, config.geometry.flatten_tolerance);
    let pipeline = SketchPipeline::new(config, tracer);

    let bytes = read_image(&args.image)?;
    let outcome = pipeline.run(&bytes).map_err(|e| {
        if e.source.is_environment() {
            tracing::error!("potrace is required: install it or pass --potrace <PATH>");
        } else if e.source.is_internal() {
            tracing::error!("internal pipeline error, please report it with the input image");
        }
        e
    })?;

    if let Some(preview) = &args.preview {
        std::fs::write(preview, outcome.preview_bmp())
            .with_context(|| format!("writing preview {}", preview.display()))?;
        tracing::info!("Preview written to {}", preview.display());
    }

    let result = match outcome {
        SketchOutcome::Drawn(result) => result,
        SketchOutcome::NoDrawableContent { .. } => {
            bail!("no drawable content: nothing long enough to plot in {}", args.image.display())
        }
    };

    let mut gcode = result.program.to_gcode();
    gcode.push('\n');

    match &args.output {
        Some(path) => {
            std::fs::write(path, gcode)
                .with_context(|| format!("writing program {}", path.display()))?;
            tracing::info!(
                "Wrote {} instructions for {} paths to {}",
                result.program.instruction_count(),
                result.program.drawn_paths(),
                path.display()
            );
        }
        None => print!("{}", gcode),
    }

    Ok(())
}

fn run_preprocess(args: &PreprocessArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let tracer = PotraceTracer::from_settings(&config.tracer, config.geometry.flatten_tolerance);
    let pipeline = SketchPipeline::new(config, tracer);

    let bytes = read_image(&args.image)?;
    let padded = pipeline.preprocess(&bytes)?;
    let bmp = padded.to_bmp().context("encoding preview")?;

    std::fs::write(&args.output, bmp)
        .with_context(|| format!("writing {}", args.output.display()))?;

    let (width, height) = padded.dimensions();
    tracing::info!(
        "Wrote {}x{} skeleton ({} pixels) to {}",
        width,
        height,
        padded.raster().foreground_count(),
        args.output.display()
    );
    Ok(())
}

fn run_write_config(path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = match path {
        Some(path) => path,
        None => PipelineConfig::default_path()?,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    PipelineConfig::default()
        .save_to_file(&path)
        .with_context(|| format!("writing configuration to {}", path.display()))?;
    println!("Default configuration written to {}", path.display());
    Ok(())
}
