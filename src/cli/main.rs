//! Background removal CLI tool
//!
//! Command-line interface for cutting backgrounds out of sticker source
//! images using the unified processor.

use super::config::CliConfigBuilder;
use crate::processor::BackgroundRemovalProcessor;
use crate::services::{ConsoleProgressReporter, ProcessingStage, ProgressTracker};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Background removal CLI tool
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "stickercut")]
pub struct Cli {
    /// Input image files or directories (use "-" for stdin)
    #[arg(value_name = "INPUT", required = true)]
    pub input: Vec<String>,

    /// Output file (single input) or directory (batch processing). Use "-" for stdout.
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = CliOutputFormat::Png)]
    pub format: CliOutputFormat,

    /// Preset configuration (explicit flags override preset fields)
    #[arg(short, long, value_enum)]
    pub preset: Option<CliPreset>,

    /// Color distance threshold (0-441.67)
    #[arg(short, long)]
    pub threshold: Option<f32>,

    /// Number of mask smoothing passes
    #[arg(short, long)]
    pub smoothing: Option<u32>,

    /// Feather radius in pixels (0 = hard edges)
    #[arg(long)]
    pub feather: Option<u32>,

    /// Use adaptive local thresholding instead of a fixed cutoff
    #[arg(short, long)]
    pub adaptive: bool,

    /// Refine mask boundaries using image gradients
    #[arg(short, long)]
    pub edges: bool,

    /// Also save the alpha mask as a grayscale PNG next to the output
    #[arg(long)]
    pub save_mask: bool,

    /// Print the result as a base64 data URI instead of writing a file
    #[arg(long)]
    pub data_uri: bool,

    /// JPEG quality (0-100)
    #[arg(long, default_value_t = 90)]
    pub jpeg_quality: u8,

    /// WebP quality (0-100)
    #[arg(long, default_value_t = 85)]
    pub webp_quality: u8,

    /// Enable verbose logging (-v: INFO, -vv: DEBUG, -vvv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Process directories recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Pattern for batch processing (e.g., "*.jpg")
    #[arg(long)]
    pub pattern: Option<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum CliOutputFormat {
    Png,
    Jpeg,
    Webp,
    Rgba8,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum CliPreset {
    Simple,
    Standard,
    Complex,
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();

    crate::tracing_config::init_cli_tracing(cli.verbose)
        .context("Failed to initialize tracing")?;

    CliConfigBuilder::validate_cli(&cli).context("Invalid CLI arguments")?;
    let config = CliConfigBuilder::from_cli(&cli).context("Failed to build configuration")?;

    info!("Starting background removal");
    debug!(
        threshold = config.threshold,
        mode = %config.threshold_mode,
        smoothing = config.smoothing,
        feather = config.feather_radius,
        "Effective configuration"
    );

    let mut processor = BackgroundRemovalProcessor::new(config)
        .context("Failed to create background removal processor")?;

    let start_time = Instant::now();
    let processed_count = process_inputs(&cli, &mut processor).await?;

    let total_time = start_time.elapsed();
    info!(
        "Processed {} image(s) in {:.2}s",
        processed_count,
        total_time.as_secs_f64()
    );

    Ok(())
}

/// Process multiple inputs using the unified processor
async fn process_inputs(cli: &Cli, processor: &mut BackgroundRemovalProcessor) -> Result<usize> {
    // Stdin is a single-input mode
    if cli.input.len() == 1 && cli.input.first().is_some_and(|s| s == "-") {
        return process_stdin(cli, processor);
    }

    let mut all_files = Vec::new();
    let image_extensions = ["jpg", "jpeg", "png", "webp", "bmp", "tiff", "tif"];

    for input in &cli.input {
        let path = PathBuf::from(input);

        if path.is_file() {
            if is_image_file(&path, &image_extensions) {
                all_files.push(path);
            } else {
                warn!("Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            let dir_files = find_image_files(&path, cli.recursive, cli.pattern.as_deref())?;
            all_files.extend(dir_files);
        } else {
            anyhow::bail!(
                "Input path does not exist or is not accessible: {}",
                path.display()
            );
        }
    }

    if all_files.is_empty() {
        warn!("No supported image files found in the provided inputs");
        return Ok(0);
    }

    // Sort for consistent processing order
    all_files.sort();

    info!("Found {} image file(s) to process", all_files.len());

    let progress = if all_files.len() > 1 {
        let pb = ProgressBar::new(all_files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let file_count = all_files.len();

    // Validate and prepare output directory for batch processing
    let output_dir = if file_count > 1 {
        if let Some(ref output) = cli.output {
            if output == "-" {
                anyhow::bail!("Cannot use stdout (-) as output when processing multiple files");
            }
            let output_path = PathBuf::from(output);
            if !output_path.exists() {
                std::fs::create_dir_all(&output_path).with_context(|| {
                    format!(
                        "Failed to create output directory: {}",
                        output_path.display()
                    )
                })?;
            } else if output_path.is_file() {
                anyhow::bail!(
                    "Output path exists and is a file, not a directory: {}",
                    output_path.display()
                );
            }
            Some(output_path)
        } else {
            None
        }
    } else {
        None
    };

    let mut processed_count = 0;
    let mut failed_count = 0;

    let mut tracker = ProgressTracker::new(Box::new(ConsoleProgressReporter));
    if file_count > 1 {
        tracker.report_stage(ProcessingStage::BatchInitialization);
    }

    for input_file in &all_files {
        if let Some(ref pb) = progress {
            pb.set_message(format!("Processing {}", input_file.display()));
        }
        if file_count > 1 {
            tracker.report_stage(ProcessingStage::BatchItemProcessing);
        }

        let output_path = if file_count == 1 {
            cli.output.clone()
        } else {
            output_dir.as_ref().map(|dir| {
                generate_output_path_with_dir(input_file, dir, processor.config().output_format)
            })
        };

        match process_single_file(cli, processor, &mut tracker, input_file, output_path.as_ref()) {
            Ok(()) => {
                processed_count += 1;
                debug!("Processed: {}", input_file.display());
            },
            Err(e) => {
                error!("Failed to process {}: {}", input_file.display(), e);
                failed_count += 1;
            },
        }

        if let Some(ref pb) = progress {
            pb.inc(1);
        }
    }

    if file_count > 1 {
        tracker.report_stage(ProcessingStage::BatchFinalization);
    }

    if let Some(pb) = progress {
        pb.finish_with_message(format!(
            "Completed! Processed: {processed_count}, Failed: {failed_count}"
        ));
    }

    if failed_count > 0 {
        warn!("Some files failed to process. Processed: {processed_count}, Failed: {failed_count}");
    }

    Ok(processed_count)
}

/// Process an image read from stdin
fn process_stdin(cli: &Cli, processor: &mut BackgroundRemovalProcessor) -> Result<usize> {
    info!("Reading image from stdin");

    let image_data = read_stdin()?;
    let start_time = Instant::now();

    let mut result = processor
        .process_bytes(&image_data)
        .context("Failed to remove background from stdin data")?;

    info!(
        "Processed stdin image in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    let config_format = processor.config().output_format;
    let quality = quality_for(cli, config_format);

    if cli.data_uri {
        let uri = result.to_data_uri(config_format, quality)?;
        println!("{uri}");
        return Ok(1);
    }

    match cli.output.as_deref() {
        Some(target) if target != "-" => {
            let output_path = PathBuf::from(target);
            result
                .save_timed(&output_path, config_format, quality)
                .context("Failed to save result")?;
            save_mask_if_requested(cli, &result, &output_path)?;
            info!("Image saved to: {}", output_path.display());
        },
        _ => {
            // Default for stdin input is stdout
            let output_data = result.to_bytes(config_format, quality)?;
            write_stdout(&output_data)?;
            info!("Image written to stdout");
        },
    }

    Ok(1)
}

/// Process a single image file using the unified processor
fn process_single_file(
    cli: &Cli,
    processor: &mut BackgroundRemovalProcessor,
    tracker: &mut ProgressTracker,
    input_path: &Path,
    output_path: Option<&String>,
) -> Result<()> {
    let mut result = processor
        .process_file(input_path)
        .context("Failed to remove background")?;

    if processor.config().debug {
        if let Ok(json) = result.metadata.to_json() {
            debug!("Processing metadata: {json}");
        }
    }

    let config_format = processor.config().output_format;
    let quality = quality_for(cli, config_format);

    if cli.data_uri {
        let uri = result.to_data_uri(config_format, quality)?;
        println!("{uri}");
        info!("{}: {}", input_path.display(), result.timings().summary());
        return Ok(());
    }

    match output_path {
        Some(target) if target == "-" => {
            let output_data = result.to_bytes(config_format, quality)?;
            write_stdout(&output_data)?;
        },
        Some(target) => {
            tracker.report_stage(ProcessingStage::FileSaving);
            let output_path = PathBuf::from(target);
            result
                .save_timed(&output_path, config_format, quality)
                .context("Failed to save result")?;
            save_mask_if_requested(cli, &result, &output_path)?;
        },
        None => {
            tracker.report_stage(ProcessingStage::FileSaving);
            let output_path = generate_output_path(input_path, config_format);
            result
                .save_timed(&output_path, config_format, quality)
                .context("Failed to save result")?;
            save_mask_if_requested(cli, &result, &output_path)?;
        },
    }

    info!("{}: {}", input_path.display(), result.timings().summary());

    Ok(())
}

/// Pick the encoder quality matching the output format
fn quality_for(cli: &Cli, format: crate::OutputFormat) -> u8 {
    match format {
        crate::OutputFormat::WebP => cli.webp_quality,
        _ => cli.jpeg_quality,
    }
}

/// Save the alpha mask next to the output file when --save-mask is set
fn save_mask_if_requested(
    cli: &Cli,
    result: &crate::types::RemovalResult,
    output_path: &Path,
) -> Result<()> {
    if !cli.save_mask {
        return Ok(());
    }

    let stem = output_path.file_stem().unwrap_or_default();
    let dir = output_path.parent().unwrap_or(Path::new("."));
    let mask_path = dir.join(format!("{}_mask.png", stem.to_string_lossy()));

    result
        .mask
        .save_png(&mask_path)
        .context("Failed to save alpha mask")?;
    info!("Mask saved to: {}", mask_path.display());

    Ok(())
}

/// Read image data from stdin
fn read_stdin() -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read image data from stdin")?;

    if buffer.is_empty() {
        anyhow::bail!("No data received from stdin");
    }

    Ok(buffer)
}

/// Write image data to stdout
fn write_stdout(data: &[u8]) -> Result<()> {
    io::stdout()
        .write_all(data)
        .context("Failed to write image data to stdout")?;
    io::stdout().flush().context("Failed to flush stdout")?;
    Ok(())
}

/// Find image files in a directory
fn find_image_files(dir: &Path, recursive: bool, pattern: Option<&str>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let image_extensions = ["jpg", "jpeg", "png", "webp", "bmp", "tiff", "tif"];

    if recursive {
        for entry in walkdir::WalkDir::new(dir) {
            let entry = entry?;
            if entry.file_type().is_file() {
                let path = entry.path();
                if is_image_file(path, &image_extensions) && matches_pattern(path, pattern) {
                    files.push(path.to_path_buf());
                }
            }
        }
    } else {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                let path = entry.path();
                if is_image_file(&path, &image_extensions) && matches_pattern(&path, pattern) {
                    files.push(path);
                }
            }
        }
    }

    Ok(files)
}

/// Check if file is an image based on extension
fn is_image_file(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.contains(&ext.to_lowercase().as_str()))
}

/// Check if file matches the given pattern
fn matches_pattern(path: &Path, pattern: Option<&str>) -> bool {
    match pattern {
        Some(pat) => {
            if let Some(filename) = path.file_name().and_then(|n| n.to_str()) {
                glob::Pattern::new(pat)
                    .map(|p| p.matches(filename))
                    .unwrap_or(false)
            } else {
                false
            }
        },
        None => true,
    }
}

/// Generate output path with correct extension
fn generate_output_path(input_path: &Path, format: crate::OutputFormat) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let dir = input_path.parent().unwrap_or(Path::new("."));

    dir.join(format!(
        "{}_cutout.{}",
        stem.to_string_lossy(),
        extension_for(format)
    ))
}

/// Generate output path inside a custom output directory
fn generate_output_path_with_dir(
    input_path: &Path,
    output_dir: &Path,
    format: crate::OutputFormat,
) -> String {
    let stem = input_path.file_stem().unwrap_or_default();
    let output_filename = format!("{}_cutout.{}", stem.to_string_lossy(), extension_for(format));

    output_dir
        .join(output_filename)
        .to_string_lossy()
        .to_string()
}

fn extension_for(format: crate::OutputFormat) -> &'static str {
    match format {
        crate::OutputFormat::Png => "png",
        crate::OutputFormat::Jpeg => "jpg",
        crate::OutputFormat::WebP => "webp",
        crate::OutputFormat::Rgba8 => "rgba8",
    }
}
