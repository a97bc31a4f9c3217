#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::unused_async)]

//! # Stickercut Background Removal Library
//!
//! A Rust library for removing flat-color backgrounds from sticker source
//! images using classical image processing. No neural networks, no model
//! downloads: the background color is estimated from the image borders and
//! pixels are classified by color distance.
//!
//! ## Features
//!
//! - **Border-based background estimation**: The dominant border color is
//!   used as the background reference, so no user input is required
//! - **Fixed and adaptive thresholding**: A global color-distance cutoff, or
//!   a locally adjusted one for unevenly lit backgrounds
//! - **Edge refinement**: Sobel gradients keep mask transitions anchored to
//!   real image edges
//! - **Mask smoothing and feathering**: Box-blur smoothing passes and a
//!   distance-based alpha ramp for soft cut edges
//! - **Format Support**: PNG, JPEG, WebP (with `webp-support`), raw RGBA8
//! - **Data URIs**: Encode results as `data:` URIs for direct embedding
//! - **CLI Integration**: Optional command-line interface (enable with the
//!   `cli` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stickercut::{remove_background_from_bytes, Preset, RemovalConfig};
//!
//! # async fn example(upload_bytes: Vec<u8>) -> anyhow::Result<()> {
//! let config = RemovalConfig::from_preset(Preset::Standard).build()?;
//! let result = remove_background_from_bytes(&upload_bytes, &config).await?;
//! result.save_png("output.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Library vs CLI Usage
//!
//! - **Library Usage**: All core functionality is available by default
//! - **CLI Usage**: Enable the `cli` feature for the command-line interface
//!
//! To use only as a library without CLI dependencies:
//!
//! ```toml
//! [dependencies]
//! stickercut = { version = "0.2", default-features = false }
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod data_uri;
pub mod error;
pub mod filter;
pub mod processor;
pub mod services;
#[cfg(feature = "cli")]
pub mod tracing_config;
pub mod types;

// Internal imports for lib functions
use tokio::io::AsyncRead;

// Public API exports
pub use config::{
    OutputFormat, Preset, RemovalConfig, RemovalConfigBuilder, ThresholdMode, MAX_COLOR_DISTANCE,
    MAX_FEATHER_RADIUS, MAX_SMOOTHING_PASSES,
};
pub use data_uri::DataUri;
pub use error::{RemovalError, Result};
pub use filter::{BackgroundReference, MaskField};
pub use processor::BackgroundRemovalProcessor;
pub use services::{
    ConsoleProgressReporter, ImageIOService, NoOpProgressReporter, OutputFormatHandler,
    ProcessingStage, ProgressReporter, ProgressTracker,
};
pub use types::{
    AlphaMask, MaskStatistics, ProcessingMetadata, ProcessingTimings, RemovalResult,
};

#[cfg(feature = "cli")]
pub use tracing_config::{init_cli_tracing, init_library_tracing, TracingConfig};

/// Remove background from an image provided as bytes
///
/// This is a stream-based API that accepts image data as bytes, making it
/// suitable for web servers, memory-based processing, and scenarios where
/// files aren't available.
///
/// # Arguments
///
/// * `image_bytes` - Raw image data as bytes (JPEG, PNG, WebP, BMP, TIFF)
/// * `config` - Configuration for the removal operation
///
/// # Returns
///
/// A `RemovalResult` containing the processed image, mask, and metadata
///
/// # Examples
///
/// ```rust,no_run
/// use stickercut::{RemovalConfig, remove_background_from_bytes};
///
/// # async fn example(upload_bytes: Vec<u8>) -> anyhow::Result<()> {
/// let config = RemovalConfig::builder().threshold(35.0).build()?;
/// let result = remove_background_from_bytes(&upload_bytes, &config).await?;
/// let output_bytes = result.to_bytes(config.output_format, 90)?;
/// # Ok(())
/// # }
/// ```
pub async fn remove_background_from_bytes(
    image_bytes: &[u8],
    config: &RemovalConfig,
) -> Result<RemovalResult> {
    let mut processor = BackgroundRemovalProcessor::new(config.clone())?;
    processor.process_bytes(image_bytes)
}

/// Remove background from a `DynamicImage` directly
///
/// This is the most flexible API for in-memory image processing. It accepts
/// a pre-loaded `DynamicImage` and processes it without any file I/O.
///
/// # Examples
///
/// ```rust,no_run
/// use stickercut::{RemovalConfig, remove_background_from_image};
/// use image::DynamicImage;
///
/// # async fn example(img: DynamicImage) -> anyhow::Result<()> {
/// let config = RemovalConfig::builder().build()?;
/// let result = remove_background_from_image(img, &config).await?;
/// result.save_png("output.png")?;
/// # Ok(())
/// # }
/// ```
pub async fn remove_background_from_image(
    image: image::DynamicImage,
    config: &RemovalConfig,
) -> Result<RemovalResult> {
    let mut processor = BackgroundRemovalProcessor::new(config.clone())?;
    processor.process_image(&image)
}

/// Remove background from an image provided as a `data:` URI
///
/// Accepts a base64-encoded data URI, decodes the payload, and runs the
/// removal pipeline on it. The URI's media type is recorded in the result
/// metadata.
///
/// # Examples
///
/// ```rust,no_run
/// use stickercut::{RemovalConfig, remove_background_from_data_uri, OutputFormat};
///
/// # async fn example(uri: &str) -> anyhow::Result<()> {
/// let config = RemovalConfig::builder().build()?;
/// let result = remove_background_from_data_uri(uri, &config).await?;
/// let output_uri = result.to_data_uri(OutputFormat::Png, 100)?;
/// # Ok(())
/// # }
/// ```
pub async fn remove_background_from_data_uri(
    uri: &str,
    config: &RemovalConfig,
) -> Result<RemovalResult> {
    let mut processor = BackgroundRemovalProcessor::new(config.clone())?;
    processor.process_data_uri(uri)
}

/// Remove background from an async reader stream
///
/// Accepts any async readable stream, making it suitable for processing
/// images from network streams, large files, or any other async data source.
///
/// # Examples
///
/// ```rust,no_run
/// use stickercut::{RemovalConfig, remove_background_from_reader};
/// use tokio::fs::File;
///
/// # async fn example() -> anyhow::Result<()> {
/// let file = File::open("large_image.jpg").await?;
/// let config = RemovalConfig::builder().build()?;
/// let result = remove_background_from_reader(file, &config).await?;
/// result.save_png("output.png")?;
/// # Ok(())
/// # }
/// ```
pub async fn remove_background_from_reader<R: AsyncRead + Unpin>(
    reader: R,
    config: &RemovalConfig,
) -> Result<RemovalResult> {
    let mut processor = BackgroundRemovalProcessor::new(config.clone())?;
    processor.process_reader(reader).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_api_compiles() {
        let config = RemovalConfig::default();
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_bytes_api_rejects_garbage() {
        let config = RemovalConfig::default();
        let result = remove_background_from_bytes(b"not an image", &config).await;
        assert!(result.is_err());
    }
}
