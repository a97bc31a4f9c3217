//! Core types for background removal operations

use crate::{
    config::OutputFormat,
    error::{RemovalError, Result},
};
use image::{DynamicImage, GenericImageView, ImageBuffer, Rgba};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Result of a background removal operation
#[derive(Debug, Clone)]
pub struct RemovalResult {
    /// The processed image with background pixels made transparent
    pub image: DynamicImage,

    /// The alpha mask that was written into the image
    pub mask: AlphaMask,

    /// Original image dimensions
    pub original_dimensions: (u32, u32),

    /// Processing metadata
    pub metadata: ProcessingMetadata,

    /// Original input path (for logging purposes)
    pub input_path: Option<String>,
}

impl RemovalResult {
    /// Create a new removal result
    #[must_use]
    pub fn new(
        image: DynamicImage,
        mask: AlphaMask,
        original_dimensions: (u32, u32),
        metadata: ProcessingMetadata,
    ) -> Self {
        Self {
            image,
            mask,
            original_dimensions,
            metadata,
            input_path: None,
        }
    }

    /// Save the result as PNG with alpha channel
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    /// Save in the specified format
    pub fn save<P: AsRef<Path>>(&self, path: P, format: OutputFormat, quality: u8) -> Result<()> {
        crate::services::ImageIOService::save_image(&self.image, path, format, quality)
    }

    /// Save in the specified format, recording the encode time in the
    /// result's timings
    pub fn save_timed<P: AsRef<Path>>(
        &mut self,
        path: P,
        format: OutputFormat,
        quality: u8,
    ) -> Result<()> {
        let encode_start = instant::Instant::now();
        self.save(path, format, quality)?;
        let encode_ms = encode_start.elapsed().as_millis() as u64;
        self.metadata.timings.encode_ms = Some(encode_ms);
        self.metadata.timings.total_ms += encode_ms;
        Ok(())
    }

    /// Get the image as raw RGBA bytes
    #[must_use]
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.image.to_rgba8().into_raw()
    }

    /// Get the image as encoded bytes in the specified format
    pub fn to_bytes(&self, format: OutputFormat, quality: u8) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Png => {
                let mut buffer = Vec::new();
                let mut cursor = std::io::Cursor::new(&mut buffer);
                self.image.write_to(&mut cursor, image::ImageFormat::Png)?;
                Ok(buffer)
            },
            OutputFormat::Jpeg => {
                // JPEG has no alpha channel, composite over white first
                let composited =
                    crate::services::OutputFormatHandler::convert_format(self.image.to_rgba8(), format)?;
                let mut buffer = Vec::new();
                let mut cursor = std::io::Cursor::new(&mut buffer);
                let mut jpeg_encoder =
                    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality);
                jpeg_encoder.encode_image(&composited.to_rgb8())?;
                Ok(buffer)
            },
            OutputFormat::WebP => {
                #[cfg(feature = "webp-support")]
                {
                    let mut buffer = Vec::new();
                    let mut cursor = std::io::Cursor::new(&mut buffer);
                    self.image.write_to(&mut cursor, image::ImageFormat::WebP)?;
                    Ok(buffer)
                }
                #[cfg(not(feature = "webp-support"))]
                {
                    Err(RemovalError::invalid_config(
                        "WebP output requires the 'webp-support' feature",
                    ))
                }
            },
            OutputFormat::Rgba8 => Ok(self.to_rgba_bytes()),
        }
    }

    /// Encode the result image as a self-describing data URI
    ///
    /// The URI embeds the MIME type for the chosen format and the base64
    /// payload, matching what the storefront hands back to the canvas layer.
    pub fn to_data_uri(&self, format: OutputFormat, quality: u8) -> Result<String> {
        let bytes = self.to_bytes(format, quality)?;
        let mime = match format {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::WebP => "image/webp",
            OutputFormat::Rgba8 => "application/octet-stream",
        };
        Ok(crate::data_uri::encode(mime, &bytes))
    }

    /// Get image dimensions
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Get detailed timing breakdown
    #[must_use]
    pub fn timings(&self) -> &ProcessingTimings {
        &self.metadata.timings
    }
}

/// Single-channel alpha mask, one byte per pixel (0 = background, 255 = foreground)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlphaMask {
    /// Mask data as opacity values (0-255), row-major
    pub data: Vec<u8>,

    /// Mask dimensions (width, height)
    pub dimensions: (u32, u32),
}

impl AlphaMask {
    /// Create a new alpha mask
    ///
    /// # Errors
    /// Returns [`RemovalError::InvalidInput`] if `data.len()` does not match
    /// `width * height`.
    pub fn new(data: Vec<u8>, dimensions: (u32, u32)) -> Result<Self> {
        let expected = dimensions.0 as usize * dimensions.1 as usize;
        if data.len() != expected {
            return Err(RemovalError::invalid_input(format!(
                "mask data length {} does not match dimensions {}x{}",
                data.len(),
                dimensions.0,
                dimensions.1
            )));
        }
        Ok(Self { data, dimensions })
    }

    /// Create mask from a grayscale image
    #[must_use]
    pub fn from_image(image: &ImageBuffer<image::Luma<u8>, Vec<u8>>) -> Self {
        let (width, height) = image.dimensions();
        Self {
            data: image.as_raw().clone(),
            dimensions: (width, height),
        }
    }

    /// Convert mask to a grayscale image
    pub fn to_image(&self) -> Result<ImageBuffer<image::Luma<u8>, Vec<u8>>> {
        let (width, height) = self.dimensions;
        ImageBuffer::from_raw(width, height, self.data.clone())
            .ok_or_else(|| RemovalError::processing("Failed to create image from mask data"))
    }

    /// Write the mask into the alpha channel of an RGBA image
    ///
    /// # Errors
    /// Returns [`RemovalError::InvalidInput`] if the image and mask
    /// dimensions differ.
    pub fn apply_to_image(&self, image: &mut ImageBuffer<Rgba<u8>, Vec<u8>>) -> Result<()> {
        let (img_width, img_height) = image.dimensions();
        if (img_width, img_height) != self.dimensions {
            return Err(RemovalError::invalid_input(format!(
                "image {}x{} and mask {}x{} dimensions do not match",
                img_width, img_height, self.dimensions.0, self.dimensions.1
            )));
        }

        for (pixel, &alpha) in image.pixels_mut().zip(self.data.iter()) {
            pixel[3] = alpha;
        }

        Ok(())
    }

    /// Whether every mask value is exactly 0 or 255 (hard-edged mask)
    #[must_use]
    pub fn is_binary(&self) -> bool {
        self.data.iter().all(|&v| v == 0 || v == 255)
    }

    /// Get mask statistics
    #[must_use]
    pub fn statistics(&self) -> MaskStatistics {
        let total_pixels = self.data.len();
        let foreground_pixels = self.data.iter().filter(|&&v| v > 127).count();
        let background_pixels = total_pixels - foreground_pixels;

        let total = total_pixels.max(1) as f32;
        MaskStatistics {
            total_pixels,
            foreground_pixels,
            background_pixels,
            foreground_ratio: foreground_pixels as f32 / total,
            background_ratio: background_pixels as f32 / total,
        }
    }

    /// Save mask as PNG
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let image = self.to_image()?;
        image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

/// Statistics about an alpha mask
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskStatistics {
    pub total_pixels: usize,
    pub foreground_pixels: usize,
    pub background_pixels: usize,
    pub foreground_ratio: f32,
    pub background_ratio: f32,
}

/// Detailed timing breakdown for background removal processing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingTimings {
    /// Image loading and decoding
    pub decode_ms: u64,

    /// Background reference color estimation
    pub estimate_ms: u64,

    /// Per-pixel classification (distance field + threshold)
    pub classify_ms: u64,

    /// Gradient-based boundary refinement (0 when disabled)
    pub refine_ms: u64,

    /// Mask smoothing passes
    pub smooth_ms: u64,

    /// Feathering (distance transform + alpha ramp)
    pub feather_ms: u64,

    /// Final image encoding (if saving to file)
    pub encode_ms: Option<u64>,

    /// Total end-to-end processing time
    pub total_ms: u64,
}

impl ProcessingTimings {
    /// Sum of the individually measured stages
    #[must_use]
    pub fn measured_ms(&self) -> u64 {
        self.decode_ms
            + self.estimate_ms
            + self.classify_ms
            + self.refine_ms
            + self.smooth_ms
            + self.feather_ms
            + self.encode_ms.unwrap_or(0)
    }

    /// Unaccounted overhead (alpha write, allocation, bookkeeping)
    #[must_use]
    pub fn other_overhead_ms(&self) -> u64 {
        self.total_ms.saturating_sub(self.measured_ms())
    }

    /// One-line timing summary for logging
    #[must_use]
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Total: {}ms | Classify: {}ms | Smooth: {}ms | Feather: {}ms",
            self.total_ms, self.classify_ms, self.smooth_ms, self.feather_ms
        );
        if let Some(encode_ms) = self.encode_ms {
            summary.push_str(&format!(" | Encode: {}ms", encode_ms));
        }
        summary
    }
}

/// Metadata about the processing operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    /// Detailed timing breakdown
    pub timings: ProcessingTimings,

    /// Threshold mode that was applied
    pub threshold_mode: String,

    /// Background reference color that was estimated ([r, g, b])
    pub background_reference: [u8; 3],

    /// Input image format, when known
    pub input_format: String,

    /// Output image format
    pub output_format: String,

    /// When processing finished
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

impl ProcessingMetadata {
    /// Create new processing metadata
    #[must_use]
    pub fn new(threshold_mode: String) -> Self {
        Self {
            timings: ProcessingTimings::default(),
            threshold_mode,
            background_reference: [0, 0, 0],
            input_format: "unknown".to_string(),
            output_format: "png".to_string(),
            completed_at: chrono::Utc::now(),
        }
    }

    /// Serialize the metadata as pretty-printed JSON
    ///
    /// # Errors
    /// Returns [`RemovalError::Processing`] when serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| RemovalError::processing(format!("Failed to serialize metadata: {}", e)))
    }
}
