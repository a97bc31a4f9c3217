//! Background removal processor
//!
//! `BackgroundRemovalProcessor` sequences the pure filter stages
//! (estimate, classify, refine, smooth, feather) into one removal run,
//! measuring per-stage timings and reporting progress. Both the CLI and
//! the library convenience functions go through this processor so
//! behavior stays consistent.

use crate::{
    config::{RemovalConfig, ThresholdMode},
    error::{RemovalError, Result},
    filter,
    services::{OutputFormatHandler, ProcessingStage, ProgressTracker},
    types::{AlphaMask, ProcessingMetadata, ProcessingTimings, RemovalResult},
};
use image::{DynamicImage, GenericImageView, RgbaImage};
use instant::Instant;
use log::debug;
use tracing::{info as trace_info, instrument, span, Level};

/// Sequences the filter stages for one configuration
pub struct BackgroundRemovalProcessor {
    config: RemovalConfig,
    progress_tracker: Option<ProgressTracker>,
}

impl BackgroundRemovalProcessor {
    /// Create a new processor with the given configuration
    ///
    /// # Errors
    /// Returns [`RemovalError::InvalidConfig`] when the configuration
    /// fails validation.
    pub fn new(config: RemovalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            progress_tracker: None,
        })
    }

    /// Attach a progress tracker that receives stage transitions
    #[must_use]
    pub fn with_progress_tracker(mut self, tracker: ProgressTracker) -> Self {
        self.progress_tracker = Some(tracker);
        self
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &RemovalConfig {
        &self.config
    }

    /// Process an image file for background removal
    ///
    /// # Errors
    /// Returns [`RemovalError::Io`] / [`RemovalError::Decode`] for file
    /// and decode failures, plus everything [`Self::process_image`] can
    /// return.
    pub fn process_file<P: AsRef<std::path::Path>>(
        &mut self,
        input_path: P,
    ) -> Result<RemovalResult> {
        let input_path_ref = input_path.as_ref();

        self.report_stage(ProcessingStage::Decoding);
        let decode_start = Instant::now();
        let image = crate::services::ImageIOService::load_image(input_path_ref)?;
        let decode_ms = decode_start.elapsed().as_millis() as u64;

        let mut result = self.process_image(&image)?;
        result.metadata.timings.decode_ms = decode_ms;
        result.metadata.timings.total_ms += decode_ms;
        result.metadata.input_format = input_path_ref
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_ascii_lowercase();
        result.input_path = Some(input_path_ref.display().to_string());
        Ok(result)
    }

    /// Process image data from bytes
    ///
    /// # Errors
    /// Returns [`RemovalError::Decode`] when the bytes are not a
    /// recognizable image, plus everything [`Self::process_image`] can
    /// return.
    pub fn process_bytes(&mut self, image_bytes: &[u8]) -> Result<RemovalResult> {
        self.report_stage(ProcessingStage::Decoding);
        let decode_start = Instant::now();
        let image = image::load_from_memory(image_bytes)
            .map_err(|e| RemovalError::decode(format!("Failed to decode image from bytes: {}", e)))?;
        let decode_ms = decode_start.elapsed().as_millis() as u64;

        let mut result = self.process_image(&image)?;
        result.metadata.timings.decode_ms = decode_ms;
        result.metadata.timings.total_ms += decode_ms;
        Ok(result)
    }

    /// Process an image supplied as a base64 data URI
    ///
    /// The MIME type recorded in the URI header is kept as the input
    /// format in the result metadata; the actual decoding is
    /// content-based.
    ///
    /// # Errors
    /// Returns [`RemovalError::Decode`] for malformed URIs or undecodable
    /// payloads, plus everything [`Self::process_image`] can return.
    pub fn process_data_uri(&mut self, uri: &str) -> Result<RemovalResult> {
        let decoded = crate::data_uri::decode(uri)?;
        let mut result = self.process_bytes(&decoded.bytes)?;
        result.metadata.input_format = decoded.mime;
        Ok(result)
    }

    /// Process image from an async reader stream
    ///
    /// # Errors
    /// Returns [`RemovalError::Io`] for stream read failures, plus
    /// everything [`Self::process_bytes`] can return.
    pub async fn process_reader<R: tokio::io::AsyncRead + Unpin>(
        &mut self,
        mut reader: R,
    ) -> Result<RemovalResult> {
        let mut buffer = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut reader, &mut buffer)
            .await
            .map_err(RemovalError::Io)?;
        self.process_bytes(&buffer)
    }

    /// Process a `DynamicImage` directly for background removal
    ///
    /// # Errors
    /// Returns [`RemovalError::InvalidInput`] for zero-size images and
    /// [`RemovalError::Processing`] for internal mask failures.
    #[instrument(
        skip(self, image),
        fields(
            mode = %self.config.threshold_mode,
            dimensions = %format!("{}x{}", image.width(), image.height())
        )
    )]
    pub fn process_image(&mut self, image: &DynamicImage) -> Result<RemovalResult> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(RemovalError::invalid_input(format!(
                "zero-size image ({}x{})",
                width, height
            )));
        }

        let mut timings = ProcessingTimings::default();
        let total_start = Instant::now();

        trace_info!(
            threshold = self.config.threshold,
            smoothing = self.config.smoothing,
            feather = self.config.feather_radius,
            "Starting background removal"
        );

        // Alpha-less inputs gain an alpha channel here
        let rgba = image.to_rgba8();

        // Stage 1: background reference
        self.report_stage(ProcessingStage::BackgroundEstimation);
        let estimate_start = Instant::now();
        let reference = {
            let _span = span!(Level::DEBUG, "background_estimation").entered();
            filter::estimate_background(&rgba)
        };
        timings.estimate_ms = estimate_start.elapsed().as_millis() as u64;
        debug!(
            "Background reference {:?} (confidence {:.2})",
            reference.color_u8(),
            reference.confidence
        );

        // Stage 2: classification
        self.report_stage(ProcessingStage::Classification);
        let classify_start = Instant::now();
        let mut mask_field = {
            let _span = span!(Level::DEBUG, "classification", mode = %self.config.threshold_mode)
                .entered();
            let distances = filter::distance_field(&rgba, &reference);
            match self.config.threshold_mode {
                ThresholdMode::Fixed => filter::classify_fixed(&distances, self.config.threshold),
                ThresholdMode::Adaptive => {
                    filter::classify_adaptive(&distances, self.config.threshold)
                },
            }
        };
        timings.classify_ms = classify_start.elapsed().as_millis() as u64;

        // Stage 3: boundary refinement (optional)
        if self.config.edge_refinement {
            self.report_stage(ProcessingStage::EdgeRefinement);
            let refine_start = Instant::now();
            let _span = span!(Level::DEBUG, "edge_refinement").entered();
            let gradient = filter::gradient_magnitude(&rgba);
            filter::refine_boundary(&mut mask_field, &gradient);
            timings.refine_ms = refine_start.elapsed().as_millis() as u64;
        }

        // Stage 4: smoothing
        self.report_stage(ProcessingStage::MaskSmoothing);
        let smooth_start = Instant::now();
        let mask_field = {
            let _span =
                span!(Level::DEBUG, "mask_smoothing", passes = self.config.smoothing).entered();
            filter::smooth(&mask_field, self.config.smoothing)
        };
        timings.smooth_ms = smooth_start.elapsed().as_millis() as u64;

        // Stage 5: feathering
        self.report_stage(ProcessingStage::Feathering);
        let feather_start = Instant::now();
        let mask_field = {
            let _span =
                span!(Level::DEBUG, "feathering", radius = self.config.feather_radius).entered();
            filter::feather(&mask_field, self.config.feather_radius)
        };
        timings.feather_ms = feather_start.elapsed().as_millis() as u64;

        // Stage 6: fold input alpha into the mask and rewrite the channel
        self.report_stage(ProcessingStage::AlphaApplication);
        let mask = Self::build_mask(&rgba, &mask_field)?;
        let mut result_rgba = rgba;
        mask.apply_to_image(&mut result_rgba)?;

        self.report_stage(ProcessingStage::FormatConversion);
        let final_image =
            OutputFormatHandler::convert_format(result_rgba, self.config.output_format)?;

        timings.total_ms = total_start.elapsed().as_millis() as u64;

        let mut metadata = ProcessingMetadata::new(self.config.threshold_mode.to_string());
        metadata.background_reference = reference.color_u8();
        metadata.output_format =
            OutputFormatHandler::file_extension(self.config.output_format).to_string();
        metadata.timings = timings;
        metadata.completed_at = chrono::Utc::now();

        let result = RemovalResult::new(final_image, mask, (width, height), metadata);

        if let Some(ref mut tracker) = self.progress_tracker {
            tracker.report_completion(&result.metadata.timings);
        }

        Ok(result)
    }

    /// Quantize the mask field, multiplied by the input alpha channel
    ///
    /// An input pixel that was already transparent stays transparent no
    /// matter how it classifies, which makes re-processing an
    /// already-cut-out image a no-op.
    fn build_mask(rgba: &RgbaImage, mask_field: &filter::MaskField) -> Result<AlphaMask> {
        let (width, height) = rgba.dimensions();
        if mask_field.dim() != (height as usize, width as usize) {
            return Err(RemovalError::processing_stage_error(
                "alpha application",
                "mask field dimensions diverged from image",
                Some(&format!("{}x{}", width, height)),
            ));
        }

        let mut data = Vec::with_capacity(width as usize * height as usize);
        for (y, row) in mask_field.outer_iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                let input_alpha = f32::from(rgba.get_pixel(x as u32, y as u32)[3]) / 255.0;
                data.push((value.clamp(0.0, 1.0) * input_alpha * 255.0).round() as u8);
            }
        }

        AlphaMask::new(data, (width, height))
    }

    fn report_stage(&mut self, stage: ProcessingStage) {
        if let Some(ref mut tracker) = self.progress_tracker {
            tracker.report_stage(stage);
        }
    }
}

impl std::fmt::Debug for BackgroundRemovalProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundRemovalProcessor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
