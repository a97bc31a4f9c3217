//! Progress reporting service
//!
//! This module separates progress reporting concerns from the filter
//! pipeline, allowing different frontends to implement their own
//! progress handling.

use crate::types::ProcessingTimings;
use instant::Instant;

/// Progress stages during background removal processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Loading and decoding input image
    Decoding,
    /// Estimating the background reference color
    BackgroundEstimation,
    /// Classifying pixels against the threshold
    Classification,
    /// Refining the boundary against image gradients
    EdgeRefinement,
    /// Smoothing the mask
    MaskSmoothing,
    /// Feathering the boundary
    Feathering,
    /// Writing the mask into the alpha channel
    AlphaApplication,
    /// Converting to output format
    FormatConversion,
    /// Saving result to file
    FileSaving,
    /// Processing completed
    Completed,

    /// Initializing batch processing
    BatchInitialization,
    /// Processing individual item in batch
    BatchItemProcessing,
    /// Finalizing batch processing
    BatchFinalization,
}

impl ProcessingStage {
    /// Get a human-readable description of the processing stage
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Decoding => "Decoding input image",
            Self::BackgroundEstimation => "Estimating background color",
            Self::Classification => "Classifying pixels",
            Self::EdgeRefinement => "Refining boundary edges",
            Self::MaskSmoothing => "Smoothing mask",
            Self::Feathering => "Feathering boundary",
            Self::AlphaApplication => "Applying alpha mask",
            Self::FormatConversion => "Converting output format",
            Self::FileSaving => "Saving result",
            Self::Completed => "Processing completed",
            Self::BatchInitialization => "Initializing batch",
            Self::BatchItemProcessing => "Processing batch item",
            Self::BatchFinalization => "Finalizing batch",
        }
    }
}

/// Trait for receiving progress updates during processing
pub trait ProgressReporter: Send + Sync {
    /// Called when processing enters a new stage
    fn report_stage(&self, stage: ProcessingStage);

    /// Called once when processing finishes, with the final timings
    fn report_completion(&self, timings: &ProcessingTimings);
}

/// Reporter that discards all updates (library default)
#[derive(Debug, Default)]
pub struct NoOpProgressReporter;

impl ProgressReporter for NoOpProgressReporter {
    fn report_stage(&self, _stage: ProcessingStage) {}
    fn report_completion(&self, _timings: &ProcessingTimings) {}
}

/// Reporter that logs stage transitions through `tracing`
#[derive(Debug, Default)]
pub struct ConsoleProgressReporter;

impl ProgressReporter for ConsoleProgressReporter {
    fn report_stage(&self, stage: ProcessingStage) {
        tracing::info!(stage = ?stage, "{}", stage.description());
    }

    fn report_completion(&self, timings: &ProcessingTimings) {
        tracing::info!("{}", timings.summary());
    }
}

/// Tracks the current stage and elapsed time, forwarding to a reporter
pub struct ProgressTracker {
    reporter: Box<dyn ProgressReporter>,
    current_stage: Option<ProcessingStage>,
    started: Instant,
}

impl ProgressTracker {
    /// Create a tracker wrapping the given reporter
    #[must_use]
    pub fn new(reporter: Box<dyn ProgressReporter>) -> Self {
        Self {
            reporter,
            current_stage: None,
            started: Instant::now(),
        }
    }

    /// Enter a new processing stage
    pub fn report_stage(&mut self, stage: ProcessingStage) {
        if self.current_stage != Some(stage) {
            self.current_stage = Some(stage);
            self.reporter.report_stage(stage);
        }
    }

    /// Report completion with final timings
    pub fn report_completion(&mut self, timings: &ProcessingTimings) {
        self.current_stage = Some(ProcessingStage::Completed);
        self.reporter.report_completion(timings);
    }

    /// Time elapsed since the tracker was created
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// The stage most recently reported, if any
    #[must_use]
    pub fn current_stage(&self) -> Option<ProcessingStage> {
        self.current_stage
    }
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("current_stage", &self.current_stage)
            .finish_non_exhaustive()
    }
}
