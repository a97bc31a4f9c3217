//! Configuration types for background removal operations

use serde::{Deserialize, Serialize};

/// Maximum Euclidean color distance in RGB space: `sqrt(3 * 255^2)`.
pub const MAX_COLOR_DISTANCE: f32 = 441.672_94;

/// Upper bound on smoothing passes accepted by [`RemovalConfig::validate`]
pub const MAX_SMOOTHING_PASSES: u32 = 64;

/// Upper bound on feather radius accepted by [`RemovalConfig::validate`]
pub const MAX_FEATHER_RADIUS: u32 = 256;

/// How the background/foreground cutoff is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdMode {
    /// One global cutoff applied uniformly to every pixel
    Fixed,
    /// Cutoff scaled per-pixel from local neighborhood distance statistics
    Adaptive,
}

impl Default for ThresholdMode {
    fn default() -> Self {
        Self::Fixed
    }
}

impl std::fmt::Display for ThresholdMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::Adaptive => write!(f, "adaptive"),
        }
    }
}

/// Output image format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// PNG with alpha channel transparency
    Png,
    /// JPEG (no transparency, alpha composited over white)
    Jpeg,
    /// WebP with alpha channel transparency
    WebP,
    /// Raw RGBA8 pixel data (4 bytes per pixel)
    Rgba8,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Png
    }
}

/// Named parameter bundles matching the storefront's slider presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preset {
    /// Flat artwork on a clean background: light cleanup only
    Simple,
    /// Typical sticker source: moderate smoothing with a soft edge
    Standard,
    /// Busy backgrounds: adaptive cutoff plus edge refinement
    Complex,
}

impl Preset {
    /// Expand the preset into a full configuration
    #[must_use]
    pub fn to_config(self) -> RemovalConfig {
        match self {
            Self::Simple => RemovalConfig {
                threshold: 30.0,
                smoothing: 1,
                feather_radius: 1,
                threshold_mode: ThresholdMode::Fixed,
                edge_refinement: false,
                ..RemovalConfig::default()
            },
            Self::Standard => RemovalConfig {
                threshold: 30.0,
                smoothing: 2,
                feather_radius: 3,
                threshold_mode: ThresholdMode::Fixed,
                edge_refinement: true,
                ..RemovalConfig::default()
            },
            Self::Complex => RemovalConfig {
                threshold: 45.0,
                smoothing: 3,
                feather_radius: 4,
                threshold_mode: ThresholdMode::Adaptive,
                edge_refinement: true,
                ..RemovalConfig::default()
            },
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple => write!(f, "simple"),
            Self::Standard => write!(f, "standard"),
            Self::Complex => write!(f, "complex"),
        }
    }
}

/// Configuration for background removal operations
///
/// The first five fields are the per-call knobs exposed to callers; the
/// remainder control output encoding and diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovalConfig {
    /// Color-distance cutoff for classifying background vs. foreground.
    /// Larger values classify more pixels as background.
    pub threshold: f32,

    /// Number of mask-smoothing passes (3x3 box blur per pass)
    pub smoothing: u32,

    /// Width of the alpha gradient at mask edges, in pixels.
    /// Zero produces a hard binary edge.
    pub feather_radius: u32,

    /// Whether the cutoff is global or computed per-neighborhood
    pub threshold_mode: ThresholdMode,

    /// Refine the mask boundary with gradient-based edge detection
    pub edge_refinement: bool,

    /// Output format
    pub output_format: OutputFormat,

    /// JPEG quality (0-100, only used for JPEG output)
    pub jpeg_quality: u8,

    /// WebP quality (0-100, only used for WebP output)
    pub webp_quality: u8,

    /// Enable debug mode (additional logging and validation)
    pub debug: bool,
}

impl Default for RemovalConfig {
    fn default() -> Self {
        Self {
            threshold: 30.0,
            smoothing: 2,
            feather_radius: 3,
            threshold_mode: ThresholdMode::default(),
            edge_refinement: false,
            output_format: OutputFormat::default(),
            jpeg_quality: 90,
            webp_quality: 85,
            debug: false,
        }
    }
}

impl RemovalConfig {
    /// Create a new configuration builder for fluent API construction
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stickercut::{RemovalConfig, ThresholdMode};
    ///
    /// let config = RemovalConfig::builder()
    ///     .threshold(45.0)
    ///     .threshold_mode(ThresholdMode::Adaptive)
    ///     .feather_radius(4)
    ///     .build()
    ///     .unwrap();
    /// ```
    #[must_use]
    pub fn builder() -> RemovalConfigBuilder {
        RemovalConfigBuilder::default()
    }

    /// Start a builder from a named preset bundle
    #[must_use]
    pub fn from_preset(preset: Preset) -> RemovalConfigBuilder {
        RemovalConfigBuilder {
            config: preset.to_config(),
        }
    }

    /// Validate all configuration parameters
    ///
    /// # Validation Rules
    ///
    /// - Threshold: finite, `0.0` to [`MAX_COLOR_DISTANCE`]
    /// - Smoothing passes: at most [`MAX_SMOOTHING_PASSES`]
    /// - Feather radius: at most [`MAX_FEATHER_RADIUS`]
    /// - JPEG/WebP quality: 0-100 (inclusive)
    ///
    /// # Errors
    /// Returns [`crate::RemovalError::InvalidConfig`] with the offending
    /// parameter, its value, and the valid range.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.threshold.is_finite() || self.threshold < 0.0 || self.threshold > MAX_COLOR_DISTANCE
        {
            return Err(crate::error::RemovalError::config_value_error(
                "threshold",
                self.threshold,
                "0-441.67",
                Some(30.0),
            ));
        }

        if self.smoothing > MAX_SMOOTHING_PASSES {
            return Err(crate::error::RemovalError::config_value_error(
                "smoothing passes",
                self.smoothing,
                "0-64",
                Some(2),
            ));
        }

        if self.feather_radius > MAX_FEATHER_RADIUS {
            return Err(crate::error::RemovalError::config_value_error(
                "feather radius",
                self.feather_radius,
                "0-256",
                Some(3),
            ));
        }

        if self.jpeg_quality > 100 {
            return Err(crate::error::RemovalError::config_value_error(
                "JPEG quality",
                self.jpeg_quality,
                "0-100",
                Some(90),
            ));
        }

        if self.webp_quality > 100 {
            return Err(crate::error::RemovalError::config_value_error(
                "WebP quality",
                self.webp_quality,
                "0-100",
                Some(85),
            ));
        }

        Ok(())
    }
}

/// Builder for `RemovalConfig`
#[derive(Debug, Default)]
pub struct RemovalConfigBuilder {
    config: RemovalConfig,
}

impl RemovalConfigBuilder {
    /// Set the color-distance cutoff
    #[must_use]
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Set the number of mask-smoothing passes
    #[must_use]
    pub fn smoothing(mut self, passes: u32) -> Self {
        self.config.smoothing = passes;
        self
    }

    /// Set the feather radius in pixels
    #[must_use]
    pub fn feather_radius(mut self, radius: u32) -> Self {
        self.config.feather_radius = radius;
        self
    }

    /// Set the threshold mode
    #[must_use]
    pub fn threshold_mode(mut self, mode: ThresholdMode) -> Self {
        self.config.threshold_mode = mode;
        self
    }

    /// Enable or disable gradient-based boundary refinement
    #[must_use]
    pub fn edge_refinement(mut self, enabled: bool) -> Self {
        self.config.edge_refinement = enabled;
        self
    }

    /// Set output format
    #[must_use]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// Set JPEG quality
    #[must_use]
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality.min(100);
        self
    }

    /// Set WebP quality
    #[must_use]
    pub fn webp_quality(mut self, quality: u8) -> Self {
        self.config.webp_quality = quality.min(100);
        self
    }

    /// Enable debug mode
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Build and validate the configuration
    ///
    /// # Errors
    /// Returns [`crate::RemovalError::InvalidConfig`] if any parameter is
    /// outside its valid range (see [`RemovalConfig::validate`]).
    pub fn build(self) -> crate::Result<RemovalConfig> {
        let config = self.config;
        config.validate()?;
        Ok(config)
    }
}
