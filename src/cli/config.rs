//! Configuration conversion utilities for CLI arguments

use crate::cli::main_impl::{Cli, CliOutputFormat, CliPreset};
use crate::config::{OutputFormat, Preset, RemovalConfig, ThresholdMode};
use anyhow::{Context, Result};

/// Convert CLI arguments to a unified `RemovalConfig`
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Build `RemovalConfig` from CLI arguments
    ///
    /// A preset supplies the baseline; explicit flags override individual
    /// fields on top of it.
    pub(crate) fn from_cli(cli: &Cli) -> Result<RemovalConfig> {
        let mut builder = match cli.preset {
            Some(preset) => RemovalConfig::from_preset(Self::parse_preset(preset)),
            None => RemovalConfig::builder(),
        };

        if let Some(threshold) = cli.threshold {
            builder = builder.threshold(threshold);
        }
        if let Some(smoothing) = cli.smoothing {
            builder = builder.smoothing(smoothing);
        }
        if let Some(feather) = cli.feather {
            builder = builder.feather_radius(feather);
        }
        if cli.adaptive {
            builder = builder.threshold_mode(ThresholdMode::Adaptive);
        }
        if cli.edges {
            builder = builder.edge_refinement(true);
        }

        builder
            .output_format(Self::parse_format(cli.format))
            .jpeg_quality(cli.jpeg_quality)
            .webp_quality(cli.webp_quality)
            .debug(cli.verbose >= 2)
            .build()
            .context("Invalid configuration")
    }

    pub(crate) fn parse_format(format: CliOutputFormat) -> OutputFormat {
        match format {
            CliOutputFormat::Png => OutputFormat::Png,
            CliOutputFormat::Jpeg => OutputFormat::Jpeg,
            CliOutputFormat::Webp => OutputFormat::WebP,
            CliOutputFormat::Rgba8 => OutputFormat::Rgba8,
        }
    }

    pub(crate) fn parse_preset(preset: CliPreset) -> Preset {
        match preset {
            CliPreset::Simple => Preset::Simple,
            CliPreset::Standard => Preset::Standard,
            CliPreset::Complex => Preset::Complex,
        }
    }

    /// Validate CLI arguments for consistency
    pub(crate) fn validate_cli(cli: &Cli) -> Result<()> {
        if cli.jpeg_quality > 100 {
            anyhow::bail!("JPEG quality must be 0-100, got {}", cli.jpeg_quality);
        }
        if cli.webp_quality > 100 {
            anyhow::bail!("WebP quality must be 0-100, got {}", cli.webp_quality);
        }
        if let Some(threshold) = cli.threshold {
            if !(0.0..=crate::config::MAX_COLOR_DISTANCE).contains(&threshold) {
                anyhow::bail!(
                    "Threshold must be between 0 and {}, got {}",
                    crate::config::MAX_COLOR_DISTANCE,
                    threshold
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, CliOutputFormat};

    fn create_test_cli() -> Cli {
        Cli {
            input: vec!["test.jpg".to_string()],
            output: None,
            format: CliOutputFormat::Png,
            preset: None,
            threshold: None,
            smoothing: None,
            feather: None,
            adaptive: false,
            edges: false,
            save_mask: false,
            data_uri: false,
            jpeg_quality: 90,
            webp_quality: 85,
            verbose: 0,
            recursive: false,
            pattern: None,
        }
    }

    #[test]
    fn test_cli_config_conversion() {
        let cli = create_test_cli();
        let config = CliConfigBuilder::from_cli(&cli).unwrap();

        assert_eq!(config.output_format, OutputFormat::Png);
        assert_eq!(config.jpeg_quality, 90);
        assert_eq!(config.webp_quality, 85);
        assert!(!config.debug);
    }

    #[test]
    fn test_preset_with_overrides() {
        let mut cli = create_test_cli();
        cli.preset = Some(CliPreset::Complex);
        cli.threshold = Some(60.0);

        let config = CliConfigBuilder::from_cli(&cli).unwrap();
        assert_eq!(config.threshold, 60.0);
        assert_eq!(config.threshold_mode, ThresholdMode::Adaptive);
        assert!(config.edge_refinement);
    }

    #[test]
    fn test_cli_validation() {
        let mut cli = create_test_cli();
        assert!(CliConfigBuilder::validate_cli(&cli).is_ok());

        cli.jpeg_quality = 150;
        assert!(CliConfigBuilder::validate_cli(&cli).is_err());

        cli.jpeg_quality = 90;
        cli.threshold = Some(-1.0);
        assert!(CliConfigBuilder::validate_cli(&cli).is_err());
    }
}
