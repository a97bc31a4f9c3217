//! Error handling and edge case testing
//!
//! This module tests error conditions, edge cases, and boundary conditions
//! that could occur during background removal operations.

use image::{DynamicImage, Rgba, RgbaImage};
use stickercut::{
    config::{RemovalConfig, MAX_COLOR_DISTANCE, MAX_FEATHER_RADIUS, MAX_SMOOTHING_PASSES},
    error::{RemovalError, Result},
    processor::BackgroundRemovalProcessor,
    types::AlphaMask,
};
use tempfile::TempDir;

#[test]
fn test_config_validation_edge_cases() -> Result<()> {
    // Boundary values for quality settings
    let config = RemovalConfig::builder()
        .jpeg_quality(0)
        .webp_quality(0)
        .build()?;
    assert_eq!(config.jpeg_quality, 0);
    assert_eq!(config.webp_quality, 0);
    assert!(config.validate().is_ok());

    let config = RemovalConfig::builder()
        .jpeg_quality(100)
        .webp_quality(100)
        .build()?;
    assert_eq!(config.jpeg_quality, 100);
    assert_eq!(config.webp_quality, 100);

    // Quality clamping in builder
    let config = RemovalConfig::builder()
        .jpeg_quality(150)
        .webp_quality(200)
        .build()?;
    assert_eq!(config.jpeg_quality, 100);
    assert_eq!(config.webp_quality, 100);

    // Manual validation failure after construction
    let mut config = RemovalConfig::default();
    config.jpeg_quality = 101;
    let validation_result = config.validate();
    assert!(validation_result.is_err());

    let error = validation_result.unwrap_err();
    assert!(error.to_string().contains("JPEG quality"));
    assert!(error.to_string().contains("101"));

    Ok(())
}

#[test]
fn test_threshold_bounds() {
    // Threshold at either end of the valid range builds fine
    assert!(RemovalConfig::builder().threshold(0.0).build().is_ok());
    assert!(RemovalConfig::builder()
        .threshold(MAX_COLOR_DISTANCE)
        .build()
        .is_ok());

    // Out-of-range thresholds are rejected
    assert!(RemovalConfig::builder().threshold(-0.1).build().is_err());
    assert!(RemovalConfig::builder()
        .threshold(MAX_COLOR_DISTANCE + 1.0)
        .build()
        .is_err());
    assert!(RemovalConfig::builder().threshold(f32::NAN).build().is_err());
}

#[test]
fn test_smoothing_and_feather_bounds() {
    assert!(RemovalConfig::builder()
        .smoothing(MAX_SMOOTHING_PASSES)
        .build()
        .is_ok());
    assert!(RemovalConfig::builder()
        .smoothing(MAX_SMOOTHING_PASSES + 1)
        .build()
        .is_err());

    assert!(RemovalConfig::builder()
        .feather_radius(MAX_FEATHER_RADIUS)
        .build()
        .is_ok());
    assert!(RemovalConfig::builder()
        .feather_radius(MAX_FEATHER_RADIUS + 1)
        .build()
        .is_err());
}

#[test]
fn test_processor_rejects_invalid_config() {
    let mut config = RemovalConfig::default();
    config.threshold = -5.0;
    assert!(BackgroundRemovalProcessor::new(config).is_err());
}

#[test]
fn test_zero_size_image_rejected() -> Result<()> {
    let config = RemovalConfig::default();
    let mut processor = BackgroundRemovalProcessor::new(config)?;

    let empty = DynamicImage::ImageRgba8(RgbaImage::new(0, 0));
    let result = processor.process_image(&empty);
    assert!(result.is_err());

    let error = result.unwrap_err();
    assert!(matches!(error, RemovalError::InvalidInput(_)));

    Ok(())
}

#[test]
fn test_one_pixel_image() -> Result<()> {
    // Smallest processable image: the single pixel is its own border,
    // so it is classified as background
    let img = RgbaImage::from_pixel(1, 1, Rgba([120, 80, 200, 255]));
    let mut processor = BackgroundRemovalProcessor::new(RemovalConfig::default())?;
    let result = processor.process_image(&DynamicImage::ImageRgba8(img))?;

    assert_eq!(result.dimensions(), (1, 1));
    assert_eq!(result.image.to_rgba8().get_pixel(0, 0)[3], 0);

    Ok(())
}

#[test]
fn test_alpha_less_input_gains_alpha() -> Result<()> {
    // RGB input without an alpha channel comes back as RGBA
    let rgb = image::RgbImage::from_pixel(16, 16, image::Rgb([255, 255, 255]));
    let mut processor = BackgroundRemovalProcessor::new(RemovalConfig::default())?;
    let result = processor.process_image(&DynamicImage::ImageRgb8(rgb))?;

    let rgba = result.image.to_rgba8();
    assert!(rgba.pixels().all(|p| p[3] == 0));

    Ok(())
}

#[test]
fn test_corrupt_bytes_error() {
    let config = RemovalConfig::default();
    let mut processor = BackgroundRemovalProcessor::new(config).expect("valid config");

    let result = processor.process_bytes(b"\x89PNG but not really");
    assert!(result.is_err());
    assert!(matches!(result.unwrap_err(), RemovalError::Decode(_)));
}

#[test]
fn test_missing_file_error() {
    let config = RemovalConfig::default();
    let mut processor = BackgroundRemovalProcessor::new(config).expect("valid config");

    let result = processor.process_file("/nonexistent/path/image.png");
    assert!(result.is_err());
}

#[test]
fn test_malformed_data_uri_errors() {
    let config = RemovalConfig::default();
    let mut processor = BackgroundRemovalProcessor::new(config).expect("valid config");

    // Not a data URI at all
    assert!(processor.process_data_uri("https://example.com/a.png").is_err());

    // Missing comma separator
    assert!(processor.process_data_uri("data:image/png;base64").is_err());

    // Header without base64 marker
    assert!(processor
        .process_data_uri("data:image/png,rawpayload")
        .is_err());

    // Valid base64 that does not decode to an image
    assert!(processor
        .process_data_uri("data:image/png;base64,bm90IGFuIGltYWdl")
        .is_err());
}

#[test]
fn test_alpha_mask_length_mismatch() {
    // Data length must match dimensions
    let result = AlphaMask::new(vec![0u8; 5], (10, 10));
    assert!(result.is_err());

    let result = AlphaMask::new(vec![128u8; 100], (10, 10));
    assert!(result.is_ok());
}

#[test]
fn test_alpha_mask_edge_values() -> Result<()> {
    // All-zero mask (complete removal)
    let zero_mask = AlphaMask::new(vec![0; 100], (10, 10))?;
    assert!(zero_mask.is_binary());
    assert_eq!(zero_mask.statistics().foreground_pixels, 0);

    // All-255 mask (nothing removed)
    let full_mask = AlphaMask::new(vec![255; 100], (10, 10))?;
    assert!(full_mask.is_binary());
    assert_eq!(full_mask.statistics().background_pixels, 0);

    // Gradient mask is not binary
    let gradient: Vec<u8> = (0..=255).collect();
    let gradient_mask = AlphaMask::new(gradient, (16, 16))?;
    assert!(!gradient_mask.is_binary());

    Ok(())
}

#[test]
fn test_save_to_unwritable_path() -> Result<()> {
    let img = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));
    let mut processor = BackgroundRemovalProcessor::new(RemovalConfig::default())?;
    let result = processor.process_image(&DynamicImage::ImageRgba8(img))?;

    let save_result = result.save_png("/nonexistent_dir/deeper/out.png");
    assert!(save_result.is_err());

    Ok(())
}

#[test]
fn test_threshold_zero_keeps_near_background_pixels() -> Result<()> {
    // With threshold 0 only exact reference matches are background
    let mut img = RgbaImage::from_pixel(32, 32, Rgba([250, 250, 250, 255]));
    // One slightly off-white pixel in the interior
    img.put_pixel(16, 16, Rgba([249, 250, 250, 255]));

    let config = RemovalConfig::builder()
        .threshold(0.0)
        .smoothing(0)
        .feather_radius(0)
        .build()?;
    let mut processor = BackgroundRemovalProcessor::new(config)?;
    let result = processor.process_image(&DynamicImage::ImageRgba8(img))?;

    let rgba = result.image.to_rgba8();
    assert_eq!(rgba.get_pixel(16, 16)[3], 255);
    assert_eq!(rgba.get_pixel(0, 0)[3], 0);

    Ok(())
}

#[test]
fn test_batch_output_written_per_file() -> Result<()> {
    // Two inputs processed with the same processor instance produce
    // independent results
    let temp_dir = TempDir::new().expect("temp dir");

    let white = RgbaImage::from_pixel(16, 16, Rgba([255, 255, 255, 255]));
    let mut with_subject = white.clone();
    for y in 4..12 {
        for x in 4..12 {
            with_subject.put_pixel(x, y, Rgba([10, 10, 10, 255]));
        }
    }

    let path_a = temp_dir.path().join("a.png");
    let path_b = temp_dir.path().join("b.png");
    DynamicImage::ImageRgba8(white).save(&path_a)?;
    DynamicImage::ImageRgba8(with_subject).save(&path_b)?;

    let mut processor = BackgroundRemovalProcessor::new(RemovalConfig::default())?;

    let result_a = processor.process_file(&path_a)?;
    let result_b = processor.process_file(&path_b)?;

    assert_eq!(result_a.mask.statistics().foreground_pixels, 0);
    assert!(result_b.mask.statistics().foreground_pixels > 0);

    Ok(())
}
