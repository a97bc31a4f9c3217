//! Output format handling service

use crate::{config::OutputFormat, error::Result};
use image::{DynamicImage, ImageBuffer, RgbaImage};

/// Service for handling output format conversions
pub struct OutputFormatHandler;

impl OutputFormatHandler {
    /// Convert an RGBA image to the specified output format
    ///
    /// Formats with an alpha channel pass through unchanged. JPEG cannot
    /// represent transparency, so the alpha channel is composited over
    /// white before the conversion.
    ///
    /// # Errors
    /// Currently infallible; the `Result` return matches the other
    /// conversion services so callers can treat them uniformly.
    pub fn convert_format(rgba_image: RgbaImage, format: OutputFormat) -> Result<DynamicImage> {
        match format {
            OutputFormat::Png | OutputFormat::Rgba8 | OutputFormat::WebP => {
                Ok(DynamicImage::ImageRgba8(rgba_image))
            },
            OutputFormat::Jpeg => {
                let (width, height) = rgba_image.dimensions();
                let mut rgb_image = ImageBuffer::new(width, height);

                for (x, y, pixel) in rgba_image.enumerate_pixels() {
                    let alpha = f32::from(pixel[3]) / 255.0;
                    let over_white = |c: u8| -> u8 {
                        (f32::from(c) * alpha + 255.0 * (1.0 - alpha)).round() as u8
                    };
                    rgb_image.put_pixel(
                        x,
                        y,
                        image::Rgb([over_white(pixel[0]), over_white(pixel[1]), over_white(pixel[2])]),
                    );
                }

                Ok(DynamicImage::ImageRgb8(rgb_image))
            },
        }
    }

    /// Get the appropriate file extension for a given output format
    #[must_use]
    pub fn file_extension(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::WebP => "webp",
            OutputFormat::Rgba8 => "rgba8",
        }
    }

    /// Whether the format can carry the transparency this library produces
    #[must_use]
    pub fn supports_transparency(format: OutputFormat) -> bool {
        !matches!(format, OutputFormat::Jpeg)
    }
}
