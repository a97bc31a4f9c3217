//! Image I/O operations service

use crate::{
    config::OutputFormat,
    error::{RemovalError, Result},
};
use image::DynamicImage;
use std::path::Path;

/// Service for handling image file input/output operations
pub struct ImageIOService;

impl ImageIOService {
    /// Load an image from a file path
    ///
    /// Tries extension-based format detection first and falls back to
    /// content-based detection, so files with wrong or missing extensions
    /// still load when the payload itself is a recognizable image.
    ///
    /// # Errors
    /// Returns [`RemovalError::Io`] when the file is missing or
    /// unreadable, and [`RemovalError::Decode`] when neither detection
    /// strategy can decode the payload.
    pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(RemovalError::file_io_error(
                "read image file",
                path_ref,
                std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
            ));
        }

        match image::open(path_ref) {
            Ok(img) => Ok(img),
            Err(e) => {
                log::debug!(
                    "Extension-based loading failed for {}: {}. Attempting content-based detection.",
                    path_ref.display(),
                    e
                );

                let data = std::fs::read(path_ref).map_err(|io_err| {
                    RemovalError::file_io_error("read image data", path_ref, io_err)
                })?;

                image::load_from_memory(&data).map_err(|content_err| {
                    RemovalError::decode(format!(
                        "Failed to load '{}' with both extension-based and content-based detection. \
                         Extension error: {}. Content error: {}",
                        path_ref.display(),
                        e,
                        content_err
                    ))
                })
            },
        }
    }

    /// Save an image to a file in the given output format
    ///
    /// # Errors
    /// Returns [`RemovalError::Image`] on encoding failures and
    /// [`RemovalError::Io`] on write failures.
    pub fn save_image<P: AsRef<Path>>(
        image: &DynamicImage,
        path: P,
        format: OutputFormat,
        quality: u8,
    ) -> Result<()> {
        let path_ref = path.as_ref();
        match format {
            OutputFormat::Png => {
                image.save_with_format(path_ref, image::ImageFormat::Png)?;
            },
            OutputFormat::Jpeg => {
                // JPEG has no alpha channel, composite over white first
                let composited = crate::services::OutputFormatHandler::convert_format(
                    image.to_rgba8(),
                    format,
                )?;
                let file = std::fs::File::create(path_ref).map_err(|e| {
                    RemovalError::file_io_error("create output file", path_ref, e)
                })?;
                let mut encoder =
                    image::codecs::jpeg::JpegEncoder::new_with_quality(file, quality);
                encoder.encode_image(&composited.to_rgb8())?;
            },
            OutputFormat::WebP => {
                #[cfg(feature = "webp-support")]
                image.save_with_format(path_ref, image::ImageFormat::WebP)?;
                #[cfg(not(feature = "webp-support"))]
                return Err(RemovalError::invalid_config(
                    "WebP output requires the 'webp-support' feature",
                ));
            },
            OutputFormat::Rgba8 => {
                std::fs::write(path_ref, image.to_rgba8().as_raw()).map_err(|e| {
                    RemovalError::file_io_error("write output file", path_ref, e)
                })?;
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file() {
        let result = ImageIOService::load_image("/definitely/not/here.png");
        assert!(matches!(result, Err(RemovalError::Io(_))));
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.png");
        std::fs::write(&path, b"this is not an image").unwrap();

        let result = ImageIOService::load_image(&path);
        assert!(matches!(result, Err(RemovalError::Decode(_))));
    }

    #[test]
    fn test_save_and_reload_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.png");

        let image =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 200])));
        ImageIOService::save_image(&image, &path, OutputFormat::Png, 90).unwrap();

        let reloaded = ImageIOService::load_image(&path).unwrap();
        assert_eq!(reloaded.to_rgba8().get_pixel(0, 0), &Rgba([1, 2, 3, 200]));
    }

    #[test]
    fn test_load_with_wrong_extension() {
        // PNG payload saved under a .jpg name: content detection recovers it
        let dir = tempdir().unwrap();
        let path = dir.path().join("mislabeled.jpg");

        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255])));
        let mut bytes = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        std::fs::write(&path, bytes).unwrap();

        let reloaded = ImageIOService::load_image(&path).unwrap();
        assert_eq!(reloaded.width(), 2);
    }

    #[test]
    fn test_save_jpeg_composites_transparency_over_white() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.jpg");

        // Transparent red pixel: dropping alpha would leave it red,
        // compositing must turn it white
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([200, 0, 0, 0])));
        ImageIOService::save_image(&image, &path, OutputFormat::Jpeg, 90).unwrap();

        let reloaded = ImageIOService::load_image(&path).unwrap().to_rgb8();
        let pixel = reloaded.get_pixel(0, 0);
        assert!(pixel[0] > 240 && pixel[1] > 240 && pixel[2] > 240);
    }

    #[test]
    fn test_save_rgba8_raw() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.rgba8");

        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 1, Rgba([7, 8, 9, 10])));
        ImageIOService::save_image(&image, &path, OutputFormat::Rgba8, 90).unwrap();

        let raw = std::fs::read(&path).unwrap();
        assert_eq!(raw, vec![7, 8, 9, 10, 7, 8, 9, 10]);
    }
}
