//! Error types for background removal operations

use thiserror::Error;

/// Result type alias for background removal operations
pub type Result<T> = std::result::Result<T, RemovalError>;

/// Error types for background removal operations
#[derive(Error, Debug)]
pub enum RemovalError {
    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding or format errors from the image crate
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Input could not be decoded into pixel data
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input image rejected before processing (zero-size, dimension mismatch)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unexpected failure during mask computation or alpha application
    #[error("Processing error: {0}")]
    Processing(String),
}

impl RemovalError {
    /// Create a new decode error
    pub fn decode<S: Into<String>>(msg: S) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new processing error
    pub fn processing<S: Into<String>>(msg: S) -> Self {
        Self::Processing(msg.into())
    }

    /// Create file I/O error with operation context
    pub fn file_io_error<P: AsRef<std::path::Path>>(
        operation: &str,
        path: P,
        error: std::io::Error,
    ) -> Self {
        let path_display = path.as_ref().display();
        Self::Io(std::io::Error::new(
            error.kind(),
            format!("Failed to {} '{}': {}", operation, path_display, error),
        ))
    }

    /// Create configuration error with valid ranges
    pub fn config_value_error<T: std::fmt::Display>(
        parameter: &str,
        value: T,
        valid_range: &str,
        recommended: Option<T>,
    ) -> Self {
        let recommendation = match recommended {
            Some(rec) => format!(" Recommended: {}", rec),
            None => String::new(),
        };

        Self::InvalidConfig(format!(
            "Invalid {}: {} (valid range: {}).{}",
            parameter, value, valid_range, recommendation
        ))
    }

    /// Create processing error with stage context
    pub fn processing_stage_error(stage: &str, details: &str, input_info: Option<&str>) -> Self {
        let input_context = match input_info {
            Some(info) => format!(" (input: {})", info),
            None => String::new(),
        };

        Self::Processing(format!(
            "Processing failed at stage '{}'{}: {}",
            stage, input_context, details
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_error_creation() {
        let err = RemovalError::invalid_config("test config error");
        assert!(matches!(err, RemovalError::InvalidConfig(_)));

        let err = RemovalError::decode("unrecognized payload");
        assert!(matches!(err, RemovalError::Decode(_)));

        let err = RemovalError::invalid_input("zero-size image");
        assert!(matches!(err, RemovalError::InvalidInput(_)));
    }

    #[test]
    fn test_error_display() {
        let err = RemovalError::invalid_config("threshold out of range");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: threshold out of range"
        );

        let err = RemovalError::decode("not an image");
        assert_eq!(err.to_string(), "Decode error: not an image");
    }

    #[test]
    fn test_contextual_errors() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = RemovalError::file_io_error("read image file", Path::new("/tmp/in.png"), io_error);
        let error_string = err.to_string();
        assert!(error_string.contains("read image file"));
        assert!(error_string.contains("/tmp/in.png"));

        let err = RemovalError::config_value_error("threshold", 500.0, "0-441.67", Some(30.0));
        let error_string = err.to_string();
        assert!(error_string.contains("threshold"));
        assert!(error_string.contains("500"));
        assert!(error_string.contains("Recommended: 30"));

        let err = RemovalError::processing_stage_error(
            "feathering",
            "mask dimension mismatch",
            Some("100x100 RGBA"),
        );
        let error_string = err.to_string();
        assert!(error_string.contains("feathering"));
        assert!(error_string.contains("100x100 RGBA"));
    }
}
