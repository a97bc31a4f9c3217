//! Tracing configuration for the CLI frontend
//!
//! The library only emits trace events; subscribers are configured here,
//! by the application.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Tracing configuration builder
#[derive(Debug, Default)]
pub struct TracingConfig {
    /// Verbosity level (maps to log levels)
    pub verbosity: u8,
    /// Environment filter string (overrides verbosity if set)
    pub env_filter: Option<String>,
}

impl TracingConfig {
    /// Create a new tracing configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity level (0-2+)
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set custom environment filter
    #[must_use]
    pub fn with_env_filter<S: Into<String>>(mut self, filter: S) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Convert verbosity level to tracing filter string
    #[must_use]
    pub fn verbosity_to_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",  // Default: warnings and errors only
            1 => "info",  // -v: stage-level progress
            2 => "debug", // -vv: internal state and computations
            _ => "trace", // -vvv+: extremely detailed traces
        }
    }

    /// Initialize the tracing subscriber based on this configuration
    ///
    /// # Errors
    /// Returns an error when the filter string is invalid or a global
    /// subscriber is already installed.
    pub fn init(self) -> anyhow::Result<()> {
        use tracing_subscriber::fmt;

        let filter = if let Some(env_filter) = &self.env_filter {
            EnvFilter::try_new(env_filter)?
        } else {
            EnvFilter::try_new(self.verbosity_to_filter())?
        };

        let fmt_layer = fmt::layer()
            .with_ansi(true)
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_file(false)
            .with_line_number(false)
            .with_level(true)
            .compact();

        Registry::default().with(filter).with(fmt_layer).init();
        Ok(())
    }
}

/// Convenience function to initialize tracing with CLI-friendly defaults
pub fn init_cli_tracing(verbosity: u8) -> anyhow::Result<()> {
    TracingConfig::new().with_verbosity(verbosity).init()
}

/// Initialize tracing for library usage (minimal configuration)
pub fn init_library_tracing() {
    // Only set up if no global subscriber is already installed
    let _ = tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_mapping() {
        assert_eq!(TracingConfig::new().verbosity_to_filter(), "warn");
        assert_eq!(
            TracingConfig::new().with_verbosity(1).verbosity_to_filter(),
            "info"
        );
        assert_eq!(
            TracingConfig::new().with_verbosity(2).verbosity_to_filter(),
            "debug"
        );
        assert_eq!(
            TracingConfig::new().with_verbosity(9).verbosity_to_filter(),
            "trace"
        );
    }

    #[test]
    fn test_env_filter_override() {
        let config = TracingConfig::new()
            .with_verbosity(2)
            .with_env_filter("stickercut=trace");
        assert_eq!(config.env_filter.as_deref(), Some("stickercut=trace"));
    }
}
