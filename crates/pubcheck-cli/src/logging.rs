//! Logging setup for the Pubcheck CLI
//!
//! Structured logging goes to stderr so it never mixes with report output
//! on stdout. Verbosity flags choose the base level; `RUST_LOG` overrides
//! everything when set.

use crate::error::{Error, Result};
use is_terminal::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter
    pub level: String,
    /// Output format: compact, full, json
    pub format: LogFormat,
    /// Enable console output
    pub console: bool,
    /// Include file and line numbers
    pub source_location: bool,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    /// Compact format for everyday use
    Compact,
    /// Full format with all details
    Full,
    /// JSON structured format
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            console: true,
            source_location: false,
        }
    }
}

impl LoggingConfig {
    /// Create logging config from verbosity level
    pub fn from_verbosity(verbosity: u8) -> Self {
        let mut config = Self::default();

        match verbosity {
            0 => {
                config.level = "warn".to_string();
            }
            1 => {
                config.level = "info".to_string();
            }
            2 => {
                config.level = "debug".to_string();
                config.source_location = true;
            }
            _ => {
                config.level = "trace".to_string();
                config.format = LogFormat::Full;
                config.source_location = true;
            }
        }

        config
    }

    /// Apply environment overrides
    pub fn merge_with_env(&mut self) {
        // RUST_LOG takes precedence
        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            self.level = rust_log;
        }

        // PUBCHECK_LOG_FORMAT
        if let Ok(format) = std::env::var("PUBCHECK_LOG_FORMAT") {
            match format.to_lowercase().as_str() {
                "compact" => self.format = LogFormat::Compact,
                "full" => self.format = LogFormat::Full,
                "json" => self.format = LogFormat::Json,
                _ => eprintln!("Invalid log format: {}, using default", format),
            }
        }
    }
}

/// Initialize the global logging system
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let ansi = config.console && std::io::stderr().is_terminal();

    // Different formats produce different subscriber types, so each arm
    // installs its own.
    match config.format {
        LogFormat::Compact => {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(ansi)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .compact()
                .finish();

            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| Error::other(format!("Failed to initialize logging: {}", e)))?;
        }
        LogFormat::Json => {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(false)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .json()
                .finish();

            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| Error::other(format!("Failed to initialize logging: {}", e)))?;
        }
        LogFormat::Full => {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(ansi)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .finish();

            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| Error::other(format!("Failed to initialize logging: {}", e)))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_from_verbosity() {
        let config = LoggingConfig::from_verbosity(0);
        assert_eq!(config.level, "warn");
        assert!(!config.source_location);

        let config = LoggingConfig::from_verbosity(2);
        assert_eq!(config.level, "debug");
        assert!(config.source_location);

        let config = LoggingConfig::from_verbosity(5);
        assert_eq!(config.level, "trace");
        assert_eq!(config.format, LogFormat::Full);
    }
}
