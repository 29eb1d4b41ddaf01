//! Configuration management for the CLI
//!
//! Configuration is optional and layered: built-in defaults, then an
//! optional TOML file (`--config`, `PUBCHECK_CONFIG`, or the per-user
//! default location), then command-line arguments.

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingSection,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Default output format: human, json, json-pretty
    pub format: String,

    /// Use colored output by default
    pub color: bool,
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration, optionally from an explicit file
    ///
    /// An explicit path that does not exist is an error; the default
    /// per-user location is simply skipped when absent.
    pub fn load_with_file(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Per-user config location (`~/.config/pubcheck/config.toml` on Linux)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pubcheck").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// The output format to use when the CLI flag is absent
    pub fn output_format(&self) -> OutputFormat {
        match self.output.format.as_str() {
            "json" => OutputFormat::Json,
            "json-pretty" => OutputFormat::JsonPretty,
            _ => OutputFormat::Human,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_human_with_color() {
        let config = Config::default();
        assert_eq!(config.output_format(), OutputFormat::Human);
        assert!(config.output.color);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn loads_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nformat = \"json-pretty\"\ncolor = false").unwrap();

        let config = Config::load_with_file(Some(file.path())).unwrap();
        assert_eq!(config.output_format(), OutputFormat::JsonPretty);
        assert!(!config.output.color);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = Config::load_with_file(Some(Path::new("/nonexistent/pubcheck.toml"))).unwrap_err();
        assert_eq!(err.exit_code(), 6);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nformmat = \"json\"").unwrap();
        assert!(Config::load_with_file(Some(file.path())).is_err());
    }
}
