//! Application configuration
//!
//! Defaults are compiled in from `bandslicer.toml`. A user file only has to
//! name the keys it changes: it is merged table by table over the built-in
//! document before being deserialized.

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use lazy_static::lazy_static;
use log::LevelFilter;
use serde::Deserialize;

use crate::editor::EditorSettings;
use crate::errors::{SliceError, SliceResult};
use crate::slicer::SliceFormat;

lazy_static! {
    // Parse the embedded defaults once
    static ref BUILTIN_DOCUMENT: toml::Value = {
        let content = include_str!("../bandslicer.toml");
        content.parse::<toml::Value>().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to parse built-in configuration: {}", e);
            toml::Value::Table(toml::map::Map::new())
        })
    };
}

/// Complete application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SlicerConfig {
    pub server: ServerConfig,
    pub slicing: SlicingConfig,
    pub editor: EditorSettings,
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the compiled editor assets
    pub static_dir: PathBuf,
    /// Entry page served for every path that is not a file
    pub index_file: String,
    /// Request bodies above this size are rejected before reaching the handler
    pub max_upload_bytes: usize,
    pub worker_threads: usize,
    pub blocking_threads: usize,
}

/// Slice output settings
#[derive(Debug, Clone, Deserialize)]
pub struct SlicingConfig {
    pub output_format: SliceFormat,
    /// File name offered in the Content-Disposition header
    pub archive_name: String,
    /// Body of every 500 response
    pub failure_message: String,
    /// Size of the rayon pool used for encoding, 0 for one thread per core
    pub encode_threads: usize,
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Log to this file (and the console) instead of env_logger's stderr output
    pub file: Option<String>,
}

impl LoggingConfig {
    /// Parse the configured level, falling back to `Info`
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.level).unwrap_or_else(|_| {
            eprintln!("Warning: Unknown log level '{}', using info", self.level);
            LevelFilter::Info
        })
    }
}

impl ServerConfig {
    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Full path of the fallback entry page
    pub fn index_path(&self) -> PathBuf {
        self.static_dir.join(&self.index_file)
    }
}

impl SlicerConfig {
    /// The compiled-in defaults
    pub fn builtin() -> SliceResult<Self> {
        Self::from_document(BUILTIN_DOCUMENT.clone())
    }

    /// Parse a TOML string and layer it over the built-in defaults
    pub fn from_str(content: &str) -> SliceResult<Self> {
        let overrides: toml::Value = content.parse()?;
        let mut document = BUILTIN_DOCUMENT.clone();
        merge_documents(&mut document, overrides);
        Self::from_document(document)
    }

    /// Load a configuration file and layer it over the built-in defaults
    pub fn from_file(path: &str) -> SliceResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Load `path` when given, otherwise the defaults
    pub fn load(path: Option<&str>) -> SliceResult<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Self::builtin(),
        }
    }

    fn from_document(document: toml::Value) -> SliceResult<Self> {
        let config: SlicerConfig = document.try_into()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> SliceResult<()> {
        if self.server.max_upload_bytes == 0 {
            return Err(SliceError::ConfigError("server.max_upload_bytes must be positive".to_string()));
        }
        if self.server.worker_threads == 0 || self.server.blocking_threads == 0 {
            return Err(SliceError::ConfigError("server thread counts must be positive".to_string()));
        }
        if self.editor.zoom_step <= 1.0 {
            return Err(SliceError::ConfigError("editor.zoom_step must be greater than 1".to_string()));
        }
        if self.editor.viewport_width <= 0.0 || self.editor.viewport_height <= 0.0 {
            return Err(SliceError::ConfigError("editor viewport must have a positive size".to_string()));
        }
        Ok(())
    }
}

/// Recursively copy every key of `overrides` into `base`
fn merge_documents(base: &mut toml::Value, overrides: toml::Value) {
    match (base, overrides) {
        (toml::Value::Table(base_table), toml::Value::Table(override_table)) => {
            for (key, value) in override_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_documents(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_defaults() {
        let config = SlicerConfig::builtin().unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.max_upload_bytes, 50 * 1024 * 1024);
        assert_eq!(config.slicing.output_format, SliceFormat::Png);
        assert_eq!(config.slicing.archive_name, "slices.zip");
        assert_eq!(config.editor.zoom_step, 1.25);
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let config = SlicerConfig::from_str("[server]\nport = 8080\n\n[slicing]\noutput_format = \"tiff\"\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.slicing.output_format, SliceFormat::Tiff);
        assert_eq!(config.slicing.archive_name, "slices.zip");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(SlicerConfig::from_str("[editor]\nzoom_step = 1.0\n").is_err());
        assert!(SlicerConfig::from_str("[slicing]\noutput_format = \"jpeg\"\n").is_err());
        assert!(SlicerConfig::from_str("not toml at all [").is_err());
        assert!(SlicerConfig::from_str("[server]\nworker_threads = 0\n").is_err());
        assert!(SlicerConfig::from_str("[server]\nmax_upload_bytes = 0\n").is_err());
    }

    #[test]
    fn test_level_filter_fallback() {
        let logging = LoggingConfig { level: "loud".to_string(), file: None };
        assert_eq!(logging.level_filter(), LevelFilter::Info);
        let logging = LoggingConfig { level: "debug".to_string(), file: None };
        assert_eq!(logging.level_filter(), LevelFilter::Debug);
    }
}
