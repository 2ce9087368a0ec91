//! Configuration file parser for ~/.config/shadow-reader/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are accepted but logged, since they are usually typos.
use crate::backend::{BackendKind, UnknownBackend};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error(transparent)]
    UnknownBackend(#[from] UnknownBackend),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend name: "reddit" or "guardian".
    pub backend: String,

    /// Category to open when history does not name one. Falls back to the
    /// backend default when unset or unknown.
    pub default_category: Option<String>,

    /// Overall limit for loading one category, in seconds.
    pub fetch_timeout_secs: u64,

    /// Quiet period after the last resize before cards re-layout.
    pub resize_debounce_ms: u64,

    /// Pixels represented by one terminal column during a mouse drag.
    pub drag_px_per_column: i32,

    /// Override for the backend host (mirrors, testing).
    pub base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::default().as_str().to_string(),
            default_category: None,
            fetch_timeout_secs: 15,
            resize_debounce_ms: 100,
            drag_px_per_column: 8,
            base_url: None,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 6] = [
        "backend",
        "default_category",
        "fetch_timeout_secs",
        "resize_debounce_ms",
        "drag_px_per_column",
        "base_url",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown backend → `Err(ConfigError::UnknownBackend)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        // Reject a bad backend name up front rather than at first use
        config.backend_kind()?;
        tracing::info!(backend = %config.backend, "Loaded configuration");
        Ok(config)
    }

    pub fn backend_kind(&self) -> Result<BackendKind, UnknownBackend> {
        self.backend.parse()
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    /// Drag scale, never below one pixel per column.
    pub fn drag_scale(&self) -> i32 {
        self.drag_px_per_column.max(1)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend, "guardian");
        assert_eq!(config.fetch_timeout(), Duration::from_secs(15));
        assert_eq!(config.resize_debounce(), Duration::from_millis(100));
        assert_eq!(config.drag_scale(), 8);
        assert!(config.default_category.is_none());
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/shadow_reader_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.backend, "guardian");
    }

    #[test]
    fn test_empty_file_returns_default() {
        let dir = std::env::temp_dir().join("shadow_reader_config_test_empty");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "   \n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.resize_debounce_ms, 100);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
backend = "reddit"
fetch_timeout_secs = 5
"#,
        )
        .unwrap();
        assert_eq!(config.backend_kind().unwrap(), BackendKind::Reddit);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(5));
        assert_eq!(config.drag_px_per_column, 8);
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let config = Config::parse("backend = \"guardian\"\ncolour = \"blue\"\n").unwrap();
        assert_eq!(config.backend, "guardian");
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(matches!(
            Config::parse("backend = \"geocities\""),
            Err(ConfigError::UnknownBackend(_))
        ));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(matches!(
            Config::parse("backend = "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_zero_values_are_floored() {
        let config = Config::parse("fetch_timeout_secs = 0\ndrag_px_per_column = 0").unwrap();
        assert_eq!(config.fetch_timeout(), Duration::from_secs(1));
        assert_eq!(config.drag_scale(), 1);
    }
}
