//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; color strings stay raw here and are
//! parsed into domain values at wiring time.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("animation.interval_ms cannot be 0")]
    InvalidInterval,

    #[error("api.base_url cannot be empty")]
    EmptyBaseUrl,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub api: FileApiConfig,
    pub art: FileArtConfig,
    pub animation: FileAnimationConfig,
    pub repl: FileReplConfig,
}

impl FileConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.animation.interval_ms == 0 {
            return Err(ConfigValidationError::InvalidInterval);
        }
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }
        Ok(())
    }
}

/// Generation API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileApiConfig {
    /// Base URL of the Ollama-compatible server.
    pub base_url: String,
    /// Connect timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for FileApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            timeout_seconds: 10,
        }
    }
}

/// Artwork settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileArtConfig {
    /// Default font face.
    pub font: String,
    /// Foreground color as `#RRGGBB`.
    pub foreground: String,
    /// Shadow color as `#RRGGBB`.
    pub shadow: String,
}

impl Default for FileArtConfig {
    fn default() -> Self {
        Self {
            font: "standard".to_string(),
            foreground: "#3B82F6".to_string(),
            shadow: "#1E40AF".to_string(),
        }
    }
}

/// Animation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnimationConfig {
    /// Tick interval in milliseconds (also the exported frame delay).
    pub interval_ms: u64,
    /// Start the live pulse when art is displayed.
    pub enabled: bool,
}

impl Default for FileAnimationConfig {
    fn default() -> Self {
        Self {
            interval_ms: 400,
            enabled: true,
        }
    }
}

/// REPL settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Path to the history file (defaults to the platform data dir).
    pub history_file: Option<String>,
    /// Show soft status lines.
    pub show_status: bool,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            history_file: None,
            show_status: true,
        }
    }
}
