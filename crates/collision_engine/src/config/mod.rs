//! Configuration system
//!
//! File-backed configuration; the format is chosen by file extension.

mod collision;

pub use collision::{CollisionConfig, GridSize, LayerEntry};
pub use serde::{Deserialize, Serialize};

use crate::physics::collision_layers::ParseSignatureError;
use std::path::Path;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match extension(path) {
            Some("json") => serde_json::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match extension(path) {
            Some("json") => serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Some("toml") => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents)?;
        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|extension| extension.to_str())
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Layer index outside the fixed layer range
    #[error("Collision layer index {0} out of range")]
    InvalidLayerIndex(i64),

    /// Malformed layer signature string
    #[error("Invalid signature for collision layer {index}: {source}")]
    InvalidSignature {
        /// Layer the signature belongs to
        index: usize,
        /// Why parsing failed
        source: ParseSignatureError,
    },
}
