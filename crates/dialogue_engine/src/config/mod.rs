//! Configuration files
//!
//! Settings types implement [`Config`] and load from `.toml` or `.ron`
//! files, picked by extension.

mod play_mode;

pub use serde::{Serialize, Deserialize};
pub use play_mode::{PlayModeConfig, LayoutMetrics, Palette, GatingRules};

use std::path::Path;

/// A settings type stored as TOML or RON
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Read settings from `path`
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if the file is unreadable, malformed or has an
    /// unknown extension.
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        match Format::of(path)? {
            Format::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Format::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }
    
    /// Write settings to `path`
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if serialization or the write fails, or the extension
    /// is unknown.
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match Format::of(path)? {
            Format::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

enum Format {
    Toml,
    Ron,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Errors loading or saving settings
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File contents did not match the settings type
    #[error("Parse error: {0}")]
    Parse(String),

    /// Settings could not be encoded
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Extension is neither `.toml` nor `.ron`
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}
