//! Configuration system
//!
//! Every object picks its defaults from [`ObjectConfig`]; the frame driver
//! settings live in [`FrameConfig`]. Both can be loaded from TOML or RON.

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_str_with_format(&contents, path)
    }

    /// Parse configuration text, picking the format from the path extension
    fn from_str_with_format(contents: &str, path: &str) -> Result<Self, ConfigError> {
        if path.ends_with(".toml") {
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
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
}

/// Defaults applied to every newly constructed object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectConfig {
    /// Objects initialize themselves on their first resolve pass
    pub self_initialize: bool,
    /// Initial layer tag
    pub layer: String,
    /// Name given to the default transform component
    pub transform_name: String,
}

impl Default for ObjectConfig {
    fn default() -> Self {
        Self {
            self_initialize: true,
            layer: String::new(),
            transform_name: "Transform".to_string(),
        }
    }
}

/// Frame driver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Simulated seconds per frame
    pub fixed_delta: f32,
    /// Stop after this many frames (None = run until every object is gone)
    pub max_frames: Option<u64>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            fixed_delta: 1.0 / 60.0,
            max_frames: None,
        }
    }
}

/// Top-level configuration for the core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Default `env_logger` filter
    pub log_filter: String,
    /// Object defaults
    pub objects: ObjectConfig,
    /// Frame driver settings
    pub frame: FrameConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            objects: ObjectConfig::default(),
            frame: FrameConfig::default(),
        }
    }
}

impl Config for CoreConfig {}
