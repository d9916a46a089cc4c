//! Configuration system
//!
//! Shape-building limits are data, not constants, so hosts can tune the
//! per-query geometry budget from a TOML or RON file.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk configuration formats, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.ron`
    Ron,
}

impl ConfigFormat {
    /// Format for `path`, if its extension is recognised
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn parse<T: for<'de> Deserialize<'de>>(self, contents: &str) -> Result<T, ConfigError> {
        match self {
            Self::Toml => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Self::Ron => ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    fn render<T: Serialize>(self, value: &T) -> Result<String, ConfigError> {
        match self {
            Self::Toml => {
                toml::to_string_pretty(value).map_err(|e| ConfigError::Serialize(e.to_string()))
            }
            Self::Ron => ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string())),
        }
    }
}

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.ron` file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;
        format.parse(&contents)
    }

    /// Save configuration to a `.toml` or `.ron` file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = ConfigFormat::from_path(path)?.render(self)?;
        std::fs::write(path, contents)?;
        Ok(())
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

    /// Values that parse but cannot be used
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Ceilings and tolerances applied by the shape builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeLimits {
    /// Total vertex count above which a model collides as a box
    pub max_vertices: usize,
    /// Sub-mesh count above which a model collides as a box
    pub max_meshes: usize,
    /// Extent below which an axis is treated as flat (scale forced to 1)
    pub extent_epsilon: f32,
}

impl ShapeLimits {
    /// Default vertex ceiling
    pub const MAX_VERTICES: usize = 1_000_000;
    /// Default sub-mesh ceiling
    pub const MAX_MESHES: usize = 1_000;
    /// Default flat-axis tolerance
    pub const EXTENT_EPSILON: f32 = 1.0e-6;

    /// Check that the limits are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.extent_epsilon.is_finite() || self.extent_epsilon < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "extent_epsilon must be finite and non-negative, got {}",
                self.extent_epsilon
            )));
        }
        Ok(())
    }
}

impl Default for ShapeLimits {
    fn default() -> Self {
        Self {
            max_vertices: Self::MAX_VERTICES,
            max_meshes: Self::MAX_MESHES,
            extent_epsilon: Self::EXTENT_EPSILON,
        }
    }
}

/// Top-level configuration for collision picks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickConfig {
    /// Shape builder limits
    pub limits: ShapeLimits,
}

impl PickConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.limits.validate()
    }
}

impl Config for PickConfig {}
