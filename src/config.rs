//! Sprite generation configuration loaded from JSON
use crate::{
    ARGB, ConfettiSprites, DEFAULT_FLATNESS, MIN_FLATNESS, Scalar, SpriteError, SpriteRenderer,
};
use serde::{Deserialize, Serialize};
use std::{fmt, io::Read, str::FromStr};

/// Palette and rendering options
///
/// ```json
/// { "colors": ["#ff0000", "#8000ff00"], "size": 24, "antialias": true }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteConfig {
    /// Colors in `#RRGGBB` or `#AARRGGBB` format
    pub colors: Vec<ARGB>,
    /// Width and height of each sprite in pixels
    pub size: usize,
    #[serde(default)]
    pub antialias: bool,
    #[serde(default = "default_flatness")]
    pub flatness: Scalar,
}

fn default_flatness() -> Scalar {
    DEFAULT_FLATNESS
}

impl SpriteConfig {
    pub fn new(colors: Vec<ARGB>, size: usize) -> Self {
        Self {
            colors,
            size,
            antialias: false,
            flatness: DEFAULT_FLATNESS,
        }
    }

    /// Load and validate configuration
    pub fn from_reader(reader: impl Read) -> Result<Self, ConfigError> {
        let config: SpriteConfig = serde_json::from_reader(reader)?;
        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if !(self.flatness >= MIN_FLATNESS && self.flatness.is_finite()) {
            return Err(ConfigError::InvalidFlatness(self.flatness));
        }
        Ok(self)
    }

    pub fn renderer(&self) -> SpriteRenderer {
        SpriteRenderer::new(self.antialias, self.flatness)
    }

    /// Render sprites described by the configuration
    pub fn generate(&self) -> Result<ConfettiSprites, SpriteError> {
        ConfettiSprites::new(&self.renderer(), &self.colors, self.size)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl FromStr for SpriteConfig {
    type Err = ConfigError;

    fn from_str(config: &str) -> Result<Self, Self::Err> {
        let config: SpriteConfig = serde_json::from_str(config)?;
        config.validate()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    /// Flatness must be a finite number not less than `MIN_FLATNESS`
    InvalidFlatness(Scalar),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Json(error) => write!(f, "Invalid sprite configuration: {}", error),
            ConfigError::InvalidFlatness(flatness) => {
                write!(
                    f,
                    "Flatness is expected to be at least {}: {}",
                    MIN_FLATNESS, flatness
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(error) => Some(error),
            ConfigError::InvalidFlatness(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error)
    }
}
