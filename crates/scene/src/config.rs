//! Scene configuration files.
//!
//! A scene file holds the wave parameters and rain settings. Any field may be
//! omitted; missing values take the castle demo's defaults. The format is
//! picked from the file extension:
//! ```text
//! scene.yaml / scene.yml   - YAML
//! scene.json               - JSON
//! ```

use std::path::Path;

use ripple_waves::{WaveError, WaveParams};
use serde::{Deserialize, Serialize};

use crate::rain::{RainConfig, RainError};

/// Errors from loading or validating a scene configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0:?}")]
    UnsupportedFormat(String),
    #[error("invalid wave parameters: {0}")]
    Waves(#[from] WaveError),
    #[error("invalid rain settings: {0}")]
    Rain(#[from] RainError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub waves: WaveParams,
    pub rain: RainConfig,
    /// Keep every disturb/update command so the run can be replayed.
    pub record_commands: bool,
}

impl SceneConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML or JSON scene file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let text = std::fs::read_to_string(path)?;
        let config = match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            "json" => Self::from_json_str(&text)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        tracing::info!(path = %path.display(), "loaded scene config");
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Domain checks for both sections. Stability is reported, not enforced.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.waves.validate()?;
        self.rain.validate()?;
        if let Err(e) = self.waves.check_stability() {
            tracing::warn!("{e}");
        }
        Ok(())
    }
}
