use crate::core::EngineConfig;
use crate::core::conventions::Conventions;
use crate::core::drive::DriveKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "RenderConfig::default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default = "RenderConfig::default_block_size")]
    pub block_size: usize,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub drive: DriveKind,
    #[serde(default = "RenderConfig::default_bins_in_use")]
    pub bins_in_use: f32,
    #[serde(default = "RenderConfig::default_exponent")]
    pub exponent: f32,
}

impl RenderConfig {
    fn default_sample_rate() -> u32 {
        48_000
    }
    fn default_block_size() -> usize {
        64
    }
    fn default_bins_in_use() -> f32 {
        12.0
    }
    fn default_exponent() -> f32 {
        1.0
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: Self::default_sample_rate(),
            block_size: Self::default_block_size(),
            seed: 0,
            drive: DriveKind::default(),
            bins_in_use: Self::default_bins_in_use(),
            exponent: Self::default_exponent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub conventions: Conventions,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("parse {path}: {source}")]
    Parse { path: String, source: toml::de::Error },
    #[error("serialize defaults: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl AppConfig {
    /// Read and parse `path`. Missing sections and keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// Default config as TOML with every key commented out, so the file
    /// documents the defaults without pinning them.
    pub fn commented_defaults() -> Result<String, ConfigError> {
        let text = toml::to_string_pretty(&Self::default())?;
        let lines: Vec<String> = text
            .lines()
            .map(|line| {
                let key = line.trim();
                if key.is_empty() || key.starts_with('[') {
                    line.to_string()
                } else {
                    format!("# {line}")
                }
            })
            .collect();
        Ok(lines.join("\n") + "\n")
    }

    /// Load `path`, or write the commented defaults there when it is missing.
    /// Unreadable or invalid files fall back to defaults with a warning.
    pub fn load_or_default(path: &str) -> Self {
        let path = Path::new(path);
        if path.exists() {
            return Self::load(path).unwrap_or_else(|err| {
                warn!("{err}. Using defaults.");
                Self::default()
            });
        }

        match Self::commented_defaults() {
            Ok(text) => {
                if let Err(err) = fs::write(path, text) {
                    warn!("Failed to write default config to {}: {err}", path.display());
                }
            }
            Err(err) => warn!("{err}"),
        }
        Self::default()
    }
}
