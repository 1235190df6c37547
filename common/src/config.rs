use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::params::{ParameterError, ParameterSet};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tracker: TrackerConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackerConfig {
    /// Source parameters from the interactive provider instead of this file.
    #[serde(default)]
    pub tuning_mode: bool,
    #[serde(flatten)]
    pub params: ParameterSet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub input_dir: PathBuf,
    #[serde(default = "default_fps")]
    pub fps: f64,
    #[serde(default)]
    pub repeat: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosticsConfig {
    /// Diagnostic images are only written when this is set.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default = "default_diagnostics_prefix")]
    pub prefix: String,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            prefix: default_diagnostics_prefix(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFile(path.display().to_string(), e))?;
        let config = Self::parse(&content)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parses and validates a TOML document. Parameter sets that violate
    /// their ranges are rejected here so the pipeline never sees them.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.tracker.params.validate()?;
        config.source.frame_period()?;
        Ok(config)
    }
}

impl SourceConfig {
    /// Time between frames. Rejects rates whose period is zero or does not
    /// fit in a `Duration`.
    pub fn frame_period(&self) -> Result<Duration, ConfigError> {
        Duration::try_from_secs_f64(1.0 / self.fps)
            .ok()
            .filter(|period| !period.is_zero())
            .ok_or_else(|| {
                ConfigError::Parse(format!(
                    "source.fps must give a representable frame period, got {}",
                    self.fps
                ))
            })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    ReadFile(String, std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("invalid tracker parameters: {0}")]
    Invalid(#[from] ParameterError),
}

// Default value functions
fn default_fps() -> f64 {
    10.0
}
fn default_diagnostics_prefix() -> String {
    "ball/".into()
}
fn default_log_level() -> String {
    "info".into()
}
