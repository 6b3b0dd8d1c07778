//! Configuration management for gridscribe.
//!
//! Handles loading, saving, and providing defaults for the tool
//! configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::align::AlignConfig;
use crate::pauses::DEFAULT_SPLIT_THRESHOLD;

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub annotation: AnnotationConfig,
    pub align: AlignConfig,
    pub logging: LoggingConfig,
}

/// Configuration for the speech recognition model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Speech recognition model to use.
    pub model: SpeechModel,
    /// Language to recognize, or "auto" for automatic detection.
    pub language: String,
    /// Compute device for inference.
    pub device: Device,
}

/// Tier emission and pause handling options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Emit the segment tier when the transcription carries segments.
    pub segment_level: bool,
    /// Emit the word tier when the transcription carries words.
    pub word_level: bool,
    /// Redistribute silence gaps between adjacent spans before building
    /// tiers.
    pub redistribute_pauses: bool,
    /// Pause redistribution ceiling in seconds.
    pub split_threshold: f64,
}

/// Supported speech recognition models (whisper.cpp GGML family).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SpeechModel {
    WhisperTiny,
    WhisperTinyEn,
    #[default]
    WhisperBase,
    WhisperBaseEn,
    WhisperSmall,
    WhisperSmallEn,
    WhisperMedium,
    WhisperMediumEn,
    WhisperLargeV3,
    WhisperLargeV3Turbo,
}

/// Compute device selection for inference.
///
/// Hardware choice is injected configuration, never process-wide state;
/// the backend receives it per instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// Try GPU offload and let the backend fall back to CPU on its own.
    #[default]
    Auto,
    Cpu,
    Gpu,
}

impl Device {
    /// Whether the backend should attempt GPU offload.
    pub fn use_gpu(&self) -> bool {
        !matches!(self, Device::Cpu)
    }
}

impl FromStr for Device {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(Device::Auto),
            "cpu" => Ok(Device::Cpu),
            "gpu" => Ok(Device::Gpu),
            other => anyhow::bail!("unknown device '{other}' (expected auto, cpu or gpu)"),
        }
    }
}

impl FromStr for SpeechModel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "whisper-tiny" => Ok(SpeechModel::WhisperTiny),
            "whisper-tiny-en" => Ok(SpeechModel::WhisperTinyEn),
            "whisper-base" => Ok(SpeechModel::WhisperBase),
            "whisper-base-en" => Ok(SpeechModel::WhisperBaseEn),
            "whisper-small" => Ok(SpeechModel::WhisperSmall),
            "whisper-small-en" => Ok(SpeechModel::WhisperSmallEn),
            "whisper-medium" => Ok(SpeechModel::WhisperMedium),
            "whisper-medium-en" => Ok(SpeechModel::WhisperMediumEn),
            "whisper-large-v3" => Ok(SpeechModel::WhisperLargeV3),
            "whisper-large-v3-turbo" => Ok(SpeechModel::WhisperLargeV3Turbo),
            other => anyhow::bail!("unknown model '{other}'"),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: LogLevel,
}

/// Log verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to a tracing filter directive string.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: SpeechModel::default(),
            language: "auto".to_string(),
            device: Device::default(),
        }
    }
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            segment_level: false,
            word_level: false,
            redistribute_pauses: true,
            split_threshold: DEFAULT_SPLIT_THRESHOLD,
        }
    }
}

impl Config {
    /// Returns the default config directory path.
    /// `~/.config/gridscribe/` (or `$XDG_CONFIG_HOME/gridscribe/`)
    pub fn config_dir() -> Result<PathBuf> {
        crate::dirs::config_dir()
    }

    /// Returns the default config file path.
    /// `~/.config/gridscribe/config.toml`
    pub fn config_path() -> Result<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Returns the default data directory path.
    /// `~/.local/share/gridscribe/` (or `$XDG_DATA_HOME/gridscribe/`)
    pub fn data_dir() -> Result<PathBuf> {
        crate::dirs::data_dir()
    }

    /// Returns the default models directory path.
    /// `~/.local/share/gridscribe/models/`
    pub fn models_dir() -> Result<PathBuf> {
        Self::data_dir().map(|p| p.join("models"))
    }

    /// Load configuration from the default path.
    /// Returns defaults if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse config file as TOML")
    }

    /// Save configuration to a specific path, creating parent directories
    /// as needed.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;

        std::fs::write(path, content)
            .with_context(|| format!("failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
