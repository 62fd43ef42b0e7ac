//! Configuration management for the model-serving adapter

use crate::models::layout::FeatureLayout;
use crate::models::runtime::{TensorContract, INPUT_BINDING, OUTPUT_BINDING, SERVE_TAG};
use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub model: ModelConfig,
    #[serde(default)]
    pub features: FeaturesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Exported model configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Local directory containing the saved model export
    pub export_dir: PathBuf,
    /// Tags selecting the meta graph (default: serve)
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,
    /// Input binding fed with serialized records
    #[serde(default = "default_input_binding")]
    pub input_binding: String,
    /// Output binding holding class ids
    #[serde(default = "default_output_binding")]
    pub output_binding: String,
}

fn default_tags() -> Vec<String> {
    vec![SERVE_TAG.to_string()]
}

fn default_input_binding() -> String {
    INPUT_BINDING.to_string()
}

fn default_output_binding() -> String {
    OUTPUT_BINDING.to_string()
}

impl ModelConfig {
    /// Configuration for an export directory with the default contract
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
            tags: default_tags(),
            input_binding: default_input_binding(),
            output_binding: default_output_binding(),
        }
    }

    pub fn contract(&self) -> TensorContract {
        TensorContract::new(&self.input_binding, &self.output_binding)
    }
}

/// Feature extraction configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeaturesConfig {
    /// JSON settings profile produced at training time
    pub settings_path: Option<PathBuf>,
    /// Field names in feature-vector order (default: Iris layout)
    pub layout: Option<Vec<String>>,
}

impl FeaturesConfig {
    /// Build the feature layout, falling back to the Iris table
    pub fn layout(&self) -> Result<FeatureLayout> {
        match &self.layout {
            Some(names) => FeatureLayout::from_names(names.iter().cloned())
                .context("Invalid feature layout in configuration"),
            None => Ok(FeatureLayout::iris()),
        }
    }

    /// Read the settings profile; an unset path means no transforms
    pub fn read_settings(&self) -> Result<String> {
        match &self.settings_path {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read feature settings from {:?}", path)),
            None => Ok("[]".to_string()),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (json, pretty, compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::new("models/iris"),
            features: FeaturesConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
