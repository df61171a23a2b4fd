//! Application configuration.
//!
//! Everything has a default; a JSON file only needs the keys it changes:
//!
//! ```json
//! { "generator": { "model": "gpt-4o" }, "data": { "sample_size": 50 } }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::apply::EngineConfig;
use crate::error::{Result, ScourError};
use crate::generator::GeneratorConfig;

const RETAIL_DESCRIPTION: &str = "The Dirty Retail Store Sales dataset contains synthetic sales \
transactions from a retail store. It covers eight product categories with 25 items per category, \
each having static prices. It simulates real-world sales data, including intentional dirtiness \
such as missing or inconsistent values.";

/// Where inputs and outputs live and how the generator sample is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Rows sampled for rule generation.
    pub sample_size: usize,
    /// Seed for the sample, so generation sees the same rows every run.
    pub seed: u64,
    pub output_dir: PathBuf,
    pub rules_filename: String,
    pub cleaned_data_filename: String,
    pub log_filename: String,
    /// Dataset description handed to the rule generator.
    pub data_description: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            sample_size: 20,
            seed: 42,
            output_dir: PathBuf::from("data/processed"),
            rules_filename: "cleaning_rules.json".to_string(),
            cleaned_data_filename: "cleaned_data.csv".to_string(),
            log_filename: "cleaning_log.json".to_string(),
            data_description: RETAIL_DESCRIPTION.to_string(),
        }
    }
}

impl DataConfig {
    pub fn rules_path(&self) -> PathBuf {
        self.output_dir.join(&self.rules_filename)
    }

    pub fn cleaned_data_path(&self) -> PathBuf {
        self.output_dir.join(&self.cleaned_data_filename)
    }

    pub fn log_path(&self) -> PathBuf {
        self.output_dir.join(&self.log_filename)
    }
}

/// Top-level configuration for [`Scour`](crate::Scour) and the CLI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub generator: GeneratorConfig,
    pub data: DataConfig,
    pub engine: EngineConfig,
}

impl AppConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ScourError::io(path, e))?;
        Self::from_json_str(&text)
            .map_err(|e| ScourError::Config(format!("Failed to parse '{}': {}", path.display(), e)))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
