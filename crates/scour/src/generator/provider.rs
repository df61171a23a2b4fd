//! Rule generator trait and configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::rules::RuleSet;
use crate::table::Table;

/// Settings for a rule generator, passed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Model to use (e.g., "gpt-4.1").
    pub model: String,

    /// Sampling temperature. Zero keeps generation repeatable.
    pub temperature: f64,

    /// Maximum tokens in the response.
    pub max_tokens: usize,

    /// HTTP timeout for one generation request.
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4.1".to_string(),
            temperature: 0.0,
            max_tokens: 4096,
            timeout_secs: 120,
        }
    }
}

impl GeneratorConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Something that proposes cleaning rules for a table.
///
/// Implementations must be thread-safe (Send + Sync) so one generator can be
/// shared by the facade and the CLI.
pub trait RuleGenerator: Send + Sync {
    /// Propose rules for data shaped like `sample`.
    ///
    /// # Arguments
    /// * `sample` - A handful of representative rows
    /// * `description` - Free-text description of the dataset
    fn generate(&self, sample: &Table, description: &str) -> Result<RuleSet>;

    /// Get the configuration for this generator.
    fn config(&self) -> &GeneratorConfig;

    /// Get the name of this generator (for logging).
    fn name(&self) -> &str;
}
