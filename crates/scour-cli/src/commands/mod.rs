//! CLI command implementations.

pub mod analyze;
pub mod apply;
pub mod generate;
pub mod validate;

use std::path::Path;

use scour::AppConfig;
use tracing::debug;

/// Configuration from `--config`, or the defaults.
pub(crate) fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) => {
            debug!("Using configuration from {}", path.display());
            AppConfig::load(path)?
        }
        None => AppConfig::default(),
    })
}
