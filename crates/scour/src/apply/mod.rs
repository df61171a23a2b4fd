//! Rule application: the engine, its per-type handlers and the execution log.

mod config;
mod engine;
mod handlers;
mod log;
pub mod pattern;
pub mod printf;

pub use config::{EngineConfig, MedianFallbackScope, MissingOperandPolicy, TotalCheckConfig};
pub use engine::RuleEngine;
pub use handlers::anomaly::flag_column_name;
pub use handlers::imputation::{ImputeStrategy, MEDIAN_SENTINEL};
pub use log::{ApplyOutcome, LogEntry, RuleWarning};
