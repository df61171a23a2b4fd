//! Scour: declarative rule engine for cleaning messy tabular transaction data.
//!
//! A rule set is an ordered list of small, explainable instructions (flag
//! anomalies, impute missing values, rewrite text, format numbers), usually
//! proposed by a language model from a sample of the data and reviewed by a
//! person. Scour applies such a rule set to a table and reports what it did.
//!
//! # Core Principles
//!
//! - **Non-destructive**: the input table is never modified; anomalies become
//!   new boolean columns rather than deletions
//! - **Ordered**: rules run in the order given, each seeing the previous output
//! - **Traceable**: every executed (rule, column) pair is logged, and every
//!   skipped one produces a warning
//!
//! # Example
//!
//! ```no_run
//! use scour::{RuleEngine, RuleSet, TableLoader};
//!
//! let (table, _) = TableLoader::new().load("retail_store_sales.csv").unwrap();
//! let rules = RuleSet::load("cleaning_rules.json").unwrap();
//! let outcome = RuleEngine::new().apply(&table, rules.rules()).unwrap();
//!
//! println!("Applied: {}", outcome.log.len());
//! println!("Warnings: {}", outcome.warnings.len());
//! ```

pub mod apply;
pub mod config;
pub mod error;
pub mod generator;
pub mod report;
pub mod rules;
pub mod table;

mod scour;

pub use crate::scour::{CleaningRun, Scour};
pub use apply::{
    ApplyOutcome, EngineConfig, LogEntry, MedianFallbackScope, MissingOperandPolicy, RuleEngine,
    RuleWarning, TotalCheckConfig,
};
pub use config::{AppConfig, DataConfig};
pub use error::{Result, ScourError};
pub use generator::{GeneratorConfig, MockGenerator, OpenAiGenerator, RuleGenerator};
pub use report::CleaningReport;
pub use rules::{Rule, RuleSet, RuleType};
pub use table::{ColumnType, SourceMetadata, Table, TableLoader, Value};
