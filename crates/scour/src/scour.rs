//! Main Scour struct and public API.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::apply::{ApplyOutcome, RuleEngine};
use crate::config::AppConfig;
use crate::error::{Result, ScourError};
use crate::generator::RuleGenerator;
use crate::report::CleaningReport;
use crate::rules::RuleSet;
use crate::table::{LoaderConfig, SourceMetadata, Table, TableLoader};

/// Result of cleaning a data file with a rule file.
#[derive(Debug, Clone)]
pub struct CleaningRun {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// The table as loaded, before any rule ran.
    pub original: Table,
    pub outcome: ApplyOutcome,
    pub report: CleaningReport,
}

impl CleaningRun {
    /// Write the cleaned table and the report.
    pub fn save(&self, data_path: impl AsRef<Path>, log_path: impl AsRef<Path>) -> Result<()> {
        self.outcome.table.write_csv(data_path)?;
        self.report.save(log_path)
    }
}

/// Loads tables, obtains rules and applies them.
///
/// # Example
///
/// ```no_run
/// use scour::Scour;
///
/// let run = Scour::new()
///     .clean("data/retail_store_sales.csv", "data/processed/cleaning_rules.json")
///     .unwrap();
/// println!("{} rule applications", run.report.total_rules_applied);
/// ```
pub struct Scour {
    config: AppConfig,
    loader: TableLoader,
    engine: RuleEngine,
    generator: Option<Arc<dyn RuleGenerator>>,
}

impl Scour {
    /// Create a Scour instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let engine = RuleEngine::with_config(config.engine.clone());
        Self {
            config,
            loader: TableLoader::new(),
            engine,
            generator: None,
        }
    }

    /// Add a rule generator for [`Scour::generate_rules`].
    pub fn with_generator(mut self, generator: impl RuleGenerator + 'static) -> Self {
        self.generator = Some(Arc::new(generator));
        self
    }

    pub fn with_loader(mut self, config: LoaderConfig) -> Self {
        self.loader = TableLoader::with_config(config);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    pub fn load_table(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        self.loader.load(path)
    }

    pub fn load_rules(&self, path: impl AsRef<Path>) -> Result<RuleSet> {
        RuleSet::load(path)
    }

    /// Ask the configured generator for rules, showing it a seeded random
    /// sample of at most `sample_size` rows.
    pub fn generate_rules(
        &self,
        table: &Table,
        description: &str,
        sample_size: usize,
        seed: u64,
    ) -> Result<RuleSet> {
        let generator = self
            .generator
            .as_ref()
            .ok_or_else(|| ScourError::Config("No rule generator configured".to_string()))?;
        if table.is_empty() {
            return Err(ScourError::EmptyData(
                "cannot generate rules from an empty table".to_string(),
            ));
        }

        let sample = table.sample(sample_size, seed);
        info!(
            "Generating rules with {} from {} of {} rows",
            generator.name(),
            sample.row_count(),
            table.row_count()
        );
        generator.generate(&sample, description)
    }

    /// Apply a rule set to a table.
    pub fn apply(&self, table: &Table, rules: &RuleSet) -> Result<ApplyOutcome> {
        self.engine.apply(table, rules.rules())
    }

    /// Load a data file and a rule file, apply the rules and build the report.
    pub fn clean(
        &self,
        data_path: impl AsRef<Path>,
        rules_path: impl AsRef<Path>,
    ) -> Result<CleaningRun> {
        let (original, source) = self.load_table(data_path)?;
        let rules = self.load_rules(rules_path)?;
        let outcome = self.apply(&original, &rules)?;
        let report = CleaningReport::new(&original, &outcome);

        Ok(CleaningRun {
            source,
            original,
            outcome,
            report,
        })
    }
}

impl Default for Scour {
    fn default() -> Self {
        Self::new()
    }
}
