//! The rule application engine.

use tracing::{debug, info};

use crate::error::Result;
use crate::rules::{Rule, RuleType};
use crate::table::Table;

use super::config::EngineConfig;
use super::handlers::{self, Target};
use super::log::{ApplyOutcome, Journal, RuleWarning};

/// Applies rules to tables.
///
/// The engine holds only configuration, so one instance can serve any number
/// of tables and rule sets, including from several threads at once.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    config: EngineConfig,
}

impl RuleEngine {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Apply `rules` in order to a copy of `table`.
    ///
    /// Each rule runs over its columns in listed order and sees the output of
    /// every rule before it. Missing columns, unknown rule types and rules
    /// lacking a required field are skipped with a warning. An invalid
    /// pattern or replacement template aborts the whole pass.
    pub fn apply(&self, table: &Table, rules: &[Rule]) -> Result<ApplyOutcome> {
        let mut working = table.clone();
        let mut journal = Journal::default();

        info!(
            "Applying {} rules to {} rows x {} columns",
            rules.len(),
            table.row_count(),
            table.column_count()
        );

        for rule in rules {
            if rule.columns.is_empty() {
                journal.warn(RuleWarning::NoColumns {
                    rule_id: rule.rule_id.clone(),
                });
                continue;
            }

            for column in &rule.columns {
                self.apply_to_column(&mut working, rule, column, &mut journal)?;
            }
        }

        info!(
            "Applied {} rule/column pairs ({} warnings)",
            journal.log.len(),
            journal.warnings.len()
        );

        Ok(ApplyOutcome {
            table: working,
            log: journal.log,
            warnings: journal.warnings,
        })
    }

    fn apply_to_column(
        &self,
        table: &mut Table,
        rule: &Rule,
        column: &str,
        journal: &mut Journal,
    ) -> Result<()> {
        let Some(values) = table.column(column) else {
            journal.warn(RuleWarning::MissingColumn {
                rule_id: rule.rule_id.clone(),
                column: column.to_string(),
            });
            return Ok(());
        };
        let target = Target {
            rule,
            column,
            values: values.to_vec(),
        };

        debug!("Applying {} ({}) to '{}'", rule.rule_id, rule.rule_type, column);

        match &rule.rule_type {
            RuleType::AnomalyFlag => handlers::anomaly::apply(table, target, &self.config, journal),
            RuleType::Imputation => {
                handlers::imputation::apply(table, target, &self.config, journal)
            }
            RuleType::Transformation => handlers::transformation::apply(table, target, journal),
            RuleType::FormatString => handlers::format_string::apply(table, target, journal),
            RuleType::Unknown(tag) => {
                journal.warn(RuleWarning::UnknownRuleType {
                    rule_id: rule.rule_id.clone(),
                    rule_type: tag.clone(),
                });
                Ok(())
            }
        }
    }
}
