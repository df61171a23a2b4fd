//! Execution log: what each (rule, column) application did.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::rules::{Rule, RuleType};
use crate::table::Table;

/// One processed (rule, column) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub rule_id: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub column: String,
    /// Rows marked invalid (anomaly flags only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flagged_count: Option<usize>,
    /// Rows detected as missing (imputation only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imputed_count: Option<usize>,
    pub description: String,
    pub reasoning: String,
}

impl LogEntry {
    pub(crate) fn new(rule: &Rule, column: &str) -> Self {
        Self {
            rule_id: rule.rule_id.clone(),
            rule_type: rule.rule_type.clone(),
            column: column.to_string(),
            flagged_count: None,
            imputed_count: None,
            description: rule.description.clone(),
            reasoning: rule.reasoning.clone(),
        }
    }

    pub(crate) fn with_flagged(mut self, count: usize) -> Self {
        self.flagged_count = Some(count);
        self
    }

    pub(crate) fn with_imputed(mut self, count: usize) -> Self {
        self.imputed_count = Some(count);
        self
    }
}

/// A non-fatal problem met while applying rules.
///
/// Warnings never interrupt the pass and never appear in the log entries.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleWarning {
    #[error("rule {rule_id} lists no columns, skipped")]
    NoColumns { rule_id: String },

    #[error("column '{column}' missing from table, rule {rule_id} skipped")]
    MissingColumn { rule_id: String, column: String },

    #[error("unknown rule type '{rule_type}' for rule {rule_id}, skipped")]
    UnknownRuleType { rule_id: String, rule_type: String },

    #[error("rule {rule_id} has no pattern, skipped for column '{column}'")]
    MissingPattern { rule_id: String, column: String },

    #[error("rule {rule_id} has no replacement, skipped for column '{column}'")]
    MissingReplacement { rule_id: String, column: String },

    #[error("rule {rule_id} needs column '{operand}' which is missing, skipped for column '{column}'")]
    MissingOperand {
        rule_id: String,
        column: String,
        operand: String,
    },

    #[error("format-string rule {rule_id} failed on column '{column}': {message}")]
    FormatApplication {
        rule_id: String,
        column: String,
        message: String,
    },
}

impl RuleWarning {
    /// True when the warning means the (rule, column) pair was not executed.
    pub fn is_skip(&self) -> bool {
        !matches!(self, RuleWarning::FormatApplication { .. })
    }
}

/// Result of one application pass.
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    /// Cleaned copy of the input table.
    pub table: Table,
    /// One entry per processed (rule, column), in execution order.
    pub log: Vec<LogEntry>,
    /// Non-fatal problems, in the order they occurred.
    pub warnings: Vec<RuleWarning>,
}

/// Collects log entries and warnings during a pass.
#[derive(Debug, Default)]
pub(crate) struct Journal {
    pub(crate) log: Vec<LogEntry>,
    pub(crate) warnings: Vec<RuleWarning>,
}

impl Journal {
    pub(crate) fn record(&mut self, entry: LogEntry) {
        self.log.push(entry);
    }

    pub(crate) fn warn(&mut self, warning: RuleWarning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_entry_serialization() {
        let rule = Rule::new("flag_missing_item", RuleType::AnomalyFlag, ["Item"])
            .with_description("Flag missing Item values");
        let entry = LogEntry::new(&rule, "Item").with_flagged(1);
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["type"], "anomaly_flag");
        assert_eq!(json["flagged_count"], 1);
        assert!(json.get("imputed_count").is_none());
        assert_eq!(json["reasoning"], "");
    }

    #[test]
    fn test_warning_display() {
        let warning = RuleWarning::MissingColumn {
            rule_id: "r1".to_string(),
            column: "Nope".to_string(),
        };
        assert_eq!(warning.to_string(), "column 'Nope' missing from table, rule r1 skipped");
        assert!(warning.is_skip());
    }
}
