//! Summary of one cleaning pass.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::apply::{ApplyOutcome, LogEntry};
use crate::error::{Result, ScourError};
use crate::table::{ColumnType, Table};

/// What a cleaning pass did, ready to be written next to the cleaned data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Number of log entries, one per executed (rule, column).
    pub total_rules_applied: usize,
    pub rules_applied: Vec<LogEntry>,
    /// (rows, columns) before cleaning.
    pub original_shape: (usize, usize),
    pub cleaned_shape: (usize, usize),
    /// Columns present after cleaning but not before, sorted by name.
    pub columns_added: Vec<String>,
    /// Rows set to `true` in each added boolean column.
    pub flag_counts: IndexMap<String, usize>,
    pub warnings: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl CleaningReport {
    pub fn new(original: &Table, outcome: &ApplyOutcome) -> Self {
        let cleaned = &outcome.table;

        let mut columns_added: Vec<String> = cleaned
            .column_names()
            .filter(|name| !original.contains_column(name))
            .map(str::to_string)
            .collect();
        columns_added.sort();

        let flag_counts = columns_added
            .iter()
            .filter(|name| cleaned.dtype(name) == Some(ColumnType::Boolean))
            .filter_map(|name| {
                let values = cleaned.column(name)?;
                let count = values.iter().filter(|v| v.as_bool() == Some(true)).count();
                Some((name.clone(), count))
            })
            .collect();

        Self {
            total_rules_applied: outcome.log.len(),
            rules_applied: outcome.log.clone(),
            original_shape: original.shape(),
            cleaned_shape: cleaned.shape(),
            columns_added,
            flag_counts,
            warnings: outcome.warnings.iter().map(ToString::to_string).collect(),
            generated_at: Utc::now(),
        }
    }

    /// Total rows flagged across every added flag column.
    pub fn total_flagged(&self) -> usize {
        self.flag_counts.values().sum()
    }

    /// Write the report as pretty JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ScourError::io(parent, e))?;
        }
        let file = File::create(path).map_err(|e| ScourError::io(path, e))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::RuleEngine;
    use crate::rules::{Rule, RuleType};
    use crate::table::Value;
    use tempfile::TempDir;

    fn outcome() -> (Table, ApplyOutcome) {
        let table = Table::from_columns([
            ("Item", vec![Value::from("Item_1"), Value::Null, Value::Null]),
            ("Quantity", vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
        ])
        .unwrap();
        let rules = vec![
            Rule::new("flag_missing_item", RuleType::AnomalyFlag, ["Item"])
                .with_pattern(r"^\s*$")
                .flag_on_match(true),
            Rule::new("flag_bad_qty", RuleType::AnomalyFlag, ["Quantity", "Missing"])
                .with_pattern(r"\d+"),
        ];
        let outcome = RuleEngine::new().apply(&table, &rules).unwrap();
        (table, outcome)
    }

    #[test]
    fn test_report_aggregates_outcome() {
        let (original, outcome) = outcome();
        let report = CleaningReport::new(&original, &outcome);

        assert_eq!(report.total_rules_applied, 2);
        assert_eq!(report.original_shape, (3, 2));
        assert_eq!(report.cleaned_shape, (3, 4));
        assert_eq!(
            report.columns_added,
            vec!["Item_flag_flag_missing_item", "Quantity_flag_flag_bad_qty"]
        );
        assert_eq!(report.flag_counts["Item_flag_flag_missing_item"], 2);
        assert_eq!(report.flag_counts["Quantity_flag_flag_bad_qty"], 0);
        assert_eq!(report.total_flagged(), 2);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_save_writes_json() {
        let (original, outcome) = outcome();
        let report = CleaningReport::new(&original, &outcome);
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("cleaning_log.json");
        report.save(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["total_rules_applied"], 2);
        assert_eq!(json["rules_applied"][0]["type"], "anomaly_flag");
        assert_eq!(json["original_shape"], serde_json::json!([3, 2]));
    }
}
