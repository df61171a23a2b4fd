//! Mock rule generator for tests and offline runs.

use crate::apply::TotalCheckConfig;
use crate::error::Result;
use crate::rules::{Rule, RuleSet, RuleType};
use crate::table::{ColumnType, Table};

use super::provider::{GeneratorConfig, RuleGenerator};

/// Proposes rules from simple heuristics, or returns a fixed list.
///
/// The heuristics are deterministic: text columns get a whitespace-trim
/// transformation, columns with missing values get a missing-value flag, and
/// a table with price, quantity and total columns gets the total check.
pub struct MockGenerator {
    config: GeneratorConfig,
    fixed: Option<Vec<Rule>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default().with_model("mock"),
            fixed: None,
        }
    }

    /// Always return these rules, whatever the sample.
    pub fn with_rules(rules: Vec<Rule>) -> Self {
        Self {
            fixed: Some(rules),
            ..Self::new()
        }
    }

    fn heuristic_rules(sample: &Table) -> Vec<Rule> {
        let mut rules = Vec::new();

        let text_columns: Vec<&str> = sample
            .columns()
            .filter(|(_, values)| ColumnType::of(values) == ColumnType::String)
            .map(|(name, _)| name)
            .collect();
        if !text_columns.is_empty() {
            rules.push(
                Rule::new("trim_whitespace", RuleType::Transformation, text_columns)
                    .with_pattern(r"^\s+|\s+$")
                    .with_replacement("")
                    .with_description("Strip leading and trailing whitespace")
                    .with_reasoning("Free-text fields often carry stray spaces")
                    .with_confidence(0.9),
            );
        }

        let with_nulls: Vec<&str> = sample
            .columns()
            .filter(|(_, values)| values.iter().any(|v| v.is_null()))
            .map(|(name, _)| name)
            .collect();
        if !with_nulls.is_empty() {
            rules.push(
                Rule::new("flag_missing_values", RuleType::AnomalyFlag, with_nulls)
                    .with_pattern(r"^\s*$")
                    .flag_on_match(true)
                    .with_description("Flag rows with missing values")
                    .with_reasoning("Missing values were observed in the sample")
                    .with_confidence(0.8),
            );
        }

        let check = TotalCheckConfig::default();
        let total_column = "Total Spent";
        if [check.price_column.as_str(), check.quantity_column.as_str(), total_column]
            .iter()
            .all(|c| sample.contains_column(c))
        {
            rules.push(
                Rule::new(check.rule_id.as_str(), RuleType::AnomalyFlag, [total_column])
                    .with_pattern(".*")
                    .with_description("Flag totals that differ from price times quantity")
                    .with_reasoning("Total should equal unit price times quantity")
                    .with_confidence(0.95),
            );
        }

        rules
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleGenerator for MockGenerator {
    fn generate(&self, sample: &Table, description: &str) -> Result<RuleSet> {
        let rules = match &self.fixed {
            Some(rules) => rules.clone(),
            None => Self::heuristic_rules(sample),
        };
        Ok(RuleSet::new(rules)?.with_description(description.trim()))
    }

    fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "mock"
    }
}
