//! Engine configuration.

use serde::{Deserialize, Serialize};

/// What the price/quantity/total check does with rows that lack a number
/// in any of the three columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingOperandPolicy {
    /// Leave the row unflagged; it cannot be shown to be inconsistent.
    #[default]
    Exclude,
    /// Flag the row; a total that cannot be checked counts as invalid.
    Flag,
}

/// Which rows the median imputation fills with the global median.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedianFallbackScope {
    /// Only rows the rule detected as missing.
    #[default]
    Rule,
    /// Every null left in the column, whether the rule detected it or not.
    Column,
}

/// The reserved arithmetic anomaly check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TotalCheckConfig {
    /// Rule id that triggers the check instead of pattern matching.
    pub rule_id: String,
    pub price_column: String,
    pub quantity_column: String,
    /// Absolute tolerance between the rounded product and the total.
    pub tolerance: f64,
    pub missing_operands: MissingOperandPolicy,
}

impl Default for TotalCheckConfig {
    fn default() -> Self {
        Self {
            rule_id: "flag_total_spent_mismatch".to_string(),
            price_column: "Price Per Unit".to_string(),
            quantity_column: "Quantity".to_string(),
            tolerance: 0.01,
            missing_operands: MissingOperandPolicy::Exclude,
        }
    }
}

/// Configuration for [`RuleEngine`](super::RuleEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub total_check: TotalCheckConfig,
    /// Column whose values group rows for median imputation.
    pub group_column: String,
    pub median_fallback: MedianFallbackScope,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            total_check: TotalCheckConfig::default(),
            group_column: "Item".to_string(),
            median_fallback: MedianFallbackScope::Rule,
        }
    }
}

impl EngineConfig {
    pub fn with_missing_operands(mut self, policy: MissingOperandPolicy) -> Self {
        self.total_check.missing_operands = policy;
        self
    }

    pub fn with_median_fallback(mut self, scope: MedianFallbackScope) -> Self {
        self.median_fallback = scope;
        self
    }

    pub fn with_group_column(mut self, column: impl Into<String>) -> Self {
        self.group_column = column.into();
        self
    }

    /// Point the arithmetic check at differently named columns.
    pub fn with_total_operands(
        mut self,
        price_column: impl Into<String>,
        quantity_column: impl Into<String>,
    ) -> Self {
        self.total_check.price_column = price_column.into();
        self.total_check.quantity_column = quantity_column.into();
        self
    }
}
