//! One handler per rule type. Each receives the current values of the
//! target column and writes its result back into the working table.

pub(super) mod anomaly;
pub(super) mod format_string;
pub(super) mod imputation;
pub(super) mod transformation;

use crate::rules::Rule;
use crate::table::Value;

use super::log::{Journal, RuleWarning};

/// The (rule, column) pair being executed.
pub(super) struct Target<'a> {
    pub rule: &'a Rule,
    pub column: &'a str,
    /// Snapshot of the column before this rule touches it.
    pub values: Vec<Value>,
}

impl Target<'_> {
    pub fn rule_id(&self) -> &str {
        &self.rule.rule_id
    }

    /// The rule's pattern, or a `MissingPattern` warning.
    pub fn pattern(&self, journal: &mut Journal) -> Option<&str> {
        let pattern = self.rule.pattern.as_deref();
        if pattern.is_none() {
            journal.warn(RuleWarning::MissingPattern {
                rule_id: self.rule.rule_id.clone(),
                column: self.column.to_string(),
            });
        }
        pattern
    }

    /// The rule's replacement, or a `MissingReplacement` warning.
    pub fn replacement(&self, journal: &mut Journal) -> Option<&str> {
        let replacement = self.rule.replacement.as_deref();
        if replacement.is_none() {
            journal.warn(RuleWarning::MissingReplacement {
                rule_id: self.rule.rule_id.clone(),
                column: self.column.to_string(),
            });
        }
        replacement
    }

    pub fn missing_operand(&self, operand: &str) -> RuleWarning {
        RuleWarning::MissingOperand {
            rule_id: self.rule.rule_id.clone(),
            column: self.column.to_string(),
            operand: operand.to_string(),
        }
    }
}
