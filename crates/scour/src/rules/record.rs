//! The rule record: one declarative cleaning instruction.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of cleaning operation a rule performs.
///
/// Serialized as its snake_case tag. Tags outside the four known kinds are
/// kept in [`RuleType::Unknown`] so that a rule set written by a newer
/// generator still loads; the engine skips such rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuleType {
    /// Derive a boolean column marking invalid rows.
    AnomalyFlag,
    /// Fill missing values.
    Imputation,
    /// Regex rewrite of a column's text.
    Transformation,
    /// Percent-style numeric formatting, or a text rewrite.
    FormatString,
    /// Any other tag, preserved verbatim.
    Unknown(String),
}

impl RuleType {
    /// The serialized tag.
    pub fn as_str(&self) -> &str {
        match self {
            RuleType::AnomalyFlag => "anomaly_flag",
            RuleType::Imputation => "imputation",
            RuleType::Transformation => "transformation",
            RuleType::FormatString => "format_string",
            RuleType::Unknown(tag) => tag,
        }
    }

    /// Returns true for the four kinds the engine knows how to apply.
    pub fn is_known(&self) -> bool {
        !matches!(self, RuleType::Unknown(_))
    }
}

impl From<String> for RuleType {
    fn from(tag: String) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "anomaly_flag" => RuleType::AnomalyFlag,
            "imputation" => RuleType::Imputation,
            "transformation" => RuleType::Transformation,
            "format_string" => RuleType::FormatString,
            _ => RuleType::Unknown(tag),
        }
    }
}

impl From<&str> for RuleType {
    fn from(tag: &str) -> Self {
        RuleType::from(tag.to_string())
    }
}

impl From<RuleType> for String {
    fn from(rule_type: RuleType) -> Self {
        match rule_type {
            RuleType::Unknown(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cleaning rule, as produced by a person or a rule generator.
///
/// Rules are validated when a [`RuleSet`](super::RuleSet) is built and are
/// only ever read by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Stable identifier, unique within a rule set.
    pub rule_id: String,

    /// Short imperative sentence.
    #[serde(default)]
    pub description: String,

    /// Why the rule exists. Never used for control flow.
    #[serde(default)]
    pub reasoning: String,

    /// Author's confidence in [0, 1]. Advisory only.
    #[serde(default)]
    pub confidence: f64,

    pub rule_type: RuleType,

    /// Regular expression used to detect values needing action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Replacement specification; meaning depends on `rule_type`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,

    /// Target columns, processed in order.
    pub columns: Vec<String>,

    /// For anomaly flags: flag rows that match instead of rows that don't.
    #[serde(default)]
    pub flag_on_match: bool,
}

impl Rule {
    /// Create a rule with the required fields; the rest default.
    pub fn new(
        rule_id: impl Into<String>,
        rule_type: impl Into<RuleType>,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            description: String::new(),
            reasoning: String::new(),
            confidence: 0.0,
            rule_type: rule_type.into(),
            pattern: None,
            replacement: None,
            columns: columns.into_iter().map(Into::into).collect(),
            flag_on_match: false,
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn flag_on_match(mut self, flag_on_match: bool) -> Self {
        self.flag_on_match = flag_on_match;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_type_tags() {
        assert_eq!(RuleType::from("anomaly_flag"), RuleType::AnomalyFlag);
        assert_eq!(RuleType::from("Imputation"), RuleType::Imputation);
        assert_eq!(
            RuleType::from("deduplicate"),
            RuleType::Unknown("deduplicate".to_string())
        );
        assert_eq!(String::from(RuleType::FormatString), "format_string");
    }

    #[test]
    fn test_unknown_tag_round_trips() {
        let json = r#"{"rule_id":"r","rule_type":"merge_rows","columns":["a"]}"#;
        let rule: Rule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.rule_type, RuleType::Unknown("merge_rows".to_string()));
        assert!(!rule.rule_type.is_known());

        let back = serde_json::to_value(&rule).unwrap();
        assert_eq!(back["rule_type"], "merge_rows");
        assert_eq!(back["flag_on_match"], false);
        assert!(back.get("pattern").is_none());
    }

    #[test]
    fn test_defaults() {
        let json = r#"{"rule_id":"r","rule_type":"transformation","columns":["a"],"pattern":"x"}"#;
        let rule: Rule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.description, "");
        assert_eq!(rule.confidence, 0.0);
        assert!(!rule.flag_on_match);
        assert_eq!(rule.replacement, None);
    }
}
