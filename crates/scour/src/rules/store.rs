//! Loading, validating and saving rule sets.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use tracing::{info, warn};

use crate::apply::pattern;
use crate::apply::printf::{has_directive, PercentFormat};
use crate::error::{Result, ScourError};

use super::record::{Rule, RuleType};

/// Optional bookkeeping stored next to the rules. The engine never reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSetMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_rules: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Anything else the author stored, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Json>,
}

#[derive(Serialize)]
struct Persisted<'a> {
    metadata: &'a RuleSetMetadata,
    rules: &'a [Rule],
}

/// An ordered, validated collection of rules.
///
/// Every `RuleSet` has passed structural validation: each rule has at least
/// one column, ids are unique, and the fields each rule type needs are
/// present. Patterns are compiled later, by [`RuleSet::check_patterns`] or
/// when the engine applies them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: Vec<Rule>,
    metadata: RuleSetMetadata,
}

impl RuleSet {
    /// Build a rule set from rules, applying the same validation as loading.
    pub fn new(rules: Vec<Rule>) -> Result<Self> {
        validate(&rules)?;
        Ok(Self {
            rules,
            metadata: RuleSetMetadata::default(),
        })
    }

    /// Load a persisted rule set.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use scour::RuleSet;
    /// let rules = RuleSet::load("data/processed/cleaning_rules.json").unwrap();
    /// println!("{} rules", rules.len());
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ScourError::io(path, e))?;
        let set = Self::from_json_str(&text)?;
        info!("Loaded {} rules from {}", set.len(), path.display());
        Ok(set)
    }

    /// Parse and validate a rule set document: `{"metadata": {...}, "rules": [...]}`.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let document: Json = serde_json::from_str(text)
            .map_err(|e| ScourError::MalformedRuleSet(format!("invalid JSON: {e}")))?;
        let Json::Object(mut document) = document else {
            return Err(ScourError::MalformedRuleSet(
                "expected a JSON object with a 'rules' key".to_string(),
            ));
        };

        let Some(rules) = document.remove("rules") else {
            return Err(ScourError::MalformedRuleSet("missing 'rules' key".to_string()));
        };
        let rules = parse_rules(rules)?;

        let metadata = match document.remove("metadata") {
            Some(Json::Null) | None => RuleSetMetadata::default(),
            Some(value) => serde_json::from_value(value)
                .map_err(|e| ScourError::MalformedRuleSet(format!("invalid metadata: {e}")))?,
        };

        validate(&rules)?;
        Ok(Self { rules, metadata })
    }

    /// Write the rule set as pretty JSON, stamping the metadata.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ScourError::io(parent, e))?;
        }

        let mut metadata = self.metadata.clone();
        metadata.total_rules = Some(self.rules.len());
        metadata.generated_at = Some(Utc::now().to_rfc3339());

        let file = File::create(path).map_err(|e| ScourError::io(path, e))?;
        serde_json::to_writer_pretty(
            BufWriter::new(file),
            &Persisted {
                metadata: &metadata,
                rules: &self.rules,
            },
        )?;

        info!("Saved {} rules to {}", self.rules.len(), path.display());
        Ok(())
    }

    /// Attach a free-text description, saved in the metadata.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = Some(description.into());
        self
    }

    /// Compile every pattern and replacement template without applying
    /// anything. Returns one error per broken rule.
    pub fn check_patterns(&self) -> Vec<ScourError> {
        self.rules.iter().filter_map(|rule| check_rule(rule).err()).collect()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<Rule> {
        self.rules
    }

    pub fn metadata(&self) -> &RuleSetMetadata {
        &self.metadata
    }

    pub fn get(&self, rule_id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.rule_id == rule_id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Deserialize a `rules` array, naming the offending record on failure.
pub(crate) fn parse_rules(rules: Json) -> Result<Vec<Rule>> {
    let Json::Array(records) = rules else {
        return Err(ScourError::MalformedRuleSet("'rules' must be an array".to_string()));
    };
    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            let id = record
                .get("rule_id")
                .and_then(Json::as_str)
                .map(|id| format!(" ({id})"))
                .unwrap_or_default();
            serde_json::from_value(record)
                .map_err(|e| ScourError::MalformedRuleSet(format!("rule #{}{id}: {e}", i + 1)))
        })
        .collect()
}

fn validate(rules: &[Rule]) -> Result<()> {
    let mut seen = HashSet::new();
    for rule in rules {
        let malformed = |what: &str| {
            ScourError::MalformedRuleSet(format!("rule {}: {what}", rule.rule_id))
        };

        if rule.rule_id.trim().is_empty() {
            return Err(ScourError::MalformedRuleSet("rule with empty rule_id".to_string()));
        }
        if !seen.insert(rule.rule_id.as_str()) {
            return Err(malformed("duplicate rule_id"));
        }
        if rule.columns.is_empty() {
            return Err(malformed("'columns' is empty"));
        }

        let needs_pattern = rule.rule_type.is_known() && rule.rule_type != RuleType::FormatString;
        if needs_pattern && rule.pattern.is_none() {
            return Err(malformed("missing 'pattern'"));
        }
        let needs_replacement = matches!(
            rule.rule_type,
            RuleType::Transformation | RuleType::Imputation | RuleType::FormatString
        );
        if needs_replacement && rule.replacement.is_none() {
            return Err(malformed("missing 'replacement'"));
        }

        if !(0.0..=1.0).contains(&rule.confidence) {
            warn!("Rule {} has confidence {} outside [0, 1]", rule.rule_id, rule.confidence);
        }
    }
    Ok(())
}

fn check_rule(rule: &Rule) -> Result<()> {
    let Some(pattern) = rule.pattern.as_deref() else {
        return check_format_template(rule);
    };
    let regex = pattern::compile(&rule.rule_id, pattern)?;

    match (&rule.rule_type, rule.replacement.as_deref()) {
        (RuleType::Transformation, Some(replacement)) => {
            pattern::translate_replacement(&rule.rule_id, &regex, replacement).map(drop)
        }
        (RuleType::FormatString, Some(replacement)) if !has_directive(replacement) => {
            pattern::translate_replacement(&rule.rule_id, &regex, replacement).map(drop)
        }
        _ => check_format_template(rule),
    }
}

fn check_format_template(rule: &Rule) -> Result<()> {
    if rule.rule_type != RuleType::FormatString {
        return Ok(());
    }
    let Some(template) = rule.replacement.as_deref() else {
        return Ok(());
    };
    PercentFormat::parse(template)
        .map(drop)
        .map_err(|e| ScourError::InvalidReplacement {
            rule_id: rule.rule_id.clone(),
            replacement: template.to_string(),
            message: e.to_string(),
        })
}
