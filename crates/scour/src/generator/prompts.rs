//! Prompt templates for rule generation.

use crate::apply::MEDIAN_SENTINEL;
use crate::table::{ColumnType, Table};

/// System prompt describing the rule schema and how the engine reads it.
pub fn system_prompt() -> String {
    format!(
        r#"# Role

You are a data cleaning expert. You are given a sample of a messy dataset and you
produce a list of data cleaning rules.

# Instructions

Create a comprehensive set of rules covering both cleaning transformations and
anomaly-detection checks. Favour recall: include every rule that could plausibly be
needed, with a confidence that reflects how sure you are. Treat the sample rows as
illustrations only; the full dataset may contain values the sample does not show.

Rules must be human-readable, generalizable and explainable. Include at least one
anomaly-detection rule.

# Output Format

Return a JSON object {{"rules": [...]}}. Each rule has these keys:
- rule_id: stable snake_case identifier, unique across all rules
- description: short imperative sentence (at most 120 characters)
- reasoning: why the rule is needed
- confidence: number between 0 and 1
- pattern: regular expression detecting the values that need action. It is matched
  against the start of each value's text; missing values appear as the empty string.
- replacement: meaning depends on rule_type (see below)
- rule_type: one of "anomaly_flag", "imputation", "transformation", "format_string"
- columns: list of column names the rule applies to
- flag_on_match: for anomaly_flag only; true flags rows that match the pattern,
  false (the default) flags rows that do not match

Rule types:
- "anomaly_flag": adds a boolean column <column>_flag_<rule_id>; the data is untouched.
  The rule id "flag_total_spent_mismatch" on "Total Spent" checks
  round(Price Per Unit * Quantity, 2) against the total instead of using the pattern.
- "imputation": fills values matching the pattern. replacement is either a literal
  value, "[Column A] * [Column B]" for a product of two columns, or
  "{MEDIAN_SENTINEL}" for the median within each Item, falling back to the
  overall median.
- "transformation": replaces every match of pattern with replacement. Use \1, \2 or
  \g<name> for groups.
- "format_string": a percent template such as "%.2f" rounds numbers.

# Example

```json
{{
  "rules": [
    {{
      "rule_id": "normalize_phone",
      "description": "Normalize phone numbers to +1-XXX-XXX-XXXX format",
      "reasoning": "Phone numbers arrive with mixed separators",
      "confidence": 0.94,
      "pattern": "(\\d{{3}})[. -]?(\\d{{3}})[. -]?(\\d{{4}})",
      "replacement": "+1-\\1-\\2-\\3",
      "rule_type": "transformation",
      "columns": ["phone_number"]
    }}
  ]
}}
```
"#
    )
}

/// User prompt: dataset description, column types and the sample rows.
pub fn user_prompt(sample: &Table, description: &str) -> String {
    format!(
        "# Dataset description\n\n{}\n\n# Dataset Columns Description\n\n{}\n# Dataset sample\n\n{}",
        description.trim(),
        dtypes_markdown(sample),
        sample.to_markdown()
    )
}

fn dtypes_markdown(table: &Table) -> String {
    let mut out = String::from("| column | type |\n|---|---|\n");
    for (name, values) in table.columns() {
        let dtype = ColumnType::of(values);
        out.push_str(&format!("| {name} | {dtype} |\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    #[test]
    fn test_user_prompt_contains_sample_and_types() {
        let table = Table::from_columns([
            ("Item", vec![Value::from("Item_1")]),
            ("Quantity", vec![Value::Int(2)]),
        ])
        .unwrap();
        let prompt = user_prompt(&table, "  Retail sales  ");

        assert!(prompt.starts_with("# Dataset description\n\nRetail sales"));
        assert!(prompt.contains("| Quantity | integer |"));
        assert!(prompt.contains("| Item_1 | 2 |"));
    }

    #[test]
    fn test_system_prompt_names_every_rule_type() {
        let prompt = system_prompt();
        for tag in ["anomaly_flag", "imputation", "transformation", "format_string"] {
            assert!(prompt.contains(tag));
        }
        assert!(prompt.contains(MEDIAN_SENTINEL));
    }
}
