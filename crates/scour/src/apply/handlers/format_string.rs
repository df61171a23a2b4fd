//! Numeric formatting with percent templates, or a plain text rewrite.
//!
//! Failures here are never fatal: the column is left as it was and a
//! `FormatApplication` warning is recorded next to the usual log entry.

use crate::apply::log::{Journal, LogEntry, RuleWarning};
use crate::apply::pattern::Substitution;
use crate::apply::printf::{has_directive, PercentFormat};
use crate::error::Result;
use crate::table::{Table, Value};

use super::Target;

pub(in crate::apply) fn apply(table: &mut Table, target: Target<'_>, journal: &mut Journal) -> Result<()> {
    let Some(replacement) = target.replacement(journal) else {
        return Ok(());
    };

    let formatted = if has_directive(replacement) {
        format_numbers(&target.values, replacement)
    } else if let Some(pattern) = target.rule.pattern.as_deref() {
        Substitution::new(target.rule_id(), pattern, replacement)
            .map(|sub| {
                target
                    .values
                    .iter()
                    .map(|v| Value::Text(sub.apply(&v.to_text())))
                    .collect::<Vec<_>>()
            })
            .map_err(|e| e.to_string())
    } else {
        format_all(&target.values, replacement)
    };

    match formatted {
        Ok(values) => table.insert_column(target.column, values)?,
        Err(message) => journal.warn(RuleWarning::FormatApplication {
            rule_id: target.rule_id().to_string(),
            column: target.column.to_string(),
            message,
        }),
    }

    journal.record(LogEntry::new(target.rule, target.column));
    Ok(())
}

/// Format every present value and read the result back as a number.
fn format_numbers(values: &[Value], template: &str) -> std::result::Result<Vec<Value>, String> {
    let format = PercentFormat::parse(template).map_err(|e| e.to_string())?;
    values
        .iter()
        .enumerate()
        .map(|(row, value)| {
            if value.is_null() {
                return Ok(Value::Null);
            }
            let number = numeric(row, value)?;
            let text = format.format(number);
            text.trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| format!("formatted value '{text}' in row {row} is not a number"))
        })
        .collect()
}

/// Format every value, keeping the formatted text.
fn format_all(values: &[Value], template: &str) -> std::result::Result<Vec<Value>, String> {
    let format = PercentFormat::parse(template).map_err(|e| e.to_string())?;
    values
        .iter()
        .enumerate()
        .map(|(row, value)| Ok(Value::Text(format.format(numeric(row, value)?))))
        .collect()
}

fn numeric(row: usize, value: &Value) -> std::result::Result<f64, String> {
    value
        .as_f64()
        .ok_or_else(|| format!("value '{value}' in row {row} is not numeric"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Rule, RuleType};

    fn run(values: Vec<Value>, rule: &Rule) -> (Table, Journal) {
        let mut table = Table::from_columns([("c", values.clone())]).unwrap();
        let mut journal = Journal::default();
        let target = Target {
            rule,
            column: "c",
            values,
        };
        apply(&mut table, target, &mut journal).unwrap();
        (table, journal)
    }

    #[test]
    fn test_percent_template_rounds_to_numbers() {
        let rule = Rule::new("round_price", RuleType::FormatString, ["c"])
            .with_pattern(r"^\d+(\.\d+)?$")
            .with_replacement("%.2f");
        let (table, journal) = run(
            vec![Value::Float(15.753), Value::from("4"), Value::Null],
            &rule,
        );

        assert_eq!(
            table.column("c").unwrap(),
            &[Value::Float(15.75), Value::Float(4.0), Value::Null]
        );
        assert_eq!(journal.log.len(), 1);
        assert!(journal.warnings.is_empty());
    }

    #[test]
    fn test_non_numeric_value_leaves_column_unchanged() {
        let rule = Rule::new("round_price", RuleType::FormatString, ["c"]).with_replacement("%.2f");
        let original = vec![Value::Float(1.234), Value::from("abc")];
        let (table, journal) = run(original.clone(), &rule);

        assert_eq!(table.column("c").unwrap(), original.as_slice());
        assert_eq!(journal.log.len(), 1);
        assert!(matches!(
            journal.warnings[0],
            RuleWarning::FormatApplication { .. }
        ));
    }

    #[test]
    fn test_pattern_without_percent_rewrites_text() {
        let rule = Rule::new("dash_dates", RuleType::FormatString, ["c"])
            .with_pattern(r"(\d{4})/(\d{2})/(\d{2})")
            .with_replacement(r"\1-\2-\3");
        let (table, _) = run(vec![Value::from("2023/01/05")], &rule);
        assert_eq!(table.get(0, "c"), Some(&Value::from("2023-01-05")));
    }

    #[test]
    fn test_bad_pattern_is_not_fatal() {
        let rule = Rule::new("broken", RuleType::FormatString, ["c"])
            .with_pattern("invalid[regex")
            .with_replacement("x");
        let (table, journal) = run(vec![Value::from("a")], &rule);
        assert_eq!(table.get(0, "c"), Some(&Value::from("a")));
        assert_eq!(journal.warnings.len(), 1);
        assert_eq!(journal.log.len(), 1);
    }

    #[test]
    fn test_template_without_directive_fails() {
        let rule = Rule::new("plain", RuleType::FormatString, ["c"]).with_replacement("USD");
        let (table, journal) = run(vec![Value::Float(2.0)], &rule);
        assert_eq!(table.get(0, "c"), Some(&Value::Float(2.0)));
        assert_eq!(journal.warnings.len(), 1);
    }
}
