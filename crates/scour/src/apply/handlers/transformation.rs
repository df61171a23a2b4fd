//! Regex rewrite of every value in a column.

use crate::apply::log::{Journal, LogEntry};
use crate::apply::pattern::Substitution;
use crate::error::Result;
use crate::table::{Table, Value};

use super::Target;

/// Replace every match of the pattern in each value's text form.
///
/// The column comes back as text only; numeric and boolean types are not
/// preserved. A bad pattern or template is fatal for the whole pass.
pub(in crate::apply) fn apply(table: &mut Table, target: Target<'_>, journal: &mut Journal) -> Result<()> {
    let Some(pattern) = target.pattern(journal) else {
        return Ok(());
    };
    let Some(replacement) = target.replacement(journal) else {
        return Ok(());
    };
    let substitution = Substitution::new(target.rule_id(), pattern, replacement)?;

    let rewritten = target
        .values
        .iter()
        .map(|v| Value::Text(substitution.apply(&v.to_text())))
        .collect();
    table.insert_column(target.column, rewritten)?;

    journal.record(LogEntry::new(target.rule, target.column));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Rule, RuleType};

    fn run(values: Vec<Value>, rule: &Rule) -> Result<(Table, Journal)> {
        let mut table = Table::from_columns([("c", values.clone())]).unwrap();
        let mut journal = Journal::default();
        let target = Target {
            rule,
            column: "c",
            values,
        };
        apply(&mut table, target, &mut journal)?;
        Ok((table, journal))
    }

    #[test]
    fn test_rewrites_text_and_converts_types() {
        let rule = Rule::new("strip_suffix", RuleType::Transformation, ["c"])
            .with_pattern(r"_(\w+)$")
            .with_replacement(r"-\1");
        let (table, journal) = run(
            vec!["Item_1".into(), Value::Int(7), Value::Null],
            &rule,
        )
        .unwrap();

        assert_eq!(
            table.column("c").unwrap(),
            &[Value::from("Item-1"), Value::from("7"), Value::from("")]
        );
        assert_eq!(journal.log.len(), 1);
        assert!(journal.warnings.is_empty());
    }

    #[test]
    fn test_reapplying_is_noop_once_pattern_no_longer_matches() {
        let rule = Rule::new("collapse", RuleType::Transformation, ["c"])
            .with_pattern(r"\s{2,}")
            .with_replacement(" ");
        let (once, _) = run(vec!["a   b".into()], &rule).unwrap();
        let again = once.column("c").unwrap().to_vec();
        let (twice, _) = run(again, &rule).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_invalid_pattern_is_fatal() {
        let rule = Rule::new("bad", RuleType::Transformation, ["c"])
            .with_pattern("invalid[regex")
            .with_replacement("x");
        assert!(run(vec!["a".into()], &rule).is_err());
    }
}
