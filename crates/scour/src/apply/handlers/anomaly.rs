//! Derived boolean columns marking invalid rows.

use crate::apply::config::{EngineConfig, MissingOperandPolicy, TotalCheckConfig};
use crate::apply::log::{Journal, LogEntry};
use crate::apply::pattern;
use crate::error::Result;
use crate::table::{Table, Value};

use super::Target;

/// Name of the flag column a rule writes for a source column.
pub fn flag_column_name(column: &str, rule_id: &str) -> String {
    format!("{column}_flag_{rule_id}")
}

/// Write `<column>_flag_<rule_id>`; the source column is left untouched.
pub(in crate::apply) fn apply(
    table: &mut Table,
    target: Target<'_>,
    config: &EngineConfig,
    journal: &mut Journal,
) -> Result<()> {
    let flags = if target.rule_id() == config.total_check.rule_id {
        match total_mismatch(table, &target.values, &config.total_check) {
            Ok(flags) => flags,
            Err(operand) => {
                journal.warn(target.missing_operand(&operand));
                return Ok(());
            }
        }
    } else {
        let Some(pattern) = target.pattern(journal) else {
            return Ok(());
        };
        let regex = pattern::compile(target.rule_id(), pattern)?;
        // The pattern describes the valid shape unless flag_on_match is set.
        target
            .values
            .iter()
            .map(|v| pattern::matches_at_start(&regex, &v.to_text()) == target.rule.flag_on_match)
            .collect()
    };

    let flagged = flags.iter().filter(|&&f| f).count();
    table.insert_column(
        flag_column_name(target.column, target.rule_id()),
        flags.into_iter().map(Value::Bool).collect(),
    )?;

    journal.record(LogEntry::new(target.rule, target.column).with_flagged(flagged));
    Ok(())
}

/// `|round(price * quantity, 2) - total| > tolerance` per row.
///
/// Returns the name of a missing operand column as the error.
fn total_mismatch(
    table: &Table,
    totals: &[Value],
    check: &TotalCheckConfig,
) -> std::result::Result<Vec<bool>, String> {
    let prices = table
        .column(&check.price_column)
        .ok_or_else(|| check.price_column.clone())?;
    let quantities = table
        .column(&check.quantity_column)
        .ok_or_else(|| check.quantity_column.clone())?;

    let flags = prices
        .iter()
        .zip(quantities)
        .zip(totals)
        .map(|((price, quantity), total)| {
            match (price.as_f64(), quantity.as_f64(), total.as_f64()) {
                (Some(p), Some(q), Some(t)) => (round_cents(p * q) - t).abs() > check.tolerance,
                _ => check.missing_operands == MissingOperandPolicy::Flag,
            }
        })
        .collect();
    Ok(flags)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
