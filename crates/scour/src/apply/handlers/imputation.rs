//! Filling values the rule's pattern detects as missing.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::apply::config::{EngineConfig, MedianFallbackScope};
use crate::apply::log::{Journal, LogEntry};
use crate::apply::pattern;
use crate::error::Result;
use crate::table::{median, Table, Value};

use super::Target;

/// Replacement sentinel selecting group-then-global median imputation.
pub const MEDIAN_SENTINEL: &str = "<MEDIAN_FROM_GROUP_OR_GLOBAL>";

static PRODUCT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\[([^\]]+)\]\s*\*\s*\[([^\]]+)\]\s*$").expect("product sentinel regex")
});

/// How an imputation rule computes its fill values.
#[derive(Debug, Clone, PartialEq)]
pub enum ImputeStrategy<'a> {
    /// `[A] * [B]`: product of two other columns in the same row.
    Product { left: &'a str, right: &'a str },
    GroupMedian,
    Literal(&'a str),
}

impl<'a> ImputeStrategy<'a> {
    pub fn parse(replacement: &'a str) -> Self {
        if replacement.trim() == MEDIAN_SENTINEL {
            return ImputeStrategy::GroupMedian;
        }
        match PRODUCT.captures(replacement) {
            Some(caps) => {
                let (_, [left, right]) = caps.extract();
                ImputeStrategy::Product {
                    left: left.trim(),
                    right: right.trim(),
                }
            }
            None => ImputeStrategy::Literal(replacement),
        }
    }
}

pub(in crate::apply) fn apply(
    table: &mut Table,
    target: Target<'_>,
    config: &EngineConfig,
    journal: &mut Journal,
) -> Result<()> {
    let Some(pattern) = target.pattern(journal) else {
        return Ok(());
    };
    let Some(replacement) = target.replacement(journal) else {
        return Ok(());
    };
    let regex = pattern::compile(target.rule_id(), pattern)?;
    let mask: Vec<bool> = target
        .values
        .iter()
        .map(|v| pattern::matches_at_start(&regex, &v.to_text()))
        .collect();
    let imputed = mask.iter().filter(|&&m| m).count();

    let filled = match ImputeStrategy::parse(replacement) {
        ImputeStrategy::Product { left, right } => {
            let Some(lhs) = table.column(left) else {
                journal.warn(target.missing_operand(left));
                return Ok(());
            };
            let Some(rhs) = table.column(right) else {
                journal.warn(target.missing_operand(right));
                return Ok(());
            };
            fill_product(&target.values, &mask, lhs, rhs)
        }
        ImputeStrategy::GroupMedian => fill_median(
            &target.values,
            &mask,
            table.column(&config.group_column),
            config.median_fallback,
        ),
        ImputeStrategy::Literal(text) => target
            .values
            .iter()
            .zip(&mask)
            .map(|(v, &missing)| if missing { Value::Text(text.to_string()) } else { v.clone() })
            .collect(),
    };
    table.insert_column(target.column, filled)?;

    journal.record(LogEntry::new(target.rule, target.column).with_imputed(imputed));
    Ok(())
}

fn fill_product(values: &[Value], mask: &[bool], lhs: &[Value], rhs: &[Value]) -> Vec<Value> {
    values
        .iter()
        .zip(mask)
        .zip(lhs.iter().zip(rhs))
        .map(|((value, &missing), (a, b))| match (missing, a.as_f64(), b.as_f64()) {
            (true, Some(a), Some(b)) => Value::Float(a * b),
            _ => value.clone(),
        })
        .collect()
}

/// Group medians for masked rows, then the global median for what is left.
///
/// Group medians only see numeric values outside the mask, and rows whose
/// group key is null take no group median. The global median is taken after
/// the group fill, so group-filled values count toward it.
fn fill_median(
    values: &[Value],
    mask: &[bool],
    groups: Option<&[Value]>,
    scope: MedianFallbackScope,
) -> Vec<Value> {
    let present = |i: usize| if mask[i] { None } else { values[i].as_f64() };

    let group_medians: HashMap<String, f64> = match groups {
        Some(groups) => {
            let mut buckets: HashMap<String, Vec<f64>> = HashMap::new();
            for (i, key) in groups.iter().enumerate() {
                if key.is_null() {
                    continue;
                }
                if let Some(x) = present(i) {
                    buckets.entry(key.to_text()).or_default().push(x);
                }
            }
            buckets
                .into_iter()
                .filter_map(|(key, xs)| median(&xs).map(|m| (key, m)))
                .collect()
        }
        None => HashMap::new(),
    };

    let group_filled: Vec<Option<f64>> = (0..values.len())
        .map(|i| {
            let key = groups.filter(|_| mask[i]).map(|g| &g[i])?;
            if key.is_null() {
                return None;
            }
            group_medians.get(&key.to_text()).copied()
        })
        .collect();

    let global = median(
        &(0..values.len())
            .filter_map(|i| group_filled[i].or_else(|| present(i)))
            .collect::<Vec<_>>(),
    );

    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            if let Some(m) = group_filled[i] {
                return Value::Float(m);
            }
            let eligible = match scope {
                MedianFallbackScope::Rule => mask[i],
                MedianFallbackScope::Column => mask[i] || value.is_null(),
            };
            match global.filter(|_| eligible) {
                Some(m) => Value::Float(m),
                None => value.clone(),
            }
        })
        .collect()
}
