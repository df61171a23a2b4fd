//! Descriptive statistics for tables and columns.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::frame::Table;
use super::value::{ColumnType, Value};

/// Shape and per-column overview of a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableInfo {
    pub rows: usize,
    pub columns: usize,
    pub column_names: Vec<String>,
    pub dtypes: IndexMap<String, ColumnType>,
    pub null_counts: IndexMap<String, usize>,
    /// Rows identical to an earlier row.
    pub duplicate_rows: usize,
}

/// Statistics computed for a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnStatistics {
    pub dtype: ColumnType,
    /// Total number of values (including nulls).
    pub count: usize,
    pub null_count: usize,
    pub null_percentage: f64,
    /// Number of distinct non-null values.
    pub unique_count: usize,
    pub unique_percentage: f64,
    /// Only present for numeric columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericStatistics>,
}

/// Statistics for numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStatistics {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1); zero for a single value.
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl NumericStatistics {
    /// Compute statistics over the given values; `None` when empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std = if values.len() > 1 {
            (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
        } else {
            0.0
        };
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let median = median(values)?;
        Some(Self {
            mean,
            median,
            std,
            min,
            max,
        })
    }
}

/// Median of the values; the mean of the two middle values for even counts.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Numeric values of a column, skipping anything that is not a number.
pub fn numeric_values(values: &[Value]) -> Vec<f64> {
    values.iter().filter_map(Value::as_f64).collect()
}

impl Table {
    /// Overview of shape, types, nulls and duplicate rows.
    pub fn info(&self) -> TableInfo {
        let mut dtypes = IndexMap::new();
        let mut null_counts = IndexMap::new();
        for (name, values) in self.columns() {
            dtypes.insert(name.to_string(), ColumnType::of(values));
            null_counts.insert(name.to_string(), values.iter().filter(|v| v.is_null()).count());
        }

        let mut seen = HashSet::new();
        let duplicate_rows = (0..self.row_count())
            .filter(|&i| {
                let key: Vec<String> = self.columns().map(|(_, c)| row_key(&c[i])).collect();
                !seen.insert(key)
            })
            .count();

        TableInfo {
            rows: self.row_count(),
            columns: self.column_count(),
            column_names: self.column_names().map(str::to_string).collect(),
            dtypes,
            null_counts,
            duplicate_rows,
        }
    }

    /// Statistics for one column; `None` if the column does not exist.
    pub fn column_stats(&self, name: &str) -> Option<ColumnStatistics> {
        let values = self.column(name)?;
        let count = values.len();
        let dtype = ColumnType::of(values);
        let null_count = values.iter().filter(|v| v.is_null()).count();
        let unique_count = values
            .iter()
            .filter(|v| !v.is_null())
            .map(row_key)
            .collect::<HashSet<_>>()
            .len();
        let percentage = |part: usize| {
            if count == 0 {
                0.0
            } else {
                part as f64 / count as f64 * 100.0
            }
        };
        let numeric = if dtype.is_numeric() {
            NumericStatistics::from_values(&numeric_values(values))
        } else {
            None
        };

        Some(ColumnStatistics {
            dtype,
            count,
            null_count,
            null_percentage: percentage(null_count),
            unique_count,
            unique_percentage: percentage(unique_count),
            numeric,
        })
    }
}

/// Hashable identity of a cell; keeps `Int(1)` and `Text("1")` apart.
fn row_key(value: &Value) -> String {
    let tag = match value {
        Value::Null => 'n',
        Value::Bool(_) => 'b',
        Value::Int(_) => 'i',
        Value::Float(_) => 'f',
        Value::Text(_) => 't',
    };
    format!("{tag}:{}", value.to_text())
}

/// Column names used by [`consistency_issues`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsistencyColumns {
    pub price: String,
    pub quantity: String,
    pub total: String,
}

impl Default for ConsistencyColumns {
    fn default() -> Self {
        Self {
            price: "Price Per Unit".to_string(),
            quantity: "Quantity".to_string(),
            total: "Total Spent".to_string(),
        }
    }
}

/// A data-quality issue found during exploratory analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyIssue {
    pub description: String,
    pub rows: usize,
}

/// Cheap retail sanity checks: totals that do not equal price times
/// quantity, zero prices and zero quantities.
pub fn consistency_issues(table: &Table, names: &ConsistencyColumns) -> Vec<ConsistencyIssue> {
    let mut issues = Vec::new();
    let price = table.column(&names.price);
    let quantity = table.column(&names.quantity);
    let total = table.column(&names.total);

    if let (Some(price), Some(quantity), Some(total)) = (price, quantity, total) {
        let mismatches = price
            .iter()
            .zip(quantity)
            .zip(total)
            .filter_map(|((p, q), t)| Some((p.as_f64()?, q.as_f64()?, t.as_f64()?)))
            .filter(|(p, q, t)| (p * q - t).abs() > 0.01)
            .count();
        if mismatches > 0 {
            issues.push(ConsistencyIssue {
                description: "Price calculation mismatch".to_string(),
                rows: mismatches,
            });
        }
    }

    for (column, label) in [(price, "Zero prices"), (quantity, "Zero quantities")] {
        if let Some(values) = column {
            let zeros = values.iter().filter(|v| v.as_f64() == Some(0.0)).count();
            if zeros > 0 {
                issues.push(ConsistencyIssue {
                    description: label.to_string(),
                    rows: zeros,
                });
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retail() -> Table {
        Table::from_columns([
            ("Price Per Unit", vec![Value::Float(10.5), Value::Float(0.0), Value::Float(4.0)]),
            ("Quantity", vec![Value::Int(2), Value::Int(1), Value::Null]),
            ("Total Spent", vec![Value::Float(21.0), Value::Float(5.0), Value::Float(8.0)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_info_counts_nulls_and_duplicates() {
        let table = Table::from_columns([
            ("a", vec![Value::Int(1), Value::Int(1), Value::Null]),
            ("b", vec![Value::from("x"), Value::from("x"), Value::from("y")]),
        ])
        .unwrap();
        let info = table.info();
        assert_eq!(info.rows, 3);
        assert_eq!(info.null_counts["a"], 1);
        assert_eq!(info.duplicate_rows, 1);
        assert_eq!(info.dtypes["b"], ColumnType::String);
    }

    #[test]
    fn test_column_stats_numeric() {
        let stats = retail().column_stats("Quantity").unwrap();
        assert_eq!(stats.null_count, 1);
        assert_eq!(stats.unique_count, 2);
        let numeric = stats.numeric.unwrap();
        assert_eq!(numeric.mean, 1.5);
        assert_eq!(numeric.median, 1.5);
        assert_eq!(numeric.min, 1.0);
        assert_eq!(numeric.max, 2.0);
    }

    #[test]
    fn test_consistency_issues() {
        let issues = consistency_issues(&retail(), &ConsistencyColumns::default());
        assert_eq!(
            issues,
            vec![
                ConsistencyIssue {
                    description: "Price calculation mismatch".to_string(),
                    rows: 1,
                },
                ConsistencyIssue {
                    description: "Zero prices".to_string(),
                    rows: 1,
                },
            ]
        );
    }
}
