//! Cell values and their canonical text form.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single cell in a [`Table`](super::Table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Canonical text form shared by every rule handler and the CSV writer.
    ///
    /// `Null` renders as the empty string, booleans as `True`/`False`, floats
    /// always keep a fractional part or exponent (`21.0`, `15.753`).
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Text(s) => s.clone(),
        }
    }

    /// Numeric view of the value.
    ///
    /// Text is parsed leniently (surrounding whitespace allowed). NaN is
    /// treated as absent so that it never leaks into arithmetic.
    pub fn as_f64(&self) -> Option<f64> {
        let number = match self {
            Value::Null => return None,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Int(i) => *i as f64,
            Value::Float(f) => *f,
            Value::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        (!number.is_nan()).then_some(number)
    }

    /// Boolean view, used when counting flag columns.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Render a float the way analysts expect to see it in a CSV cell.
fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    // Debug output is the shortest round-trip form and keeps ".0" on integers.
    format!("{f:?}")
}

/// Data type of a column, derived from its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Whole numbers.
    Integer,
    /// Floating-point numbers (possibly mixed with integers).
    Float,
    /// Boolean values.
    Boolean,
    /// Text, or a mix of types.
    String,
    /// Only missing values.
    Empty,
}

impl ColumnType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    /// Infer the type of a column from its values.
    pub fn of(values: &[Value]) -> Self {
        let mut current = ColumnType::Empty;
        for value in values {
            let kind = match value {
                Value::Null => continue,
                Value::Bool(_) => ColumnType::Boolean,
                Value::Int(_) => ColumnType::Integer,
                Value::Float(_) => ColumnType::Float,
                Value::Text(_) => return ColumnType::String,
            };
            current = match (current, kind) {
                (ColumnType::Empty, k) => k,
                (a, b) if a == b => a,
                (ColumnType::Integer, ColumnType::Float) | (ColumnType::Float, ColumnType::Integer) => {
                    ColumnType::Float
                }
                _ => return ColumnType::String,
            };
        }
        current
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::String => "string",
            ColumnType::Empty => "empty",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_text() {
        assert_eq!(Value::Null.to_text(), "");
        assert_eq!(Value::Bool(true).to_text(), "True");
        assert_eq!(Value::Bool(false).to_text(), "False");
        assert_eq!(Value::Int(3).to_text(), "3");
        assert_eq!(Value::Float(21.0).to_text(), "21.0");
        assert_eq!(Value::Float(15.753).to_text(), "15.753");
        assert_eq!(Value::from("food").to_text(), "food");
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(Value::Int(2).as_f64(), Some(2.0));
        assert_eq!(Value::from(" 3.5 ").as_f64(), Some(3.5));
        assert_eq!(Value::from("abc").as_f64(), None);
        assert_eq!(Value::from("nan").as_f64(), None);
        assert_eq!(Value::Null.as_f64(), None);
        assert_eq!(Value::Bool(true).as_f64(), Some(1.0));
    }

    #[test]
    fn test_column_type_inference() {
        assert_eq!(ColumnType::of(&[Value::Int(1), Value::Null]), ColumnType::Integer);
        assert_eq!(ColumnType::of(&[Value::Int(1), Value::Float(2.5)]), ColumnType::Float);
        assert_eq!(ColumnType::of(&[Value::Int(1), Value::Bool(true)]), ColumnType::String);
        assert_eq!(ColumnType::of(&[Value::Null]), ColumnType::Empty);
        assert_eq!(ColumnType::of(&[Value::from("x"), Value::Int(1)]), ColumnType::String);
    }
}
