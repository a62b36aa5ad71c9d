use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    Empty,
}

impl Value {
    /// Interpret a raw cell coming from a textual export.
    ///
    /// `NaN` or `inf` aren't measurements, they're kept as text.
    pub fn parse(cell: &str) -> Self {
        let cell = cell.trim();
        if cell.is_empty() {
            Value::Empty
        } else if let Some(number) = cell.parse::<f64>().ok().filter(|n| n.is_finite()) {
            Value::Number(number)
        } else {
            Value::Text(cell.to_string())
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) if n.is_finite() => Some(*n),
            Value::Number(_) => None,
            Value::Text(_) | Value::Empty => None,
        }
    }
}

/// One sample of a table: column name to cell.
///
/// Columns are kept ordered so that anything iterating over a row is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, Value>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: Value) -> Self {
        self.0.insert(column.into(), value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// The numeric value of a column, `0` when the column is absent or not a number.
    ///
    /// Spreadsheets exported from different sites don't share the exact same
    /// schema, so a missing column is never an error.
    pub fn number_or_zero(&self, column: &str) -> f64 {
        self.get(column).and_then(Value::as_number).unwrap_or(0.0)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
