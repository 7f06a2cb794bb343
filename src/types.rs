use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;

//==============================================================================
// Scalar values
//==============================================================================

/// A single cell or argument value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    Boolean(bool),
    Date(NaiveDate),
    /// Absent cell
    Empty,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Text(_) => "Text",
            Value::Boolean(_) => "Boolean",
            Value::Date(_) => "Date",
            Value::Empty => "Empty",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Absent cells and NaN numbers are treated as missing, pandas style
    pub fn is_present(&self) -> bool {
        match self {
            Value::Empty => false,
            Value::Number(n) => !n.is_nan(),
            _ => true,
        }
    }

    /// Ordering between two values of the same type. Mixed types are unordered.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Text(s) => write!(f, "{}", s),
            Value::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Empty => Ok(()),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
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

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

//==============================================================================
// Column arrays
//==============================================================================

/// Column value types (homogeneous arrays, `None` marks an absent cell)
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Number(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    Date(Vec<Option<NaiveDate>>),
    Boolean(Vec<Option<bool>>),
}

impl ColumnValue {
    /// Dense numeric column
    pub fn numbers(values: impl IntoIterator<Item = f64>) -> Self {
        ColumnValue::Number(values.into_iter().map(Some).collect())
    }

    /// Dense text column
    pub fn texts<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        ColumnValue::Text(values.into_iter().map(|s| Some(s.into())).collect())
    }

    /// Dense date column
    pub fn dates(values: impl IntoIterator<Item = NaiveDate>) -> Self {
        ColumnValue::Date(values.into_iter().map(Some).collect())
    }

    /// Dense boolean column
    pub fn booleans(values: impl IntoIterator<Item = bool>) -> Self {
        ColumnValue::Boolean(values.into_iter().map(Some).collect())
    }

    /// Get the length of the array
    pub fn len(&self) -> usize {
        match self {
            ColumnValue::Number(v) => v.len(),
            ColumnValue::Text(v) => v.len(),
            ColumnValue::Date(v) => v.len(),
            ColumnValue::Boolean(v) => v.len(),
        }
    }

    /// Check if array is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnValue::Number(_) => "Number",
            ColumnValue::Text(_) => "Text",
            ColumnValue::Date(_) => "Date",
            ColumnValue::Boolean(_) => "Boolean",
        }
    }

    /// Cell at `row`, `Value::Empty` for absent cells or rows past the end
    pub fn get(&self, row: usize) -> Value {
        let cell = match self {
            ColumnValue::Number(v) => v.get(row).copied().flatten().map(Value::Number),
            ColumnValue::Text(v) => v.get(row).cloned().flatten().map(Value::Text),
            ColumnValue::Date(v) => v.get(row).copied().flatten().map(Value::Date),
            ColumnValue::Boolean(v) => v.get(row).copied().flatten().map(Value::Boolean),
        };
        cell.unwrap_or(Value::Empty)
    }

    pub fn is_present(&self, row: usize) -> bool {
        match self {
            ColumnValue::Number(v) => matches!(v.get(row), Some(Some(n)) if !n.is_nan()),
            ColumnValue::Text(v) => matches!(v.get(row), Some(Some(_))),
            ColumnValue::Date(v) => matches!(v.get(row), Some(Some(_))),
            ColumnValue::Boolean(v) => matches!(v.get(row), Some(Some(_))),
        }
    }

    /// Row-wise equality against `expected`. No coercion between types:
    /// a text "1" never equals the number 1, and absent cells never match.
    pub fn eq_mask(&self, expected: &Value) -> Vec<bool> {
        match (self, expected) {
            (ColumnValue::Number(v), Value::Number(x)) => {
                v.iter().map(|cell| *cell == Some(*x)).collect()
            }
            (ColumnValue::Text(v), Value::Text(x)) => {
                v.iter().map(|cell| cell.as_deref() == Some(x.as_str())).collect()
            }
            (ColumnValue::Date(v), Value::Date(x)) => {
                v.iter().map(|cell| *cell == Some(*x)).collect()
            }
            (ColumnValue::Boolean(v), Value::Boolean(x)) => {
                v.iter().map(|cell| *cell == Some(*x)).collect()
            }
            _ => vec![false; self.len()],
        }
    }

    /// Numeric view of the column, if it is a Number column
    pub fn as_numbers(&self) -> Option<&[Option<f64>]> {
        match self {
            ColumnValue::Number(v) => Some(v),
            _ => None,
        }
    }
}

/// A named column in a table
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: ColumnValue,
}

impl Column {
    pub fn new(name: impl Into<String>, values: ColumnValue) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

//==============================================================================
// Table
//==============================================================================

/// An ordered collection of named columns of equal length
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Add a column, replacing any existing column with the same name in place
    pub fn add_column(&mut self, column: Column) {
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
    }

    /// Builder-style `add_column`
    pub fn with_column(mut self, name: impl Into<String>, values: ColumnValue) -> Self {
        self.add_column(Column::new(name, values));
        self
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Get the number of rows (length of first column, all should be same)
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |col| col.len())
    }

    /// Validate all columns have the same length
    pub fn validate_lengths(&self) -> Result<(), String> {
        let row_count = self.row_count();
        for column in &self.columns {
            if column.len() != row_count {
                return Err(format!(
                    "Column '{}' has {} rows, expected {} rows",
                    column.name,
                    column.len(),
                    row_count
                ));
            }
        }
        Ok(())
    }
}
