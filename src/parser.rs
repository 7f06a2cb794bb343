//! Inline table and argument parsing
//!
//! Tables arrive as YAML text, a mapping of column name to a list of cells:
//!
//! ```yaml
//! region: [EMEA, US, EMEA]
//! amount: [100, 250, null]
//! ```
//!
//! Each column's type comes from its first non-null cell. Strings shaped like
//! `YYYY-MM-DD` become dates. `null` marks an absent cell.

use crate::error::{CalcError, CalcResult};
use crate::types::{Column, ColumnValue, Table, Value};
use chrono::NaiveDate;
use serde_yaml::Value as YamlValue;

/// Parse a table from inline YAML text
pub fn parse_table(name: &str, yaml_text: &str) -> CalcResult<Table> {
    let yaml: YamlValue = serde_yaml::from_str(yaml_text)?;
    let map = match yaml {
        YamlValue::Mapping(map) => map,
        other => {
            return Err(CalcError::Parse(format!(
                "Table '{}' must be a mapping of column name to list, found {}",
                name,
                type_name(&other)
            )))
        }
    };

    let mut table = Table::new(name);
    for (key, value) in &map {
        let col_name = key.as_str().ok_or_else(|| {
            CalcError::Parse(format!(
                "Table '{}': column names must be strings, found {}",
                name,
                type_name(key)
            ))
        })?;
        let seq = value.as_sequence().ok_or_else(|| {
            CalcError::Parse(format!(
                "Table '{}': column '{}' must be a list, found {}",
                name,
                col_name,
                type_name(value)
            ))
        })?;
        table.add_column(Column::new(col_name, parse_column(col_name, seq)?));
    }

    table.validate_lengths().map_err(|e| CalcError::Parse(format!("Table '{}': {}", name, e)))?;
    Ok(table)
}

/// Parse one column's cells into a homogeneous array
fn parse_column(col_name: &str, seq: &[YamlValue]) -> CalcResult<ColumnValue> {
    if seq.is_empty() {
        return Err(CalcError::Parse(format!("Column '{}' cannot be empty", col_name)));
    }

    let first = seq.iter().find(|v| !v.is_null()).ok_or_else(|| {
        CalcError::Parse(format!(
            "Column '{}' has only null cells, so its type is unknown",
            col_name
        ))
    })?;

    let mismatch = |row: usize, expected: &str, val: &YamlValue| {
        CalcError::Parse(format!(
            "Column '{}' row {}: Expected {}, found {}",
            col_name,
            row,
            expected,
            type_name(val)
        ))
    };

    match detect_column_type(first)? {
        "Number" => {
            let mut numbers = Vec::with_capacity(seq.len());
            for (i, val) in seq.iter().enumerate() {
                numbers.push(match val {
                    YamlValue::Null => None,
                    YamlValue::Number(n) => Some(n.as_f64().ok_or_else(|| {
                        CalcError::Parse(format!(
                            "Column '{}' row {}: Invalid number format",
                            col_name, i
                        ))
                    })?),
                    other => return Err(mismatch(i, "Number", other)),
                });
            }
            Ok(ColumnValue::Number(numbers))
        }
        "Date" => {
            let mut dates = Vec::with_capacity(seq.len());
            for (i, val) in seq.iter().enumerate() {
                dates.push(match val {
                    YamlValue::Null => None,
                    YamlValue::String(s) if is_valid_date_format(s) => Some(
                        parse_date(s)
                            .map_err(|e| CalcError::Parse(format!("Column '{}' row {}: {}", col_name, i, e)))?,
                    ),
                    other => return Err(mismatch(i, "Date", other)),
                });
            }
            Ok(ColumnValue::Date(dates))
        }
        "Text" => {
            let mut texts = Vec::with_capacity(seq.len());
            for (i, val) in seq.iter().enumerate() {
                texts.push(match val {
                    YamlValue::Null => None,
                    YamlValue::String(s) if !is_valid_date_format(s) => Some(s.clone()),
                    other => return Err(mismatch(i, "Text", other)),
                });
            }
            Ok(ColumnValue::Text(texts))
        }
        _ => {
            let mut booleans = Vec::with_capacity(seq.len());
            for (i, val) in seq.iter().enumerate() {
                booleans.push(match val {
                    YamlValue::Null => None,
                    YamlValue::Bool(b) => Some(*b),
                    other => return Err(mismatch(i, "Boolean", other)),
                });
            }
            Ok(ColumnValue::Boolean(booleans))
        }
    }
}

/// Detect the column type from its first non-null cell
fn detect_column_type(val: &YamlValue) -> CalcResult<&'static str> {
    match val {
        YamlValue::Number(_) => Ok("Number"),
        YamlValue::String(s) => {
            if is_valid_date_format(s) {
                Ok("Date")
            } else {
                Ok("Text")
            }
        }
        YamlValue::Bool(_) => Ok("Boolean"),
        _ => Err(CalcError::Parse(format!(
            "Unsupported cell type: {}",
            type_name(val)
        ))),
    }
}

/// Check if a string has the `YYYY-MM-DD` shape
fn is_valid_date_format(s: &str) -> bool {
    let parts: Vec<&str> = s.split('-').collect();
    s.len() == 10
        && parts.len() == 3
        && [4, 2, 2]
            .iter()
            .zip(&parts)
            .all(|(len, part)| part.len() == *len && part.chars().all(|c| c.is_ascii_digit()))
}

/// Get the type name of a YAML value for error messages
fn type_name(val: &YamlValue) -> &'static str {
    match val {
        YamlValue::Null => "Null",
        YamlValue::Bool(_) => "Boolean",
        YamlValue::Number(_) => "Number",
        YamlValue::String(_) => "String",
        YamlValue::Sequence(_) => "Array",
        YamlValue::Mapping(_) => "Mapping",
        YamlValue::Tagged(_) => "Tagged",
    }
}

/// Parse an ISO `YYYY-MM-DD` date
pub fn parse_date(text: &str) -> CalcResult<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| CalcError::Parse(format!("Invalid date '{}': {} (expected YYYY-MM-DD)", text, e)))
}

/// Parse a comma-separated list of ISO dates. Blank entries are skipped.
pub fn parse_date_list(text: &str) -> CalcResult<Vec<NaiveDate>> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_date)
        .collect()
}

/// Convert one command-line token into a cell value.
///
/// Numbers, `true`/`false` and ISO dates are recognized; everything else is
/// text. Wrapping a token in quotes forces text (`'"2024"'`).
pub fn parse_scalar(text: &str) -> CalcResult<Value> {
    let trimmed = text.trim();

    for quote in ['"', '\''] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return Ok(Value::Text(trimmed[1..trimmed.len() - 1].to_string()));
        }
    }

    if let Ok(n) = trimmed.parse::<f64>() {
        if n.is_finite() {
            return Ok(Value::Number(n));
        }
    }

    match trimmed.to_ascii_uppercase().as_str() {
        "TRUE" => return Ok(Value::Boolean(true)),
        "FALSE" => return Ok(Value::Boolean(false)),
        _ => {}
    }

    if is_valid_date_format(trimmed) {
        return parse_date(trimmed).map(Value::Date);
    }

    Ok(Value::Text(text.to_string()))
}
