//! Lookup Functions
//! INDEX, MATCH, XLOOKUP over table columns

use super::criteria::lookup_column;
use crate::error::{CalcError, CalcResult};
use crate::types::{ColumnValue, Table, Value};
use std::cmp::Ordering;
use std::str::FromStr;
use tracing::debug;

/// How a lookup value is matched against a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Equal values only (code 0)
    #[default]
    Exact,
    /// Exact, else the largest value below (code -1)
    ExactOrNextSmaller,
    /// Exact, else the smallest value above (code 1)
    ExactOrNextLarger,
}

impl MatchMode {
    /// XLOOKUP match_mode codes
    pub fn from_code(code: i32) -> CalcResult<Self> {
        match code {
            0 => Ok(MatchMode::Exact),
            -1 => Ok(MatchMode::ExactOrNextSmaller),
            1 => Ok(MatchMode::ExactOrNextLarger),
            other => Err(CalcError::invalid(format!(
                "invalid match mode {} (use 0, -1 or 1)",
                other
            ))),
        }
    }
}

impl FromStr for MatchMode {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(MatchMode::Exact),
            "smaller" | "next-smaller" => Ok(MatchMode::ExactOrNextSmaller),
            "larger" | "next-larger" => Ok(MatchMode::ExactOrNextLarger),
            other => match other.parse::<i32>() {
                Ok(code) => MatchMode::from_code(code),
                Err(_) => Err(CalcError::invalid(format!("invalid match mode '{}'", s))),
            },
        }
    }
}

/// 0-based row of the match for `value`, or `None`.
/// Approximate modes only consider cells of the lookup value's type.
fn find_row(values: &ColumnValue, value: &Value, mode: MatchMode) -> Option<usize> {
    let exact = values.eq_mask(value).iter().position(|&hit| hit);
    if exact.is_some() || mode == MatchMode::Exact {
        return exact;
    }

    let wanted = match mode {
        MatchMode::ExactOrNextSmaller => Ordering::Less,
        _ => Ordering::Greater,
    };

    let mut best: Option<(usize, Value)> = None;
    for row in 0..values.len() {
        let cell = values.get(row);
        if !cell.is_present() || cell.compare(value) != Some(wanted) {
            continue;
        }
        // keep the candidate nearest to `value`
        let closer = match &best {
            None => true,
            Some((_, current)) => cell.compare(current) == Some(wanted.reverse()),
        };
        if closer {
            best = Some((row, cell));
        }
    }
    best.map(|(row, _)| row)
}

/// INDEX(column, row): cell at 1-based `row`
pub fn index(table: &Table, column: &str, row: usize) -> CalcResult<Value> {
    let column = lookup_column(table, column)?;
    if row < 1 || row > column.len() {
        return Err(CalcError::invalid(format!(
            "INDEX: row {} out of bounds (1-{})",
            row,
            column.len()
        )));
    }
    Ok(column.values.get(row - 1))
}

/// MATCH(value, column, mode): 1-based position of the match
pub fn match_row(table: &Table, column: &str, value: &Value, mode: MatchMode) -> CalcResult<usize> {
    let column = lookup_column(table, column)?;
    find_row(&column.values, value, mode)
        .map(|row| row + 1)
        .ok_or_else(|| {
            CalcError::NotFound(format!("MATCH: {} not found in '{}'", value, column.name))
        })
}

/// XLOOKUP(value, lookup_col, return_col, mode, if_not_found)
pub fn xlookup(
    table: &Table,
    value: &Value,
    lookup_col: &str,
    return_col: &str,
    mode: MatchMode,
    if_not_found: Option<Value>,
) -> CalcResult<Value> {
    let lookup = lookup_column(table, lookup_col)?;
    let returns = lookup_column(table, return_col)?;
    if lookup.len() != returns.len() {
        return Err(CalcError::invalid(format!(
            "XLOOKUP: lookup column ({}) and return column ({}) must have same length",
            lookup.len(),
            returns.len()
        )));
    }

    let row = find_row(&lookup.values, value, mode);
    debug!(lookup = lookup_col, returns = return_col, ?mode, ?row, "xlookup");

    match (row, if_not_found) {
        (Some(row), _) => Ok(returns.values.get(row)),
        (None, Some(fallback)) => Ok(fallback),
        (None, None) => Err(CalcError::NotFound(format!(
            "XLOOKUP: {} not found in '{}'",
            value, lookup_col
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rates() -> Table {
        Table::new("rates")
            .with_column("tier", ColumnValue::texts(["bronze", "silver", "gold"]))
            .with_column("threshold", ColumnValue::numbers([0.0, 1000.0, 5000.0]))
            .with_column("rate", ColumnValue::numbers([0.01, 0.02, 0.035]))
    }

    #[test]
    fn test_index_one_based() {
        assert_eq!(index(&rates(), "tier", 1).unwrap(), Value::from("bronze"));
        assert_eq!(index(&rates(), "rate", 3).unwrap(), Value::from(0.035));
        assert!(index(&rates(), "tier", 0).unwrap_err().is_invalid_argument());
        assert!(index(&rates(), "tier", 4).is_err());
    }

    #[test]
    fn test_match_exact() {
        let row = match_row(&rates(), "tier", &Value::from("gold"), MatchMode::Exact).unwrap();
        assert_eq!(row, 3);
        let err = match_row(&rates(), "tier", &Value::from("GOLD"), MatchMode::Exact).unwrap_err();
        assert!(matches!(err, CalcError::NotFound(_)));
    }

    #[test]
    fn test_match_next_smaller_and_larger() {
        let t = rates();
        let value = Value::from(2500);
        assert_eq!(match_row(&t, "threshold", &value, MatchMode::ExactOrNextSmaller).unwrap(), 2);
        assert_eq!(match_row(&t, "threshold", &value, MatchMode::ExactOrNextLarger).unwrap(), 3);
        assert!(match_row(&t, "threshold", &Value::from(9000), MatchMode::ExactOrNextLarger).is_err());
    }

    #[test]
    fn test_xlookup_with_fallback() {
        let t = rates();
        let found = xlookup(&t, &Value::from("silver"), "tier", "rate", MatchMode::Exact, None).unwrap();
        assert_eq!(found, Value::from(0.02));

        let fallback = xlookup(
            &t,
            &Value::from("platinum"),
            "tier",
            "rate",
            MatchMode::Exact,
            Some(Value::from(0)),
        )
        .unwrap();
        assert_eq!(fallback, Value::from(0));

        let err = xlookup(&t, &Value::from("platinum"), "tier", "rate", MatchMode::Exact, None)
            .unwrap_err();
        assert!(matches!(err, CalcError::NotFound(_)));
    }

    #[test]
    fn test_xlookup_approximate_tier() {
        let rate = xlookup(
            &rates(),
            &Value::from(1200),
            "threshold",
            "tier",
            MatchMode::ExactOrNextSmaller,
            None,
        )
        .unwrap();
        assert_eq!(rate, Value::from("silver"));
    }

    #[test]
    fn test_approximate_dates() {
        let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
        let t = Table::new("d")
            .with_column("when", ColumnValue::dates([d(1, 1), d(4, 1), d(7, 1)]))
            .with_column("label", ColumnValue::texts(["Q1", "Q2", "Q3"]));
        let label = xlookup(
            &t,
            &Value::from(d(5, 15)),
            "when",
            "label",
            MatchMode::ExactOrNextSmaller,
            None,
        )
        .unwrap();
        assert_eq!(label, Value::from("Q2"));
    }

    #[test]
    fn test_match_mode_parsing() {
        assert_eq!(MatchMode::from_code(-1).unwrap(), MatchMode::ExactOrNextSmaller);
        assert_eq!("larger".parse::<MatchMode>().unwrap(), MatchMode::ExactOrNextLarger);
        assert_eq!("0".parse::<MatchMode>().unwrap(), MatchMode::Exact);
        assert!(MatchMode::from_code(2).is_err());
        assert!("near".parse::<MatchMode>().is_err());
    }
}
