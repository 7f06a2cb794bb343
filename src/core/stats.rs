//! Column statistics: COVARIANCE.S, VAR.S, VAR.P, RANK.AVG
//!
//! Absent cells are skipped. Too few usable rows yields NaN rather than an error,
//! the same sentinel the aggregations use for empty selections.

use super::criteria::lookup_column;
use crate::error::{CalcError, CalcResult};
use crate::types::Table;
use tracing::debug;

fn numeric_column<'a>(table: &'a Table, name: &str) -> CalcResult<&'a [Option<f64>]> {
    let column = lookup_column(table, name)?;
    column.values.as_numbers().ok_or_else(|| {
        CalcError::invalid(format!(
            "column '{}' is {}, expected Number",
            name,
            column.values.type_name()
        ))
    })
}

fn present(cell: &Option<f64>) -> Option<f64> {
    cell.filter(|n| !n.is_nan())
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sum_squared_deviations(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum()
}

/// Sample covariance of two columns over rows where both cells are present
pub fn covar(table: &Table, x: &str, y: &str) -> CalcResult<f64> {
    let xs = numeric_column(table, x)?;
    let ys = numeric_column(table, y)?;
    if xs.len() != ys.len() {
        return Err(CalcError::invalid(format!(
            "COVAR: columns '{}' ({}) and '{}' ({}) differ in length",
            x,
            xs.len(),
            y,
            ys.len()
        )));
    }

    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(a, b)| Some((present(a)?, present(b)?)))
        .collect();
    if pairs.len() < 2 {
        return Ok(f64::NAN);
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;
    let covariance = pairs
        .iter()
        .map(|(a, b)| (a - mean_x) * (b - mean_y))
        .sum::<f64>()
        / (n - 1.0);

    debug!(x, y, rows = pairs.len(), covariance, "covar");
    Ok(covariance)
}

/// Sample variance (n - 1)
pub fn var(table: &Table, column: &str) -> CalcResult<f64> {
    let values: Vec<f64> = numeric_column(table, column)?.iter().filter_map(present).collect();
    if values.len() < 2 {
        return Ok(f64::NAN);
    }
    Ok(sum_squared_deviations(&values) / (values.len() - 1) as f64)
}

/// Population variance (n). A single value has variance 0.
pub fn varp(table: &Table, column: &str) -> CalcResult<f64> {
    let values: Vec<f64> = numeric_column(table, column)?.iter().filter_map(present).collect();
    if values.is_empty() {
        return Ok(f64::NAN);
    }
    Ok(sum_squared_deviations(&values) / values.len() as f64)
}

/// Rank of every row within its column, ties sharing their average rank.
/// Largest value is rank 1 unless `ascending`. Absent cells rank NaN.
pub fn rank(table: &Table, column: &str, ascending: bool) -> CalcResult<Vec<f64>> {
    let cells = numeric_column(table, column)?;
    let values: Vec<f64> = cells.iter().filter_map(present).collect();

    Ok(cells
        .iter()
        .map(|cell| match present(cell) {
            None => f64::NAN,
            Some(v) => {
                let ahead = values
                    .iter()
                    .filter(|&&other| if ascending { other < v } else { other > v })
                    .count();
                let tied = values.iter().filter(|&&other| other == v).count();
                ahead as f64 + (tied as f64 + 1.0) / 2.0
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnValue;

    fn table() -> Table {
        Table::new("t")
            .with_column("x", ColumnValue::numbers([1.0, 2.0, 3.0, 4.0]))
            .with_column("y", ColumnValue::numbers([2.0, 4.0, 6.0, 8.0]))
            .with_column(
                "gappy",
                ColumnValue::Number(vec![Some(10.0), None, Some(20.0), Some(f64::NAN)]),
            )
            .with_column("label", ColumnValue::texts(["a", "b", "c", "d"]))
    }

    #[test]
    fn test_covar_sample() {
        // mean x 2.5, mean y 5; sum of products 10; / (4 - 1)
        assert!((covar(&table(), "x", "y").unwrap() - 10.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_covar_pairwise_complete() {
        // rows 0 and 2 only: x = (1, 3), gappy = (10, 20)
        assert!((covar(&table(), "x", "gappy").unwrap() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_covar_too_few_rows() {
        let t = Table::new("one")
            .with_column("a", ColumnValue::numbers([1.0]))
            .with_column("b", ColumnValue::numbers([2.0]));
        assert!(covar(&t, "a", "b").unwrap().is_nan());
    }

    #[test]
    fn test_var_and_varp() {
        let t = table();
        assert!((var(&t, "x").unwrap() - 5.0 / 3.0).abs() < 1e-12);
        assert!((varp(&t, "x").unwrap() - 1.25).abs() < 1e-12);
        assert_eq!(varp(&t, "gappy").unwrap(), 25.0);
        assert_eq!(var(&t, "gappy").unwrap(), 50.0);
    }

    #[test]
    fn test_var_degenerate() {
        let t = Table::new("one").with_column("a", ColumnValue::numbers([7.0]));
        assert!(var(&t, "a").unwrap().is_nan());
        assert_eq!(varp(&t, "a").unwrap(), 0.0);
    }

    #[test]
    fn test_rank_average_ties() {
        let t = Table::new("r").with_column(
            "score",
            ColumnValue::Number(vec![Some(90.0), Some(80.0), Some(90.0), None, Some(70.0)]),
        );
        let ranks = rank(&t, "score", false).unwrap();
        assert_eq!(&ranks[..3], &[1.5, 3.0, 1.5]);
        assert!(ranks[3].is_nan());
        assert_eq!(ranks[4], 4.0);

        let ascending = rank(&t, "score", true).unwrap();
        assert_eq!(ascending[4], 1.0);
        assert_eq!(ascending[0], 3.5);
    }

    #[test]
    fn test_non_numeric_column() {
        let err = var(&table(), "label").unwrap_err();
        assert!(err.to_string().contains("is Text, expected Number"));
    }
}
