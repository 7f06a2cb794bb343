//! Conditional aggregation: SUMIFS, COUNTIFS, AVERAGEIFS, MAXIFS, MINIFS
//!
//! Every function comes in two forms:
//! - criteria form: flat `[column, value, ...]` equality pairs
//! - mask form (`*_by_mask`): pre-computed boolean masks, for criteria that
//!   equality cannot express (see [`crate::core::criteria`] for builders)
//!
//! An empty selection is not an error. Sum and Count return 0, Average/Max/Min
//! return `f64::NAN`; use [`require_selection`] to turn that into an error.

use crate::core::criteria::{and_reduce, criteria_mask, lookup_column, Criterion, Mask};
use crate::error::{CalcError, CalcResult};
use crate::types::{Column, Table, Value};
use serde::Serialize;
use std::str::FromStr;
use tracing::debug;

/// Reduction applied to the masked rows of the target column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AggKind {
    Sum,
    Count,
    Average,
    Max,
    Min,
}

impl AggKind {
    pub const ALL: [AggKind; 5] = [
        AggKind::Sum,
        AggKind::Count,
        AggKind::Average,
        AggKind::Max,
        AggKind::Min,
    ];

    /// Spreadsheet function name for messages
    pub fn function_name(self) -> &'static str {
        match self {
            AggKind::Sum => "SUMIFS",
            AggKind::Count => "COUNTIFS",
            AggKind::Average => "AVERAGEIFS",
            AggKind::Max => "MAXIFS",
            AggKind::Min => "MINIFS",
        }
    }

    /// Reduce `column` over the rows where `mask` is true
    fn apply(self, column: &Column, mask: &[bool]) -> CalcResult<f64> {
        Ok(match self {
            AggKind::Count => mask
                .iter()
                .enumerate()
                .filter(|(row, hit)| **hit && column.values.is_present(*row))
                .count() as f64,
            AggKind::Sum => self.selected_numbers(column, mask)?.into_iter().sum(),
            AggKind::Average => {
                let values = self.selected_numbers(column, mask)?;
                if values.is_empty() {
                    f64::NAN
                } else {
                    values.iter().sum::<f64>() / values.len() as f64
                }
            }
            AggKind::Max => self
                .selected_numbers(column, mask)?
                .into_iter()
                .reduce(f64::max)
                .unwrap_or(f64::NAN),
            AggKind::Min => self
                .selected_numbers(column, mask)?
                .into_iter()
                .reduce(f64::min)
                .unwrap_or(f64::NAN),
        })
    }

    /// Present numbers of the masked rows; absent cells and NaN are skipped
    fn selected_numbers(self, column: &Column, mask: &[bool]) -> CalcResult<Vec<f64>> {
        let numbers = column.values.as_numbers().ok_or_else(|| {
            CalcError::invalid(format!(
                "{}: target column '{}' is {}, expected Number",
                self.function_name(),
                column.name,
                column.values.type_name()
            ))
        })?;

        Ok(numbers
            .iter()
            .zip(mask)
            .filter_map(|(cell, &hit)| if hit { *cell } else { None })
            .filter(|n| !n.is_nan())
            .collect())
    }
}

impl FromStr for AggKind {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" | "sumifs" => Ok(AggKind::Sum),
            "count" | "countifs" => Ok(AggKind::Count),
            "average" | "avg" | "mean" | "averageifs" => Ok(AggKind::Average),
            "max" | "maxifs" => Ok(AggKind::Max),
            "min" | "minifs" => Ok(AggKind::Min),
            other => Err(CalcError::invalid(format!(
                "unknown aggregator '{}' (use sum, count, average, max or min)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for AggKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.function_name())
    }
}

fn checked_table(table: &Table, kind: AggKind) -> CalcResult<()> {
    table
        .validate_lengths()
        .map_err(|e| CalcError::invalid(format!("{}: {}", kind.function_name(), e)))
}

/// Criteria form. `criteria` is a flat `[column, value, column, value, ...]` list;
/// an odd length fails with `InvalidArgument`, an empty list aggregates the whole column.
pub fn aggregate(
    table: &Table,
    target: &str,
    kind: AggKind,
    criteria: &[Value],
) -> CalcResult<f64> {
    let criteria = Criterion::pairs(criteria)
        .map_err(|e| e.in_function(kind.function_name()))?;
    checked_table(table, kind)?;

    let column = lookup_column(table, target)?;
    let mask = criteria_mask(table, &criteria)?;
    let result = kind.apply(column, &mask)?;

    debug!(
        function = kind.function_name(),
        column = target,
        criteria = criteria.len(),
        matched = mask.iter().filter(|&&hit| hit).count(),
        result,
        "aggregate"
    );
    Ok(result)
}

/// Mask form. Each mask must have one entry per table row.
pub fn aggregate_by_mask(
    table: &Table,
    target: &str,
    kind: AggKind,
    masks: &[Mask],
) -> CalcResult<f64> {
    checked_table(table, kind)?;

    let column = lookup_column(table, target)?;
    let mask = and_reduce(table.row_count(), masks)
        .map_err(|e| e.in_function(kind.function_name()))?;
    let result = kind.apply(column, &mask)?;

    debug!(
        function = kind.function_name(),
        column = target,
        masks = masks.len(),
        matched = mask.iter().filter(|&&hit| hit).count(),
        result,
        "aggregate_by_mask"
    );
    Ok(result)
}

/// Convert the NaN sentinel of an empty Average/Max/Min into `EmptySelection`
pub fn require_selection(value: f64, what: &str) -> CalcResult<f64> {
    if value.is_nan() {
        Err(CalcError::EmptySelection(format!(
            "{}: no rows matched the criteria",
            what
        )))
    } else {
        Ok(value)
    }
}

pub fn sumifs(table: &Table, sum_column: &str, criteria: &[Value]) -> CalcResult<f64> {
    aggregate(table, sum_column, AggKind::Sum, criteria)
}

pub fn countifs(table: &Table, count_column: &str, criteria: &[Value]) -> CalcResult<f64> {
    aggregate(table, count_column, AggKind::Count, criteria)
}

pub fn averageifs(table: &Table, average_column: &str, criteria: &[Value]) -> CalcResult<f64> {
    aggregate(table, average_column, AggKind::Average, criteria)
}

pub fn maxifs(table: &Table, max_column: &str, criteria: &[Value]) -> CalcResult<f64> {
    aggregate(table, max_column, AggKind::Max, criteria)
}

pub fn minifs(table: &Table, min_column: &str, criteria: &[Value]) -> CalcResult<f64> {
    aggregate(table, min_column, AggKind::Min, criteria)
}

pub fn sumifs_by_mask(table: &Table, sum_column: &str, masks: &[Mask]) -> CalcResult<f64> {
    aggregate_by_mask(table, sum_column, AggKind::Sum, masks)
}

pub fn countifs_by_mask(table: &Table, count_column: &str, masks: &[Mask]) -> CalcResult<f64> {
    aggregate_by_mask(table, count_column, AggKind::Count, masks)
}

pub fn averageifs_by_mask(table: &Table, average_column: &str, masks: &[Mask]) -> CalcResult<f64> {
    aggregate_by_mask(table, average_column, AggKind::Average, masks)
}

pub fn maxifs_by_mask(table: &Table, max_column: &str, masks: &[Mask]) -> CalcResult<f64> {
    aggregate_by_mask(table, max_column, AggKind::Max, masks)
}

pub fn minifs_by_mask(table: &Table, min_column: &str, masks: &[Mask]) -> CalcResult<f64> {
    aggregate_by_mask(table, min_column, AggKind::Min, masks)
}
