//! Criteria and row masks
//!
//! A criterion is a `(column, expected)` pair that turns into a boolean
//! mask over the table rows. Masks are combined with a logical AND.
//! The mask builders at the bottom cover what plain equality cannot:
//! regex matches, inclusive ranges and arbitrary predicates.

use crate::error::{CalcError, CalcResult};
use crate::types::{Table, Value};
use regex::Regex;

/// Boolean vector of length `row_count`
pub type Mask = Vec<bool>;

/// A single equality test contributing one AND-term to a row mask
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub column: String,
    pub expected: Value,
}

impl Criterion {
    pub fn new(column: impl Into<String>, expected: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            expected: expected.into(),
        }
    }

    /// Split a flat `[column, value, column, value, ...]` argument list into criteria.
    /// Column positions must hold text.
    pub fn pairs(flat: &[Value]) -> CalcResult<Vec<Criterion>> {
        if flat.len() % 2 != 0 {
            return Err(CalcError::invalid(format!(
                "odd number of criteria arguments ({}); expected column/value pairs",
                flat.len()
            )));
        }

        flat.chunks_exact(2)
            .map(|pair| match &pair[0] {
                Value::Text(column) => Ok(Criterion::new(column.clone(), pair[1].clone())),
                other => Err(CalcError::invalid(format!(
                    "criteria column name must be text, found {} '{}'",
                    other.type_name(),
                    other
                ))),
            })
            .collect()
    }

    /// Row-wise equality mask against `table[self.column]`
    pub fn mask(&self, table: &Table) -> CalcResult<Mask> {
        let column = lookup_column(table, &self.column)?;
        Ok(column.values.eq_mask(&self.expected))
    }
}

/// Column by name, or `InvalidArgument` listing what the table does have
pub(crate) fn lookup_column<'a>(
    table: &'a Table,
    name: &str,
) -> CalcResult<&'a crate::types::Column> {
    table.column(name).ok_or_else(|| {
        CalcError::invalid(format!(
            "unknown column '{}' (available: {})",
            name,
            table.column_names().join(", ")
        ))
    })
}

/// AND-reduce masks. An empty list selects every row.
pub fn and_reduce(row_count: usize, masks: &[Mask]) -> CalcResult<Mask> {
    let mut combined = vec![true; row_count];
    for (i, mask) in masks.iter().enumerate() {
        if mask.len() != row_count {
            return Err(CalcError::invalid(format!(
                "mask {} has length {}, expected {}",
                i,
                mask.len(),
                row_count
            )));
        }
        for (acc, &hit) in combined.iter_mut().zip(mask) {
            *acc &= hit;
        }
    }
    Ok(combined)
}

/// Build and AND-reduce the equality masks of `criteria`
pub fn criteria_mask(table: &Table, criteria: &[Criterion]) -> CalcResult<Mask> {
    let masks = criteria
        .iter()
        .map(|c| c.mask(table))
        .collect::<CalcResult<Vec<_>>>()?;
    and_reduce(table.row_count(), &masks)
}

// ═══════════════════════════════════════════════════════════════════════════
// PREDICATE MASK BUILDERS
// ═══════════════════════════════════════════════════════════════════════════

/// Rows whose cell satisfies `predicate`. Absent cells are passed as `Value::Empty`.
pub fn predicate_mask<F>(table: &Table, column: &str, predicate: F) -> CalcResult<Mask>
where
    F: Fn(&Value) -> bool,
{
    let column = lookup_column(table, column)?;
    Ok((0..column.len())
        .map(|row| predicate(&column.values.get(row)))
        .collect())
}

/// Rows whose text cell matches `pattern`. Non-text cells never match.
pub fn matches_mask(table: &Table, column: &str, pattern: &str) -> CalcResult<Mask> {
    let re = Regex::new(pattern)
        .map_err(|e| CalcError::invalid(format!("invalid pattern '{}': {}", pattern, e)))?;
    predicate_mask(table, column, |cell| {
        cell.as_text().is_some_and(|text| re.is_match(text))
    })
}

/// Rows with `low <= cell <= high`. Bounds and cells must share a type (numbers or dates).
pub fn range_mask(table: &Table, column: &str, low: &Value, high: &Value) -> CalcResult<Mask> {
    if low.compare(high).is_none() {
        return Err(CalcError::invalid(format!(
            "range bounds must be comparable values of one type, got {} and {}",
            low.type_name(),
            high.type_name()
        )));
    }
    predicate_mask(table, column, |cell| {
        matches!(
            (cell.compare(low), cell.compare(high)),
            (Some(lo), Some(hi)) if lo.is_ge() && hi.is_le()
        )
    })
}
