//! Logical combinators: AND, OR, IF and SUM as folds
//!
//! AND/OR stop at the first deciding element, so a lazily mapped iterator
//! only evaluates what it needs to.

use crate::error::{CalcError, CalcResult};

/// AND over every condition. Fails on an empty input.
pub fn and_all<I>(conditions: I) -> CalcResult<bool>
where
    I: IntoIterator<Item = bool>,
{
    let mut conditions = conditions.into_iter().peekable();
    if conditions.peek().is_none() {
        return Err(CalcError::invalid("AND requires at least one condition"));
    }
    Ok(conditions.all(|c| c))
}

/// OR over every condition. Fails on an empty input.
pub fn or_any<I>(conditions: I) -> CalcResult<bool>
where
    I: IntoIterator<Item = bool>,
{
    let mut conditions = conditions.into_iter().peekable();
    if conditions.peek().is_none() {
        return Err(CalcError::invalid("OR requires at least one condition"));
    }
    Ok(conditions.any(|c| c))
}

/// SUM as a left fold. NaN propagates.
pub fn sum_all<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().fold(0.0, |acc, v| acc + v)
}

/// IF(condition, then, otherwise). Only the taken branch is evaluated.
pub fn if_then<T, A, B>(condition: bool, then: A, otherwise: B) -> T
where
    A: FnOnce() -> T,
    B: FnOnce() -> T,
{
    if condition {
        then()
    } else {
        otherwise()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_and_all() {
        assert!(and_all([true, true]).unwrap());
        assert!(!and_all([true, false, true]).unwrap());
    }

    #[test]
    fn test_or_any() {
        assert!(or_any([false, true]).unwrap());
        assert!(!or_any([false, false]).unwrap());
    }

    #[test]
    fn test_empty_inputs_are_invalid() {
        assert!(and_all(Vec::<bool>::new()).unwrap_err().is_invalid_argument());
        assert!(or_any(std::iter::empty::<bool>()).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_and_short_circuits() {
        let evaluated = Cell::new(0);
        let result = and_all([false, true, true].into_iter().map(|c| {
            evaluated.set(evaluated.get() + 1);
            c
        }))
        .unwrap();
        assert!(!result);
        assert_eq!(evaluated.get(), 1);
    }

    #[test]
    fn test_or_short_circuits() {
        let evaluated = Cell::new(0);
        let result = or_any([false, true, false].into_iter().map(|c| {
            evaluated.set(evaluated.get() + 1);
            c
        }))
        .unwrap();
        assert!(result);
        assert_eq!(evaluated.get(), 2);
    }

    #[test]
    fn test_sum_all() {
        assert_eq!(sum_all([1.0, 2.0, 3.5]), 6.5);
        assert_eq!(sum_all(Vec::<f64>::new()), 0.0);
        assert!(sum_all([1.0, f64::NAN]).is_nan());
    }

    #[test]
    fn test_if_then_is_lazy() {
        let otherwise_ran = Cell::new(false);
        let result = if_then(true, || "yes", || {
            otherwise_ran.set(true);
            "no"
        });
        assert_eq!(result, "yes");
        assert!(!otherwise_ran.get());
        assert_eq!(if_then(false, || 1, || 2), 2);
    }
}
