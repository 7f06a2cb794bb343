//! Day-count conventions (YEARFRAC)

use super::dates::{days, days360, is_leap_year};
use crate::error::{CalcError, CalcResult};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::str::FromStr;

/// How a date span is converted to a fraction of a year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayCountBasis {
    /// US (NASD) 30/360, spreadsheet basis 0
    #[default]
    Us30360,
    /// Actual/actual, basis 1
    ActualActual,
    /// Actual/360, basis 2
    Actual360,
    /// Actual/365, basis 3
    Actual365,
    /// European 30/360, basis 4
    Euro30360,
}

/// (basis code, variant, accepted names)
const BASES: [(i32, DayCountBasis, &[&str]); 5] = [
    (0, DayCountBasis::Us30360, &["us30/360", "30/360", "us30360", "nasd"]),
    (1, DayCountBasis::ActualActual, &["actual/actual", "act/act", "actualactual"]),
    (2, DayCountBasis::Actual360, &["actual/360", "act/360", "actual360"]),
    (3, DayCountBasis::Actual365, &["actual/365", "act/365", "actual365"]),
    (4, DayCountBasis::Euro30360, &["euro30/360", "30e/360", "euro30360"]),
];

impl DayCountBasis {
    pub fn from_code(code: i32) -> CalcResult<Self> {
        BASES
            .iter()
            .find(|(c, _, _)| *c == code)
            .map(|(_, basis, _)| *basis)
            .ok_or_else(|| {
                CalcError::invalid(format!("unknown day-count basis {} (use 0-4)", code))
            })
    }

    pub fn code(self) -> i32 {
        BASES
            .iter()
            .find(|(_, basis, _)| *basis == self)
            .map_or(0, |(code, _, _)| *code)
    }

    pub fn name(self) -> &'static str {
        match self {
            DayCountBasis::Us30360 => "US 30/360",
            DayCountBasis::ActualActual => "Actual/Actual",
            DayCountBasis::Actual360 => "Actual/360",
            DayCountBasis::Actual365 => "Actual/365",
            DayCountBasis::Euro30360 => "European 30/360",
        }
    }

    /// Fraction of a year between `start` and `end` under this basis
    pub fn year_fraction(self, start: NaiveDate, end: NaiveDate) -> f64 {
        match self {
            DayCountBasis::ActualActual => {
                let year_length = if is_leap_year(start.year()) { 366.0 } else { 365.0 };
                days(start, end) as f64 / year_length
            }
            DayCountBasis::Actual360 => days(start, end) as f64 / 360.0,
            DayCountBasis::Actual365 => days(start, end) as f64 / 365.0,
            DayCountBasis::Us30360 => days360(start, end, false) as f64 / 360.0,
            DayCountBasis::Euro30360 => days360(start, end, true) as f64 / 360.0,
        }
    }
}

impl FromStr for DayCountBasis {
    type Err = CalcError;

    /// Accepts a basis code ("0".."4") or a name such as "act/360"
    fn from_str(s: &str) -> CalcResult<Self> {
        let key = s.trim().to_ascii_lowercase();
        if let Ok(code) = key.parse::<i32>() {
            return DayCountBasis::from_code(code);
        }
        BASES
            .iter()
            .find(|(_, _, names)| names.contains(&key.as_str()))
            .map(|(_, basis, _)| *basis)
            .ok_or_else(|| CalcError::invalid(format!("unknown day-count basis '{}'", s)))
    }
}

impl std::fmt::Display for DayCountBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// YEARFRAC(start, end, basis)
pub fn year_frac(start: NaiveDate, end: NaiveDate, basis: DayCountBasis) -> f64 {
    basis.year_fraction(start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_us30360_month_end() {
        let frac = year_frac(d(2024, 1, 31), d(2024, 2, 29), DayCountBasis::Us30360);
        assert_eq!(frac, 29.0 / 360.0);
    }

    #[test]
    fn test_euro30360_both_31st() {
        let frac = year_frac(d(2024, 1, 31), d(2024, 3, 31), DayCountBasis::Euro30360);
        assert_eq!(frac, 61.0 / 360.0);
    }

    #[test]
    fn test_actual_bases() {
        let (start, end) = (d(2024, 1, 1), d(2024, 7, 1));
        assert_eq!(year_frac(start, end, DayCountBasis::Actual360), 182.0 / 360.0);
        assert_eq!(year_frac(start, end, DayCountBasis::Actual365), 182.0 / 365.0);
        assert_eq!(year_frac(start, end, DayCountBasis::ActualActual), 182.0 / 366.0);
    }

    #[test]
    fn test_actual_actual_uses_start_year() {
        let frac = year_frac(d(2023, 7, 1), d(2024, 7, 1), DayCountBasis::ActualActual);
        assert_eq!(frac, 366.0 / 365.0);
    }

    #[test]
    fn test_from_code_round_trip() {
        for code in 0..=4 {
            assert_eq!(DayCountBasis::from_code(code).unwrap().code(), code);
        }
        assert!(DayCountBasis::from_code(5).unwrap_err().is_invalid_argument());
        assert!(DayCountBasis::from_code(-1).is_err());
    }

    #[test]
    fn test_from_str_names_and_codes() {
        assert_eq!("act/360".parse::<DayCountBasis>().unwrap(), DayCountBasis::Actual360);
        assert_eq!("30E/360".parse::<DayCountBasis>().unwrap(), DayCountBasis::Euro30360);
        assert_eq!(" 1 ".parse::<DayCountBasis>().unwrap(), DayCountBasis::ActualActual);
        assert!("act/999".parse::<DayCountBasis>().is_err());
    }

    #[test]
    fn test_default_is_us30360() {
        assert_eq!(DayCountBasis::default().code(), 0);
    }
}
