use crate::core::aggregate::{aggregate as aggregate_values, aggregate_by_mask, AggKind};
use crate::core::criteria::{matches_mask, Criterion};
use crate::core::dates::{self, WeekdayMode};
use crate::core::day_count::{year_frac, DayCountBasis};
use crate::error::{CalcError, CalcResult};
use crate::parser::{parse_date, parse_date_list, parse_scalar, parse_table};
use crate::types::Value;
use chrono::NaiveDate;
use colored::Colorize;
use serde_json::json;

/// Format a number for display, removing unnecessary decimal places
fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    // Round to 6 decimal places for display
    let rounded = (n * 1e6).round() / 1e6;
    format!("{:.6}", rounded)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Print one result, either as a labelled line or as a JSON document
fn report(json: bool, label: &str, shown: &str, document: serde_json::Value) -> CalcResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        println!("{} {}", format!("{}:", label).bold().cyan(), shown);
    }
    Ok(())
}

fn parse_holidays(holidays: &str) -> CalcResult<Vec<NaiveDate>> {
    parse_date_list(holidays)
}

/// Execute the serial command: date to serial day number
pub fn serial(date: &str, json: bool) -> CalcResult<()> {
    let date = parse_date(date)?;
    let serial = dates::to_serial(date);
    report(
        json,
        "Serial",
        &serial.to_string(),
        json!({ "date": date, "serial": serial }),
    )
}

/// Execute the from-serial command. A fractional serial also yields a time of day.
pub fn from_serial(serial: &str, json: bool) -> CalcResult<()> {
    let value: f64 = serial
        .trim()
        .parse()
        .map_err(|_| CalcError::Parse(format!("Invalid serial '{}': expected a number", serial)))?;

    if value.fract() == 0.0 {
        let date = dates::from_serial(value as i64)?;
        report(
            json,
            "Date",
            &date.format("%Y-%m-%d").to_string(),
            json!({ "serial": value, "date": date }),
        )
    } else {
        let datetime = dates::from_serial_fractional(value)?;
        report(
            json,
            "Date",
            &datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            json!({ "serial": value, "datetime": datetime }),
        )
    }
}

/// Execute the edate command
pub fn edate(date: &str, months: i32, json: bool) -> CalcResult<()> {
    let start = parse_date(date)?;
    let result = dates::edate(start, months)?;
    report(
        json,
        "EDATE",
        &result.to_string(),
        json!({ "start": start, "months": months, "date": result }),
    )
}

/// Execute the eomonth command
pub fn eomonth(date: &str, months: i32, json: bool) -> CalcResult<()> {
    let start = parse_date(date)?;
    let result = dates::eomonth(start, months)?;
    report(
        json,
        "EOMONTH",
        &result.to_string(),
        json!({ "start": start, "months": months, "date": result }),
    )
}

/// Execute the days360 command
pub fn days360(start: &str, end: &str, european: bool, json: bool) -> CalcResult<()> {
    let (start, end) = (parse_date(start)?, parse_date(end)?);
    let days = dates::days360(start, end, european);
    report(
        json,
        "DAYS360",
        &days.to_string(),
        json!({ "start": start, "end": end, "european": european, "days": days }),
    )
}

/// Execute the yearfrac command
pub fn yearfrac(start: &str, end: &str, basis: &str, json: bool) -> CalcResult<()> {
    let (start, end) = (parse_date(start)?, parse_date(end)?);
    let basis: DayCountBasis = basis.parse()?;
    let fraction = year_frac(start, end, basis);
    report(
        json,
        &format!("YEARFRAC ({})", basis),
        &format_number(fraction),
        json!({ "start": start, "end": end, "basis": basis, "fraction": fraction }),
    )
}

/// Execute the workday command
pub fn workday(start: &str, days: i64, holidays: &str, json: bool) -> CalcResult<()> {
    let start = parse_date(start)?;
    let holidays = parse_holidays(holidays)?;
    let result = dates::workday(start, days, &holidays)?;
    report(
        json,
        "WORKDAY",
        &result.to_string(),
        json!({ "start": start, "days": days, "holidays": holidays, "date": result }),
    )
}

/// Execute the networkdays command
pub fn networkdays(start: &str, end: &str, holidays: &str, json: bool) -> CalcResult<()> {
    let (start, end) = (parse_date(start)?, parse_date(end)?);
    let holidays = parse_holidays(holidays)?;
    let count = dates::networkdays(start, end, &holidays);
    report(
        json,
        "NETWORKDAYS",
        &count.to_string(),
        json!({ "start": start, "end": end, "holidays": holidays, "days": count }),
    )
}

/// Execute the weekday command
pub fn weekday(date: &str, mode: &str, json: bool) -> CalcResult<()> {
    let date = parse_date(date)?;
    let mode: WeekdayMode = mode.parse()?;
    let number = dates::weekday(date, mode);
    report(
        json,
        &format!("WEEKDAY (mode {})", mode),
        &number.to_string(),
        json!({ "date": date, "mode": mode.code(), "weekday": number }),
    )
}

/// Flat criteria tokens as values. Column-name positions stay text verbatim.
fn criteria_values(tokens: &[String]) -> CalcResult<Vec<Value>> {
    tokens
        .iter()
        .enumerate()
        .map(|(i, token)| {
            if i % 2 == 0 {
                Ok(Value::Text(token.clone()))
            } else {
                parse_scalar(token)
            }
        })
        .collect()
}

/// Execute the aggregate command.
///
/// Plain criteria go through the criteria form; any `--matches COL=REGEX`
/// switches to the mask form with the equality masks and regex masks combined.
pub fn aggregate(
    kind: &str,
    target: &str,
    table_yaml: &str,
    matches: &[String],
    criteria: &[String],
    json: bool,
) -> CalcResult<()> {
    let kind: AggKind = kind.parse()?;
    let table = parse_table("table", table_yaml)?;
    let flat = criteria_values(criteria)?;

    let result = if matches.is_empty() {
        aggregate_values(&table, target, kind, &flat)?
    } else {
        let mut masks = Criterion::pairs(&flat)?
            .iter()
            .map(|c| c.mask(&table))
            .collect::<CalcResult<Vec<_>>>()?;
        for filter in matches {
            let (column, pattern) = filter.split_once('=').ok_or_else(|| {
                CalcError::invalid(format!("--matches expects COLUMN=REGEX, got '{}'", filter))
            })?;
            masks.push(matches_mask(&table, column, pattern)?);
        }
        aggregate_by_mask(&table, target, kind, &masks)?
    };

    report(
        json,
        &format!("{}({})", kind.function_name(), target),
        &format_number(result),
        json!({
            "function": kind.function_name(),
            "column": target,
            "criteria": criteria.len() / 2,
            "patterns": matches.len(),
            "result": result,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(400.0), "400");
        assert_eq!(format_number(29.0 / 360.0), "0.080556");
        assert_eq!(format_number(-2.5), "-2.5");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_criteria_values_keeps_column_names_as_text() {
        let tokens = vec!["2024".to_string(), "2024".to_string()];
        let values = criteria_values(&tokens).unwrap();
        assert_eq!(values, vec![Value::from("2024"), Value::from(2024)]);
    }

    #[test]
    fn test_aggregate_rejects_bad_matches_filter() {
        let err = aggregate(
            "sum",
            "amount",
            "amount: [1, 2]\nregion: [a, b]",
            &["region".to_string()],
            &[],
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("COLUMN=REGEX"));
    }

    #[test]
    fn test_aggregate_odd_criteria() {
        let err = aggregate(
            "sum",
            "amount",
            "amount: [1, 2]\nregion: [a, b]",
            &[],
            &["region".to_string()],
            false,
        )
        .unwrap_err();
        assert!(err.is_invalid_argument());
    }
}
