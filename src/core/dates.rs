//! Date Functions
//! DATE, TIME, DATEVALUE, EXCELDATE, EDATE, EOMONTH, DAYS, DAYS360, DATEDIF,
//! WEEKDAY, WEEKNUM, ISOWEEKNUM, WORKDAY, NETWORKDAYS
//!
//! Serial dates count days from the 1900 date system anchor: serial 0 is
//! 1899-12-30, so serials from 1900-03-01 onward agree with spreadsheet tools
//! and 1900-01-01 is serial 2 (the inherited off-by-two of the 1900 leap-year bug).

use crate::error::{CalcError, CalcResult};
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use std::collections::HashSet;
use std::str::FromStr;
use tracing::{debug, trace};

/// Proleptic Gregorian ordinal (0001-01-01 = 1) of serial day 0
pub const SERIAL_EPOCH_OFFSET: i64 = 693_594;

const SECONDS_PER_DAY: f64 = 86_400.0;

// ═══════════════════════════════════════════════════════════════════════════
// CALENDAR BASICS
// ═══════════════════════════════════════════════════════════════════════════

/// Check if a year is a leap year
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Number of days in `month` of `year`
pub fn days_in_month(year: i32, month: u32) -> CalcResult<u32> {
    check_month(month)?;
    Ok(month_length(year, month))
}

fn month_length(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn check_month(month: u32) -> CalcResult<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(CalcError::invalid(format!("month {} out of range 1-12", month)))
    }
}

/// DATE(year, month, day). Out-of-range components are rejected, never rolled over.
pub fn date(year: i32, month: u32, day: u32) -> CalcResult<NaiveDate> {
    check_month(month)?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        CalcError::invalid(format!(
            "day {} out of range for {:04}-{:02}",
            day, year, month
        ))
    })
}

/// TIME(hour, minute, second) as a fraction of one day.
/// Components past their range wrap (25 hours is 1 hour).
pub fn time(hour: u32, minute: u32, second: u32) -> f64 {
    let hour = hour % 24;
    let minute = minute % 60;
    let second = second % 60;
    f64::from(hour) / 24.0 + f64::from(minute) / (24.0 * 60.0) + f64::from(second) / SECONDS_PER_DAY
}

// ═══════════════════════════════════════════════════════════════════════════
// SERIAL DATES
// ═══════════════════════════════════════════════════════════════════════════

/// DATEVALUE: serial day number of `date`
pub fn to_serial(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) - SERIAL_EPOCH_OFFSET
}

/// Serial number including the time of day as a fraction
pub fn to_serial_fractional(datetime: NaiveDateTime) -> f64 {
    to_serial(datetime.date()) as f64
        + f64::from(datetime.time().num_seconds_from_midnight()) / SECONDS_PER_DAY
}

/// Calendar date of an integer serial
pub fn from_serial(serial: i64) -> CalcResult<NaiveDate> {
    serial
        .checked_add(SERIAL_EPOCH_OFFSET)
        .and_then(|ordinal| i32::try_from(ordinal).ok())
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or_else(|| CalcError::invalid(format!("serial date {} out of range", serial)))
}

/// Calendar date and time of a fractional serial.
///
/// The fraction is decoded by truncation at every step (hours, then minutes,
/// then seconds), so a time can come out up to a second early. Spreadsheet
/// tools round instead; this keeps the truncating behavior on purpose.
pub fn from_serial_fractional(serial: f64) -> CalcResult<NaiveDateTime> {
    if !serial.is_finite() {
        return Err(CalcError::invalid(format!("serial date {} is not finite", serial)));
    }
    let day = serial.floor();
    let date = from_serial(day as i64)?;
    let time = fraction_to_time(serial - day)?;
    Ok(date.and_time(time))
}

fn fraction_to_time(fraction: f64) -> CalcResult<NaiveTime> {
    let hours = fraction * 24.0;
    let hour = hours.floor();
    let minutes = (hours - hour) * 60.0;
    let minute = minutes.floor();
    let second = ((minutes - minute) * 60.0).floor();

    NaiveTime::from_hms_opt(hour as u32, minute as u32, second as u32).ok_or_else(|| {
        CalcError::invalid(format!("day fraction {} does not decode to a time", fraction))
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// DATE ARITHMETIC
// ═══════════════════════════════════════════════════════════════════════════

pub fn add_days(date: NaiveDate, days: i64) -> CalcResult<NaiveDate> {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.ok_or_else(|| CalcError::invalid(format!("{} + {} days is out of range", date, days)))
}

/// Same month and day `years` later. Feb 29 into a non-leap year is rejected.
pub fn add_years(date: NaiveDate, years: i32) -> CalcResult<NaiveDate> {
    let year = date
        .year()
        .checked_add(years)
        .ok_or_else(|| CalcError::invalid(format!("{} + {} years is out of range", date, years)))?;
    NaiveDate::from_ymd_opt(year, date.month(), date.day()).ok_or_else(|| {
        CalcError::invalid(format!(
            "{:04}-{:02}-{:02} does not exist",
            year,
            date.month(),
            date.day()
        ))
    })
}

/// Move (year, month) by `months`. Floor division keeps the remainder in 0..12,
/// e.g. -1 month is one year back plus 11 months forward.
fn shift_month(year: i32, month: u32, months: i32) -> (i32, u32) {
    let mut new_year = year + months.div_euclid(12);
    let mut new_month = month + months.rem_euclid(12) as u32;
    if new_month > 12 {
        new_year += 1;
        new_month -= 12;
    }
    (new_year, new_month)
}

/// Shift by whole months keeping the day of month. Fails when that day does not
/// exist in the target month (2023-12-31 minus one month).
pub fn add_months(date: NaiveDate, months: i32) -> CalcResult<NaiveDate> {
    let (year, month) = shift_month(date.year(), date.month(), months);
    NaiveDate::from_ymd_opt(year, month, date.day()).ok_or_else(|| {
        CalcError::invalid(format!(
            "{} + {} months lands on {:04}-{:02}-{:02}, which does not exist",
            date,
            months,
            year,
            month,
            date.day()
        ))
    })
}

/// EDATE: like [`add_months`] but a missing day clamps to the month's last day
pub fn edate(date: NaiveDate, months: i32) -> CalcResult<NaiveDate> {
    let (year, month) = shift_month(date.year(), date.month(), months);
    let day = date.day().min(month_length(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| CalcError::invalid(format!("EDATE: year {} out of range", year)))
}

/// EOMONTH: last day of the month `months` away from `date`
pub fn eomonth(date: NaiveDate, months: i32) -> CalcResult<NaiveDate> {
    let (year, month) = shift_month(date.year(), date.month(), months);
    NaiveDate::from_ymd_opt(year, month, month_length(year, month))
        .ok_or_else(|| CalcError::invalid(format!("EOMONTH: year {} out of range", year)))
}

/// DAYS: `end - start` in calendar days (negative when end is earlier)
pub fn days(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days()
}

/// DAYS360 on the 30/360 calendar.
///
/// Day-of-month values are capped at 30. With `european` set, one day is added
/// when both dates fall on the 31st.
pub fn days360(start: NaiveDate, end: NaiveDate, european: bool) -> i64 {
    let month_difference = 12 * i64::from(end.year() - start.year())
        + (i64::from(end.month()) - i64::from(start.month()));
    let day_difference = i64::from(end.day().min(30)) - i64::from(start.day().min(30));
    let both_31st = start.day() == 31 && end.day() == 31;
    let adjustment = if european && both_31st { 1 } else { 0 };

    30 * month_difference + day_difference + adjustment
}

/// DATEDIF units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateUnit {
    /// "Y": complete years
    Years,
    /// "M": complete months
    Months,
    /// "D": days
    Days,
    /// "MD": days, ignoring months and years
    MonthDays,
    /// "YM": months, ignoring years
    YearMonths,
    /// "YD": days, ignoring years
    YearDays,
}

impl FromStr for DateUnit {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        match s.trim().trim_matches('"').to_ascii_uppercase().as_str() {
            "Y" => Ok(DateUnit::Years),
            "M" => Ok(DateUnit::Months),
            "D" => Ok(DateUnit::Days),
            "MD" => Ok(DateUnit::MonthDays),
            "YM" => Ok(DateUnit::YearMonths),
            "YD" => Ok(DateUnit::YearDays),
            other => Err(CalcError::invalid(format!(
                "DATEDIF: invalid unit '{}' (use Y, M, D, MD, YM, or YD)",
                other
            ))),
        }
    }
}

/// Same month/day in `year`, Feb 29 clamped to Feb 28
fn same_day_in_year(date: NaiveDate, year: i32) -> CalcResult<NaiveDate> {
    let day = date.day().min(month_length(year, date.month()));
    NaiveDate::from_ymd_opt(year, date.month(), day)
        .ok_or_else(|| CalcError::invalid(format!("year {} out of range", year)))
}

/// DATEDIF(start, end, unit)
pub fn datedif(start: NaiveDate, end: NaiveDate, unit: DateUnit) -> CalcResult<i64> {
    if start > end {
        return Err(CalcError::invalid(format!(
            "DATEDIF: start {} is after end {}",
            start, end
        )));
    }

    let day_short = end.day() < start.day();
    let result = match unit {
        DateUnit::Years => {
            let mut years = i64::from(end.year() - start.year());
            if (end.month(), end.day()) < (start.month(), start.day()) {
                years -= 1;
            }
            years
        }
        DateUnit::Months => {
            let mut months = 12 * i64::from(end.year() - start.year())
                + (i64::from(end.month()) - i64::from(start.month()));
            if day_short {
                months -= 1;
            }
            months
        }
        DateUnit::Days => days(start, end),
        DateUnit::MonthDays => {
            let mut day_diff = i64::from(end.day()) - i64::from(start.day());
            if day_diff < 0 {
                let (year, month) = shift_month(end.year(), end.month(), -1);
                day_diff += i64::from(month_length(year, month));
            }
            day_diff
        }
        DateUnit::YearMonths => {
            let mut months = i64::from(end.month()) - i64::from(start.month());
            if day_short {
                months -= 1;
            }
            months.rem_euclid(12)
        }
        DateUnit::YearDays => {
            let mut anchor = same_day_in_year(start, end.year())?;
            if anchor > end {
                anchor = same_day_in_year(start, end.year() - 1)?;
            }
            days(anchor, end)
        }
    };
    Ok(result)
}

// ═══════════════════════════════════════════════════════════════════════════
// WEEKDAYS AND WEEK NUMBERS
// ═══════════════════════════════════════════════════════════════════════════

/// Weekday numbering convention of WEEKDAY(date, return_type)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekdayMode {
    code: i32,
    first_day: Weekday,
    base: u32,
}

/// (return_type, day numbered first, number it gets)
const WEEKDAY_MODES: [(i32, Weekday, u32); 10] = [
    (1, Weekday::Sun, 1),
    (2, Weekday::Mon, 1),
    (3, Weekday::Mon, 0),
    (11, Weekday::Mon, 1),
    (12, Weekday::Tue, 1),
    (13, Weekday::Wed, 1),
    (14, Weekday::Thu, 1),
    (15, Weekday::Fri, 1),
    (16, Weekday::Sat, 1),
    (17, Weekday::Sun, 1),
];

impl WeekdayMode {
    pub fn from_code(code: i32) -> CalcResult<Self> {
        WEEKDAY_MODES
            .iter()
            .find(|(c, _, _)| *c == code)
            .map(|&(code, first_day, base)| WeekdayMode {
                code,
                first_day,
                base,
            })
            .ok_or_else(|| {
                CalcError::invalid(format!(
                    "WEEKDAY: unknown return type {} (use 1, 2, 3 or 11-17)",
                    code
                ))
            })
    }

    pub fn code(self) -> i32 {
        self.code
    }

    pub fn number(self, day: Weekday) -> u32 {
        days_after(day, self.first_day) + self.base
    }
}

impl Default for WeekdayMode {
    fn default() -> Self {
        WeekdayMode {
            code: 1,
            first_day: Weekday::Sun,
            base: 1,
        }
    }
}

impl FromStr for WeekdayMode {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        let code = s
            .trim()
            .parse::<i32>()
            .map_err(|_| CalcError::invalid(format!("WEEKDAY: return type '{}' is not a number", s)))?;
        WeekdayMode::from_code(code)
    }
}

impl std::fmt::Display for WeekdayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)
    }
}

/// Days from `start` forward to `day` (0..7)
fn days_after(day: Weekday, start: Weekday) -> u32 {
    (day.num_days_from_monday() + 7 - start.num_days_from_monday()) % 7
}

/// WEEKDAY(date, return_type)
pub fn weekday(date: NaiveDate, mode: WeekdayMode) -> u32 {
    mode.number(date.weekday())
}

/// WEEKNUM(date, return_type). Types 1, 2 and 11-17 count the week holding
/// Jan 1 as week 1; type 21 is the ISO week.
pub fn weeknum(date: NaiveDate, return_type: i32) -> CalcResult<u32> {
    let first_day = match return_type {
        21 => return Ok(isoweeknum(date)),
        1 | 17 => Weekday::Sun,
        2 | 11 => Weekday::Mon,
        12 => Weekday::Tue,
        13 => Weekday::Wed,
        14 => Weekday::Thu,
        15 => Weekday::Fri,
        16 => Weekday::Sat,
        other => {
            return Err(CalcError::invalid(format!(
                "WEEKNUM: unknown return type {} (use 1, 2, 11-17 or 21)",
                other
            )))
        }
    };
    let jan1 = NaiveDate::from_yo_opt(date.year(), 1)
        .ok_or_else(|| CalcError::invalid(format!("WEEKNUM: year {} out of range", date.year())))?;
    let lead = days_after(jan1.weekday(), first_day);
    Ok((date.ordinal0() + lead) / 7 + 1)
}

/// ISOWEEKNUM(date)
pub fn isoweeknum(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

// ═══════════════════════════════════════════════════════════════════════════
// BUSINESS DAYS
// ═══════════════════════════════════════════════════════════════════════════

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Monday to Friday and not a holiday
pub fn is_business_day(date: NaiveDate, holidays: &[NaiveDate]) -> bool {
    !is_weekend(date) && !holidays.contains(&date)
}

/// WORKDAY(start, days, holidays): the date `days` business days away.
/// The start date itself is never counted; `days == 0` returns it unchanged.
pub fn workday(start: NaiveDate, days: i64, holidays: &[NaiveDate]) -> CalcResult<NaiveDate> {
    let holidays: HashSet<NaiveDate> = holidays.iter().copied().collect();
    let step = if days >= 0 { 1 } else { -1 };
    let mut remaining = days.unsigned_abs();
    let mut current = start;

    while remaining > 0 {
        current = add_days(current, step)?;
        if !is_weekend(current) && !holidays.contains(&current) {
            remaining -= 1;
        } else {
            trace!(date = %current, "workday: skipping non-business day");
        }
    }

    debug!(%start, days, holidays = holidays.len(), result = %current, "workday");
    Ok(current)
}

/// NETWORKDAYS(start, end, holidays): business days from start to end, both
/// inclusive. Negative when `end` is before `start`.
pub fn networkdays(start: NaiveDate, end: NaiveDate, holidays: &[NaiveDate]) -> i64 {
    let holidays: HashSet<NaiveDate> = holidays.iter().copied().collect();
    let (from, to, sign) = if start <= end {
        (start, end, 1)
    } else {
        (end, start, -1)
    };

    let count = from
        .iter_days()
        .take_while(|d| *d <= to)
        .filter(|d| {
            let open = !is_weekend(*d) && !holidays.contains(d);
            trace!(date = %d, open, "networkdays");
            open
        })
        .count() as i64;

    debug!(%start, %end, holidays = holidays.len(), count, "networkdays");
    count * sign
}
