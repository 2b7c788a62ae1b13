//! Date/time string verification.
//!
//! Which restriction groups are present selects the expected format:
//! date-only (`%Y-%m-%d`), time-only (`%H:%M:%S`), or combined. Restriction
//! bounds that fail to parse are developer faults; a value that fails to
//! parse is a format error; a parsed value outside the window is a data
//! error.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::fault::Fault;
use crate::schema::{DateTimeRules, FieldValue};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const COMBINED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn check(name: &str, value: &FieldValue, rules: &DateTimeRules, today: NaiveDate) -> Vec<Fault> {
    let FieldValue::Str(data) = value else {
        return vec![Fault::Data(format!(
            "{name} type is invalid. Expected str but received {}",
            value.kind_name()
        ))];
    };

    // Defaults: a century either side of today, and the full day.
    let default_min_date = shift_years(today, -100).to_string();
    let default_max_date = shift_years(today, 100).to_string();

    let (min_date, max_date) = match &rules.date {
        Some(window) => (
            window.min.clone().unwrap_or(default_min_date),
            window.max.clone().unwrap_or(default_max_date),
        ),
        None => (default_min_date, default_max_date),
    };

    let (min_time, max_time) = match &rules.time {
        Some(window) => (
            window.min.clone().unwrap_or_else(|| "00:00:00".to_owned()),
            window.max.clone().unwrap_or_else(|| "23:59:59".to_owned()),
        ),
        None => ("00:00:00".to_owned(), "23:59:59".to_owned()),
    };

    match (rules.date.is_some(), rules.time.is_some()) {
        (true, true) => {
            let min = match NaiveDateTime::parse_from_str(
                &format!("{min_date} {min_time}"),
                COMBINED_FORMAT,
            ) {
                Ok(v) => v,
                Err(_) => return vec![bound_fault(name, "min")],
            };
            let max = match NaiveDateTime::parse_from_str(
                &format!("{max_date} {max_time}"),
                COMBINED_FORMAT,
            ) {
                Ok(v) => v,
                Err(_) => return vec![bound_fault(name, "max")],
            };
            match NaiveDateTime::parse_from_str(data, COMBINED_FORMAT) {
                Ok(parsed) => range_fault(name, parsed, min, max),
                Err(_) => vec![format_fault(name)],
            }
        }
        (true, false) => {
            let min = match NaiveDate::parse_from_str(&min_date, DATE_FORMAT) {
                Ok(v) => v,
                Err(_) => return vec![bound_fault(name, "min")],
            };
            let max = match NaiveDate::parse_from_str(&max_date, DATE_FORMAT) {
                Ok(v) => v,
                Err(_) => return vec![bound_fault(name, "max")],
            };
            match NaiveDate::parse_from_str(data, DATE_FORMAT) {
                Ok(parsed) => range_fault(name, parsed, min, max),
                Err(_) => vec![format_fault(name)],
            }
        }
        (false, true) => {
            let min = match NaiveTime::parse_from_str(&min_time, TIME_FORMAT) {
                Ok(v) => v,
                Err(_) => return vec![bound_fault(name, "min")],
            };
            let max = match NaiveTime::parse_from_str(&max_time, TIME_FORMAT) {
                Ok(v) => v,
                Err(_) => return vec![bound_fault(name, "max")],
            };
            match NaiveTime::parse_from_str(data, TIME_FORMAT) {
                Ok(parsed) => range_fault(name, parsed, min, max),
                Err(_) => vec![format_fault(name)],
            }
        }
        // No restriction group selects no format; nothing can match.
        (false, false) => vec![format_fault(name)],
    }
}

fn format_fault(name: &str) -> Fault {
    Fault::Data(format!(
        "{name} invalid datetime format. Expected YYYY-MM-DD"
    ))
}

fn bound_fault(name: &str, bound: &str) -> Fault {
    Fault::Developer(format!(
        "{name}-restriction-{bound} is invalid. Bound is not parseable in the selected format"
    ))
}

fn range_fault<T: PartialOrd>(name: &str, parsed: T, min: T, max: T) -> Vec<Fault> {
    if parsed < min || parsed > max {
        vec![Fault::Data(format!("{name} datetime out of range"))]
    } else {
        Vec::new()
    }
}

/// Shift a date by whole years, clamping Feb 29 to Feb 28 when the target
/// year is not a leap year.
fn shift_years(date: NaiveDate, years: i32) -> NaiveDate {
    use chrono::Datelike;
    let year = date.year() + years;
    date.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
        .unwrap_or(date)
}
