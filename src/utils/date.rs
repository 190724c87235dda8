use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use regex::Regex;

const PERIOD_PATTERN: &str = r"^(\d{4})(?:-(\d{2})(?:-(\d{2}))?)?$";

/// First and last day of `month`.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next.pred_opt()?))
}

/// Expand one period (`YYYY`, `YYYY-MM` or `YYYY-MM-DD`) into its first and
/// last day.
fn period_bounds(re: &Regex, p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let invalid = || AppError::InvalidRange(p.to_string());
    let caps = re.captures(p.trim()).ok_or_else(invalid)?;

    let year: i32 = caps[1].parse().map_err(|_| invalid())?;
    let month: Option<u32> = caps.get(2).and_then(|m| m.as_str().parse().ok());
    let day: Option<u32> = caps.get(3).and_then(|m| m.as_str().parse().ok());

    match (month, day) {
        (None, _) => {
            let d1 = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)?;
            let d2 = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(invalid)?;
            Ok((d1, d2))
        }
        (Some(m), None) => month_bounds(year, m).ok_or_else(invalid),
        (Some(m), Some(d)) => {
            let date = NaiveDate::from_ymd_opt(year, m, d).ok_or_else(invalid)?;
            Ok((date, date))
        }
    }
}

/// Parse a `--period` / `--range` value into an inclusive date range.
///
/// Accepted:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - any of the above on both sides of a `:` (same format on both sides)
pub fn parse_period(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let re = Regex::new(PERIOD_PATTERN).map_err(|e| AppError::Other(e.to_string()))?;

    let (from, to) = match r.split_once(':') {
        Some((start, end)) => {
            if start.trim().len() != end.trim().len() {
                return Err(AppError::InvalidRange(format!(
                    "{r}: start and end must have the same format"
                )));
            }
            let (from, _) = period_bounds(&re, start)?;
            let (_, to) = period_bounds(&re, end)?;
            (from, to)
        }
        None => period_bounds(&re, r)?,
    };

    if from > to {
        return Err(AppError::InvalidRange(format!("{r}: start is after end")));
    }
    Ok((from, to))
}
