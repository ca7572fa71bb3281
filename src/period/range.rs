use std::{fmt, str::FromStr};

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::errors::{FinanceError, Result};

/// Weeks run Thursday to Wednesday.
pub const WEEK_START: Weekday = Weekday::Thu;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RangeSelector {
    Week,
    Month,
    Year,
}

impl fmt::Display for RangeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RangeSelector::Week => "week",
            RangeSelector::Month => "month",
            RangeSelector::Year => "year",
        };
        f.write_str(label)
    }
}

impl FromStr for RangeSelector {
    type Err = FinanceError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "week" | "thisweek" => Ok(RangeSelector::Week),
            "month" | "thismonth" => Ok(RangeSelector::Month),
            "year" | "thisyear" => Ok(RangeSelector::Year),
            other => Err(FinanceError::InvalidInput(format!(
                "unknown range `{other}` (expected week, month or year)"
            ))),
        }
    }
}

/// Inclusive calendar-date interval.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(FinanceError::InvalidInput(
                "range end must not precede start".into(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

/// Resolves the interval a selector refers to.
///
/// Only months are steppable: `Week` and `Year` always follow `today`, while
/// `Month` follows the navigated `reference` date.
pub fn resolve_range(selector: RangeSelector, reference: NaiveDate, today: NaiveDate) -> DateRange {
    match selector {
        RangeSelector::Week => week_range(today),
        RangeSelector::Month => month_range(reference),
        RangeSelector::Year => year_range(today),
    }
}

pub fn week_range(date: NaiveDate) -> DateRange {
    let start = last_weekday_on_or_before(date, WEEK_START);
    DateRange {
        start,
        end: start + Duration::days(6),
    }
}

pub fn month_range(date: NaiveDate) -> DateRange {
    let start = date - Duration::days(date.day0() as i64);
    DateRange {
        start,
        end: last_day_before(start.checked_add_months(Months::new(1))),
    }
}

pub fn year_range(date: NaiveDate) -> DateRange {
    let start = date - Duration::days(date.ordinal0() as i64);
    DateRange {
        start,
        end: last_day_before(start.checked_add_months(Months::new(12))),
    }
}

/// Day before `next_start`; the last representable date when that overflowed.
fn last_day_before(next_start: Option<NaiveDate>) -> NaiveDate {
    next_start
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// The twelve calendar months of the year containing `date`.
pub fn months_of_year(date: NaiveDate) -> Vec<DateRange> {
    let first = year_range(date).start;
    (0..12).map(|offset| month_range(shift_month(first, offset))).collect()
}

/// Steps a date by whole months, clamping the day to the target month's length.
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let magnitude = Months::new(months.unsigned_abs());
    let shifted = if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    };
    shifted.unwrap_or(date)
}

/// Length of a calendar month, `None` for an invalid year/month pair.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|first| month_range(first).end.day())
}

pub(crate) fn last_weekday_on_or_before(date: NaiveDate, weekday: Weekday) -> NaiveDate {
    let current = date.weekday().num_days_from_monday() as i64;
    let target = weekday.num_days_from_monday() as i64;
    date - Duration::days((current - target).rem_euclid(7))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_runs_thursday_to_wednesday() {
        // 2024-06-12 is a Wednesday.
        let range = week_range(date(2024, 6, 12));
        assert_eq!(range.start, date(2024, 6, 6));
        assert_eq!(range.end, date(2024, 6, 12));
        assert_eq!(range.start.weekday(), Weekday::Thu);

        let on_thursday = week_range(date(2024, 6, 13));
        assert_eq!(on_thursday.start, date(2024, 6, 13));
    }

    #[test]
    fn month_range_handles_leap_february() {
        let range = month_range(date(2024, 2, 17));
        assert_eq!(range.start, date(2024, 2, 1));
        assert_eq!(range.end, date(2024, 2, 29));
        assert_eq!(range.num_days(), 29);
        assert_eq!(month_range(date(2023, 2, 1)).end, date(2023, 2, 28));
    }

    #[test]
    fn days_in_month_follows_the_calendar() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(1900, 2), Some(28));
        assert_eq!(days_in_month(2000, 2), Some(29));
        assert_eq!(days_in_month(2024, 12), Some(31));
        assert_eq!(days_in_month(2024, 13), None);
        assert_eq!(year_range(date(2023, 5, 5)).num_days(), 365);
    }

    #[test]
    fn resolve_range_ignores_reference_for_week_and_year() {
        let reference = date(2023, 3, 15);
        let today = date(2024, 6, 12);
        assert_eq!(
            resolve_range(RangeSelector::Month, reference, today),
            month_range(reference)
        );
        assert_eq!(
            resolve_range(RangeSelector::Year, reference, today),
            DateRange::new(date(2024, 1, 1), date(2024, 12, 31)).unwrap()
        );
        assert_eq!(
            resolve_range(RangeSelector::Week, reference, today),
            week_range(today)
        );
    }

    #[test]
    fn shift_month_clamps_day_and_crosses_years() {
        assert_eq!(shift_month(date(2024, 1, 31), 1), date(2024, 2, 29));
        assert_eq!(shift_month(date(2024, 1, 15), -1), date(2023, 12, 15));
        assert_eq!(shift_month(date(2024, 11, 30), 3), date(2025, 2, 28));
    }

    #[test]
    fn months_of_year_covers_every_day_once() {
        let months = months_of_year(date(2024, 7, 4));
        assert_eq!(months.len(), 12);
        let total: i64 = months.iter().map(DateRange::num_days).sum();
        assert_eq!(total, 366);
        for pair in months.windows(2) {
            assert_eq!(pair[0].end + Duration::days(1), pair[1].start);
        }
    }

    #[test]
    fn selector_parses_case_insensitively() {
        assert_eq!("Month".parse::<RangeSelector>().unwrap(), RangeSelector::Month);
        assert_eq!("thisWeek".parse::<RangeSelector>().unwrap(), RangeSelector::Week);
        assert!("decade".parse::<RangeSelector>().is_err());
    }
}
