//! Eleven-day work periods anchored on Thursdays.
//!
//! A month is tiled starting from the Thursday on or before its first day. Each
//! period covers 11 calendar days and the next one starts the day after, until a
//! start would fall past the month's last day. Periods are never clipped, so the
//! first may begin in the previous month and the last may end in the next one.

use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::range::{last_weekday_on_or_before, month_range, DateRange, WEEK_START};

pub const WORK_PERIOD_DAYS: i64 = 11;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WorkPeriod {
    pub fn starting(start: NaiveDate) -> Self {
        Self {
            start,
            end: start + Duration::days(WORK_PERIOD_DAYS - 1),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        is_within_work_period(date, self)
    }

    /// The period that immediately follows this one.
    pub fn next(&self) -> Self {
        Self::starting(self.start + Duration::days(WORK_PERIOD_DAYS))
    }

    /// The period that immediately precedes this one.
    pub fn previous(&self) -> Self {
        Self::starting(self.start - Duration::days(WORK_PERIOD_DAYS))
    }

    /// 1-based day number of `date` inside the period.
    pub fn day_of(&self, date: NaiveDate) -> Option<i64> {
        self.contains(date).then(|| (date - self.start).num_days() + 1)
    }

    pub fn as_range(&self) -> DateRange {
        DateRange {
            start: self.start,
            end: self.end,
        }
    }

    /// Short chart label, e.g. `30/05`.
    pub fn label(&self) -> String {
        self.start.format("%d/%m").to_string()
    }
}

impl fmt::Display for WorkPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start.format("%d/%m"), self.end.format("%d/%m"))
    }
}

/// Thursday on or before the first day of the month containing `anchor`.
pub fn first_period_start(anchor: NaiveDate) -> NaiveDate {
    last_weekday_on_or_before(month_range(anchor).start, WEEK_START)
}

pub fn generate_work_periods(anchor: NaiveDate) -> Vec<WorkPeriod> {
    let month_end = month_range(anchor).end;
    let mut periods = Vec::new();
    let mut current = WorkPeriod::starting(first_period_start(anchor));
    while current.start <= month_end {
        periods.push(current);
        current = current.next();
    }
    periods
}

pub fn is_within_work_period(date: NaiveDate, period: &WorkPeriod) -> bool {
    date >= period.start && date <= period.end
}

/// The period of `date`'s own month tiling that contains `date`.
pub fn work_period_containing(date: NaiveDate) -> WorkPeriod {
    let first = first_period_start(date);
    let index = (date - first).num_days() / WORK_PERIOD_DAYS;
    WorkPeriod::starting(first + Duration::days(index * WORK_PERIOD_DAYS))
}

/// The `count` consecutive periods ending with the one containing `today`,
/// newest first. Walking back crosses month boundaries freely.
pub fn recent_work_periods(today: NaiveDate, count: usize) -> Vec<WorkPeriod> {
    let mut periods = Vec::with_capacity(count);
    let mut current = work_period_containing(today);
    for _ in 0..count {
        periods.push(current);
        current = current.previous();
    }
    periods
}
