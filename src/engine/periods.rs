use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::Entry;
use crate::period::{generate_work_periods, WorkPeriod};

use super::ratios::return_on_investment;
use super::totals::Totals;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodAggregate {
    pub period: WorkPeriod,
    pub totals: Totals,
    pub roi: f64,
    /// Entries inside the period, most recent date first.
    pub entries: Vec<Entry>,
}

impl PeriodAggregate {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn aggregate_work_period(entries: &[Entry], period: WorkPeriod) -> PeriodAggregate {
    let mut members: Vec<Entry> = entries
        .iter()
        .filter(|entry| entry.is_aggregatable() && period.contains(entry.date))
        .cloned()
        .collect();
    members.sort_by(|a, b| b.date.cmp(&a.date));
    let totals: Totals = members.iter().collect();
    PeriodAggregate {
        period,
        roi: return_on_investment(&totals),
        totals,
        entries: members,
    }
}

/// Aggregates every work period of `anchor`'s month, in chronological order.
///
/// `entries` should be the whole snapshot: the first and last periods reach
/// into the neighbouring months and pick up entries dated there.
pub fn aggregate_by_work_period(entries: &[Entry], anchor: NaiveDate) -> Vec<PeriodAggregate> {
    generate_work_periods(anchor)
        .into_iter()
        .map(|period| aggregate_work_period(entries, period))
        .collect()
}
