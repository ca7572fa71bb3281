use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Entry, EntryKind};
use crate::period::{months_of_year, DateRange};

/// Per-kind sums of a set of entries.
///
/// `balance` is income minus investment. Expenses are deliberately left out: it
/// measures income retained after funding investments.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Totals {
    pub expense: f64,
    pub income: f64,
    pub investment: f64,
    pub balance: f64,
    pub entry_count: usize,
}

impl Totals {
    pub fn amount_for(&self, kind: EntryKind) -> f64 {
        match kind {
            EntryKind::Expense => self.expense,
            EntryKind::Income => self.income,
            EntryKind::Investment => self.investment,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    fn add(&mut self, entry: &Entry) {
        match entry.kind {
            EntryKind::Expense => self.expense += entry.amount,
            EntryKind::Income => self.income += entry.amount,
            EntryKind::Investment => self.investment += entry.amount,
        }
        self.entry_count += 1;
        self.balance = self.income - self.investment;
    }
}

impl<'a> FromIterator<&'a Entry> for Totals {
    fn from_iter<I: IntoIterator<Item = &'a Entry>>(iter: I) -> Self {
        let mut totals = Totals::default();
        for entry in iter.into_iter().filter(|entry| entry.is_aggregatable()) {
            totals.add(entry);
        }
        totals
    }
}

pub fn aggregate_totals(entries: &[Entry]) -> Totals {
    entries.iter().collect()
}

/// Keeps entries dated inside `range`, both ends included.
pub fn filter_by_range(entries: &[Entry], range: &DateRange) -> Vec<Entry> {
    entries
        .iter()
        .filter(|entry| range.contains(entry.date))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyAggregate {
    pub month: DateRange,
    pub totals: Totals,
}

/// Totals for each calendar month of the year containing `year_anchor`.
pub fn monthly_breakdown(entries: &[Entry], year_anchor: NaiveDate) -> Vec<MonthlyAggregate> {
    months_of_year(year_anchor)
        .into_iter()
        .map(|month| MonthlyAggregate {
            month,
            totals: entries
                .iter()
                .filter(|entry| month.contains(entry.date))
                .collect(),
        })
        .collect()
}
