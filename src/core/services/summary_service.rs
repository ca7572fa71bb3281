use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Entry, EntryKind, EntrySnapshot};
use crate::engine::{
    aggregate_by_work_period, aggregate_totals, aggregate_work_period, category_breakdown,
    category_usage, derived_ratios, filter_by_range, monthly_breakdown, CategoryBreakdown,
    CategoryUsage, DerivedRatios, MonthlyAggregate, PeriodAggregate, Totals,
};
use crate::insights::{evaluate, Finding, InsightInput, DEFAULT_RULES, REPORT_RULES};
use crate::period::{
    recent_work_periods, resolve_range, work_period_containing, DateRange, RangeSelector,
};

/// Which slice of time a summary covers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryRequest {
    pub selector: RangeSelector,
    /// Month navigation anchor. Ignored by `Week` and `Year`, which follow today.
    pub reference: NaiveDate,
}

impl SummaryRequest {
    pub fn new(selector: RangeSelector, reference: NaiveDate) -> Self {
        Self {
            selector,
            reference,
        }
    }

    pub fn month(reference: NaiveDate) -> Self {
        Self::new(RangeSelector::Month, reference)
    }
}

/// Everything the analytics and report views render for one range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodSummary {
    pub range: DateRange,
    pub totals: Totals,
    pub categories: CategoryBreakdown,
    pub work_periods: Vec<PeriodAggregate>,
    /// Work period containing today, regardless of the selected range.
    pub current_period: PeriodAggregate,
    /// Day of today inside `current_period`, 1 through 11.
    pub current_period_day: i64,
    /// Category usage counts inside the range, most frequent first.
    pub most_used: Vec<CategoryUsage>,
    pub ratios: DerivedRatios,
    pub findings: Vec<Finding>,
    pub report_findings: Vec<Finding>,
    pub rejected_records: usize,
}

impl PeriodSummary {
    /// True when the range holds no entries ("no entries yet", not an error).
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

pub struct SummaryService;

impl SummaryService {
    pub fn summarize(
        snapshot: &EntrySnapshot,
        request: &SummaryRequest,
        today: NaiveDate,
    ) -> PeriodSummary {
        let range = resolve_range(request.selector, request.reference, today);
        let in_range = filter_by_range(&snapshot.entries, &range);
        let totals = aggregate_totals(&in_range);
        let categories = category_breakdown(&in_range);
        let ratios = derived_ratios(&totals, range.num_days());
        let input = Self::insight_input(totals, ratios, &categories);
        let current_period = Self::current_work_period(&snapshot.entries, today);
        let current_period_day = current_period.period.day_of(today).unwrap_or(1);

        tracing::debug!(
            selector = %request.selector,
            %range,
            entries = totals.entry_count,
            "summarized entry snapshot"
        );

        PeriodSummary {
            range,
            totals,
            work_periods: aggregate_by_work_period(&snapshot.entries, request.reference),
            most_used: category_usage(&in_range),
            categories,
            current_period,
            current_period_day,
            ratios,
            findings: evaluate(&DEFAULT_RULES, &input),
            report_findings: evaluate(&REPORT_RULES, &input),
            rejected_records: snapshot.rejected.len(),
        }
    }

    pub fn insight_input(
        totals: Totals,
        ratios: DerivedRatios,
        categories: &CategoryBreakdown,
    ) -> InsightInput {
        InsightInput {
            totals,
            ratios,
            top_expense: categories.top(EntryKind::Expense).cloned(),
        }
    }

    /// The last `limit` consecutive work periods up to today's, newest
    /// first, with empty periods dropped.
    pub fn work_period_history(
        entries: &[Entry],
        today: NaiveDate,
        limit: usize,
    ) -> Vec<PeriodAggregate> {
        recent_work_periods(today, limit)
            .into_iter()
            .map(|period| aggregate_work_period(entries, period))
            .filter(|period| !period.is_empty())
            .collect()
    }

    pub fn current_work_period(entries: &[Entry], today: NaiveDate) -> PeriodAggregate {
        aggregate_work_period(entries, work_period_containing(today))
    }

    pub fn yearly_overview(entries: &[Entry], today: NaiveDate) -> Vec<MonthlyAggregate> {
        monthly_breakdown(entries, today)
    }
}
