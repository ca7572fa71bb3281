//! Pure aggregation over entry snapshots.
//!
//! Nothing here keeps state between calls or reads the clock; callers pass the
//! snapshot and dates in and recompute from scratch whenever entries change.

pub mod categories;
pub mod periods;
pub mod ratios;
pub mod totals;

pub use categories::{
    aggregate_by_category, category_breakdown, category_usage, CategoryAggregate,
    CategoryBreakdown, CategoryUsage,
};
pub use periods::{aggregate_by_work_period, aggregate_work_period, PeriodAggregate};
pub use ratios::{derived_ratios, retained_income_rate, return_on_investment, DerivedRatios};
pub use totals::{aggregate_totals, filter_by_range, monthly_breakdown, MonthlyAggregate, Totals};
