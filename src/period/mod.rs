//! Calendar boundaries and the Thursday-anchored work-period tiling.

pub mod range;
pub mod work_period;

pub use range::{
    days_in_month, month_range, months_of_year, resolve_range, shift_month, week_range,
    year_range, DateRange, RangeSelector,
};
pub use work_period::{
    first_period_start, generate_work_periods, is_within_work_period, recent_work_periods,
    work_period_containing, WorkPeriod, WORK_PERIOD_DAYS,
};
