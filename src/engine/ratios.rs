use serde::{Deserialize, Serialize};

use super::totals::Totals;

/// Rates derived from a [`Totals`] bundle over a number of days.
///
/// Every field is finite: a zero denominator yields `0.0`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct DerivedRatios {
    pub avg_income_per_day: f64,
    pub avg_expense_per_day: f64,
    pub investment_efficiency: f64,
    pub savings_rate: f64,
}

pub fn derived_ratios(totals: &Totals, days_in_period: i64) -> DerivedRatios {
    let days = days_in_period.max(0) as f64;
    DerivedRatios {
        avg_income_per_day: safe_div(totals.income, days),
        avg_expense_per_day: safe_div(totals.expense, days),
        investment_efficiency: return_on_investment(totals),
        savings_rate: percentage(
            totals.income - totals.expense - totals.investment,
            totals.income,
        ),
    }
}

/// Balance as a percentage of the amount invested.
pub fn return_on_investment(totals: &Totals) -> f64 {
    percentage(totals.balance, totals.investment)
}

/// Share of income kept after investing (`balance / income`), as a percentage.
pub fn retained_income_rate(totals: &Totals) -> f64 {
    percentage(totals.balance, totals.income)
}

pub(crate) fn percentage(part: f64, whole: f64) -> f64 {
    safe_div(part, whole) * 100.0
}

fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        let value = numerator / denominator;
        if value.is_finite() {
            return value;
        }
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(income: f64, expense: f64, investment: f64) -> Totals {
        Totals {
            income,
            expense,
            investment,
            balance: income - investment,
            entry_count: 3,
        }
    }

    #[test]
    fn savings_rate_subtracts_expenses_and_investments() {
        let ratios = derived_ratios(&totals(10_000.0, 3_000.0, 1_000.0), 30);
        assert_eq!(ratios.savings_rate, 60.0);
        assert_eq!(ratios.investment_efficiency, 900.0);
        assert_eq!(ratios.avg_expense_per_day, 100.0);
    }

    #[test]
    fn zero_denominators_yield_zero() {
        let ratios = derived_ratios(&Totals::default(), 0);
        assert_eq!(ratios, DerivedRatios::default());

        let spend_only = derived_ratios(&totals(0.0, 50.0, 0.0), -3);
        assert_eq!(spend_only.avg_expense_per_day, 0.0);
        assert_eq!(spend_only.savings_rate, 0.0);
    }

    #[test]
    fn losses_give_negative_efficiency() {
        let ratios = derived_ratios(&totals(0.0, 0.0, 200.0), 11);
        assert_eq!(ratios.investment_efficiency, -100.0);
    }

    #[test]
    fn retained_rate_uses_balance() {
        assert_eq!(retained_income_rate(&totals(1000.0, 999.0, 250.0)), 75.0);
        assert_eq!(retained_income_rate(&totals(0.0, 0.0, 250.0)), 0.0);
    }
}
