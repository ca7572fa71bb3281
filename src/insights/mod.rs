//! Qualitative findings derived from aggregate figures.
//!
//! Rules are plain data: an ordered table of predicate and message functions.
//! Evaluation keeps table order and every matching rule fires.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::{retained_income_rate, CategoryAggregate, DerivedRatios, Totals};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Positive,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Positive => "positive",
            Severity::Warning => "warning",
        })
    }
}

/// Figures the rules look at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightInput {
    pub totals: Totals,
    pub ratios: DerivedRatios,
    pub top_expense: Option<CategoryAggregate>,
}

pub struct InsightRule {
    pub key: &'static str,
    pub severity: Severity,
    pub title: &'static str,
    pub applies: fn(&InsightInput) -> bool,
    pub message: fn(&InsightInput) -> String,
}

impl fmt::Debug for InsightRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsightRule")
            .field("key", &self.key)
            .field("severity", &self.severity)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Finding {
    pub key: String,
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

pub fn evaluate(rules: &[InsightRule], input: &InsightInput) -> Vec<Finding> {
    rules
        .iter()
        .filter(|rule| (rule.applies)(input))
        .map(|rule| Finding {
            key: rule.key.to_string(),
            severity: rule.severity,
            title: rule.title.to_string(),
            message: (rule.message)(input),
        })
        .collect()
}

pub const HIGH_EFFICIENCY_PCT: f64 = 20.0;
pub const HIGH_SAVINGS_PCT: f64 = 30.0;
pub const CASH_FLOW_MULTIPLIER: f64 = 2.0;
pub const EXPENSE_CONCENTRATION_PCT: f64 = 40.0;
pub const HIGH_RETAINED_PCT: f64 = 20.0;

/// Rules for the analytics view.
pub static DEFAULT_RULES: [InsightRule; 4] = [
    InsightRule {
        key: "high_roi",
        severity: Severity::Positive,
        title: "Excellent ROI",
        applies: high_efficiency,
        message: high_efficiency_message,
    },
    InsightRule {
        key: "losing_investments",
        severity: Severity::Warning,
        title: "Investments at a loss",
        applies: negative_efficiency,
        message: negative_efficiency_message,
    },
    InsightRule {
        key: "high_savings",
        severity: Severity::Positive,
        title: "Excellent savings",
        applies: high_savings,
        message: high_savings_message,
    },
    InsightRule {
        key: "positive_cash_flow",
        severity: Severity::Positive,
        title: "Positive cash flow",
        applies: strong_cash_flow,
        message: strong_cash_flow_message,
    },
];

/// Rules for the reports view.
pub static REPORT_RULES: [InsightRule; 3] = [
    InsightRule {
        key: "expense_concentration",
        severity: Severity::Warning,
        title: "Expense concentration",
        applies: concentrated_expenses,
        message: concentrated_expenses_message,
    },
    InsightRule {
        key: "surplus",
        severity: Severity::Positive,
        title: "Great management",
        applies: has_surplus,
        message: surplus_message,
    },
    InsightRule {
        key: "high_retained_income",
        severity: Severity::Positive,
        title: "Great savings rate",
        applies: high_retained_income,
        message: high_retained_income_message,
    },
];

fn high_efficiency(input: &InsightInput) -> bool {
    input.ratios.investment_efficiency > HIGH_EFFICIENCY_PCT
}

fn high_efficiency_message(input: &InsightInput) -> String {
    format!(
        "Your investments have an efficiency of {:.1}%",
        input.ratios.investment_efficiency
    )
}

fn negative_efficiency(input: &InsightInput) -> bool {
    input.ratios.investment_efficiency < 0.0
}

fn negative_efficiency_message(input: &InsightInput) -> String {
    format!(
        "Your investments are losing {:.1}%",
        input.ratios.investment_efficiency.abs()
    )
}

fn high_savings(input: &InsightInput) -> bool {
    input.ratios.savings_rate > HIGH_SAVINGS_PCT
}

fn high_savings_message(input: &InsightInput) -> String {
    format!(
        "You are saving {:.1}% of your income",
        input.ratios.savings_rate
    )
}

fn strong_cash_flow(input: &InsightInput) -> bool {
    input.ratios.avg_income_per_day > input.ratios.avg_expense_per_day * CASH_FLOW_MULTIPLIER
}

fn strong_cash_flow_message(_: &InsightInput) -> String {
    "Your daily income is more than double your daily expenses".to_string()
}

fn concentrated_expenses(input: &InsightInput) -> bool {
    input
        .top_expense
        .as_ref()
        .is_some_and(|top| top.percentage_of_type_total > EXPENSE_CONCENTRATION_PCT)
}

fn concentrated_expenses_message(input: &InsightInput) -> String {
    match &input.top_expense {
        Some(top) => format!(
            "{} accounts for {:.1}% of your expenses",
            top.category, top.percentage_of_type_total
        ),
        None => String::new(),
    }
}

fn has_surplus(input: &InsightInput) -> bool {
    input.totals.balance > 0.0
}

fn surplus_message(input: &InsightInput) -> String {
    format!("You have a surplus of {:.2}", input.totals.balance)
}

fn high_retained_income(input: &InsightInput) -> bool {
    retained_income_rate(&input.totals) > HIGH_RETAINED_PCT
}

fn high_retained_income_message(input: &InsightInput) -> String {
    format!(
        "You are keeping {:.1}% of your income",
        retained_income_rate(&input.totals)
    )
}
