use std::{cmp::Ordering, collections::HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::{Entry, EntryKind};

use super::ratios::percentage;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryAggregate {
    pub category: String,
    pub amount: f64,
    pub percentage_of_type_total: f64,
    pub entry_count: usize,
}

/// Groups entries of `kind` by category name, largest amount first.
///
/// Ties keep the order in which categories were first seen. Category names are
/// not checked against the vocabulary; unknown names form their own bucket.
pub fn aggregate_by_category(entries: &[Entry], kind: EntryKind) -> Vec<CategoryAggregate> {
    let mut buckets: Vec<CategoryAggregate> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut kind_total = 0.0;

    for entry in entries
        .iter()
        .filter(|entry| entry.kind == kind && entry.is_aggregatable())
    {
        let slot = *index.entry(entry.category.as_str()).or_insert_with(|| {
            buckets.push(CategoryAggregate {
                category: entry.category.clone(),
                amount: 0.0,
                percentage_of_type_total: 0.0,
                entry_count: 0,
            });
            buckets.len() - 1
        });
        buckets[slot].amount += entry.amount;
        buckets[slot].entry_count += 1;
        kind_total += entry.amount;
    }

    for bucket in &mut buckets {
        bucket.percentage_of_type_total = percentage(bucket.amount, kind_total);
    }
    buckets.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(Ordering::Equal));
    buckets
}

/// Category aggregates for all three kinds at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryBreakdown {
    pub expense: Vec<CategoryAggregate>,
    pub income: Vec<CategoryAggregate>,
    pub investment: Vec<CategoryAggregate>,
}

impl CategoryBreakdown {
    pub fn for_kind(&self, kind: EntryKind) -> &[CategoryAggregate] {
        match kind {
            EntryKind::Expense => &self.expense,
            EntryKind::Income => &self.income,
            EntryKind::Investment => &self.investment,
        }
    }

    /// Largest category of `kind`, if any entries exist.
    pub fn top(&self, kind: EntryKind) -> Option<&CategoryAggregate> {
        self.for_kind(kind).first()
    }
}

pub fn category_breakdown(entries: &[Entry]) -> CategoryBreakdown {
    CategoryBreakdown {
        expense: aggregate_by_category(entries, EntryKind::Expense),
        income: aggregate_by_category(entries, EntryKind::Income),
        investment: aggregate_by_category(entries, EntryKind::Investment),
    }
}

/// How often a `(kind, category)` pair was used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryUsage {
    pub kind: EntryKind,
    pub category: String,
    pub count: usize,
}

/// Most used categories across every kind, most frequent first.
pub fn category_usage(entries: &[Entry]) -> Vec<CategoryUsage> {
    let mut usage: Vec<CategoryUsage> = Vec::new();
    let mut index: HashMap<(EntryKind, &str), usize> = HashMap::new();
    for entry in entries {
        let key = (entry.kind, entry.category.as_str());
        match index.get(&key) {
            Some(&slot) => usage[slot].count += 1,
            None => {
                index.insert(key, usage.len());
                usage.push(CategoryUsage {
                    kind: entry.kind,
                    category: entry.category.clone(),
                    count: 1,
                });
            }
        }
    }
    usage.sort_by(|a, b| b.count.cmp(&a.count));
    usage
}
