use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{FinanceError, Result};

/// Closed set of financial movements an entry can record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryKind {
    #[serde(rename = "gasto")]
    Expense,
    #[serde(rename = "ingreso")]
    Income,
    #[serde(rename = "inversion")]
    Investment,
}

impl EntryKind {
    pub const ALL: [EntryKind; 3] = [EntryKind::Expense, EntryKind::Income, EntryKind::Investment];

    /// Identifier used by the storage wire format.
    pub fn wire_name(self) -> &'static str {
        match self {
            EntryKind::Expense => "gasto",
            EntryKind::Income => "ingreso",
            EntryKind::Investment => "inversion",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Expense => "Expense",
            EntryKind::Income => "Income",
            EntryKind::Investment => "Investment",
        };
        f.pad(label)
    }
}

impl FromStr for EntryKind {
    type Err = FinanceError;

    /// Accepts both the wire names and the English labels.
    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gasto" | "expense" => Ok(EntryKind::Expense),
            "ingreso" | "income" => Ok(EntryKind::Income),
            "inversion" | "investment" => Ok(EntryKind::Investment),
            other => Err(FinanceError::InvalidInput(format!(
                "unknown entry type `{other}`"
            ))),
        }
    }
}

/// Opaque entry identifier. Stores assign v4 UUIDs, but any string a store
/// hands back (such as "17" from an older export) is accepted as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One persisted financial movement. The engine only ever reads these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntryId>,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub category: String,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entry {
    /// Builds an unsaved entry; the repository assigns id and timestamps.
    pub fn new(
        kind: EntryKind,
        category: impl Into<String>,
        amount: f64,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            kind,
            category: category.into(),
            amount,
            date,
            description: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Entries with a NaN or infinite amount are left out of every aggregate.
    pub fn is_aggregatable(&self) -> bool {
        self.amount.is_finite()
    }

    pub fn display_label(&self) -> String {
        format!(
            "{} {} {:.2} [{}]",
            self.date, self.category, self.amount, self.kind
        )
    }
}

/// Input for creating an entry: everything except repository-owned fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub category: String,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewEntry {
    pub fn new(
        kind: EntryKind,
        category: impl Into<String>,
        amount: f64,
        date: NaiveDate,
    ) -> Self {
        Self {
            kind,
            category: category.into(),
            amount,
            date,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_fields(&self.category, self.amount)
    }

    pub(crate) fn into_entry(self, id: EntryId, now: DateTime<Utc>) -> Entry {
        Entry {
            id: Some(id),
            kind: self.kind,
            category: self.category,
            amount: self.amount,
            date: self.date,
            description: self.description,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EntryPatch {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntryKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

impl EntryPatch {
    pub fn has_effect(&self) -> bool {
        self.kind.is_some()
            || self.category.is_some()
            || self.amount.is_some()
            || self.date.is_some()
            || self.description.is_some()
    }

    /// Applies the patch to a copy of `entry`, validating the result.
    pub fn apply_to(&self, entry: &Entry) -> Result<Entry> {
        let mut updated = entry.clone();
        if let Some(kind) = self.kind {
            updated.kind = kind;
        }
        if let Some(category) = &self.category {
            updated.category = category.clone();
        }
        if let Some(amount) = self.amount {
            updated.amount = amount;
        }
        if let Some(date) = self.date {
            updated.date = date;
        }
        if let Some(description) = &self.description {
            updated.description = description.clone();
        }
        validate_fields(&updated.category, updated.amount)?;
        Ok(updated)
    }
}

fn validate_fields(category: &str, amount: f64) -> Result<()> {
    if category.trim().is_empty() {
        return Err(FinanceError::InvalidInput("category is required".into()));
    }
    if !amount.is_finite() {
        return Err(FinanceError::InvalidInput(format!(
            "amount must be a finite number, got {amount}"
        )));
    }
    if amount < 0.0 {
        return Err(FinanceError::InvalidInput(format!(
            "amount must not be negative, got {amount}"
        )));
    }
    Ok(())
}
