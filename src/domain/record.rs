//! Storage wire form of entries and the snapshot built from it.
//!
//! Rows are decoded one at a time from loose JSON so a single bad row
//! (unknown type, a string amount, an unparsable date) is isolated instead of
//! failing the whole load.

use std::cmp::Reverse;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::entry::{Entry, EntryId, EntryKind};
use crate::errors::{FinanceError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryRecord {
    #[serde(
        default,
        deserialize_with = "opaque_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub amount: f64,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Ids are opaque: strings pass through, numeric ids keep their digits.
fn opaque_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) => Ok(Some(id)),
        Some(Value::Number(id)) => Ok(Some(id.to_string())),
        Some(other) => Err(de::Error::custom(format!("unsupported id `{other}`"))),
    }
}

impl From<&Entry> for EntryRecord {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id.as_ref().map(|id| id.as_str().to_string()),
            kind: entry.kind.wire_name().to_string(),
            category: entry.category.clone(),
            amount: entry.amount,
            date: entry.date.format(DATE_FORMAT).to_string(),
            description: entry.description.clone(),
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

impl TryFrom<EntryRecord> for Entry {
    type Error = FinanceError;

    fn try_from(record: EntryRecord) -> Result<Self> {
        let id_label = record.id.as_deref();
        let kind = match record.kind.as_str() {
            "gasto" => EntryKind::Expense,
            "ingreso" => EntryKind::Income,
            "inversion" => EntryKind::Investment,
            other => {
                return Err(FinanceError::malformed(
                    id_label,
                    format!("unknown entry type `{other}`"),
                ))
            }
        };
        let date = parse_calendar_date(&record.date)
            .ok_or_else(|| FinanceError::malformed(id_label, format!("bad date `{}`", record.date)))?;
        if !record.amount.is_finite() {
            return Err(FinanceError::malformed(id_label, "amount is not finite"));
        }
        Ok(Entry {
            id: record.id.map(EntryId::from),
            kind,
            category: record.category,
            amount: record.amount,
            date,
            description: record.description,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// Best-effort id of a raw stored row, readable even when the row is not.
pub fn row_id(row: &Value) -> Option<String> {
    match row.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Decodes one raw stored row into an [`Entry`].
pub fn decode_row(row: &Value) -> Result<Entry> {
    let record = EntryRecord::deserialize(row)
        .map_err(|err| FinanceError::malformed(row_id(row).as_deref(), err.to_string()))?;
    Entry::try_from(record)
}

/// Parses a stored `YYYY-MM-DD` string as a local calendar date.
///
/// A trailing time component (`2024-06-01T00:00:00Z`, `2024-06-01 10:30`) is
/// dropped rather than converted, so the calendar day never shifts across a
/// timezone boundary. Any other trailing text makes the date invalid.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let day_part = trimmed.get(..10)?;
    if !is_iso_day(day_part) {
        return None;
    }
    let day = NaiveDate::parse_from_str(day_part, DATE_FORMAT).ok()?;
    let suffix = &trimmed[10..];
    (suffix.is_empty() || is_time_suffix(day_part, suffix)).then_some(day)
}

fn is_iso_day(day_part: &str) -> bool {
    day_part.bytes().enumerate().all(|(index, byte)| match index {
        4 | 7 => byte == b'-',
        _ => byte.is_ascii_digit(),
    })
}

fn is_time_suffix(day_part: &str, suffix: &str) -> bool {
    let Some(time) = suffix.strip_prefix('T').or_else(|| suffix.strip_prefix(' ')) else {
        return false;
    };
    let stamp = format!("{day_part}T{time}");
    DateTime::parse_from_rfc3339(&stamp).is_ok()
        || TIME_FORMATS
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(&stamp, format).is_ok())
}

/// A stored row that could not be turned into an [`Entry`].
#[derive(Debug, Clone)]
pub struct RejectedRecord {
    pub id: Option<String>,
    pub row: Value,
    pub reason: String,
}

/// Read model handed to the engine: valid entries plus isolated rejects.
#[derive(Debug, Clone, Default)]
pub struct EntrySnapshot {
    pub entries: Vec<Entry>,
    pub rejected: Vec<RejectedRecord>,
}

impl EntrySnapshot {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            rejected: Vec::new(),
        }
    }

    pub fn from_rows(rows: Vec<Value>) -> Self {
        let mut snapshot = Self::default();
        for row in rows {
            match decode_row(&row) {
                Ok(entry) => snapshot.entries.push(entry),
                Err(err) => {
                    tracing::warn!(error = %err, "skipping malformed entry record");
                    snapshot.rejected.push(RejectedRecord {
                        id: row_id(&row),
                        row,
                        reason: err.to_string(),
                    });
                }
            }
        }
        snapshot
    }

    /// Orders entries most recently created first, undated ones last.
    ///
    /// Expects entries in insertion order; equal timestamps keep the later
    /// insertion first.
    pub fn sort_newest_first(&mut self) {
        self.entries.reverse();
        self.entries.sort_by_key(|entry| Reverse(entry.created_at));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
