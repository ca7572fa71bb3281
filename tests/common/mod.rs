#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use finance_core::domain::{Entry, EntryKind};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh directory that outlives the calling test.
pub fn scratch_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn expense(category: &str, amount: f64, on: NaiveDate) -> Entry {
    Entry::new(EntryKind::Expense, category, amount, on)
}

pub fn income(category: &str, amount: f64, on: NaiveDate) -> Entry {
    Entry::new(EntryKind::Income, category, amount, on)
}

pub fn investment(category: &str, amount: f64, on: NaiveDate) -> Entry {
    Entry::new(EntryKind::Investment, category, amount, on)
}
