use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use serde_json::Value;

use super::{ChangeKind, ChangeNotifier, EntryChange, EntryRepository, Subscription};
use crate::{
    core::{
        utils::{write_atomic, PathResolver},
        Clock, SystemClock,
    },
    domain::{decode_row, row_id, Entry, EntryId, EntryPatch, EntryRecord, EntrySnapshot, NewEntry},
    errors::{FinanceError, Result},
};

/// Repository backed by a single JSON array of entry records.
///
/// Rows are kept as raw JSON values between reads and writes. Rows that fail
/// to decode stay in the file untouched; they are only reported through
/// [`EntrySnapshot::rejected`].
pub struct JsonEntryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
    notifier: ChangeNotifier,
    clock: Arc<dyn Clock>,
}

impl JsonEntryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, Arc::new(SystemClock))
    }

    pub fn with_clock(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            notifier: ChangeNotifier::default(),
            clock,
        }
    }

    /// Store file under the application base directory.
    pub fn new_default() -> Self {
        Self::new(PathResolver::store_file_in(&PathResolver::base_dir()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_rows(&self) -> Result<Vec<Value>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&data).map_err(|err| {
            FinanceError::StorageError(format!(
                "failed to parse `{}`: {err}",
                self.path.display()
            ))
        })
    }

    fn write_rows(&self, rows: &[Value]) -> Result<()> {
        let json = serde_json::to_string_pretty(rows)?;
        write_atomic(&self.path, &json)
    }

    /// Runs `mutate` against the rows under the write lock and persists them.
    fn modify<T>(&self, mutate: impl FnOnce(&mut Vec<Value>) -> Result<T>) -> Result<T> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut rows = self.read_rows()?;
        let outcome = mutate(&mut rows)?;
        self.write_rows(&rows)?;
        Ok(outcome)
    }
}

fn position_of(rows: &[Value], id: &EntryId) -> Result<usize> {
    rows.iter()
        .position(|row| row_id(row).as_deref() == Some(id.as_str()))
        .ok_or_else(|| FinanceError::EntryNotFound(id.to_string()))
}

impl EntryRepository for JsonEntryStore {
    fn list(&self) -> Result<EntrySnapshot> {
        let rows = {
            let _guard = self
                .write_lock
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            self.read_rows()?
        };
        let mut snapshot = EntrySnapshot::from_rows(rows);
        snapshot.sort_newest_first();
        tracing::debug!(
            path = %self.path.display(),
            entries = snapshot.len(),
            rejected = snapshot.rejected.len(),
            "loaded entry snapshot"
        );
        Ok(snapshot)
    }

    fn create(&self, entry: NewEntry) -> Result<Entry> {
        entry.validate()?;
        let id = EntryId::generate();
        let created = entry.into_entry(id.clone(), self.clock.now());
        self.modify(|rows| {
            rows.push(serde_json::to_value(EntryRecord::from(&created))?);
            Ok(())
        })?;
        tracing::info!(%id, kind = %created.kind, path = %self.path.display(), "entry created");
        self.notifier.publish(EntryChange {
            kind: ChangeKind::Insert,
            id,
        });
        Ok(created)
    }

    fn update(&self, id: &EntryId, patch: EntryPatch) -> Result<Entry> {
        let now = self.clock.now();
        let updated = self.modify(|rows| {
            let index = position_of(rows, id)?;
            let current = decode_row(&rows[index])?;
            let mut updated = patch.apply_to(&current)?;
            updated.updated_at = Some(now);
            rows[index] = serde_json::to_value(EntryRecord::from(&updated))?;
            Ok(updated)
        })?;
        tracing::info!(%id, path = %self.path.display(), "entry updated");
        self.notifier.publish(EntryChange {
            kind: ChangeKind::Update,
            id: id.clone(),
        });
        Ok(updated)
    }

    fn delete(&self, id: &EntryId) -> Result<()> {
        self.modify(|rows| {
            let index = position_of(rows, id)?;
            rows.remove(index);
            Ok(())
        })?;
        tracing::info!(%id, path = %self.path.display(), "entry deleted");
        self.notifier.publish(EntryChange {
            kind: ChangeKind::Delete,
            id: id.clone(),
        });
        Ok(())
    }

    fn subscribe(&self) -> Subscription {
        self.notifier.subscribe()
    }
}
