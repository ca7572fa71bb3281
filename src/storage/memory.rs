use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{ChangeKind, ChangeNotifier, EntryChange, EntryRepository, Subscription};
use crate::{
    core::{Clock, SystemClock},
    domain::{Entry, EntryId, EntryPatch, EntrySnapshot, NewEntry},
    errors::{FinanceError, Result},
};

/// Process-local repository, used by tests and embedders without a store file.
pub struct MemoryEntryStore {
    entries: Mutex<Vec<Entry>>,
    notifier: ChangeNotifier,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryEntryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            notifier: ChangeNotifier::default(),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EntryRepository for MemoryEntryStore {
    fn list(&self) -> Result<EntrySnapshot> {
        let mut snapshot = EntrySnapshot::new(self.lock().clone());
        snapshot.sort_newest_first();
        Ok(snapshot)
    }

    fn create(&self, entry: NewEntry) -> Result<Entry> {
        entry.validate()?;
        let id = EntryId::generate();
        let created = entry.into_entry(id.clone(), self.clock.now());
        self.lock().push(created.clone());
        tracing::info!(%id, kind = %created.kind, "entry created");
        self.notifier.publish(EntryChange {
            kind: ChangeKind::Insert,
            id,
        });
        Ok(created)
    }

    fn update(&self, id: &EntryId, patch: EntryPatch) -> Result<Entry> {
        let updated = {
            let mut entries = self.lock();
            let slot = entries
                .iter_mut()
                .find(|entry| entry.id.as_ref() == Some(id))
                .ok_or_else(|| FinanceError::EntryNotFound(id.to_string()))?;
            let mut updated = patch.apply_to(slot)?;
            updated.updated_at = Some(self.clock.now());
            *slot = updated.clone();
            updated
        };
        tracing::info!(%id, "entry updated");
        self.notifier.publish(EntryChange {
            kind: ChangeKind::Update,
            id: id.clone(),
        });
        Ok(updated)
    }

    fn delete(&self, id: &EntryId) -> Result<()> {
        {
            let mut entries = self.lock();
            let before = entries.len();
            entries.retain(|entry| entry.id.as_ref() != Some(id));
            if entries.len() == before {
                return Err(FinanceError::EntryNotFound(id.to_string()));
            }
        }
        tracing::info!(%id, "entry deleted");
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntryKind;
    use chrono::NaiveDate;

    fn new_entry(amount: f64) -> NewEntry {
        NewEntry::new(
            EntryKind::Expense,
            "Gas",
            amount,
            NaiveDate::from_ymd_opt(2024, 6, 4).unwrap(),
        )
    }

    #[test]
    fn create_update_delete_notify_in_order() {
        let store = MemoryEntryStore::new();
        let feed = store.subscribe();

        let created = store.create(new_entry(10.0)).unwrap();
        let id = created.id.unwrap();
        let patch = EntryPatch {
            amount: Some(25.0),
            ..EntryPatch::default()
        };
        assert_eq!(store.update(&id, patch).unwrap().amount, 25.0);
        store.delete(&id).unwrap();

        let kinds: Vec<ChangeKind> = feed.drain().unwrap().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ChangeKind::Insert, ChangeKind::Update, ChangeKind::Delete]
        );
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn unknown_id_is_not_found() {
        let store = MemoryEntryStore::new();
        let missing = EntryId::from("17");
        assert!(matches!(
            store.delete(&missing),
            Err(FinanceError::EntryNotFound(id)) if id == "17"
        ));
        assert!(matches!(
            store.update(&missing, EntryPatch::default()),
            Err(FinanceError::EntryNotFound(_))
        ));
    }

    #[test]
    fn invalid_entries_leave_store_untouched() {
        let store = MemoryEntryStore::new();
        let feed = store.subscribe();
        assert!(store.create(new_entry(-1.0)).is_err());
        assert!(store.list().unwrap().is_empty());
        assert!(feed.drain().unwrap().is_empty());
    }
}
