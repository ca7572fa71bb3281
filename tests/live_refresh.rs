mod common;

use std::{sync::Arc, thread, time::Duration};

use common::{date, scratch_dir};
use finance_core::{
    core::{services::SummaryRequest, FixedClock},
    domain::{EntryKind, EntryPatch, NewEntry},
    errors::FinanceError,
    storage::{EntryRepository, JsonEntryStore, MemoryEntryStore},
    sync::LiveSummary,
};

fn clock() -> FixedClock {
    FixedClock::new(date(2024, 6, 15))
}

#[test]
fn summary_follows_repository_changes() {
    let store = Arc::new(MemoryEntryStore::new());
    let mut live = LiveSummary::new(Arc::clone(&store), SummaryRequest::month(date(2024, 6, 1)));
    live.refresh().expect("initial refresh");
    assert!(live.summary(&clock()).expect("summary").is_empty());

    let sale = store
        .create(NewEntry::new(EntryKind::Income, "Ventas", 800.0, date(2024, 6, 3)))
        .expect("create");
    assert!(live.poll().expect("poll"));
    assert_eq!(live.summary(&clock()).expect("summary").totals.income, 800.0);

    store
        .update(
            sale.id.as_ref().expect("id"),
            EntryPatch {
                amount: Some(900.0),
                ..EntryPatch::default()
            },
        )
        .expect("update");
    assert!(live.poll().expect("poll"));
    assert_eq!(live.summary(&clock()).expect("summary").totals.income, 900.0);

    store.delete(sale.id.as_ref().expect("id")).expect("delete");
    assert!(live.poll().expect("poll"));
    assert!(live.summary(&clock()).expect("summary").is_empty());
    assert_eq!(live.refresh_count(), 4);
}

#[test]
fn waiting_picks_up_changes_from_another_thread() {
    let store = Arc::new(JsonEntryStore::new(scratch_dir().join("entries.json")));
    let mut live = LiveSummary::new(Arc::clone(&store), SummaryRequest::month(date(2024, 6, 1)));

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            store
                .create(NewEntry::new(EntryKind::Investment, "Bonos", 250.0, date(2024, 6, 12)))
                .expect("create");
        })
    };

    assert!(live.wait_for_change(Duration::from_secs(5)).expect("wait"));
    writer.join().expect("writer thread");

    let summary = live.summary(&clock()).expect("summary");
    assert_eq!(summary.totals.investment, 250.0);
    assert_eq!(summary.totals.balance, -250.0);
}

#[test]
fn failed_refresh_keeps_last_good_snapshot() {
    let path = scratch_dir().join("entries.json");
    let store = Arc::new(JsonEntryStore::new(&path));
    store
        .create(NewEntry::new(EntryKind::Expense, "Gas", 40.0, date(2024, 6, 2)))
        .expect("create");

    let mut live = LiveSummary::new(Arc::clone(&store), SummaryRequest::month(date(2024, 6, 1)));
    live.refresh().expect("first refresh");

    std::fs::write(&path, "not json").expect("corrupt store");
    assert!(matches!(live.refresh(), Err(FinanceError::StorageError(_))));
    assert_eq!(live.summary(&clock()).expect("summary").totals.expense, 40.0);
}

#[test]
fn quiet_feed_times_out_without_refreshing() {
    let store = Arc::new(MemoryEntryStore::new());
    let mut live = LiveSummary::new(store, SummaryRequest::month(date(2024, 6, 1)));
    assert!(!live.wait_for_change(Duration::from_millis(20)).expect("wait"));
    assert_eq!(live.refresh_count(), 0);
    assert!(matches!(
        live.summary(&clock()),
        Err(FinanceError::SnapshotUnavailable)
    ));
}
