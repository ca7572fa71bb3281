//! Keeps a summary in step with a repository's change feed.
//!
//! Every notification triggers a full re-read of the repository; the
//! summary is always recomputed from a complete snapshot, never patched
//! incrementally.

use std::{sync::Arc, time::Duration};

use crate::{
    core::{
        services::{PeriodSummary, SummaryRequest, SummaryService},
        Clock,
    },
    domain::EntrySnapshot,
    errors::{FinanceError, Result},
    period::shift_month,
    storage::{EntryRepository, Subscription},
};

pub struct LiveSummary<R: EntryRepository> {
    repository: Arc<R>,
    subscription: Subscription,
    request: SummaryRequest,
    snapshot: Option<EntrySnapshot>,
    refreshes: u64,
}

impl<R: EntryRepository> LiveSummary<R> {
    /// Subscribes to `repository`. No snapshot is held until the first refresh.
    pub fn new(repository: Arc<R>, request: SummaryRequest) -> Self {
        let subscription = repository.subscribe();
        Self {
            repository,
            subscription,
            request,
            snapshot: None,
            refreshes: 0,
        }
    }

    /// Re-reads the repository. On failure the previous snapshot is kept.
    pub fn refresh(&mut self) -> Result<()> {
        match self.repository.list() {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                self.refreshes += 1;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "refresh failed, keeping previous snapshot");
                Err(err)
            }
        }
    }

    /// Drains pending notifications and refreshes once if any arrived.
    ///
    /// Returns whether a refresh happened.
    pub fn poll(&mut self) -> Result<bool> {
        let changes = self.subscription.drain()?;
        if changes.is_empty() {
            return Ok(false);
        }
        tracing::debug!(changes = changes.len(), "entry changes received");
        self.refresh()?;
        Ok(true)
    }

    /// Blocks up to `timeout` for a change, then behaves like [`poll`](Self::poll).
    pub fn wait_for_change(&mut self, timeout: Duration) -> Result<bool> {
        match self.subscription.wait(timeout)? {
            Some(_) => {
                // Collapse any burst that arrived alongside the first change.
                self.subscription.drain()?;
                self.refresh()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn summary(&self, clock: &dyn Clock) -> Result<PeriodSummary> {
        let snapshot = self
            .snapshot
            .as_ref()
            .ok_or(FinanceError::SnapshotUnavailable)?;
        Ok(SummaryService::summarize(
            snapshot,
            &self.request,
            clock.today(),
        ))
    }

    pub fn snapshot(&self) -> Option<&EntrySnapshot> {
        self.snapshot.as_ref()
    }

    pub fn request(&self) -> SummaryRequest {
        self.request
    }

    pub fn set_request(&mut self, request: SummaryRequest) {
        self.request = request;
    }

    /// Moves the month reference by `months` (negative goes back).
    pub fn navigate_months(&mut self, months: i32) {
        self.request.reference = shift_month(self.request.reference, months);
    }

    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::FixedClock,
        domain::{EntryKind, NewEntry},
        period::RangeSelector,
        storage::MemoryEntryStore,
    };
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn summary_requires_a_first_refresh() {
        let store = Arc::new(MemoryEntryStore::new());
        let live = LiveSummary::new(store, SummaryRequest::month(date(2024, 6, 1)));
        let clock = FixedClock::new(date(2024, 6, 15));
        assert!(matches!(
            live.summary(&clock),
            Err(FinanceError::SnapshotUnavailable)
        ));
    }

    #[test]
    fn burst_of_changes_refreshes_once() {
        let store = Arc::new(MemoryEntryStore::new());
        let mut live = LiveSummary::new(Arc::clone(&store), SummaryRequest::month(date(2024, 6, 1)));
        live.refresh().unwrap();

        for amount in [10.0, 20.0, 30.0] {
            store
                .create(NewEntry::new(EntryKind::Expense, "Gas", amount, date(2024, 6, 4)))
                .unwrap();
        }

        assert!(live.poll().unwrap());
        assert_eq!(live.refresh_count(), 2);
        assert!(!live.poll().unwrap());
        assert_eq!(live.snapshot().map(EntrySnapshot::len), Some(3));

        let summary = live.summary(&FixedClock::new(date(2024, 6, 15))).unwrap();
        assert_eq!(summary.totals.expense, 60.0);
    }

    #[test]
    fn navigation_moves_reference_month() {
        let store = Arc::new(MemoryEntryStore::new());
        let mut live = LiveSummary::new(store, SummaryRequest::month(date(2024, 1, 31)));
        live.navigate_months(-1);
        assert_eq!(live.request().reference, date(2023, 12, 31));
        live.navigate_months(2);
        assert_eq!(live.request().reference, date(2024, 2, 29));

        live.set_request(SummaryRequest::new(RangeSelector::Year, date(2024, 6, 1)));
        assert_eq!(live.request().selector, RangeSelector::Year);
    }
}
