pub mod json_backend;
pub mod memory;

use std::{
    sync::{
        mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError},
        Mutex, PoisonError,
    },
    time::Duration,
};

use crate::{
    domain::{Entry, EntryId, EntryPatch, EntrySnapshot, NewEntry},
    errors::{FinanceError, Result},
};

/// Abstraction over backends that persist entries and announce changes.
///
/// The aggregation side only ever consumes `list()` snapshots; every mutation
/// is followed by an [`EntryChange`] on each live [`Subscription`].
pub trait EntryRepository: Send + Sync {
    /// Current entries, most recently created first.
    fn list(&self) -> Result<EntrySnapshot>;
    fn create(&self, entry: NewEntry) -> Result<Entry>;
    fn update(&self, id: &EntryId, patch: EntryPatch) -> Result<Entry>;
    fn delete(&self, id: &EntryId) -> Result<()>;
    fn subscribe(&self) -> Subscription;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryChange {
    pub kind: ChangeKind,
    pub id: EntryId,
}

/// Receiving end of a repository's change feed. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    receiver: Receiver<EntryChange>,
}

impl Subscription {
    /// Next pending change without blocking.
    pub fn try_next(&self) -> Result<Option<EntryChange>> {
        match self.receiver.try_recv() {
            Ok(change) => Ok(Some(change)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(FinanceError::SubscriptionClosed),
        }
    }

    /// Takes every pending change. Fails only when the feed is closed and empty.
    pub fn drain(&self) -> Result<Vec<EntryChange>> {
        let mut changes = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(change) => changes.push(change),
                Err(TryRecvError::Empty) => return Ok(changes),
                Err(TryRecvError::Disconnected) if changes.is_empty() => {
                    return Err(FinanceError::SubscriptionClosed)
                }
                Err(TryRecvError::Disconnected) => return Ok(changes),
            }
        }
    }

    /// Blocks up to `timeout` for the next change.
    pub fn wait(&self, timeout: Duration) -> Result<Option<EntryChange>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(change) => Ok(Some(change)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(FinanceError::SubscriptionClosed),
        }
    }
}

/// Fan-out of change events to every live subscription.
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    subscribers: Mutex<Vec<Sender<EntryChange>>>,
}

impl ChangeNotifier {
    pub fn subscribe(&self) -> Subscription {
        let (sender, receiver) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
        Subscription { receiver }
    }

    /// Sends `change` to all subscribers, pruning the ones that were dropped.
    pub fn publish(&self, change: EntryChange) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|sender| sender.send(change.clone()).is_ok());
        tracing::debug!(
            kind = ?change.kind,
            id = %change.id,
            subscribers = subscribers.len(),
            "published entry change"
        );
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

pub use json_backend::JsonEntryStore;
pub use memory::MemoryEntryStore;
