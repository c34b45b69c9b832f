//! Ids of items with a mutation in flight.
//!
//! An id is inserted by [`PendingActionSet::begin`] before the mutation
//! request starts and removed when the returned [`PendingGuard`] drops, so
//! every exit path (success, failure, declined confirmation, a cancelled
//! future) releases it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use super::ItemId;

/// What an item is busy with; drives the progress label of its control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingKind {
    /// Joining a group.
    Joining,
    /// Leaving a group.
    Leaving,
    /// Deleting the item.
    Deleting,
    /// Changing the item's status.
    Updating,
}

impl PendingKind {
    /// Label shown on the item's control while the mutation runs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Joining => "Joining...",
            Self::Leaving => "Leaving...",
            Self::Deleting => "Deleting...",
            Self::Updating => "Updating...",
        }
    }
}

/// Shared set of item ids currently being mutated.
///
/// Cloning yields another handle to the same set. Only the
/// [`MutationDispatcher`](crate::service::MutationDispatcher) writes to it.
#[derive(Debug, Clone, Default)]
pub struct PendingActionSet {
    inner: Arc<Mutex<HashMap<ItemId, PendingKind>>>,
}

impl PendingActionSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `id` as busy with `kind`.
    ///
    /// Returns `None` if the id is already pending; its control is
    /// disabled, so a second action must not start.
    #[must_use]
    pub fn begin(&self, id: ItemId, kind: PendingKind) -> Option<PendingGuard> {
        let mut map = self.lock();
        if map.contains_key(&id) {
            return None;
        }
        map.insert(id, kind);
        Some(PendingGuard {
            set: self.clone(),
            id,
        })
    }

    /// Returns `true` if `id` has a mutation in flight.
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.lock().contains_key(&id)
    }

    /// Returns what `id` is busy with, if anything.
    #[must_use]
    pub fn kind_of(&self, id: ItemId) -> Option<PendingKind> {
        self.lock().get(&id).copied()
    }

    /// Snapshot of all pending ids with their kinds.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<ItemId, PendingKind> {
        self.lock().clone()
    }

    /// Number of pending ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Critical sections never await or panic, so a poisoned lock still
    // holds a consistent map.
    fn lock(&self) -> MutexGuard<'_, HashMap<ItemId, PendingKind>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases its id from the [`PendingActionSet`] on drop.
#[derive(Debug)]
pub struct PendingGuard {
    set: PendingActionSet,
    id: ItemId,
}

impl PendingGuard {
    /// The id this guard holds.
    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.set.lock().remove(&self.id);
    }
}
