//! Single-item mutations: join, leave, delete, status changes.
//!
//! [`MutationDispatcher::perform`] follows one fixed sequence: mark the
//! item pending, confirm destructive actions, call the endpoint, then
//! notify. The pending mark is a guard, so the item is released on every
//! exit path including a dropped future. Failures are never retried.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use crate::api::MutationApi;
use crate::domain::{EventBus, ItemAction, ItemId, ListEvent, MutationResult, PendingActionSet};
use crate::notify::{ErrorReporter, Notice};

/// Asks the user to confirm a destructive action.
///
/// Blocking by contract: the dispatcher waits for the answer before
/// sending anything.
pub trait Confirm: Send + Sync {
    /// Returns `true` if the user accepts `prompt`.
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirms every prompt; for non-interactive callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Local record of which groups the user belongs to.
///
/// Updated as soon as a join or leave succeeds, ahead of the re-fetch, so
/// the "joined" view does not flicker. A controller tracking membership
/// merges the flags of every page it applies.
#[derive(Debug, Clone, Default)]
pub struct MembershipCache {
    joined: Arc<Mutex<HashSet<ItemId>>>,
}

impl MembershipCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole cache.
    pub fn replace(&self, ids: impl IntoIterator<Item = ItemId>) {
        *self.lock() = ids.into_iter().collect();
    }

    /// Merges `(id, joined)` flags reported by the backend. Groups not
    /// listed keep their current state.
    pub fn merge(&self, flags: impl IntoIterator<Item = (ItemId, bool)>) {
        let mut joined = self.lock();
        for (id, member) in flags {
            if member {
                joined.insert(id);
            } else {
                joined.remove(&id);
            }
        }
    }

    /// Returns `true` if the user is a member of `id`.
    #[must_use]
    pub fn is_joined(&self, id: ItemId) -> bool {
        self.lock().contains(&id)
    }

    /// Number of joined groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if the user belongs to no group.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn apply(&self, id: ItemId, action: &ItemAction) {
        match action {
            ItemAction::Join => {
                self.lock().insert(id);
            }
            ItemAction::Leave | ItemAction::Delete => {
                self.lock().remove(&id);
            }
            _ => {}
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<ItemId>> {
        self.joined.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// How a call to [`MutationDispatcher::perform`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The endpoint accepted the mutation.
    Completed,
    /// The user declined the confirmation; no request was sent.
    Declined,
    /// The request failed; the error was reported.
    Failed,
    /// The item already had a mutation in flight; nothing was done.
    AlreadyPending,
}

/// Runs single-item mutations for one resource.
pub struct MutationDispatcher {
    resource: &'static str,
    noun: &'static str,
    api: Arc<dyn MutationApi>,
    pending: PendingActionSet,
    membership: MembershipCache,
    confirm: Arc<dyn Confirm>,
    reporter: ErrorReporter,
    events: EventBus,
}

impl MutationDispatcher {
    /// Creates a dispatcher.
    #[must_use]
    pub fn new(
        resource: &'static str,
        noun: &'static str,
        api: Arc<dyn MutationApi>,
        confirm: Arc<dyn Confirm>,
        reporter: ErrorReporter,
        events: EventBus,
    ) -> Self {
        Self {
            resource,
            noun,
            api,
            pending: PendingActionSet::new(),
            membership: MembershipCache::new(),
            confirm,
            reporter,
            events,
        }
    }

    /// The set of items with a mutation in flight (read-only for callers).
    #[must_use]
    pub fn pending(&self) -> &PendingActionSet {
        &self.pending
    }

    /// The optimistic membership cache.
    #[must_use]
    pub fn membership(&self) -> &MembershipCache {
        &self.membership
    }

    /// Applies `action` to `id`.
    ///
    /// Errors are reported through the [`ErrorReporter`] and surface here
    /// only as [`MutationOutcome::Failed`].
    pub async fn perform(&self, id: ItemId, action: ItemAction) -> MutationOutcome {
        let Some(_guard) = self.pending.begin(id, action.pending_kind()) else {
            tracing::debug!(resource = self.resource, %id, %action, "mutation already pending");
            return MutationOutcome::AlreadyPending;
        };
        self.publish_started(id, &action);

        if let Some(prompt) = action.confirmation_prompt(self.noun)
            && !self.confirm.confirm(&prompt)
        {
            tracing::debug!(resource = self.resource, %id, %action, "mutation declined");
            self.publish_finished(id, &action, MutationResult::Declined);
            return MutationOutcome::Declined;
        }

        match self.api.mutate(id, &action).await {
            Ok(()) => {
                tracing::info!(resource = self.resource, %id, %action, "mutation completed");
                self.membership.apply(id, &action);
                self.reporter
                    .notifier()
                    .notify(Notice::success(action.success_message(self.noun)));
                self.publish_finished(id, &action, MutationResult::Completed);
                MutationOutcome::Completed
            }
            Err(e) => {
                self.reporter.report(&e).await;
                self.publish_finished(id, &action, MutationResult::Failed);
                MutationOutcome::Failed
            }
        }
    }

    fn publish_started(&self, item_id: ItemId, action: &ItemAction) {
        let _ = self.events.publish(ListEvent::MutationStarted {
            resource: self.resource,
            item_id,
            action: action.name().to_string(),
            timestamp: Utc::now(),
        });
    }

    fn publish_finished(&self, item_id: ItemId, action: &ItemAction, outcome: MutationResult) {
        let _ = self.events.publish(ListEvent::MutationFinished {
            resource: self.resource,
            item_id,
            action: action.name().to_string(),
            outcome,
            timestamp: Utc::now(),
        });
    }
}

impl fmt::Debug for MutationDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationDispatcher")
            .field("resource", &self.resource)
            .field("pending", &self.pending)
            .field("membership", &self.membership)
            .finish_non_exhaustive()
    }
}
