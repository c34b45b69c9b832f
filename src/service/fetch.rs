//! Request sequencing for list fetches.
//!
//! Each fetch takes a [`FetchTicket`] from the [`FetchSequencer`] when it
//! snapshots the query. When the response arrives, it may be applied only
//! if the ticket is still the newest one issued: responses are applied in
//! request order, never arrival order, and a response that lost the race
//! to a newer request is thrown away.

use std::sync::atomic::{AtomicU64, Ordering};

/// Sequence number of one list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

impl FetchTicket {
    /// The raw sequence number.
    #[must_use]
    pub const fn seq(self) -> u64 {
        self.0
    }
}

/// Issues monotonically increasing fetch tickets.
#[derive(Debug, Default)]
pub struct FetchSequencer {
    latest: AtomicU64,
}

impl FetchSequencer {
    /// Creates a sequencer; the first ticket is 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket newer than every ticket issued so far, superseding
    /// them.
    pub fn begin(&self) -> FetchTicket {
        FetchTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Returns `true` if no newer ticket has been issued since `ticket`.
    #[must_use]
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// Supersedes every outstanding ticket without starting a fetch, so
    /// their results are discarded on arrival.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }
}

/// Whether a list request is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    /// No request outstanding.
    #[default]
    Idle,
    /// The newest request has not resolved yet.
    Fetching,
}

/// What to show after the newest fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Clear the list to empty and show the error state.
    #[default]
    ClearToEmpty,
    /// Keep showing the previous result (joined/all toggles).
    KeepPrevious,
}

/// How one call to `refresh` ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the displayed result.
    Applied {
        /// Ticket of the applied request.
        ticket: FetchTicket,
        /// Total items across all pages.
        total_count: u64,
    },
    /// A newer request was issued before this one resolved; its result
    /// (success or failure) was dropped.
    Superseded {
        /// Ticket of the dropped request.
        ticket: FetchTicket,
    },
    /// The newest request failed and the failure policy was applied.
    Failed {
        /// Ticket of the failed request.
        ticket: FetchTicket,
    },
}

impl FetchOutcome {
    /// Returns `true` for [`FetchOutcome::Applied`].
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}
