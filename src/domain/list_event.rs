//! Events emitted by list controllers for the render layer.
//!
//! Every fetch transition, mutation transition and notice is published as
//! a [`ListEvent`] through the [`super::EventBus`]. A render layer
//! subscribes once and redraws the affected region.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ItemId;
use crate::notify::Notice;

/// Event published by a list controller or the notification center.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum ListEvent {
    /// A list request was issued.
    FetchStarted {
        /// Resource name (e.g. `"groups"`).
        resource: &'static str,
        /// Sequence number of the request.
        seq: u64,
        /// Requested page.
        page: u32,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A list response replaced the displayed result.
    FetchApplied {
        /// Resource name.
        resource: &'static str,
        /// Sequence number of the request.
        seq: u64,
        /// Items on the applied page.
        item_count: usize,
        /// Total items across all pages.
        total_count: u64,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A list response arrived after a newer request started and was
    /// thrown away.
    FetchDiscarded {
        /// Resource name.
        resource: &'static str,
        /// Sequence number of the stale request.
        seq: u64,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// The newest list request failed.
    FetchFailed {
        /// Resource name.
        resource: &'static str,
        /// Sequence number of the request.
        seq: u64,
        /// Error description.
        error: String,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A mutation began; the item's control should show progress.
    MutationStarted {
        /// Resource name.
        resource: &'static str,
        /// Target item.
        item_id: ItemId,
        /// Action name (e.g. `"leave"`).
        action: String,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A mutation finished, successfully or not, or was declined.
    MutationFinished {
        /// Resource name.
        resource: &'static str,
        /// Target item.
        item_id: ItemId,
        /// Action name.
        action: String,
        /// How it ended.
        outcome: MutationResult,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A user-visible notice was raised.
    Notice(Notice),

    /// A notice was dismissed.
    NoticeDismissed {
        /// Id of the dismissed notice.
        notice_id: uuid::Uuid,
    },
}

/// Terminal state of a mutation as seen by the render layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationResult {
    /// The endpoint accepted the mutation.
    Completed,
    /// The user declined the confirmation; nothing was sent.
    Declined,
    /// The endpoint rejected the mutation or was unreachable.
    Failed,
}

impl ListEvent {
    /// Returns the resource this event concerns, if any.
    #[must_use]
    pub fn resource(&self) -> Option<&'static str> {
        match self {
            Self::FetchStarted { resource, .. }
            | Self::FetchApplied { resource, .. }
            | Self::FetchDiscarded { resource, .. }
            | Self::FetchFailed { resource, .. }
            | Self::MutationStarted { resource, .. }
            | Self::MutationFinished { resource, .. } => Some(resource),
            Self::Notice(_) | Self::NoticeDismissed { .. } => None,
        }
    }
}
