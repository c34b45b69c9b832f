//! User-visible notices and the center that holds them.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{EventBus, ListEvent};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// An action succeeded.
    Success,
    /// Neutral information.
    Info,
    /// Degraded service (e.g. maintenance mode).
    Warning,
    /// An action failed.
    Error,
}

/// A dismissable message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Id used to dismiss the notice.
    pub id: Uuid,
    /// Severity.
    pub level: NoticeLevel,
    /// Text shown to the user.
    pub message: String,
    /// When the notice was raised.
    pub timestamp: DateTime<Utc>,
}

impl Notice {
    /// Creates a notice with a fresh id.
    #[must_use]
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// Shorthand for a [`NoticeLevel::Success`] notice.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    /// Shorthand for a [`NoticeLevel::Error`] notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

/// Receives notices for display.
pub trait Notifier: Send + Sync + fmt::Debug {
    /// Shows `notice` to the user.
    fn notify(&self, notice: Notice);
}

/// Holds active notices until dismissed and mirrors them on the event bus.
#[derive(Debug)]
pub struct NotificationCenter {
    active: Mutex<Vec<Notice>>,
    events: EventBus,
}

impl NotificationCenter {
    /// Creates a center publishing on `events`.
    #[must_use]
    pub fn new(events: EventBus) -> Self {
        Self {
            active: Mutex::new(Vec::new()),
            events,
        }
    }

    /// Notices not yet dismissed, oldest first.
    #[must_use]
    pub fn active(&self) -> Vec<Notice> {
        self.lock().clone()
    }

    /// Dismisses a notice. Returns `false` if it was not active.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let removed = {
            let mut active = self.lock();
            let before = active.len();
            active.retain(|n| n.id != id);
            active.len() != before
        };
        if removed {
            let _ = self.events.publish(ListEvent::NoticeDismissed { notice_id: id });
        }
        removed
    }

    /// Dismisses every active notice.
    pub fn dismiss_all(&self) {
        let drained: Vec<Notice> = self.lock().drain(..).collect();
        for notice in drained {
            let _ = self
                .events
                .publish(ListEvent::NoticeDismissed { notice_id: notice.id });
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notice>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => tracing::warn!(message = %notice.message, "error notice"),
            _ => tracing::debug!(level = ?notice.level, message = %notice.message, "notice"),
        }
        self.lock().push(notice.clone());
        let _ = self.events.publish(ListEvent::Notice(notice));
    }
}
