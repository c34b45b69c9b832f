//! Modal bookkeeping and the page scroll lock.
//!
//! The page scroll is locked while at least one modal is open. Each open
//! modal holds a [`ModalGuard`]; the lock is released when the last guard
//! is dropped, on every exit path.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Tracks open modals.
#[derive(Debug, Clone, Default)]
pub struct Chrome {
    open_modals: Arc<AtomicUsize>,
}

impl Chrome {
    /// Creates chrome with no modal open.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a modal, locking page scroll until the guard is released.
    #[must_use = "dropping the guard closes the modal"]
    pub fn open_modal(&self) -> ModalGuard {
        let open = self.open_modals.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::trace!(open, "modal opened");
        ModalGuard {
            open_modals: Arc::clone(&self.open_modals),
        }
    }

    /// Closes the modal held by `guard`.
    pub fn close_modal(&self, guard: ModalGuard) {
        drop(guard);
    }

    /// Number of modals currently open.
    #[must_use]
    pub fn open_modals(&self) -> usize {
        self.open_modals.load(Ordering::Acquire)
    }

    /// Whether page scroll is locked.
    #[must_use]
    pub fn is_scroll_locked(&self) -> bool {
        self.open_modals() > 0
    }
}

/// One open modal. Dropping it closes the modal.
#[derive(Debug)]
pub struct ModalGuard {
    open_modals: Arc<AtomicUsize>,
}

impl Drop for ModalGuard {
    fn drop(&mut self) {
        let open = self.open_modals.fetch_sub(1, Ordering::AcqRel).saturating_sub(1);
        tracing::trace!(open, "modal closed");
    }
}
