//! One page of a resource list as returned by the backend.

use serde::Serialize;

/// The items of the current page plus the collection totals.
///
/// Replaced wholesale on every applied fetch; never patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListResult<T> {
    items: Vec<T>,
    total_count: u64,
    total_pages: u32,
}

impl<T> ListResult<T> {
    /// Builds a result, clamping `total_pages` to at least 1.
    #[must_use]
    pub fn new(items: Vec<T>, total_count: u64, total_pages: u32) -> Self {
        Self {
            items,
            total_count,
            total_pages: total_pages.max(1),
        }
    }

    /// An empty list with a single (empty) page.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, 1)
    }

    /// Items on the current page, in server order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Total number of items across all pages.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Total number of pages (always at least 1).
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Returns `true` if the current page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the result, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for ListResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}
