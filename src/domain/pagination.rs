//! Pagination window computation for page-number controls.
//!
//! The window is derived, never stored: it is recomputed from the current
//! page and the last result's page count whenever the list renders.

use serde::Serialize;

/// Default number of page buttons shown at once.
pub const DEFAULT_MAX_VISIBLE: u32 = 5;

/// One control in the rendered pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "page", rename_all = "snake_case")]
pub enum PageControl {
    /// Jump to page 1.
    First,
    /// Gap marker between a jump control and the window.
    Ellipsis,
    /// A numbered page button.
    Page(u32),
    /// Jump to the last page.
    Last(u32),
}

/// The visible slice of page numbers around the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationWindow {
    /// Page the window is centred on.
    pub current_page: u32,
    /// Last page of the list.
    pub total_pages: u32,
    /// First page number in the window.
    pub start_page: u32,
    /// Last page number in the window (inclusive).
    pub end_page: u32,
    /// Whether pages are hidden between page 1 and `start_page`.
    pub show_first_ellipsis: bool,
    /// Whether pages are hidden between `end_page` and the last page.
    pub show_last_ellipsis: bool,
}

impl PaginationWindow {
    /// Computes the window for `current_page` of `total_pages`.
    ///
    /// Returns `None` when there is at most one page: no controls are
    /// rendered at all. `current_page` is clamped into range and a
    /// `max_visible` of zero is treated as one.
    #[must_use]
    pub fn compute(current_page: u32, total_pages: u32, max_visible: u32) -> Option<Self> {
        if total_pages <= 1 {
            return None;
        }
        let current = current_page.clamp(1, total_pages);
        let visible = max_visible.clamp(1, total_pages);

        let half = visible / 2;
        let start = current.saturating_sub(half).max(1);
        let end = start.saturating_add(visible - 1).min(total_pages);
        let start = start.min(end - (visible - 1));

        Some(Self {
            current_page: current,
            total_pages,
            start_page: start,
            end_page: end,
            show_first_ellipsis: start > 2,
            show_last_ellipsis: end < total_pages.saturating_sub(1),
        })
    }

    /// Whether a jump-to-first control is shown.
    #[must_use]
    pub fn show_first(&self) -> bool {
        self.start_page > 1
    }

    /// Whether a jump-to-last control is shown.
    #[must_use]
    pub fn show_last(&self) -> bool {
        self.end_page < self.total_pages
    }

    /// Page numbers inside the window.
    pub fn pages(&self) -> impl Iterator<Item = u32> {
        self.start_page..=self.end_page
    }

    /// Flattens the window into render order.
    #[must_use]
    pub fn controls(&self) -> Vec<PageControl> {
        let span = usize::try_from(self.end_page - self.start_page).unwrap_or(0);
        let mut out = Vec::with_capacity(span.saturating_add(5));
        if self.show_first() {
            out.push(PageControl::First);
        }
        if self.show_first_ellipsis {
            out.push(PageControl::Ellipsis);
        }
        out.extend(self.pages().map(PageControl::Page));
        if self.show_last_ellipsis {
            out.push(PageControl::Ellipsis);
        }
        if self.show_last() {
            out.push(PageControl::Last(self.total_pages));
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn window(current: u32, total: u32) -> PaginationWindow {
        let Some(w) = PaginationWindow::compute(current, total, DEFAULT_MAX_VISIBLE) else {
            panic!("expected a window for {current}/{total}");
        };
        w
    }

    #[test]
    fn single_page_renders_nothing() {
        assert!(PaginationWindow::compute(1, 1, 5).is_none());
        assert!(PaginationWindow::compute(1, 0, 5).is_none());
    }

    #[test]
    fn first_page_of_ten() {
        let w = window(1, 10);
        assert_eq!(w.pages().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert!(!w.show_first_ellipsis);
        assert!(w.show_last_ellipsis);
        assert!(w.show_last());
        assert_eq!(
            w.controls(),
            vec![
                PageControl::Page(1),
                PageControl::Page(2),
                PageControl::Page(3),
                PageControl::Page(4),
                PageControl::Page(5),
                PageControl::Ellipsis,
                PageControl::Last(10),
            ]
        );
    }

    #[test]
    fn middle_page_is_centred() {
        let w = window(6, 10);
        assert_eq!((w.start_page, w.end_page), (4, 8));
        assert!(w.show_first_ellipsis);
        assert!(w.show_last_ellipsis);
        assert_eq!(w.controls().first(), Some(&PageControl::First));
    }

    #[test]
    fn last_page_clamps_to_end() {
        let w = window(10, 10);
        assert_eq!((w.start_page, w.end_page), (6, 10));
        assert!(w.show_first_ellipsis);
        assert!(!w.show_last_ellipsis);
        assert!(!w.show_last());
    }

    #[test]
    fn adjacent_boundary_needs_no_ellipsis() {
        let w = window(4, 10);
        assert_eq!((w.start_page, w.end_page), (2, 6));
        assert!(w.show_first());
        assert!(!w.show_first_ellipsis);
    }

    #[test]
    fn fewer_pages_than_visible() {
        let w = window(2, 3);
        assert_eq!(w.pages().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(!w.show_first() && !w.show_last());
    }

    #[test]
    fn window_always_contains_current_page() {
        for total in 2..30 {
            for current in 1..=total {
                let w = window(current, total);
                assert!(w.start_page <= current && current <= w.end_page);
                assert!(w.start_page >= 1 && w.end_page <= total);
            }
        }
    }

    #[test]
    fn window_near_u32_max_does_not_overflow() {
        let w = window(u32::MAX - 2, u32::MAX);
        assert_eq!((w.start_page, w.end_page), (u32::MAX - 4, u32::MAX));
        assert!(w.show_first_ellipsis);
        assert!(!w.show_last_ellipsis);
        assert!(!w.show_last());

        let controls = w.controls();
        assert_eq!(controls.len(), 7);
        assert_eq!(controls.first(), Some(&PageControl::First));
        assert_eq!(controls.get(1), Some(&PageControl::Ellipsis));
        assert_eq!(controls.last(), Some(&PageControl::Page(u32::MAX)));
    }

    #[test]
    fn last_page_of_u32_max_clamps_to_end() {
        let w = window(u32::MAX, u32::MAX);
        assert_eq!((w.start_page, w.end_page), (u32::MAX - 4, u32::MAX));
        assert_eq!(w.current_page, u32::MAX);
        assert!(!w.show_last_ellipsis);
        assert!(!w.controls().contains(&PageControl::Last(u32::MAX)));
    }
}
