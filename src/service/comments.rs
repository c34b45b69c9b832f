//! Infinite-scroll comment feed.
//!
//! Unlike the paginated lists, a feed appends each page to what is
//! already shown. Page requests retry with linear backoff before the
//! failure is reported.

use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::fetch::FetchSequencer;
use super::retry::RetryPolicy;
use crate::api::ListApi;
use crate::api::dto::ListRequest;
use crate::notify::ErrorReporter;

/// How one call to [`CommentFeed::load_more`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOutcome {
    /// A page was appended.
    Loaded {
        /// Number of comments appended.
        added: usize,
    },
    /// Another load was already running; nothing was requested.
    Busy,
    /// Every page has been loaded; nothing was requested.
    Exhausted,
    /// The feed was reset while the page was loading; it was dropped.
    Superseded,
    /// All attempts failed; the error was reported.
    Failed,
}

struct FeedState<T> {
    items: Vec<T>,
    next_page: u32,
    total_pages: Option<u32>,
    loading: bool,
    error: Option<String>,
}

impl<T> FeedState<T> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            next_page: 1,
            total_pages: None,
            loading: false,
            error: None,
        }
    }

    fn has_more(&self) -> bool {
        self.total_pages.is_none_or(|total| self.next_page <= total)
    }
}

/// Comments of one post, loaded a page at a time.
pub struct CommentFeed<T> {
    api: Arc<dyn ListApi<T>>,
    page_size: u32,
    retry: RetryPolicy,
    reporter: ErrorReporter,
    sequencer: FetchSequencer,
    state: Mutex<FeedState<T>>,
}

impl<T: Send + 'static> CommentFeed<T> {
    /// Creates an empty feed.
    #[must_use]
    pub fn new(
        api: Arc<dyn ListApi<T>>,
        page_size: u32,
        retry: RetryPolicy,
        reporter: ErrorReporter,
    ) -> Self {
        Self {
            api,
            page_size: page_size.max(1),
            retry,
            reporter,
            sequencer: FetchSequencer::new(),
            state: Mutex::new(FeedState::new()),
        }
    }

    /// Loads the next page and appends it.
    ///
    /// A call made while a load is running returns [`FeedOutcome::Busy`]
    /// without issuing a request.
    pub async fn load_more(&self) -> FeedOutcome {
        let (ticket, request) = {
            let mut state = self.state.lock().await;
            if state.loading {
                return FeedOutcome::Busy;
            }
            if !state.has_more() {
                return FeedOutcome::Exhausted;
            }
            state.loading = true;
            (
                self.sequencer.begin(),
                ListRequest::page(state.next_page, self.page_size),
            )
        };
        tracing::debug!(page = request.page_number, seq = ticket.seq(), "loading comments");

        let result = self.retry.run(|| self.api.list(&request)).await;

        let mut state = self.state.lock().await;
        if !self.sequencer.is_current(ticket) {
            return FeedOutcome::Superseded;
        }
        state.loading = false;
        match result {
            Ok(page) => {
                state.total_pages = Some(page.total_pages());
                state.next_page = request.page_number.saturating_add(1);
                state.error = None;
                let items = page.into_items();
                let added = items.len();
                state.items.extend(items);
                FeedOutcome::Loaded { added }
            }
            Err(e) => {
                tracing::warn!(page = request.page_number, error = %e, "comment page failed");
                state.error = Some(e.user_messages().join("; "));
                drop(state);
                self.reporter.report(&e).await;
                FeedOutcome::Failed
            }
        }
    }

    /// Empties the feed; a load in flight is discarded when it lands.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        self.sequencer.invalidate();
        *state = FeedState::new();
    }

    /// Whether another page can be loaded.
    pub async fn has_more(&self) -> bool {
        self.state.lock().await.has_more()
    }

    /// Whether a page is being loaded.
    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.loading
    }

    /// Message of the last failed load, cleared on success.
    pub async fn error(&self) -> Option<String> {
        self.state.lock().await.error.clone()
    }

    /// Number of comments loaded so far.
    pub async fn len(&self) -> usize {
        self.state.lock().await.items.len()
    }

    /// Whether no comments are loaded.
    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.items.is_empty()
    }
}

impl<T: Clone + Send + 'static> CommentFeed<T> {
    /// Copies the loaded comments.
    pub async fn items(&self) -> Vec<T> {
        self.state.lock().await.items.clone()
    }
}

impl<T> fmt::Debug for CommentFeed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommentFeed")
            .field("page_size", &self.page_size)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
