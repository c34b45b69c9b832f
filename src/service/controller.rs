//! Paginated resource list controller.
//!
//! [`ListController`] owns the query state and last result of one list,
//! turns every state change into a fetch, drops responses that lost the
//! race to a newer request, and routes item mutations through its
//! [`MutationDispatcher`]. A render layer reads [`ListSnapshot`]s and
//! listens on the [`EventBus`].
//!
//! Every fetch follows the pattern: lock state → apply change → take a
//! ticket and snapshot the request → unlock → call the API → lock state →
//! apply only if the ticket is still current.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use super::debounce::Debouncer;
use super::fetch::{FailurePolicy, FetchOutcome, FetchSequencer, FetchStatus, FetchTicket};
use super::mutation::{Confirm, MembershipCache, MutationDispatcher, MutationOutcome};
use super::retry::RetryPolicy;
use crate::api::dto::ListRequest;
use crate::api::{HttpResourceApi, ListApi, MutationApi, Resource};
use crate::config::ClientConfig;
use crate::domain::{
    EventBus, FilterValue, ItemAction, ItemId, ListEvent, ListResult, PageSizes, PaginationWindow,
    PendingActionSet, PendingKind, QueryState,
};
use crate::notify::ErrorReporter;

/// Reads an item's id and whether the current user is a member.
pub type MembershipOf<T> = fn(&T) -> Option<(ItemId, bool)>;

/// Per-list tuning.
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// Allowed page sizes and the initial one.
    pub page_sizes: PageSizes,
    /// Quiet period for search input.
    pub search_debounce: Duration,
    /// Page buttons in the pagination window.
    pub max_visible: u32,
    /// What to show when the newest fetch fails.
    pub failure_policy: FailurePolicy,
    /// Retries for list requests; none by default.
    pub retry: RetryPolicy,
}

impl ControllerOptions {
    /// Options derived from the client configuration.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            page_sizes: config.page_sizes.clone(),
            search_debounce: config.search_debounce,
            max_visible: config.pagination_max_visible,
            failure_policy: FailurePolicy::default(),
            retry: RetryPolicy::none(),
        }
    }

    /// Replaces the failure policy.
    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

/// What the list region should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    /// Nothing to show yet; render loading skeletons.
    Loading,
    /// The newest fetch succeeded with no items.
    Empty,
    /// The newest fetch failed and there is nothing to show.
    Failed(String),
    /// Items are available.
    Populated,
}

/// Point-in-time copy of a controller's render inputs.
#[derive(Debug, Clone, Serialize)]
pub struct ListSnapshot<T> {
    /// Query the displayed result belongs to (or is being fetched for).
    #[serde(skip)]
    pub query: QueryState,
    /// Last applied result.
    pub result: ListResult<T>,
    /// Whether a fetch is outstanding.
    pub status: FetchStatus,
    /// Message of the newest failed fetch, cleared on success.
    pub error: Option<String>,
    /// Whether any fetch has been applied yet.
    pub loaded: bool,
    /// Items with a mutation in flight.
    pub pending: HashMap<ItemId, PendingKind>,
    /// Pagination controls; `None` for a single page.
    pub window: Option<PaginationWindow>,
}

impl<T> ListSnapshot<T> {
    /// Derives the view state.
    #[must_use]
    pub fn view(&self) -> ListView {
        derive_view(
            self.result.is_empty(),
            self.status,
            self.error.as_deref(),
            self.loaded,
        )
    }
}

fn derive_view(empty: bool, status: FetchStatus, error: Option<&str>, loaded: bool) -> ListView {
    if !empty {
        return ListView::Populated;
    }
    if status == FetchStatus::Fetching {
        return ListView::Loading;
    }
    match error {
        Some(error) => ListView::Failed(error.to_string()),
        None if loaded => ListView::Empty,
        None => ListView::Loading,
    }
}

struct ControllerState<T> {
    query: QueryState,
    result: ListResult<T>,
    status: FetchStatus,
    error: Option<String>,
    loaded: bool,
}

/// Controller for one paginated resource list.
///
/// Created with [`ListController::new`], which returns an `Arc` because
/// debounced search input re-enters the controller from a timer task.
/// Dropping the last `Arc` supersedes in-flight fetches and cancels
/// pending search input.
pub struct ListController<T> {
    resource: Resource,
    api: Arc<dyn ListApi<T>>,
    state: RwLock<ControllerState<T>>,
    sequencer: FetchSequencer,
    dispatcher: MutationDispatcher,
    reporter: ErrorReporter,
    events: EventBus,
    search: Debouncer<String>,
    options: ControllerOptions,
    membership_of: OnceLock<MembershipOf<T>>,
}

impl<T: Send + Sync + 'static> ListController<T> {
    /// Creates a controller. No fetch is issued until [`Self::refresh`]
    /// or a state change.
    #[must_use]
    pub fn new(
        resource: Resource,
        list_api: Arc<dyn ListApi<T>>,
        mutation_api: Arc<dyn MutationApi>,
        reporter: ErrorReporter,
        confirm: Arc<dyn Confirm>,
        events: EventBus,
        options: ControllerOptions,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let search = search_debouncer(Weak::clone(weak), options.search_debounce);
            let dispatcher = MutationDispatcher::new(
                resource.name,
                resource.noun,
                mutation_api,
                confirm,
                reporter.clone(),
                events.clone(),
            );
            Self {
                state: RwLock::new(ControllerState {
                    query: QueryState::new(options.page_sizes.clone()),
                    result: ListResult::empty(),
                    status: FetchStatus::Idle,
                    error: None,
                    loaded: false,
                }),
                resource,
                api: list_api,
                sequencer: FetchSequencer::new(),
                dispatcher,
                reporter,
                events,
                search,
                options,
                membership_of: OnceLock::new(),
            }
        })
    }

    /// The resource this controller lists.
    #[must_use]
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Bus carrying this controller's events.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Items with a mutation in flight.
    #[must_use]
    pub fn pending(&self) -> &PendingActionSet {
        self.dispatcher.pending()
    }

    /// Optimistic group membership.
    #[must_use]
    pub fn membership(&self) -> &MembershipCache {
        self.dispatcher.membership()
    }

    /// Seeds [`Self::membership`] from every applied page using `extract`.
    /// Returns `false` if an extractor was already installed.
    pub fn track_membership(&self, extract: MembershipOf<T>) -> bool {
        self.membership_of.set(extract).is_ok()
    }

    /// Feeds a raw search keystroke. The search is applied, and a fetch
    /// issued, once input has been quiet for the debounce period.
    pub fn search_input(&self, term: &str) {
        self.search.call(term.to_string());
    }

    /// Applies a search term immediately and returns to page 1.
    pub async fn set_search(&self, term: &str) -> Option<FetchOutcome> {
        self.update(|q, _| q.set_search(term)).await
    }

    /// Sets a filter (blank text clears it) and returns to page 1.
    pub async fn set_filter(
        &self,
        key: &str,
        value: impl Into<FilterValue> + Send,
    ) -> Option<FetchOutcome> {
        let value = value.into();
        self.update(move |q, _| q.set_filter(key, value)).await
    }

    /// Removes a filter and returns to page 1.
    pub async fn clear_filter(&self, key: &str) -> Option<FetchOutcome> {
        self.update(|q, _| q.clear_filter(key)).await
    }

    /// Sets the sort and returns to page 1.
    pub async fn set_sort(&self, field: &str, descending: bool) -> Option<FetchOutcome> {
        self.update(|q, _| q.set_sort(field, descending)).await
    }

    /// Changes the page size (if allowed) and returns to page 1.
    pub async fn set_page_size(&self, size: u32) -> Option<FetchOutcome> {
        self.update(|q, _| q.set_page_size(size)).await
    }

    /// Moves to page `n`; ignored outside `1..=total_pages` of the last
    /// result.
    pub async fn set_page(&self, n: u32) -> Option<FetchOutcome> {
        self.update(|q, total_pages| q.set_page(n, total_pages)).await
    }

    /// Resets search, filters and sort and returns to page 1.
    pub async fn clear_all(&self) -> Option<FetchOutcome> {
        self.search.cancel();
        self.update(|q, _| q.clear_all()).await
    }

    /// Fetches the current query again.
    pub async fn refresh(&self) -> FetchOutcome {
        let (ticket, request) = {
            let mut state = self.state.write().await;
            self.begin_fetch(&mut state)
        };
        self.run_fetch(ticket, request).await
    }

    /// Runs a mutation on one item and re-fetches the list if it
    /// completed.
    pub async fn perform(&self, id: ItemId, action: ItemAction) -> MutationOutcome {
        let outcome = self.dispatcher.perform(id, action).await;
        if outcome == MutationOutcome::Completed {
            let _ = self.refresh().await;
        }
        outcome
    }

    /// Current query.
    pub async fn query(&self) -> QueryState {
        self.state.read().await.query.clone()
    }

    /// Current fetch status.
    pub async fn status(&self) -> FetchStatus {
        self.state.read().await.status
    }

    /// What the list region should render right now.
    pub async fn view(&self) -> ListView {
        let state = self.state.read().await;
        derive_view(
            state.result.is_empty(),
            state.status,
            state.error.as_deref(),
            state.loaded,
        )
    }

    async fn update<F>(&self, change: F) -> Option<FetchOutcome>
    where
        F: FnOnce(&mut QueryState, u32) -> bool,
    {
        let (ticket, request) = {
            let mut state = self.state.write().await;
            let total_pages = state.result.total_pages();
            if !change(&mut state.query, total_pages) {
                return None;
            }
            self.begin_fetch(&mut state)
        };
        Some(self.run_fetch(ticket, request).await)
    }

    fn begin_fetch(&self, state: &mut ControllerState<T>) -> (FetchTicket, ListRequest) {
        state.status = FetchStatus::Fetching;
        let ticket = self.sequencer.begin();
        let request = ListRequest::from_query(&state.query);
        tracing::debug!(
            resource = self.resource.name,
            seq = ticket.seq(),
            page = request.page_number,
            search = request.search_term.as_deref().unwrap_or(""),
            "fetch started"
        );
        let _ = self.events.publish(ListEvent::FetchStarted {
            resource: self.resource.name,
            seq: ticket.seq(),
            page: request.page_number,
            timestamp: Utc::now(),
        });
        (ticket, request)
    }

    async fn run_fetch(&self, ticket: FetchTicket, request: ListRequest) -> FetchOutcome {
        let result = self.options.retry.run(|| self.api.list(&request)).await;

        let mut state = self.state.write().await;
        if !self.sequencer.is_current(ticket) {
            drop(state);
            tracing::debug!(
                resource = self.resource.name,
                seq = ticket.seq(),
                "discarding superseded response"
            );
            let _ = self.events.publish(ListEvent::FetchDiscarded {
                resource: self.resource.name,
                seq: ticket.seq(),
                timestamp: Utc::now(),
            });
            return FetchOutcome::Superseded { ticket };
        }

        state.status = FetchStatus::Idle;
        match result {
            Ok(page) => {
                let item_count = page.items().len();
                let total_count = page.total_count();
                if let Some(&extract) = self.membership_of.get() {
                    self.membership().merge(page.items().iter().filter_map(extract));
                }
                state.result = page;
                state.error = None;
                state.loaded = true;
                drop(state);
                let _ = self.events.publish(ListEvent::FetchApplied {
                    resource: self.resource.name,
                    seq: ticket.seq(),
                    item_count,
                    total_count,
                    timestamp: Utc::now(),
                });
                FetchOutcome::Applied {
                    ticket,
                    total_count,
                }
            }
            Err(e) => {
                if self.options.failure_policy == FailurePolicy::ClearToEmpty {
                    state.result = ListResult::empty();
                }
                state.error = Some(e.user_messages().join("; "));
                drop(state);
                let _ = self.events.publish(ListEvent::FetchFailed {
                    resource: self.resource.name,
                    seq: ticket.seq(),
                    error: e.to_string(),
                    timestamp: Utc::now(),
                });
                self.reporter.report(&e).await;
                FetchOutcome::Failed { ticket }
            }
        }
    }
}

impl<T: Clone + Send + Sync + 'static> ListController<T> {
    /// Copies the current render inputs.
    pub async fn snapshot(&self) -> ListSnapshot<T> {
        let state = self.state.read().await;
        ListSnapshot {
            query: state.query.clone(),
            result: state.result.clone(),
            status: state.status,
            error: state.error.clone(),
            loaded: state.loaded,
            pending: self.pending().snapshot(),
            window: PaginationWindow::compute(
                state.query.page(),
                state.result.total_pages(),
                self.options.max_visible,
            ),
        }
    }
}

impl<T: DeserializeOwned + Send + Sync + 'static> ListController<T> {
    /// Creates a controller talking HTTP to `resource`.
    #[must_use]
    pub fn http(
        resource: Resource,
        client: reqwest::Client,
        config: &ClientConfig,
        reporter: ErrorReporter,
        confirm: Arc<dyn Confirm>,
        events: EventBus,
        options: ControllerOptions,
    ) -> Arc<Self> {
        let api = Arc::new(HttpResourceApi::<T>::new(
            client,
            &config.api_base_url,
            resource.clone(),
        ));
        Self::new(
            resource,
            Arc::clone(&api) as Arc<dyn ListApi<T>>,
            api as Arc<dyn MutationApi>,
            reporter,
            confirm,
            events,
            options,
        )
    }
}

fn search_debouncer<T: Send + Sync + 'static>(
    controller: Weak<ListController<T>>,
    delay: Duration,
) -> Debouncer<String> {
    Debouncer::new(delay, move |term: String| {
        let controller = Weak::clone(&controller);
        async move {
            // Input that settles after the list is gone is ignored.
            if let Some(controller) = controller.upgrade() {
                let _ = controller.set_search(&term).await;
            }
        }
    })
}

impl<T> Drop for ListController<T> {
    fn drop(&mut self) {
        self.sequencer.invalidate();
        self.search.cancel();
    }
}

impl<T> fmt::Debug for ListController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListController")
            .field("resource", &self.resource)
            .field("dispatcher", &self.dispatcher)
            .field("search", &self.search)
            .finish_non_exhaustive()
    }
}
