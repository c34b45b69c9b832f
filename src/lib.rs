//! # fitlist
//!
//! Headless controller for the paginated resource lists of the fitness
//! platform REST API: foods, groups, support tickets, trainer service
//! requests, payouts and post comments.
//!
//! A [`service::ListController`] owns the query (search, filters, sort,
//! page) for one list, issues a fetch whenever the query changes, and only
//! ever shows the response to the most recent request. Search input is
//! debounced; item mutations (join, leave, delete, status changes) run
//! through a dispatcher that blocks double submission and asks for
//! confirmation on destructive actions. Errors become user-facing notices.
//!
//! ## Architecture
//!
//! ```text
//! Render layer
//!     │  snapshot() / view() / EventBus
//!     │
//!     ├── ListController, CommentFeed (service/)
//!     │     ├── Debouncer, FetchSequencer, RetryPolicy
//!     │     └── MutationDispatcher ── PendingActionSet
//!     │
//!     ├── ErrorReporter ── NotificationCenter (notify/)
//!     │
//!     ├── ListApi / MutationApi (api/)
//!     │     └── HttpResourceApi (reqwest)
//!     │
//!     └── Backend REST API
//! ```

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod forms;
pub mod notify;
pub mod service;
pub mod ui;
