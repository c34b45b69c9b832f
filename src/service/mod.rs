//! Services: the list controller and the machinery it composes.

pub mod comments;
pub mod controller;
pub mod debounce;
pub mod fetch;
pub mod mutation;
pub mod retry;

pub use comments::{CommentFeed, FeedOutcome};
pub use controller::{ControllerOptions, ListController, ListSnapshot, ListView, MembershipOf};
pub use debounce::Debouncer;
pub use fetch::{FailurePolicy, FetchOutcome, FetchSequencer, FetchStatus, FetchTicket};
pub use mutation::{AlwaysConfirm, Confirm, MembershipCache, MutationDispatcher, MutationOutcome};
pub use retry::RetryPolicy;
