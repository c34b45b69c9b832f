//! Domain layer: list state, identifiers, and the event system.
//!
//! Everything here is synchronous and free of I/O: query state, the
//! result of the last fetch, the pending-mutation set, the derived
//! pagination window, and the event bus the render layer listens on.

pub mod event_bus;
pub mod item_action;
pub mod item_id;
pub mod list_event;
pub mod list_result;
pub mod pagination;
pub mod pending;
pub mod query_state;

pub use event_bus::EventBus;
pub use item_action::ItemAction;
pub use item_id::ItemId;
pub use list_event::{ListEvent, MutationResult};
pub use list_result::ListResult;
pub use pagination::{DEFAULT_MAX_VISIBLE, PageControl, PaginationWindow};
pub use pending::{PendingActionSet, PendingGuard, PendingKind};
pub use query_state::{FilterValue, PageSizes, QueryState, RESERVED_PARAMS, is_reserved_param};
