//! Client-side form validation.
//!
//! Forms are validated before any request is made. Failures come back as
//! [`crate::error::ClientError::Validation`] holding per-field messages for
//! inline display; they are never routed to the notifier.

pub mod ticket;

pub use ticket::{NewTicket, TicketCategory, TicketForm, TicketPriority};
