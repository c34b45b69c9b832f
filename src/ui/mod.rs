//! Page chrome shared by every list view.

pub mod chrome;

pub use chrome::{Chrome, ModalGuard};
