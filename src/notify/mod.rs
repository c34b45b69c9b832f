//! User-visible notices and error reporting.

pub mod notice;
pub mod reporter;

pub use notice::{Notice, NoticeLevel, NotificationCenter, Notifier};
pub use reporter::{ErrorReporter, HttpMaintenanceProbe, MaintenanceProbe};
