//! Single-item mutations a list can dispatch.

use std::fmt;

use super::PendingKind;

/// A mutation applied to one item of a list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemAction {
    /// Join a group.
    Join,
    /// Leave a group. Destructive: asks for confirmation.
    Leave,
    /// Delete the item (post, ticket, …). Destructive: asks for
    /// confirmation.
    Delete,
    /// Approve a pending request.
    Approve,
    /// Reject a pending request.
    Reject,
    /// Set an arbitrary status (e.g. close a ticket).
    SetStatus(String),
}

impl ItemAction {
    /// Short machine name used in logs and events.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Join => "join",
            Self::Leave => "leave",
            Self::Delete => "delete",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::SetStatus(_) => "set_status",
        }
    }

    /// Progress state shown while the mutation runs.
    #[must_use]
    pub fn pending_kind(&self) -> PendingKind {
        match self {
            Self::Join => PendingKind::Joining,
            Self::Leave => PendingKind::Leaving,
            Self::Delete => PendingKind::Deleting,
            Self::Approve | Self::Reject | Self::SetStatus(_) => PendingKind::Updating,
        }
    }

    /// Status value sent in the `PATCH` body, for status-changing actions.
    #[must_use]
    pub fn status_value(&self) -> Option<&str> {
        match self {
            Self::Approve => Some("Approved"),
            Self::Reject => Some("Rejected"),
            Self::SetStatus(s) => Some(s),
            Self::Join | Self::Leave | Self::Delete => None,
        }
    }

    /// Confirmation prompt for destructive actions; `None` means the
    /// action runs without asking.
    #[must_use]
    pub fn confirmation_prompt(&self, noun: &str) -> Option<String> {
        match self {
            Self::Leave => Some(format!("Are you sure you want to leave this {noun}?")),
            Self::Delete => Some(format!("Are you sure you want to delete this {noun}?")),
            _ => None,
        }
    }

    /// Notice shown after the endpoint accepted the mutation.
    #[must_use]
    pub fn success_message(&self, noun: &str) -> String {
        match self {
            Self::Join => format!("Joined {noun} successfully"),
            Self::Leave => format!("Left {noun} successfully"),
            Self::Delete => format!("Deleted {noun} successfully"),
            Self::Approve => format!("Approved {noun} successfully"),
            Self::Reject => format!("Rejected {noun} successfully"),
            Self::SetStatus(s) => format!("Updated {noun} status to {s}"),
        }
    }
}

impl fmt::Display for ItemAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_destructive_actions_confirm() {
        assert!(ItemAction::Leave.confirmation_prompt("group").is_some());
        assert!(ItemAction::Delete.confirmation_prompt("ticket").is_some());
        assert!(ItemAction::Join.confirmation_prompt("group").is_none());
        assert!(ItemAction::Approve.confirmation_prompt("request").is_none());
    }

    #[test]
    fn status_actions_carry_values() {
        assert_eq!(ItemAction::Approve.status_value(), Some("Approved"));
        assert_eq!(
            ItemAction::SetStatus("Closed".to_string()).status_value(),
            Some("Closed")
        );
        assert_eq!(ItemAction::Delete.status_value(), None);
    }
}
