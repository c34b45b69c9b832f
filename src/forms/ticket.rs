//! Support ticket submission form.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{ClientError, FieldErrors};

/// Ticket category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketCategory {
    /// App or account malfunction.
    Technical,
    /// Payments and invoices.
    Billing,
    /// Profile and login.
    Account,
    /// Programs and coaching.
    Training,
    /// Anything else.
    Other,
}

impl TicketCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 5] = [
        Self::Technical,
        Self::Billing,
        Self::Account,
        Self::Training,
        Self::Other,
    ];

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Technical => "Technical",
            Self::Billing => "Billing",
            Self::Account => "Account",
            Self::Training => "Training",
            Self::Other => "Other",
        }
    }
}

impl FromStr for TicketCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

impl fmt::Display for TicketCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketPriority {
    /// Low.
    Low,
    /// Medium.
    Medium,
    /// High.
    High,
}

impl TicketPriority {
    /// Every priority, lowest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl FromStr for TicketPriority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw ticket form input as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TicketForm {
    /// Ticket title.
    #[validate(length(
        min = 3,
        max = 100,
        message = "Title must be between 3 and 100 characters"
    ))]
    pub title: String,
    /// Problem description.
    #[validate(length(
        min = 10,
        max = 2000,
        message = "Description must be between 10 and 2000 characters"
    ))]
    pub description: String,
    /// Category name.
    #[validate(custom(function = "validate_category"))]
    pub category: String,
    /// Priority name.
    #[validate(custom(function = "validate_priority"))]
    pub priority: String,
}

/// A validated ticket, ready to be posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTicket {
    /// Trimmed title.
    pub title: String,
    /// Trimmed description.
    pub description: String,
    /// Category.
    pub category: TicketCategory,
    /// Priority.
    pub priority: TicketPriority,
}

impl TicketForm {
    /// Validates the trimmed input.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] with one entry per invalid
    /// field.
    pub fn validate_input(&self) -> Result<NewTicket, ClientError> {
        let trimmed = Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category.trim().to_string(),
            priority: self.priority.trim().to_string(),
        };
        trimmed
            .validate()
            .map_err(|e| ClientError::Validation(field_errors(&e)))?;

        let (Ok(category), Ok(priority)) = (
            trimmed.category.parse::<TicketCategory>(),
            trimmed.priority.parse::<TicketPriority>(),
        ) else {
            return Err(ClientError::Validation(FieldErrors::new()));
        };
        Ok(NewTicket {
            title: trimmed.title,
            description: trimmed.description,
            category,
            priority,
        })
    }
}

fn validate_category(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<TicketCategory>()
        .map(|_| ())
        .map_err(|()| invalid("category", "Please choose a category"))
}

fn validate_priority(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<TicketPriority>()
        .map(|_| ())
        .map_err(|()| invalid("priority", "Please choose a priority"))
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Flattens `validator` errors into field → messages.
fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    for (field, errs) in errors.field_errors() {
        let messages = errs
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map_or_else(|| e.code.to_string(), ToString::to_string)
            })
            .collect();
        out.insert(field.to_string(), messages);
    }
    out
}
