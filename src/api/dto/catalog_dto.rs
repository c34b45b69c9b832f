//! Item shapes of the catalogued resources.
//!
//! Fields the list views do not use are left out; unknown fields in the
//! payload are ignored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ItemId;

/// A food catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodDto {
    /// Food id.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Category name (e.g. `"Protein"`).
    #[serde(default)]
    pub category: Option<String>,
    /// Energy per serving.
    #[serde(default)]
    pub calories: f64,
    /// Protein grams per serving.
    #[serde(default)]
    pub protein: f64,
    /// Carbohydrate grams per serving.
    #[serde(default)]
    pub carbs: f64,
    /// Fat grams per serving.
    #[serde(default)]
    pub fat: f64,
}

/// A social group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDto {
    /// Group id.
    pub id: ItemId,
    /// Group name.
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: Option<String>,
    /// Current member count.
    #[serde(default)]
    pub member_count: u32,
    /// Whether the current user is a member.
    #[serde(default)]
    pub is_joined: bool,
    /// Whether joining needs owner approval.
    #[serde(default)]
    pub is_private: bool,
}

impl GroupDto {
    /// The group id paired with the current user's membership flag.
    #[must_use]
    pub fn membership(&self) -> Option<(ItemId, bool)> {
        Some((self.id, self.is_joined))
    }

    /// Reads the same pair from an undecoded group object. Returns `None`
    /// when the object has no parseable `id`; a missing `isJoined` counts
    /// as not joined.
    #[must_use]
    pub fn membership_in_json(value: &serde_json::Value) -> Option<(ItemId, bool)> {
        let id = value.get("id")?.as_str()?.parse().ok()?;
        let joined = value
            .get("isJoined")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);
        Some((id, joined))
    }
}

/// A support ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDto {
    /// Ticket id.
    pub id: ItemId,
    /// Title.
    pub title: String,
    /// Status (`"Open"`, `"InProgress"`, `"Resolved"`, `"Closed"`).
    pub status: String,
    /// Priority (`"Low"`, `"Medium"`, `"High"`).
    #[serde(default)]
    pub priority: Option<String>,
    /// Category.
    #[serde(default)]
    pub category: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A request for a trainer's service package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequestDto {
    /// Request id.
    pub id: ItemId,
    /// Requesting customer's display name.
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Package name.
    #[serde(default)]
    pub package_name: Option<String>,
    /// Status (`"Pending"`, `"Approved"`, `"Rejected"`).
    pub status: String,
    /// Package price.
    #[serde(default)]
    pub price: f64,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A trainer payout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutDto {
    /// Payout id.
    pub id: ItemId,
    /// Amount paid out.
    pub amount: f64,
    /// Status (`"Pending"`, `"Paid"`, `"Failed"`).
    pub status: String,
    /// Payout date.
    #[serde(default)]
    pub payout_date: Option<NaiveDate>,
}

/// A comment on a group post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    /// Comment id.
    pub id: ItemId,
    /// Author display name.
    #[serde(default)]
    pub author_name: Option<String>,
    /// Comment text.
    pub content: String,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn group_decodes_with_defaults() {
        let json = r#"{"id":"3f2504e0-4f89-11d3-9a0c-0305e82c3301","name":"Runners","unused":1}"#;
        let Ok(group) = serde_json::from_str::<GroupDto>(json) else {
            panic!("decode failed");
        };
        assert_eq!(group.name, "Runners");
        assert!(!group.is_joined);
        assert_eq!(group.member_count, 0);
    }

    #[test]
    fn membership_reads_typed_and_untyped_groups() {
        let value = serde_json::json!({
            "id": "3f2504e0-4f89-11d3-9a0c-0305e82c3301",
            "name": "Runners",
            "isJoined": true,
        });
        let Ok(group) = serde_json::from_value::<GroupDto>(value.clone()) else {
            panic!("decode failed");
        };
        assert_eq!(group.membership(), Some((group.id, true)));
        assert_eq!(GroupDto::membership_in_json(&value), group.membership());

        let no_flag = serde_json::json!({ "id": "3f2504e0-4f89-11d3-9a0c-0305e82c3301" });
        assert_eq!(GroupDto::membership_in_json(&no_flag), Some((group.id, false)));
        assert_eq!(GroupDto::membership_in_json(&serde_json::json!({ "id": 7 })), None);
    }

    #[test]
    fn payout_date_is_iso() {
        let json = r#"{"id":"3f2504e0-4f89-11d3-9a0c-0305e82c3301","amount":120.5,"status":"Paid","payoutDate":"2025-02-28"}"#;
        let Ok(payout) = serde_json::from_str::<PayoutDto>(json) else {
            panic!("decode failed");
        };
        assert_eq!(payout.payout_date, NaiveDate::from_ymd_opt(2025, 2, 28));
    }
}
