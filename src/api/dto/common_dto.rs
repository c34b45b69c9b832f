//! Wire types shared by every paginated resource.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{FilterValue, QueryState};

/// List request parameters, serialized in the backend's PascalCase.
///
/// `GET` resources send these as a query string, `POST` resources as a
/// JSON body. Optional fields are omitted when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListRequest {
    /// 1-based page number.
    pub page_number: u32,
    /// Items per page.
    pub page_size: u32,
    /// Free-text search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    /// Status filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Inclusive lower date bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper date bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Sort field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    /// Sort direction; only sent together with `SortBy`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_descending: Option<bool>,
    /// Resource-specific filters, sent under their own keys.
    #[serde(flatten)]
    pub extra: BTreeMap<String, FilterValue>,
}

impl ListRequest {
    /// Builds the request for a query snapshot.
    ///
    /// The `Status`, `StartDate` and `EndDate` filters map to their
    /// dedicated fields; a date given as text under a date key, or a date
    /// under `Status`, is sent through `extra` unchanged.
    #[must_use]
    pub fn from_query(query: &QueryState) -> Self {
        let mut extra = query.filters().clone();

        let status = match extra.remove("Status") {
            Some(FilterValue::Text(s)) => Some(s),
            Some(other) => {
                extra.insert("Status".to_string(), other);
                None
            }
            None => None,
        };
        let mut take_date = |key: &str| match extra.remove(key) {
            Some(FilterValue::Date(d)) => Some(d),
            Some(other) => {
                extra.insert(key.to_string(), other);
                None
            }
            None => None,
        };
        let start_date = take_date("StartDate");
        let end_date = take_date("EndDate");

        let sort_by = query.sort_by().map(str::to_string);
        let sort_descending = sort_by.as_ref().map(|_| query.sort_descending());

        Self {
            page_number: query.page(),
            page_size: query.page_size(),
            search_term: Some(query.search_term())
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            status,
            start_date,
            end_date,
            sort_by,
            sort_descending,
            extra,
        }
    }

    /// A bare request for one page, with no search, filters or sort.
    #[must_use]
    pub fn page(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number,
            page_size,
            search_term: None,
            status: None,
            start_date: None,
            end_date: None,
            sort_by: None,
            sort_descending: None,
            extra: BTreeMap::new(),
        }
    }

    /// Flattens the request into query-string pairs.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if serialization fails.
    pub fn to_query_pairs(&self) -> Result<Vec<(String, String)>, serde_json::Error> {
        let value = serde_json::to_value(self)?;
        let serde_json::Value::Object(map) = value else {
            return Ok(Vec::new());
        };
        Ok(map
            .into_iter()
            .filter_map(|(k, v)| match v {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some((k, s)),
                other => Some((k, other.to_string())),
            })
            .collect())
    }
}

/// Envelope every backend response is wrapped in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<D> {
    /// Application-level status code mirrored in the body.
    #[serde(default)]
    pub status_code: Option<u16>,
    /// Payload; absent on some mutation responses.
    #[serde(default)]
    pub data: Option<D>,
    /// Optional message accompanying the payload.
    #[serde(default)]
    pub message: Option<String>,
}

/// Totals that accompany every list payload.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTotals {
    /// Total items across all pages.
    #[serde(default)]
    pub total_count: u64,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
}

/// Body of a status-changing `PATCH`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    /// New status name (e.g. `"Approved"`).
    pub status: String,
}

/// Maintenance probe document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceStatus {
    /// Whether the platform is in maintenance mode.
    #[serde(default, alias = "isMaintenance")]
    pub maintenance: bool,
    /// Message to show while in maintenance.
    #[serde(default)]
    pub message: Option<String>,
}
