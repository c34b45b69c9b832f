//! Filter, sort and page state for one paginated list.
//!
//! Every setter that narrows or reorders the result set (search, filter,
//! sort, page size) applies its value and resets the page to 1 inside the
//! same `&mut self` call, so no reader can ever observe the new filter
//! paired with the old page. Setters return `true` when the state changed,
//! which is the controller's cue to fetch.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ClientError;

/// Request parameters owned by paging, search and sort. A filter under
/// one of these keys would be sent twice, so [`QueryState::set_filter`]
/// ignores them.
pub const RESERVED_PARAMS: [&str; 5] = [
    "PageNumber",
    "PageSize",
    "SearchTerm",
    "SortBy",
    "SortDescending",
];

/// Returns whether `key` names a reserved request parameter, ignoring case.
#[must_use]
pub fn is_reserved_param(key: &str) -> bool {
    RESERVED_PARAMS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(key.trim()))
}

/// Value of a single list filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Free-form or enumerated text (e.g. a status name).
    Text(String),
    /// Calendar date, sent as ISO-8601 `YYYY-MM-DD`.
    Date(NaiveDate),
}

impl FilterValue {
    fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

/// The set of page sizes a list offers, plus the one it starts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSizes {
    allowed: Vec<u32>,
    default_size: u32,
}

impl PageSizes {
    /// Builds a page size set.
    ///
    /// Zero entries are dropped and the rest sorted and deduplicated.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if no usable size remains or
    /// `default_size` is not among them.
    pub fn new(mut allowed: Vec<u32>, default_size: u32) -> Result<Self, ClientError> {
        allowed.retain(|&n| n > 0);
        allowed.sort_unstable();
        allowed.dedup();
        if allowed.is_empty() {
            return Err(ClientError::Config("no page sizes configured".to_string()));
        }
        if !allowed.contains(&default_size) {
            return Err(ClientError::Config(format!(
                "default page size {default_size} is not in {allowed:?}"
            )));
        }
        Ok(Self {
            allowed,
            default_size,
        })
    }

    /// Returns `true` if `size` may be selected.
    #[must_use]
    pub fn contains(&self, size: u32) -> bool {
        self.allowed.contains(&size)
    }

    /// The initial page size.
    #[must_use]
    pub fn default_size(&self) -> u32 {
        self.default_size
    }

    /// All allowed sizes in ascending order.
    #[must_use]
    pub fn allowed(&self) -> &[u32] {
        &self.allowed
    }
}

impl Default for PageSizes {
    fn default() -> Self {
        Self {
            allowed: vec![10, 20, 50],
            default_size: 10,
        }
    }
}

/// Query parameters of a paginated list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    page: u32,
    page_size: u32,
    search_term: String,
    filters: BTreeMap<String, FilterValue>,
    sort_by: Option<String>,
    sort_descending: bool,
    page_sizes: PageSizes,
}

impl QueryState {
    /// Creates the state a list starts with: page 1, default page size, no
    /// search, filters or sort.
    #[must_use]
    pub fn new(page_sizes: PageSizes) -> Self {
        Self {
            page: 1,
            page_size: page_sizes.default_size(),
            search_term: String::new(),
            filters: BTreeMap::new(),
            sort_by: None,
            sort_descending: false,
            page_sizes,
        }
    }

    /// Current 1-based page.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Current page size.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Current search term (trimmed, possibly empty).
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Active filters, ordered by key.
    #[must_use]
    pub fn filters(&self) -> &BTreeMap<String, FilterValue> {
        &self.filters
    }

    /// Returns the value of one filter.
    #[must_use]
    pub fn filter(&self, key: &str) -> Option<&FilterValue> {
        self.filters.get(key)
    }

    /// Field the list is sorted by, if any.
    #[must_use]
    pub fn sort_by(&self) -> Option<&str> {
        self.sort_by.as_deref()
    }

    /// Whether the sort is descending.
    #[must_use]
    pub fn sort_descending(&self) -> bool {
        self.sort_descending
    }

    /// The page sizes this list accepts.
    #[must_use]
    pub fn page_sizes(&self) -> &PageSizes {
        &self.page_sizes
    }

    /// Sets the search term and returns to page 1.
    pub fn set_search(&mut self, term: &str) -> bool {
        let term = term.trim();
        let changed = self.search_term != term || self.page != 1;
        self.search_term = term.to_string();
        self.page = 1;
        changed
    }

    /// Sets (or, for blank text, removes) a filter and returns to page 1.
    ///
    /// A key from [`RESERVED_PARAMS`] is ignored and reports no change.
    pub fn set_filter(&mut self, key: &str, value: impl Into<FilterValue>) -> bool {
        if is_reserved_param(key) {
            tracing::warn!(key, "ignoring filter on a reserved parameter");
            return false;
        }
        let value = value.into();
        if value.is_blank() {
            return self.clear_filter(key);
        }
        let changed = self.filters.get(key) != Some(&value) || self.page != 1;
        self.filters.insert(key.to_string(), value);
        self.page = 1;
        changed
    }

    /// Removes a filter and returns to page 1.
    pub fn clear_filter(&mut self, key: &str) -> bool {
        let changed = self.filters.remove(key).is_some() || self.page != 1;
        self.page = 1;
        changed
    }

    /// Sets the sort field and direction and returns to page 1. A blank
    /// field clears the sort.
    pub fn set_sort(&mut self, field: &str, descending: bool) -> bool {
        let field = Some(field.trim())
            .filter(|f| !f.is_empty())
            .map(str::to_string);
        let changed =
            self.sort_by != field || self.sort_descending != descending || self.page != 1;
        self.sort_by = field;
        self.sort_descending = descending;
        self.page = 1;
        changed
    }

    /// Sets the page size and returns to page 1.
    ///
    /// Sizes outside the allowed set are ignored.
    pub fn set_page_size(&mut self, size: u32) -> bool {
        if !self.page_sizes.contains(size) {
            return false;
        }
        let changed = self.page_size != size || self.page != 1;
        self.page_size = size;
        self.page = 1;
        changed
    }

    /// Moves to page `n` if it lies within `1..=total_pages`. No other
    /// field is touched.
    pub fn set_page(&mut self, n: u32, total_pages: u32) -> bool {
        if n < 1 || n > total_pages || n == self.page {
            return false;
        }
        self.page = n;
        true
    }

    /// Resets search, filters and sort to their defaults and returns to
    /// page 1. The page size is kept.
    pub fn clear_all(&mut self) -> bool {
        let cleared = Self {
            page_size: self.page_size,
            ..Self::new(self.page_sizes.clone())
        };
        let changed = *self != cleared;
        *self = cleared;
        changed
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(PageSizes::default())
    }
}
