//! Resource descriptors and the API seams controllers depend on.
//!
//! A [`Resource`] names a paginated REST collection: where it lives, how
//! its list is requested, and under which key the response carries its
//! items. [`ListApi`] and [`MutationApi`] are the boundaries controllers
//! call through; [`super::HttpResourceApi`] implements both over HTTP and
//! tests substitute scripted fakes.

use futures_util::future::BoxFuture;

use super::dto::ListRequest;
use crate::domain::{ItemAction, ItemId, ListResult};
use crate::error::ClientError;

/// How a resource's list endpoint receives its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMethod {
    /// `GET` with a query string.
    Get,
    /// `POST` with a JSON body.
    Post,
}

/// A paginated REST collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Short name used in logs and events (e.g. `"groups"`).
    pub name: &'static str,
    /// Singular noun used in user-facing messages (e.g. `"group"`).
    pub noun: &'static str,
    /// Collection path relative to the API base URL.
    pub path: String,
    /// Key of the item array inside the response `data` object.
    pub items_key: &'static str,
    /// List request style.
    pub list_method: ListMethod,
}

impl Resource {
    fn new(
        name: &'static str,
        noun: &'static str,
        path: &str,
        items_key: &'static str,
        list_method: ListMethod,
    ) -> Self {
        Self {
            name,
            noun,
            path: path.to_string(),
            items_key,
            list_method,
        }
    }

    /// Food catalog.
    #[must_use]
    pub fn foods() -> Self {
        Self::new("foods", "food", "/api/foods", "foods", ListMethod::Get)
    }

    /// Social groups.
    #[must_use]
    pub fn groups() -> Self {
        Self::new("groups", "group", "/api/groups", "groups", ListMethod::Get)
    }

    /// Support tickets.
    #[must_use]
    pub fn tickets() -> Self {
        Self::new("tickets", "ticket", "/api/tickets", "tickets", ListMethod::Get)
    }

    /// Requests for trainer service packages.
    #[must_use]
    pub fn service_requests() -> Self {
        Self::new(
            "requests",
            "request",
            "/api/trainer/service-requests",
            "requests",
            ListMethod::Get,
        )
    }

    /// Trainer payouts; searched with a `POST` body.
    #[must_use]
    pub fn payouts() -> Self {
        Self::new(
            "payouts",
            "payout",
            "/api/payouts/search",
            "payouts",
            ListMethod::Post,
        )
    }

    /// Comments under one group post.
    #[must_use]
    pub fn post_comments(post_id: ItemId) -> Self {
        Self::new(
            "comments",
            "comment",
            &format!("/api/posts/{post_id}/comments"),
            "comments",
            ListMethod::Get,
        )
    }

    /// Looks up a top-level catalogued resource by name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        Self::catalog().into_iter().find(|r| r.name == name)
    }

    /// All top-level catalogued resources.
    #[must_use]
    pub fn catalog() -> Vec<Self> {
        vec![
            Self::foods(),
            Self::groups(),
            Self::tickets(),
            Self::service_requests(),
            Self::payouts(),
        ]
    }

    /// Path of one item of the collection.
    ///
    /// Search-style collections (`…/search`) address their items on the
    /// parent path.
    #[must_use]
    pub fn item_path(&self, id: ItemId) -> String {
        let base = self.path.strip_suffix("/search").unwrap_or(&self.path);
        format!("{base}/{id}")
    }
}

/// Fetches one page of a resource list.
pub trait ListApi<T>: Send + Sync {
    /// Requests the page described by `request`.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport failure, non-success status,
    /// or a response without the expected list shape.
    fn list<'a>(
        &'a self,
        request: &'a ListRequest,
    ) -> BoxFuture<'a, Result<ListResult<T>, ClientError>>;
}

/// Applies single-item mutations.
pub trait MutationApi: Send + Sync {
    /// Applies `action` to item `id`.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] on transport failure or non-success
    /// status.
    fn mutate<'a>(
        &'a self,
        id: ItemId,
        action: &'a ItemAction,
    ) -> BoxFuture<'a, Result<(), ClientError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lookup_by_name() {
        assert_eq!(Resource::by_name("payouts").map(|r| r.list_method), Some(ListMethod::Post));
        assert_eq!(Resource::by_name("groups").map(|r| r.items_key), Some("groups"));
        assert!(Resource::by_name("charts").is_none());
    }

    #[test]
    fn item_path_strips_search_suffix() {
        let id = ItemId::new();
        assert_eq!(Resource::payouts().item_path(id), format!("/api/payouts/{id}"));
        assert_eq!(Resource::groups().item_path(id), format!("/api/groups/{id}"));
    }

    #[test]
    fn comments_path_embeds_post() {
        let post = ItemId::new();
        assert_eq!(
            Resource::post_comments(post).path,
            format!("/api/posts/{post}/comments")
        );
    }
}
