//! `reqwest`-backed implementation of the resource API seams.

use std::fmt;
use std::marker::PhantomData;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::dto::{ApiEnvelope, ListRequest, ListTotals, StatusChange};
use super::resource::{ListApi, ListMethod, MutationApi, Resource};
use crate::config::ClientConfig;
use crate::domain::{ItemAction, ItemId, ListResult};
use crate::error::ClientError;

/// Builds the shared HTTP client with the configured timeout.
///
/// # Errors
///
/// Returns [`ClientError::Transport`] if the TLS backend cannot be
/// initialised.
pub fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client, ClientError> {
    Ok(reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?)
}

/// HTTP implementation of [`ListApi`] and [`MutationApi`] for one
/// [`Resource`].
pub struct HttpResourceApi<T> {
    client: reqwest::Client,
    base_url: String,
    resource: Resource,
    _items: PhantomData<fn() -> T>,
}

impl<T> HttpResourceApi<T> {
    /// Creates an API handle sharing `client`.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &str, resource: Resource) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            resource,
            _items: PhantomData,
        }
    }

    /// The resource this handle talks to.
    #[must_use]
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Posts a new item to the resource's collection path.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the request cannot be sent and
    /// [`ClientError::Status`] for a failing HTTP or envelope status.
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<(), ClientError> {
        let url = self.url(&self.resource.path);
        tracing::debug!(resource = self.resource.name, "create request");
        let body = read_success(self.client.post(url).json(body).send().await?).await?;
        check_envelope_status(&body)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl<T> fmt::Debug for HttpResourceApi<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResourceApi")
            .field("base_url", &self.base_url)
            .field("resource", &self.resource)
            .finish_non_exhaustive()
    }
}

impl<T: DeserializeOwned + Send> HttpResourceApi<T> {
    async fn fetch_list(&self, request: &ListRequest) -> Result<ListResult<T>, ClientError> {
        let url = self.url(&self.resource.path);
        let builder = match self.resource.list_method {
            ListMethod::Get => {
                let mut url =
                    reqwest::Url::parse(&url).map_err(|e| ClientError::Config(e.to_string()))?;
                url.query_pairs_mut().extend_pairs(request.to_query_pairs()?);
                self.client.get(url)
            }
            ListMethod::Post => self.client.post(url).json(request),
        };

        tracing::debug!(
            resource = self.resource.name,
            page = request.page_number,
            "list request"
        );
        let body = read_success(builder.send().await?).await?;
        decode_list(&body, self.resource.items_key)
    }

    async fn send_mutation(&self, id: ItemId, action: &ItemAction) -> Result<(), ClientError> {
        let url = self.url(&self.resource.item_path(id));
        let builder = match (action, action.status_value()) {
            (ItemAction::Join, _) => self.client.post(format!("{url}/join")),
            (ItemAction::Leave, _) => self.client.post(format!("{url}/leave")),
            (ItemAction::Delete, _) => self.client.delete(url),
            (_, Some(status)) => self.client.patch(url).json(&StatusChange {
                status: status.to_string(),
            }),
            (_, None) => {
                return Err(ClientError::Config(format!(
                    "action {action} has no wire mapping"
                )));
            }
        };

        tracing::debug!(resource = self.resource.name, %id, %action, "mutation request");
        let body = read_success(builder.send().await?).await?;
        check_envelope_status(&body)
    }
}

impl<T: DeserializeOwned + Send> ListApi<T> for HttpResourceApi<T> {
    fn list<'a>(
        &'a self,
        request: &'a ListRequest,
    ) -> BoxFuture<'a, Result<ListResult<T>, ClientError>> {
        self.fetch_list(request).boxed()
    }
}

impl<T: DeserializeOwned + Send> MutationApi for HttpResourceApi<T> {
    fn mutate<'a>(
        &'a self,
        id: ItemId,
        action: &'a ItemAction,
    ) -> BoxFuture<'a, Result<(), ClientError>> {
        self.send_mutation(id, action).boxed()
    }
}

/// Returns the body of a 2xx response, or the parsed error otherwise.
async fn read_success(response: reqwest::Response) -> Result<String, ClientError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ClientError::from_status(status.as_u16(), &body));
    }
    Ok(body)
}

/// Rejects 2xx transport responses whose body reports a failure status.
fn check_envelope_status(body: &str) -> Result<(), ClientError> {
    if body.trim().is_empty() {
        return Ok(());
    }
    let Ok(envelope) = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body) else {
        return Ok(());
    };
    match envelope.status_code {
        Some(code) if !(200..300).contains(&code) => Err(ClientError::from_status(code, body)),
        _ => Ok(()),
    }
}

/// Decodes a list response body.
///
/// The body must be an envelope whose `data` object carries an array under
/// `items_key` alongside `totalCount`/`totalPages`. A 2xx body whose
/// envelope status is not 2xx, or which lacks the items array, is an
/// error rather than an empty list.
///
/// # Errors
///
/// Returns [`ClientError::Status`] for a failing envelope status,
/// [`ClientError::MalformedResponse`] for a missing payload, and
/// [`ClientError::Decode`] when items do not match `T`.
pub fn decode_list<T: DeserializeOwned>(
    body: &str,
    items_key: &str,
) -> Result<ListResult<T>, ClientError> {
    let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_str(body)?;
    if let Some(code) = envelope.status_code
        && !(200..300).contains(&code)
    {
        return Err(ClientError::from_status(code, body));
    }

    let Some(mut data) = envelope.data else {
        return Err(ClientError::MalformedResponse("response has no data".to_string()));
    };
    let Some(items) = data.get_mut(items_key).map(serde_json::Value::take) else {
        return Err(ClientError::MalformedResponse(format!(
            "data has no `{items_key}` array"
        )));
    };
    let items: Vec<T> = serde_json::from_value(items)?;
    let totals: ListTotals = serde_json::from_value(data)?;

    Ok(ListResult::new(items, totals.total_count, totals.total_pages))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    #[test]
    fn decodes_items_under_resource_key() {
        let body = r#"{"statusCode":200,"data":{"foods":[{"name":"Oats"},{"name":"Rice"}],"totalCount":12,"totalPages":2}}"#;
        let Ok(result) = decode_list::<Named>(body, "foods") else {
            panic!("decode failed");
        };
        assert_eq!(result.items().len(), 2);
        assert_eq!(result.total_count(), 12);
        assert_eq!(result.total_pages(), 2);
    }

    #[test]
    fn wrong_items_key_is_malformed() {
        let body = r#"{"statusCode":200,"data":{"groups":[],"totalCount":0,"totalPages":0}}"#;
        let result = decode_list::<Named>(body, "foods");
        assert!(matches!(result, Err(ClientError::MalformedResponse(_))));
    }

    #[test]
    fn failing_envelope_status_is_an_error() {
        let body = r#"{"statusCode":500,"message":"boom"}"#;
        let result = decode_list::<Named>(body, "foods");
        let Err(err) = result else {
            panic!("expected error");
        };
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.user_messages(), vec!["boom".to_string()]);
    }

    #[test]
    fn empty_list_is_not_an_error() {
        let body = r#"{"statusCode":200,"data":{"foods":[],"totalCount":0,"totalPages":0}}"#;
        let Ok(result) = decode_list::<Named>(body, "foods") else {
            panic!("decode failed");
        };
        assert!(result.is_empty());
        assert_eq!(result.total_pages(), 1);
    }

    #[test]
    fn mutation_envelope_checks() {
        assert!(check_envelope_status("").is_ok());
        assert!(check_envelope_status(r#"{"statusCode":204}"#).is_ok());
        assert!(check_envelope_status(r#"{"statusCode":400,"message":"full"}"#).is_err());
    }
}
