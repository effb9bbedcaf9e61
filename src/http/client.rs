//! HttpResourceClient - reqwest-backed JSON client for one collection.

use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use super::catalog::HttpCategoryClient;
use super::config::ClientConfig;
use crate::error::ClientError;
use crate::model::{Account, Categorization, Transaction};
use crate::resource::{Resource, ResourceClient, ResourceId, TransactionQueries};

/// Which operation produced a response. Decides how error statuses map
/// onto [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Call {
    List,
    Get(ResourceId),
    Create,
    Update(ResourceId),
    Delete(ResourceId),
}

impl Call {
    fn target(self) -> Option<ResourceId> {
        match self {
            Call::List | Call::Create => None,
            Call::Get(id) | Call::Update(id) | Call::Delete(id) => Some(id),
        }
    }

    fn carries_payload(self) -> bool {
        matches!(self, Call::Create | Call::Update(_))
    }
}

fn classify(call: Call, collection: &str, status: StatusCode, detail: String) -> ClientError {
    match (status.as_u16(), call.target()) {
        (404, Some(id)) => ClientError::not_found(collection, id),
        (400 | 422, _) if call.carries_payload() => ClientError::Validation(detail),
        _ => ClientError::Transport(format!(
            "{} request failed status={}: {}",
            collection, status, detail
        )),
    }
}

/// Pull a readable message out of an error body: `{"error": ...}`,
/// `{"message": ...}`, raw text, or the status line.
fn error_detail(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["error", "message"] {
            if let Some(text) = value.get(key).and_then(Value::as_str) {
                if !text.trim().is_empty() {
                    return text.to_string();
                }
            }
        }
    }
    let text = body.trim();
    if text.is_empty() {
        status.to_string()
    } else {
        text.to_string()
    }
}

/// Typed JSON client for the collection of `R` under a base URL.
///
/// Clone is cheap: the underlying `reqwest::Client` is reference counted.
pub struct HttpResourceClient<R> {
    client: reqwest::Client,
    base_url: String,
    _marker: PhantomData<fn() -> R>,
}

impl<R> Clone for HttpResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            _marker: PhantomData,
        }
    }
}

impl<R: Resource> HttpResourceClient<R> {
    /// Use an existing client. `base_url` must not end with `/`.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            _marker: PhantomData,
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, R::COLLECTION)
    }

    fn record_url(&self, id: ResourceId) -> String {
        format!("{}/{}/{}", self.base_url, R::COLLECTION, id)
    }
}

/// Send `request` and turn non-2xx answers into a [`ClientError`].
#[instrument(name = "http_resource_call", skip(request))]
pub(super) async fn send(
    collection: &str,
    call: Call,
    request: RequestBuilder,
) -> Result<Response, ClientError> {
    let response = request
        .send()
        .await
        .map_err(|e| ClientError::Transport(format!("{} request failed: {}", collection, e)))?;

    let status = response.status();
    debug!(%status, "response received");
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(classify(call, collection, status, error_detail(status, &body)))
}

pub(super) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ClientError::Transport(format!("read body failed: {}", e)))?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl<R: Resource> ResourceClient<R> for HttpResourceClient<R> {
    async fn list(&self) -> Result<Vec<R>, ClientError> {
        let request = self.client.get(self.collection_url());
        decode(send(R::COLLECTION, Call::List, request).await?).await
    }

    async fn get(&self, id: ResourceId) -> Result<R, ClientError> {
        let request = self.client.get(self.record_url(id));
        decode(send(R::COLLECTION, Call::Get(id), request).await?).await
    }

    async fn create(&self, payload: R::Create) -> Result<R, ClientError> {
        let request = self.client.post(self.collection_url()).json(&payload);
        decode(send(R::COLLECTION, Call::Create, request).await?).await
    }

    async fn update(&self, id: ResourceId, patch: R::Update) -> Result<R, ClientError> {
        let request = self.client.put(self.record_url(id)).json(&patch);
        decode(send(R::COLLECTION, Call::Update(id), request).await?).await
    }

    async fn delete(&self, id: ResourceId) -> Result<(), ClientError> {
        let request = self.client.delete(self.record_url(id));
        send(R::COLLECTION, Call::Delete(id), request).await?;
        Ok(())
    }
}

#[async_trait]
impl TransactionQueries for HttpResourceClient<Transaction> {
    async fn list_limited(&self, limit: usize) -> Result<Vec<Transaction>, ClientError> {
        let request = self.client.get(self.collection_url()).query(&[("limit", limit)]);
        decode(send(Transaction::COLLECTION, Call::List, request).await?).await
    }

    async fn uncategorized(&self) -> Result<Vec<Transaction>, ClientError> {
        let request = self.client.get(format!("{}/uncategorized", self.collection_url()));
        decode(send(Transaction::COLLECTION, Call::List, request).await?).await
    }

    async fn search(&self, query: &str) -> Result<Vec<Transaction>, ClientError> {
        let request = self
            .client
            .get(format!("{}/search", self.collection_url()))
            .query(&[("q", query)]);
        decode(send(Transaction::COLLECTION, Call::List, request).await?).await
    }

    async fn categorize(
        &self,
        id: ResourceId,
        categorization: Categorization,
    ) -> Result<Transaction, ClientError> {
        let request = self.client.patch(self.record_url(id)).json(&categorization);
        decode(send(Transaction::COLLECTION, Call::Update(id), request).await?).await
    }
}

/// Factory for typed clients sharing one connection pool.
#[derive(Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Build the shared `reqwest::Client` from transport settings.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.bearer_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ClientError::Validation(format!("invalid bearer token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Transport(format!("http client setup failed: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Typed client for any resource kind.
    pub fn resource<R: Resource>(&self) -> HttpResourceClient<R> {
        HttpResourceClient::with_client(self.client.clone(), self.base_url.clone())
    }

    pub fn accounts(&self) -> HttpResourceClient<Account> {
        self.resource()
    }

    pub fn transactions(&self) -> HttpResourceClient<Transaction> {
        self.resource()
    }

    pub fn categories(&self) -> HttpCategoryClient {
        HttpCategoryClient::with_client(self.client.clone(), self.base_url.clone())
    }
}
