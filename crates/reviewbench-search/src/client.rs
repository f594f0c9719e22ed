//! Thin Elasticsearch REST client over `reqwest`.
//!
//! Only the endpoints the loaders and the harness use are exposed. Every
//! non-2xx answer becomes [`EsError::Status`] carrying the response body, so
//! mapping or query mistakes surface with the server's own explanation.

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::error::EsError;
use crate::response::{BulkResponse, ClusterInfo, CountResponse, IndexStats, SearchResponse};

#[derive(Debug, Clone)]
pub struct EsClient {
    http: Client,
    base_url: String,
}

impl EsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, EsError> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}/{}", self.base_url, path.trim_start_matches('/')))
    }

    /// `HEAD /`: succeeds when the node answers with a 2xx.
    pub async fn ping(&self) -> Result<(), EsError> {
        let resp = self.request(Method::HEAD, "/").send().await?;
        check(resp, "ping").await.map(|_| ())
    }

    pub async fn info(&self) -> Result<ClusterInfo, EsError> {
        let resp = self.request(Method::GET, "/").send().await?;
        decode(resp, "info").await
    }

    pub async fn index_exists(&self, index: &str) -> Result<bool, EsError> {
        let resp = self.request(Method::HEAD, index).send().await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(false),
            s if s.is_success() => Ok(true),
            _ => check(resp, "index exists").await.map(|_| false),
        }
    }

    pub async fn delete_index(&self, index: &str) -> Result<(), EsError> {
        let resp = self.request(Method::DELETE, index).send().await?;
        check(resp, "delete index").await.map(|_| ())
    }

    pub async fn create_index(&self, index: &str, body: &Value) -> Result<(), EsError> {
        tracing::debug!(index, body = %body, "create index");
        let resp = self.request(Method::PUT, index).json(body).send().await?;
        check(resp, "create index").await.map(|_| ())
    }

    /// Index or overwrite a single document under `id`.
    pub async fn index_document<T: Serialize + ?Sized>(&self, index: &str, id: &str, doc: &T) -> Result<(), EsError> {
        let resp = self.request(Method::PUT, &format!("{index}/_doc/{id}")).json(doc).send().await?;
        check(resp, "index document").await.map(|_| ())
    }

    /// `POST /_bulk` with a newline-delimited body (see [`crate::bulk`]).
    pub async fn bulk(&self, ndjson: String) -> Result<BulkResponse, EsError> {
        let resp = self
            .request(Method::POST, "_bulk")
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(ndjson)
            .send()
            .await?;
        decode(resp, "bulk").await
    }

    pub async fn refresh(&self, index: &str) -> Result<(), EsError> {
        let resp = self.request(Method::POST, &format!("{index}/_refresh")).send().await?;
        check(resp, "refresh").await.map(|_| ())
    }

    pub async fn count(&self, index: &str) -> Result<u64, EsError> {
        let resp = self.request(Method::GET, &format!("{index}/_count")).send().await?;
        let count: CountResponse = decode(resp, "count").await?;
        Ok(count.count)
    }

    pub async fn stats(&self, index: &str) -> Result<IndexStats, EsError> {
        let resp = self.request(Method::GET, &format!("{index}/_stats")).send().await?;
        decode(resp, "stats").await
    }

    pub async fn search<T, A>(&self, index: &str, body: &Value) -> Result<SearchResponse<T, A>, EsError>
    where
        T: DeserializeOwned,
        A: DeserializeOwned,
    {
        tracing::debug!(index, body = %body, "search");
        let resp = self.request(Method::POST, &format!("{index}/_search")).json(body).send().await?;
        decode(resp, "search").await
    }
}

async fn check(resp: reqwest::Response, context: &str) -> Result<reqwest::Response, EsError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(EsError::Status { context: context.to_string(), status: status.as_u16(), body })
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response, context: &str) -> Result<T, EsError> {
    let bytes = check(resp, context).await?.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|source| EsError::Decode { context: context.to_string(), source })
}
