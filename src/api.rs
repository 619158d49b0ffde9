//! Backend API client.
//!
//! [`NewsApi`] is the seam between the page controller and the network; the
//! controller never touches `reqwest` directly, so tests can substitute a fake.

use crate::errors::ClientError;
use crate::models::{
    AnswerResponse, Article, AskRequest, FetchNewsRequest, SearchRequest, SearchResponse, Stats,
};
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::time::Duration;

pub trait NewsApi: Send + Sync + 'static {
    fn stats(&self) -> impl Future<Output = Result<Stats, ClientError>> + Send;

    fn fetch_news(
        &self,
        request: &FetchNewsRequest,
    ) -> impl Future<Output = Result<Vec<Article>, ClientError>> + Send;

    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<SearchResponse, ClientError>> + Send;

    fn ask(
        &self,
        request: &AskRequest,
    ) -> impl Future<Output = Result<AnswerResponse, ClientError>> + Send;
}

/// [`NewsApi`] over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpNewsApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpNewsApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ClientError::Network(err.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Http {
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode(err.to_string()))
}

impl NewsApi for HttpNewsApi {
    async fn stats(&self) -> Result<Stats, ClientError> {
        let response = self.client.get(self.url("/stats")).send().await?;
        decode(response).await
    }

    async fn fetch_news(&self, request: &FetchNewsRequest) -> Result<Vec<Article>, ClientError> {
        self.post_json("/fetch-news", request).await
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ClientError> {
        self.post_json("/search", request).await
    }

    async fn ask(&self, request: &AskRequest) -> Result<AnswerResponse, ClientError> {
        self.post_json("/ask", request).await
    }
}
