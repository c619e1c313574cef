//! HTTP client for the backend RAG/login API.
//!
//! Each call is a single JSON `POST` with no retry. Non-2xx responses,
//! network failures and undecodable bodies are logged here and returned to
//! the caller.

use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::http::{add_extra_headers, build_http_client, RequestBuilderExt, ResponseExt};
use crate::options::TransportOptions;

pub const DEFAULT_TOP_K: u32 = 5;
pub const DEFAULT_MIN_SCORE: f64 = 0.5;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid JSON in response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Body of `POST /login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub age: u32,
}

/// Body of `POST /query`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    pub top_k: u32,
    pub min_score: f64,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: DEFAULT_TOP_K,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

/// Client for the two backend endpoints.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    transport_options: TransportOptions,
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new(
        base_url: impl Into<String>,
        transport_options: TransportOptions,
    ) -> Result<Self, BackendError> {
        let http = build_http_client(&transport_options)?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport_options,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /login`.
    pub async fn login(&self, request: &LoginRequest) -> Result<Value, BackendError> {
        self.post("login", request).await
    }

    /// `POST /query`.
    pub async fn query(&self, request: &QueryRequest) -> Result<Value, BackendError> {
        self.post("query", request).await
    }

    async fn post<T: Serialize + Sync>(
        &self,
        endpoint: &'static str,
        body: &T,
    ) -> Result<Value, BackendError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let req = self.http.post(&url).header(CONTENT_TYPE, "application/json");
        let req = add_extra_headers(req, &self.transport_options);

        let response = req.json_logged(body).send().await.map_err(|e| {
            tracing::error!("Network error while calling {} API: {}", endpoint, e);
            BackendError::Network(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text_logged().await.unwrap_or_default();
            tracing::error!("{} API returned an error status {}", endpoint, status);
            return Err(BackendError::Status {
                endpoint,
                status,
                body,
            });
        }

        response
            .json_logged::<Value, BackendError>()
            .await
            .inspect_err(|e| tracing::error!("Invalid response from {} API: {}", endpoint, e))
    }
}
