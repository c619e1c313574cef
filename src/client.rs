//! Core LLM client trait and error types.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Message, Response};

/// Errors that can occur during LLM client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Main client trait for LLM providers.
#[async_trait]
pub trait Client: Send + Sync {
    /// Send a request to the LLM provider.
    async fn request(&self, messages: Vec<Message>) -> Result<Response, ClientError>;

    /// Send a single user prompt and return the assistant's text.
    async fn complete(&self, prompt: &str) -> Result<String, ClientError> {
        let response = self.request(vec![Message::user(prompt)]).await?;
        Ok(response.text())
    }
}
