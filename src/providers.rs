//! LLM provider implementations.

use crate::client::{Client, ClientError};
use crate::options::{ModelOptions, TransportOptions};

/// Trait for LLM providers that can create configured clients.
pub trait Provider {
    /// The client type produced by this provider.
    type Client: Client;

    /// Provider-specific model options carried in [`ModelOptions`].
    type Model: Default;

    /// Create a new client with the given API key and model name.
    fn create(api_key: String, model: String) -> Result<Self::Client, ClientError>;

    /// Create a new client with custom options.
    fn create_with_options(
        api_key: String,
        model_options: ModelOptions<Self::Model>,
        transport_options: TransportOptions,
    ) -> Result<Self::Client, ClientError>;
}

pub mod gemini;

pub use gemini::{Gemini, GeminiClient, GeminiModel};
