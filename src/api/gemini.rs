//! Google Gemini API client implementation.
//!
//! This module implements the `Client` trait for Google's Gemini
//! `generateContent` endpoint.
//! See: <https://ai.google.dev/api/rest>

use async_trait::async_trait;
use nonempty::NonEmpty;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::client::{Client, ClientError};
use crate::http::{add_extra_headers, build_http_client, RequestBuilderExt, ResponseExt};
use crate::model::{Message, Part, Response};
use crate::options::{ModelOptions, TransportOptions};

/// Gemini-specific model options.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeminiModel {
    pub top_k: Option<u32>,
    pub stop_sequences: Option<Vec<String>>,
}

/// Gemini client using HTTP transport.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    model_options: ModelOptions<GeminiModel>,
    transport_options: TransportOptions,
    http: reqwest::Client,
}

impl GeminiClient {
    /// Create a new Gemini client.
    pub fn new(
        api_key: String,
        base_url: String,
        model_options: ModelOptions<GeminiModel>,
        transport_options: TransportOptions,
    ) -> Result<Self, ClientError> {
        let http = build_http_client(&transport_options)?;
        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model_options,
            transport_options,
            http,
        })
    }

    /// Model selection this client sends with every request.
    pub fn model_options(&self) -> &ModelOptions<GeminiModel> {
        &self.model_options
    }

    pub fn transport_options(&self) -> &TransportOptions {
        &self.transport_options
    }

    fn endpoint(&self) -> Result<String, ClientError> {
        if self.model_options.model.is_empty() {
            return Err(ClientError::Config("Model must be specified".to_string()));
        }
        Ok(format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model_options.model
        ))
    }

    /// Handle Gemini error responses.
    fn handle_error_response(status: reqwest::StatusCode, body: &str) -> ClientError {
        if let Ok(error_resp) = serde_json::from_str::<GeminiErrorResponse>(body) {
            ClientError::ProviderError(format!(
                "Gemini error ({}): {}",
                error_resp.error.code, error_resp.error.message
            ))
        } else {
            ClientError::ProviderError(format!("HTTP {}: {}", status, body))
        }
    }
}

impl GeminiRequest {
    fn new(messages: Vec<Message>, model_options: &ModelOptions<GeminiModel>) -> Self {
        let mut system_parts: Vec<GeminiPart> = model_options
            .system
            .iter()
            .map(|text| GeminiPart::text(text.clone()))
            .collect();
        let mut contents = Vec::new();

        for msg in messages {
            match msg {
                Message::System(parts) => {
                    system_parts.extend(parts.into_iter().map(GeminiPart::from));
                }
                _ => contents.push(msg.into()),
            }
        }

        let system_instruction = if system_parts.is_empty() {
            None
        } else {
            Some(GeminiSystemInstruction {
                parts: system_parts,
            })
        };

        GeminiRequest {
            contents,
            system_instruction,
            generation_config: Some(GeminiGenerationConfig {
                top_k: model_options.provider.top_k,
                stop_sequences: model_options.provider.stop_sequences.clone(),
            }),
        }
    }
}

impl GeminiPart {
    fn text(text: String) -> Self {
        GeminiPart {
            text: Some(text),
            thought: None,
        }
    }
}

impl From<Part> for GeminiPart {
    fn from(part: Part) -> Self {
        match part {
            Part::Text { content } => GeminiPart::text(content),
            Part::Reasoning { content } => GeminiPart {
                text: Some(content),
                thought: Some(true),
            },
        }
    }
}

impl From<Message> for GeminiContent {
    fn from(msg: Message) -> Self {
        let role = match msg {
            Message::Assistant(_) => GeminiRole::Model,
            Message::User(_) | Message::System(_) => GeminiRole::User,
        };

        let parts = match msg {
            Message::User(parts) | Message::Assistant(parts) | Message::System(parts) => {
                parts.into_iter().map(GeminiPart::from).collect()
            }
        };

        GeminiContent { role, parts }
    }
}

impl GeminiPart {
    fn into_part(self) -> Option<Part> {
        let text = self.text?;
        if self.thought.unwrap_or_default() {
            Some(Part::Reasoning { content: text })
        } else {
            Some(Part::Text { content: text })
        }
    }
}

impl From<GeminiResponse> for Response {
    fn from(gemini_resp: GeminiResponse) -> Self {
        // Only the first candidate is surfaced; Gemini returns one unless asked otherwise.
        let parts: Vec<Part> = gemini_resp
            .candidates
            .head
            .content
            .parts
            .into_iter()
            .filter_map(GeminiPart::into_part)
            .collect();

        Response {
            data: vec![Message::Assistant(parts)],
        }
    }
}

#[async_trait]
impl Client for GeminiClient {
    async fn request(&self, messages: Vec<Message>) -> Result<Response, ClientError> {
        let url = self.endpoint()?;
        let request_body = GeminiRequest::new(messages, &self.model_options);

        let mut req = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header("x-goog-api-key", &self.api_key);

        req = add_extra_headers(req, &self.transport_options);

        tracing::debug!("Sending Gemini request to model {}", self.model_options.model);
        let response = req.json_logged(&request_body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text_logged().await.unwrap_or_default();
            tracing::error!("Gemini request failed with status {}", status);
            return Err(Self::handle_error_response(status, &body));
        }

        let gemini_response: GeminiResponse = response.json_logged::<_, ClientError>().await?;
        Ok(gemini_response.into())
    }
}

// --- Gemini API Request/Response Types ---

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    system_instruction: Option<GeminiSystemInstruction>,
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Clone, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum GeminiRole {
    User,
    Model,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default = "default_role")]
    role: GeminiRole,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

fn default_role() -> GeminiRole {
    GeminiRole::Model
}

/// Text-only view of a Gemini part. Function-call parts carry no `text`
/// and are dropped on the way in.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiPart {
    text: Option<String>,
    thought: Option<bool>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    top_k: Option<u32>,
    stop_sequences: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: NonEmpty<GeminiCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default = "empty_content")]
    content: GeminiContent,
}

fn empty_content() -> GeminiContent {
    GeminiContent {
        role: GeminiRole::Model,
        parts: Vec::new(),
    }
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiError {
    code: u32,
    message: String,
}
