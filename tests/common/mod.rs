#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};
use toolbridge::client::{Client, ClientError};
use toolbridge::dispatch::Params;
use toolbridge::mcp::{McpError, McpServer, ToolCallResult};
use toolbridge::model::{Message, Part, Response};
use toolbridge::ToolDescriptor;

/// LLM client that replays canned replies and records prompts.
#[derive(Clone)]
pub struct MockClient {
    replies: Arc<Mutex<Vec<String>>>,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl MockClient {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.iter().map(|r| r.to_string()).collect())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl Client for MockClient {
    async fn request(&self, messages: Vec<Message>) -> Result<Response, ClientError> {
        let prompt = messages
            .first()
            .and_then(|m| m.content())
            .unwrap_or_default();
        self.prompts.lock().unwrap().push(prompt);

        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(ClientError::ProviderError(
                "No more mock responses".to_string(),
            ));
        }
        Ok(Response {
            data: vec![Message::Assistant(vec![Part::text(replies.remove(0))])],
        })
    }
}

/// MCP server double with a fixed tool list and scripted call results.
#[derive(Clone, Default)]
pub struct MockServer {
    tools: Vec<ToolDescriptor>,
    results: Arc<Mutex<Vec<Result<ToolCallResult, McpError>>>>,
    pub calls: Arc<Mutex<Vec<(String, Params)>>>,
}

impl MockServer {
    pub fn new(tools: Vec<ToolDescriptor>) -> Self {
        Self {
            tools,
            ..Default::default()
        }
    }

    /// Queue the result of the next tool call.
    pub fn respond(self, result: Result<ToolCallResult, McpError>) -> Self {
        self.results.lock().unwrap().push(result);
        self
    }

    pub fn calls(&self) -> Vec<(String, Params)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl McpServer for MockServer {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, McpError> {
        Ok(self.tools.clone())
    }

    async fn call_tool(&self, name: &str, params: &Params) -> Result<ToolCallResult, McpError> {
        self.calls
            .lock()
            .unwrap()
            .push((name.to_string(), params.clone()));

        let mut results = self.results.lock().unwrap();
        if results.is_empty() {
            return Ok(text_result("ok"));
        }
        results.remove(0)
    }
}

pub fn text_result(text: &str) -> ToolCallResult {
    ToolCallResult {
        texts: vec![text.to_string()],
        structured: None,
    }
}

/// The two tools the real server exposes, with their schemas' shape.
pub fn rag_tools() -> Vec<ToolDescriptor> {
    let login = json!({
        "type": "object",
        "properties": {
            "name": {"type": ["string", "null"]},
            "age": {"type": ["integer", "null"]}
        }
    });
    let query = json!({
        "type": "object",
        "properties": {
            "query": {"type": "string"},
            "top_k": {"type": "integer", "default": 5},
            "min_score": {"type": "number", "default": 0.5}
        },
        "required": ["query"]
    });

    vec![
        ToolDescriptor::new(
            "login_tool",
            "Login for Lomaa IT Solutions",
            login.as_object().cloned().unwrap(),
        ),
        ToolDescriptor::new(
            "query_tool",
            "Search the knowledge base",
            query.as_object().cloned().unwrap(),
        ),
    ]
}
