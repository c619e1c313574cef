//! Client side of the MCP connection.
//!
//! [`McpServer`] is the seam the session talks through. It is implemented for
//! any running rmcp client service, so a stdio child process and an in-memory
//! duplex connection look the same to the session.

use std::ffi::OsStr;
use std::ops::Deref;
use std::path::Path;

use async_trait::async_trait;
use rmcp::model::{CallToolRequestParam, CallToolResult, RawContent};
use rmcp::service::{RoleClient, RunningService};
use rmcp::transport::TokioChildProcess;
use rmcp::{ClientHandler, ServiceExt};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::process::Command;

use crate::dispatch::Params;
use crate::tools::ToolDescriptor;

#[derive(Debug, Error)]
pub enum McpError {
    #[error("MCP error: {0}")]
    Mcp(String),
    #[error("Failed to start server process {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{message}")]
    ToolFailed { tool: String, message: String },
}

/// Outcome of a remote tool call, reduced to what the client displays.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToolCallResult {
    /// Text content blocks, in order.
    pub texts: Vec<String>,
    /// Structured content, when the server sent any.
    pub structured: Option<Value>,
}

impl ToolCallResult {
    /// The text shown to the user: the first text block, else the structured
    /// content as JSON.
    pub fn text(&self) -> String {
        if let Some(first) = self.texts.first() {
            return first.clone();
        }
        self.structured
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_default()
    }
}

impl From<CallToolResult> for ToolCallResult {
    fn from(result: CallToolResult) -> Self {
        let texts = result
            .content
            .into_iter()
            .filter_map(|content| match content.raw {
                RawContent::Text(text_content) => Some(text_content.text),
                _ => None,
            })
            .collect();

        Self {
            texts,
            structured: result.structured_content,
        }
    }
}

/// Trait for MCP servers the client session can use.
#[async_trait]
pub trait McpServer: Send + Sync {
    /// List available tools, in the server's order.
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, McpError>;

    /// Execute a tool with flat string arguments.
    async fn call_tool(&self, name: &str, params: &Params) -> Result<ToolCallResult, McpError>;
}

#[async_trait]
impl<S: ClientHandler + Send + Sync> McpServer for RunningService<RoleClient, S> {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, McpError> {
        let result = self
            .deref()
            .list_tools(None)
            .await
            .map_err(|e| McpError::Mcp(e.to_string()))?;
        Ok(result.tools.into_iter().map(ToolDescriptor::from).collect())
    }

    async fn call_tool(&self, name: &str, params: &Params) -> Result<ToolCallResult, McpError> {
        let arguments: Map<String, Value> = params
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();

        tracing::info!("Calling tool {} with {} argument(s)", name, arguments.len());

        let params = CallToolRequestParam {
            name: name.to_string().into(),
            arguments: Some(arguments),
        };

        let result = self
            .deref()
            .call_tool(params)
            .await
            .map_err(|e| McpError::Mcp(e.to_string()))?;

        let failed = result.is_error.unwrap_or(false);
        let result = ToolCallResult::from(result);

        if failed {
            tracing::warn!("Tool {} reported an error", name);
            return Err(McpError::ToolFailed {
                tool: name.to_string(),
                message: result.text(),
            });
        }

        Ok(result)
    }
}

/// Build the command that runs a server script: Python and Node scripts go
/// through their interpreter, anything else is executed directly.
pub fn server_command(script: &Path) -> Command {
    let interpreter = match script.extension().and_then(OsStr::to_str) {
        Some("py") => Some("python"),
        Some("js") => Some("node"),
        _ => None,
    };

    match interpreter {
        Some(program) => {
            let mut cmd = Command::new(program);
            cmd.arg(script);
            cmd
        }
        None => Command::new(script),
    }
}

/// Spawn the server script as a child process and open an MCP session over its stdio.
pub async fn connect_stdio(script: &Path) -> Result<RunningService<RoleClient, ()>, McpError> {
    let command = server_command(script);
    let program = command.as_std().get_program().to_string_lossy().into_owned();

    tracing::info!("Starting MCP server {}", script.display());

    let transport = TokioChildProcess::new(command).map_err(|source| McpError::Spawn {
        program: program.clone(),
        source,
    })?;

    let service = ()
        .serve(transport)
        .await
        .map_err(|e| McpError::Mcp(format!("Failed to initialize session with {program}: {e}")))?;

    tracing::info!("Connected to MCP server {}", script.display());
    Ok(service)
}
