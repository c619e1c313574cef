//! Per-connection client session.
//!
//! A [`Session`] owns the LLM client, the MCP connection and the single
//! pending-call slot. Each call to [`Session::process_query`] is one user
//! turn and yields a [`TurnOutcome`]; failures never escape a turn.

use std::fmt;

use itertools::Itertools;
use thiserror::Error;

use crate::client::{Client, ClientError};
use crate::dispatch::{select_tool, Dispatch, ParameterCountMismatch, Params, PendingCall};
use crate::mcp::{McpError, McpServer};
use crate::tools::ToolDescriptor;

/// Result of one user turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The LLM answered directly; no tool was named.
    Answer(String),
    /// A tool ran and returned this text.
    ToolResult { tool: String, text: String },
    /// A tool was chosen but parameters are missing; a pending call was stored.
    NeedParameters(PendingCall),
    /// The values supplied for a pending call did not match the expected count.
    ParameterCountMismatch(ParameterCountMismatch),
    /// The tool call itself failed.
    ToolError { tool: String, message: String },
    /// The turn could not be processed: unreadable input, or listing tools
    /// or asking the LLM failed.
    Failed(String),
}

impl TurnOutcome {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            TurnOutcome::ParameterCountMismatch(_)
                | TurnOutcome::ToolError { .. }
                | TurnOutcome::Failed(_)
        )
    }
}

impl fmt::Display for TurnOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnOutcome::Answer(text) => f.write_str(text),
            TurnOutcome::ToolResult { tool, text } => write!(f, "✅ Used tool {tool}:\n{text}"),
            TurnOutcome::NeedParameters(pending) => f.write_str(&pending.prompt()),
            TurnOutcome::ParameterCountMismatch(err) => write!(f, "{err}"),
            TurnOutcome::ToolError { tool, message } => {
                write!(f, "❌ Error calling tool {tool}: {message}")
            }
            TurnOutcome::Failed(message) => write!(f, "Error processing query: {message}"),
        }
    }
}

#[derive(Debug, Error)]
enum TurnError {
    #[error(transparent)]
    Mcp(#[from] McpError),
    #[error(transparent)]
    Llm(#[from] ClientError),
}

/// Build the routing prompt sent to the LLM for a normal turn.
pub fn build_prompt(tools: &[ToolDescriptor], query: &str) -> String {
    let tools_context = tools.iter().map(ToolDescriptor::summary).join("\n");
    format!(
        "Available MCP Tools:\n\
         {tools_context}\n\
         User Query:\n\
         {query}\n\
         Instructions:\n\
         - Decide if a tool is needed.\n\
         - If yes, give tool name and map query to inputs.\n\
         - If required params are missing, just mention that.\n"
    )
}

/// A single interactive session against one MCP server.
pub struct Session<C: Client, S: McpServer> {
    llm: C,
    server: S,
    pending: Option<PendingCall>,
}

impl<C: Client, S: McpServer> Session<C, S> {
    pub fn new(llm: C, server: S) -> Self {
        Self {
            llm,
            server,
            pending: None,
        }
    }

    /// The call waiting for parameters, if any.
    pub fn pending(&self) -> Option<&PendingCall> {
        self.pending.as_ref()
    }

    pub fn into_server(self) -> S {
        self.server
    }

    /// Handle one user turn.
    ///
    /// While a call is pending the input is treated as its missing values;
    /// otherwise the LLM picks a tool.
    pub async fn process_query(&mut self, query: &str) -> TurnOutcome {
        if let Some(pending) = self.pending.take() {
            return self.resume(pending, query).await;
        }

        match self.dispatch(query).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Error processing query: {}", e);
                TurnOutcome::Failed(e.to_string())
            }
        }
    }

    async fn resume(&mut self, pending: PendingCall, input: &str) -> TurnOutcome {
        match pending.fill(input) {
            Ok(params) => self.invoke(&pending.tool_name, &params).await,
            Err(mismatch) => {
                tracing::info!(
                    "Got {} value(s) for {}, expected {}",
                    mismatch.supplied,
                    pending.tool_name,
                    mismatch.expected()
                );
                self.pending = Some(pending);
                TurnOutcome::ParameterCountMismatch(mismatch)
            }
        }
    }

    async fn dispatch(&mut self, query: &str) -> Result<TurnOutcome, TurnError> {
        let tools = self.server.list_tools().await?;
        let prompt = build_prompt(&tools, query);
        let reply = self.llm.complete(&prompt).await?;

        Ok(match select_tool(&tools, &reply, query) {
            Dispatch::Answer(text) => TurnOutcome::Answer(text),
            Dispatch::Invoke { tool, params } => self.invoke(&tool, &params).await,
            Dispatch::Defer(pending) => {
                tracing::info!(
                    "Waiting for {} before calling {}",
                    pending.missing.join(", "),
                    pending.tool_name
                );
                self.pending = Some(pending.clone());
                TurnOutcome::NeedParameters(pending)
            }
        })
    }

    async fn invoke(&self, tool: &str, params: &Params) -> TurnOutcome {
        match self.server.call_tool(tool, params).await {
            Ok(result) => TurnOutcome::ToolResult {
                tool: tool.to_string(),
                text: result.text(),
            },
            Err(e) => {
                tracing::error!("Error calling tool {}: {}", tool, e);
                TurnOutcome::ToolError {
                    tool: tool.to_string(),
                    message: e.to_string(),
                }
            }
        }
    }
}
