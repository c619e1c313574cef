//! # toolbridge
//!
//! A small MCP (Model Context Protocol) bridge in two halves:
//!
//! - a **client** session that asks an LLM (Gemini) whether one of the
//!   server's tools fits the user's query, fills the tool's parameters from
//!   the query, and calls it over MCP;
//! - a **server** that exposes `login_tool` and `query_tool` as thin wrappers
//!   over a backend RAG/login HTTP API.
//!
//! ## Architecture
//!
//! 1. **Providers** create LLM **Clients** (`providers`, `api`).
//! 2. The **dispatch** heuristic is a pure function from LLM reply + query to
//!    a decision: answer, invoke, or ask for missing parameters.
//! 3. A **Session** holds one MCP connection and at most one pending call,
//!    and turns each query into a [`session::TurnOutcome`].
//! 4. **RagTools** is the rmcp tool server, forwarding to [`backend::BackendClient`].
//!
//! ## Example
//! ```no_run
//! use std::path::Path;
//! use toolbridge::providers::{Gemini, Provider};
//! use toolbridge::{mcp, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let llm = Gemini::create("your-api-key".to_string(), "gemini-2.5-flash".to_string())?;
//!     let server = mcp::connect_stdio(Path::new("./toolbridge-server")).await?;
//!     let mut session = Session::new(llm, server);
//!
//!     let outcome = session.process_query("what is Lomaa").await;
//!     println!("{outcome}");
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod backend;
pub mod chat;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod http;
pub mod logging;
pub mod mcp;
pub mod model;
pub mod options;
pub mod providers;
pub mod server;
pub mod session;
pub mod tools;

pub use client::{Client, ClientError};
pub use dispatch::{Dispatch, PendingCall};
pub use mcp::{McpError, McpServer};
pub use server::RagTools;
pub use session::{Session, TurnOutcome};
pub use tools::ToolDescriptor;

// Re-export rmcp for convenience
pub use rmcp;
