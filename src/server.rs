//! MCP tool server exposing the backend API as two tools.
//!
//! `login_tool` checks its arguments locally and answers with a
//! `missing_arguments` payload instead of calling the backend when one is
//! absent. `query_tool` always forwards. Backend failures come back as MCP
//! error results so the client can show them and carry on.

use rmcp::handler::server::tool::ToolCallContext;
use rmcp::handler::server::{router::tool::ToolRouter, wrapper::Parameters};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{tool, tool_router, ErrorData, RoleServer, ServerHandler};
use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use crate::backend::{BackendClient, BackendError, LoginRequest, QueryRequest};
use crate::backend::{DEFAULT_MIN_SCORE, DEFAULT_TOP_K};
use crate::tools::{LOGIN_TOOL, QUERY_TOOL};

/// Name the server reports during MCP initialization.
pub const SERVER_NAME: &str = "newrag";

/// Order tools are listed in. The client picks the first tool named in the
/// LLM reply, so this order decides ties.
const TOOL_ORDER: [&str; 2] = [LOGIN_TOOL, QUERY_TOOL];

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct LoginArgs {
    /// Full name of the user logging in.
    #[serde(default)]
    pub name: Option<String>,
    /// Age of the user, in years.
    #[serde(default, deserialize_with = "lenient_age")]
    #[schemars(with = "Option<u32>")]
    pub age: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct QueryArgs {
    /// The question to search the knowledge base for.
    pub query: String,
    /// Maximum number of passages to retrieve.
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    /// Minimum relevance score for a passage to be returned.
    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

fn default_top_k() -> u32 {
    DEFAULT_TOP_K
}

fn default_min_score() -> f64 {
    DEFAULT_MIN_SCORE
}

/// Accepts the age as a JSON number or a numeric string; the client sends
/// every argument as a string.
fn lenient_age<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Age {
        Number(u32),
        Text(String),
    }

    match Option::<Age>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Age::Number(n)) => Ok(Some(n)),
        Some(Age::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("age must be a whole number, got {text:?}"))),
    }
}

impl LoginArgs {
    /// Names of the arguments that were not supplied, in declaration order.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push("name");
        }
        if self.age.is_none() {
            missing.push("age");
        }
        missing
    }
}

/// The `missing_arguments` payload returned instead of calling the backend.
pub fn missing_arguments(missing: &[&str]) -> Value {
    json!({
        "error": "missing_arguments",
        "message": format!(
            "To help you with the login process, please provide your {}.",
            missing.join(", ")
        ),
    })
}

fn json_result(value: &Value) -> CallToolResult {
    CallToolResult::success(vec![Content::text(value.to_string())])
}

fn backend_failure(api: &str, err: &BackendError) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("Error calling {api} API: {err}"))])
}

/// Tool handler forwarding to the backend API.
#[derive(Debug, Clone)]
pub struct RagTools {
    backend: BackendClient,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl RagTools {
    pub fn new(backend: BackendClient) -> Self {
        Self {
            backend,
            tool_router: Self::tool_router(),
        }
    }

    /// Registered tools in [`TOOL_ORDER`]; the router's own listing is unordered.
    pub fn tools(&self) -> Vec<Tool> {
        let mut tools = self.tool_router.list_all();
        tools.sort_by_key(|tool| {
            TOOL_ORDER
                .iter()
                .position(|name| *name == tool.name)
                .unwrap_or(TOOL_ORDER.len())
        });
        tools
    }

    #[tool(
        description = "Use this tool when the user asks about registration, login, sign in, sign off or authentication with Lomaa IT Solutions (also written 'Lomaa', 'lomaa it solutions' or 'lomaa'). It needs two inputs, name and age. If the user wants to log in but has not given both, ask for the missing ones."
    )]
    async fn login_tool(
        &self,
        Parameters(args): Parameters<LoginArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        let missing = args.missing();
        let (Some(name), Some(age)) = (args.name, args.age) else {
            tracing::info!("login_tool called without {}", missing.join(", "));
            return Ok(json_result(&missing_arguments(&missing)));
        };

        let request = LoginRequest { name, age };
        tracing::info!("Calling login API with payload: {:?}", request);

        match self.backend.login(&request).await {
            Ok(response) => {
                tracing::info!("Login API responded");
                Ok(json_result(&response))
            }
            Err(e) => Ok(backend_failure("login", &e)),
        }
    }

    #[tool(
        description = "Use this tool for questions about 'lomma', 'lomaa', 'lomaa it', 'lomaa it solutions' or any general information query. It searches the RAG knowledge base and returns the most relevant stored passages."
    )]
    async fn query_tool(
        &self,
        Parameters(args): Parameters<QueryArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = QueryRequest {
            query: args.query,
            top_k: args.top_k,
            min_score: args.min_score,
        };
        tracing::info!(
            "Calling query API (top_k={}, min_score={})",
            request.top_k,
            request.min_score
        );

        match self.backend.query(&request).await {
            Ok(response) => Ok(json_result(&response)),
            Err(e) => Ok(backend_failure("query", &e)),
        }
    }
}

impl ServerHandler for RagTools {
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let call = ToolCallContext::new(self, request, context);
        self.tool_router.call(call).await
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Login and knowledge-base search for Lomaa IT Solutions.".to_string(),
            ),
            ..Default::default()
        }
    }
}
