//! Tool descriptors as seen by the client.

pub use rmcp::model::Tool;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the knowledge-base tool; dispatch binds the raw query to it directly.
pub const QUERY_TOOL: &str = "query_tool";

/// Name of the login tool.
pub const LOGIN_TOOL: &str = "login_tool";

/// A tool advertised by the server for the duration of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Map<String, Value>,
}

impl ToolDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Map<String, Value>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Parameter names the client must fill before calling this tool.
    ///
    /// Uses the schema's `required` list when it is non-empty, otherwise every
    /// declared property. Order follows the schema.
    pub fn parameters(&self) -> Vec<String> {
        let required: Vec<String> = self
            .input_schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        if !required.is_empty() {
            return required;
        }

        self.input_schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| props.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// One line for the tool listing shown to the LLM.
    pub fn summary(&self) -> String {
        format!("- {}: {}", self.name, self.description)
    }
}

impl From<Tool> for ToolDescriptor {
    fn from(tool: Tool) -> Self {
        Self {
            name: tool.name.to_string(),
            description: tool
                .description
                .map(|d| d.to_string())
                .unwrap_or_default(),
            input_schema: (*tool.input_schema).clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_required_list_wins() {
        let tool = ToolDescriptor::new(
            QUERY_TOOL,
            "search",
            schema(json!({
                "type": "object",
                "properties": {"query": {}, "top_k": {}, "min_score": {}},
                "required": ["query"]
            })),
        );
        assert_eq!(tool.parameters(), vec!["query"]);
    }

    #[test]
    fn test_properties_keep_declaration_order() {
        let tool = ToolDescriptor::new(
            LOGIN_TOOL,
            "login",
            schema(json!({
                "type": "object",
                "properties": {"name": {"type": "string"}, "age": {"type": "integer"}}
            })),
        );
        assert_eq!(tool.parameters(), vec!["name", "age"]);
    }

    #[test]
    fn test_schema_without_properties_has_no_parameters() {
        let tool = ToolDescriptor::new("ping", "", schema(json!({"type": "object"})));
        assert!(tool.parameters().is_empty());
        assert_eq!(tool.summary(), "- ping: ");
    }
}
