//! Tool selection heuristic and pending-call continuation.
//!
//! Everything here is pure: no I/O, no session state. [`select_tool`] decides
//! what a turn should do from the LLM's free-text reply, and
//! [`PendingCall::fill`] completes a deferred call from the user's next input.
//! The session layer owns the single pending slot and performs the calls.
//!
//! Parameter inference is deliberately naive. A parameter counts as "present"
//! when its name occurs in the query, and the whole query is bound to it.

use std::collections::HashMap;

use itertools::Itertools;
use thiserror::Error;

use crate::tools::{ToolDescriptor, QUERY_TOOL};

/// Flat string-keyed arguments for a tool call.
pub type Params = HashMap<String, String>;

/// A tool call waiting for the user to supply missing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCall {
    pub tool_name: String,
    pub collected: Params,
    /// Missing parameter names, in schema order.
    pub missing: Vec<String>,
}

/// What a normal (non-pending) turn should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Call the tool now with these arguments.
    Invoke { tool: String, params: Params },
    /// Ask the user for the missing parameters and remember the call.
    Defer(PendingCall),
    /// No tool matched; the LLM reply is the answer.
    Answer(String),
}

/// The user supplied a different number of values than were asked for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Expected {} values: {}", .missing.len(), .missing.join(", "))]
pub struct ParameterCountMismatch {
    pub missing: Vec<String>,
    pub supplied: usize,
}

impl ParameterCountMismatch {
    pub fn expected(&self) -> usize {
        self.missing.len()
    }
}

/// Pick at most one tool based on the LLM reply and bind what we can from the query.
///
/// Tools are tried in listing order; the first whose name appears in the
/// reply (case-insensitively) wins.
pub fn select_tool(tools: &[ToolDescriptor], reply: &str, query: &str) -> Dispatch {
    let reply_lower = reply.to_lowercase();

    let Some(tool) = tools
        .iter()
        .find(|tool| reply_lower.contains(&tool.name.to_lowercase()))
    else {
        return Dispatch::Answer(reply.to_string());
    };

    if tool.name == QUERY_TOOL {
        let params = Params::from([("query".to_string(), query.to_string())]);
        return Dispatch::Invoke {
            tool: tool.name.clone(),
            params,
        };
    }

    let query_lower = query.to_lowercase();
    let (collected, missing): (Vec<String>, Vec<String>) = tool
        .parameters()
        .into_iter()
        .partition(|param| query_lower.contains(&param.to_lowercase()));

    let collected: Params = collected
        .into_iter()
        .map(|param| (param, query.to_string()))
        .collect();

    if missing.is_empty() {
        Dispatch::Invoke {
            tool: tool.name.clone(),
            params: collected,
        }
    } else {
        Dispatch::Defer(PendingCall {
            tool_name: tool.name.clone(),
            collected,
            missing,
        })
    }
}

impl PendingCall {
    /// The message asking the user for the missing values.
    pub fn prompt(&self) -> String {
        format!(
            "To use {}, please provide information in this specific format: {}",
            self.tool_name,
            self.missing.iter().join(", ")
        )
    }

    /// Merge comma-separated values from `input` into the collected parameters.
    ///
    /// Values are matched to missing names by position. Leaves `self`
    /// untouched so a count mismatch can be retried.
    pub fn fill(&self, input: &str) -> Result<Params, ParameterCountMismatch> {
        let values: Vec<&str> = input.split(',').map(str::trim).collect();

        if values.len() != self.missing.len() {
            return Err(ParameterCountMismatch {
                missing: self.missing.clone(),
                supplied: values.len(),
            });
        }

        let mut params = self.collected.clone();
        params.extend(
            self.missing
                .iter()
                .cloned()
                .zip(values.into_iter().map(str::to_string)),
        );
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool(name: &str, properties: &[&str]) -> ToolDescriptor {
        let props: serde_json::Map<_, _> = properties
            .iter()
            .map(|p| (p.to_string(), json!({"type": "string"})))
            .collect();
        let schema = json!({"type": "object", "properties": props});
        ToolDescriptor::new(name, format!("{name} tool"), schema.as_object().cloned().unwrap())
    }

    #[test]
    fn test_no_tool_name_returns_reply() {
        let tools = vec![tool("login_tool", &["name", "age"])];
        let dispatch = select_tool(&tools, "Paris is the capital.", "capital of France?");
        assert_eq!(dispatch, Dispatch::Answer("Paris is the capital.".to_string()));
    }

    #[test]
    fn test_first_listed_match_wins() {
        let tools = vec![tool("alpha", &[]), tool("beta", &[])];
        let dispatch = select_tool(&tools, "use BETA or Alpha", "q");
        assert_eq!(
            dispatch,
            Dispatch::Invoke {
                tool: "alpha".to_string(),
                params: Params::new()
            }
        );
    }

    #[test]
    fn test_parameter_present_binds_whole_query() {
        let tools = vec![tool("login_tool", &["name", "age"])];
        let dispatch = select_tool(&tools, "login_tool", "My NAME is Bob and my age is 30");
        match dispatch {
            Dispatch::Invoke { params, .. } => {
                assert_eq!(params["name"], "My NAME is Bob and my age is 30");
                assert_eq!(params["age"], "My NAME is Bob and my age is 30");
            }
            other => panic!("expected invoke, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_match_defers_remaining() {
        let tools = vec![tool("login_tool", &["name", "age"])];
        let Dispatch::Defer(pending) = select_tool(&tools, "login_tool", "my age is 30") else {
            panic!("expected defer");
        };
        assert_eq!(pending.missing, vec!["name"]);
        assert_eq!(pending.collected["age"], "my age is 30");
    }

    #[test]
    fn test_fill_trims_and_merges() {
        let pending = PendingCall {
            tool_name: "login_tool".to_string(),
            collected: Params::from([("age".to_string(), "30".to_string())]),
            missing: vec!["name".to_string()],
        };
        let params = pending.fill("  Alice  ").unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params["name"], "Alice");
        assert_eq!(params["age"], "30");
    }

    #[test]
    fn test_mismatch_message_names_count() {
        let pending = PendingCall {
            tool_name: "login_tool".to_string(),
            collected: Params::new(),
            missing: vec!["name".to_string(), "age".to_string()],
        };
        let err = pending.fill("a, b, c").unwrap_err();
        assert_eq!(err.expected(), 2);
        assert_eq!(err.supplied, 3);
        assert_eq!(err.to_string(), "Expected 2 values: name, age");
    }
}
