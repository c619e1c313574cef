mod common;

use common::{rag_tools, text_result, MockClient, MockServer};
use toolbridge::chat::chat_loop;
use toolbridge::mcp::McpError;
use toolbridge::Session;

async fn run(session: &mut Session<MockClient, MockServer>, input: &str) -> String {
    run_bytes(session, input.as_bytes()).await
}

async fn run_bytes(session: &mut Session<MockClient, MockServer>, input: &[u8]) -> String {
    let mut output = Vec::new();
    chat_loop(session, input, &mut output)
        .await
        .unwrap();
    String::from_utf8(output).unwrap()
}

#[tokio::test]
async fn test_quit_stops_without_calling_anything() {
    let llm = MockClient::new(&["query_tool"]);
    let server = MockServer::new(rag_tools());
    let mut session = Session::new(llm.clone(), server.clone());

    let output = run(&mut session, "QuIt\nwhat is Lomaa\n").await;

    assert!(output.starts_with("\nMCP Client Started!\nType your queries or 'quit' to exit.\n"));
    assert_eq!(output.matches("Query: ").count(), 1);
    assert_eq!(llm.prompt_count(), 0);
    assert!(server.calls().is_empty());
}

#[tokio::test]
async fn test_error_turn_is_printed_and_loop_continues() {
    let llm = MockClient::new(&["query_tool", "query_tool"]);
    let server = MockServer::new(rag_tools())
        .respond(Err(McpError::ToolFailed {
            tool: "query_tool".to_string(),
            message: "query returned HTTP 500 Internal Server Error: boom".to_string(),
        }))
        .respond(Ok(text_result("{\"answer\":\"IT services\"}")));
    let mut session = Session::new(llm, server.clone());

    let output = run(&mut session, "what is Lomaa\nwhat does Lomaa do\nquit\n").await;

    assert!(output.contains(
        "❌ Error calling tool query_tool: query returned HTTP 500 Internal Server Error: boom"
    ));
    assert!(output.contains("✅ Used tool query_tool:\n{\"answer\":\"IT services\"}"));
    assert_eq!(server.calls().len(), 2);
}

#[tokio::test]
async fn test_blank_lines_skipped_and_eof_ends_loop() {
    let llm = MockClient::new(&["Hello there"]);
    let mut session = Session::new(llm.clone(), MockServer::new(rag_tools()));

    let output = run(&mut session, "\n   \nhi\n").await;

    assert!(output.contains("\nHello there\n"));
    assert_eq!(llm.prompt_count(), 1);
}

#[tokio::test]
async fn test_pending_prompt_then_values_over_the_loop() {
    let server = MockServer::new(rag_tools());
    let mut session = Session::new(MockClient::new(&["login_tool"]), server.clone());

    let output = run(&mut session, "please sign me in\nAlice, 30\nquit\n").await;

    assert!(output.contains(
        "To use login_tool, please provide information in this specific format: name, age"
    ));
    assert!(output.contains("✅ Used tool login_tool:\nok"));
    assert_eq!(server.calls().len(), 1);
    assert!(session.pending().is_none());
}

#[tokio::test]
async fn test_invalid_utf8_line_is_reported_and_loop_continues() {
    let llm = MockClient::new(&["Hello there"]);
    let mut session = Session::new(llm.clone(), MockServer::new(rag_tools()));

    let output = run_bytes(&mut session, b"\xff\xfe\nhi\nquit\n").await;

    assert!(output.contains("\nError processing query: input is not valid UTF-8"));
    assert!(output.contains("\nHello there\n"));
    assert_eq!(llm.prompt_count(), 1);
    assert_eq!(output.matches("Query: ").count(), 3);
}
