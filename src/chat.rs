//! Interactive read-eval-print loop over a [`Session`].

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::client::Client;
use crate::mcp::McpServer;
use crate::session::{Session, TurnOutcome};

/// Read queries line by line until `quit` (any case) or end of input.
///
/// Blank lines are skipped. Every turn's outcome, error or not, is written
/// to `output` and the loop continues; a line that is not valid UTF-8 is
/// reported the same way. Only I/O errors on the streams themselves end it.
pub async fn chat_loop<C, S, R, W>(
    session: &mut Session<C, S>,
    mut input: R,
    output: &mut W,
) -> std::io::Result<()>
where
    C: Client,
    S: McpServer,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output
        .write_all(b"\nMCP Client Started!\nType your queries or 'quit' to exit.\n")
        .await?;

    let mut buf = Vec::new();
    loop {
        output.write_all(b"\nQuery: ").await?;
        output.flush().await?;

        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let outcome = match std::str::from_utf8(&buf) {
            Ok(line) => {
                let query = line.trim();
                if query.is_empty() {
                    continue;
                }
                if query.to_lowercase() == "quit" {
                    break;
                }
                session.process_query(query).await
            }
            Err(e) => TurnOutcome::Failed(format!("input is not valid UTF-8: {e}")),
        };
        if outcome.is_error() {
            tracing::warn!("Turn ended with an error: {}", outcome);
        }
        output.write_all(format!("\n{outcome}\n").as_bytes()).await?;
    }

    output.flush().await
}
