//! Stdio transport: newline-delimited JSON-RPC messages on stdin, one response
//! line per answered message on stdout.

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use crate::mcp::rpc::{json_rpc_error, PARSE_ERROR};
use crate::mcp::server::handle_json_rpc_payload;
use crate::transport::{Transport, TransportError};
use crate::AppState;

/// Newline-delimited JSON-RPC over stdin/stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdioTransport;

#[async_trait]
impl Transport for StdioTransport {
    fn name(&self) -> &'static str {
        "stdio"
    }

    async fn serve(&self, state: AppState) -> Result<(), TransportError> {
        info!(server_name = %state.server_name, "stdio transport ready");

        serve_lines(
            &state,
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
        )
        .await?;

        info!("stdin closed, stdio transport stopping");
        Ok(())
    }
}

/// Answers each non-blank input line with at most one output line. Returns on EOF.
///
/// A line that is not UTF-8 or not JSON is answered with a parse error and the
/// loop keeps reading.
pub async fn serve_lines<R, W>(
    state: &AppState,
    mut reader: R,
    mut writer: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer).await? == 0 {
            break;
        }

        let line = match std::str::from_utf8(&buffer) {
            Ok(line) => line.trim(),
            Err(err) => {
                warn!(error = %err, "discarding non-utf8 stdio message");
                write_line(&mut writer, &json_rpc_error(None, PARSE_ERROR, "Parse error")).await?;
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(line) {
            Ok(payload) => handle_json_rpc_payload(state, payload).await,
            Err(err) => {
                warn!(error = %err, "discarding unparseable stdio message");
                Some(json_rpc_error(None, PARSE_ERROR, "Parse error"))
            }
        };

        if let Some(response) = response {
            write_line(&mut writer, &response).await?;
        }
    }

    Ok(())
}

async fn write_line<W>(writer: &mut W, response: &Value) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut encoded = serde_json::to_vec(response)?;
    encoded.push(b'\n');
    writer.write_all(&encoded).await?;
    writer.flush().await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::Value;

    use super::serve_lines;
    use crate::{catalog::default_registry, AppState};

    fn state() -> AppState {
        AppState::new(
            Arc::new(default_registry().expect("default registry")),
            "stdio-test",
            None,
        )
    }

    async fn run(input: &str) -> Vec<Value> {
        run_bytes(input.as_bytes()).await
    }

    async fn run_bytes(input: &[u8]) -> Vec<Value> {
        let mut output = Vec::new();
        serve_lines(&state(), input, &mut output)
            .await
            .expect("stdio loop");

        String::from_utf8(output)
            .expect("utf8 output")
            .lines()
            .map(|line| serde_json::from_str(line).expect("json line"))
            .collect()
    }

    #[tokio::test]
    async fn answers_each_request_on_its_own_line() {
        let responses = run(concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"add_numbers","arguments":{"a":2,"b":3}}}"#,
            "\n",
        ))
        .await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[1]["id"], 2);
        assert_eq!(responses[1]["result"]["structuredContent"]["result"], 5);
    }

    #[tokio::test]
    async fn skips_blank_lines_and_notifications() {
        let responses = run(concat!(
            "\n",
            "   \n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":"last","method":"prompts/list"}"#,
        ))
        .await;

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], "last");
        assert!(responses[0]["result"]["prompts"].is_array());
    }

    #[tokio::test]
    async fn reports_parse_errors_and_keeps_reading() {
        let responses = run(concat!(
            "{not json\n",
            r#"{"jsonrpc":"2.0","id":7,"method":"resources/read","params":{"uri":"greeting://Alice"}}"#,
            "\n",
        ))
        .await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["error"]["code"], -32700);
        assert!(responses[1]["result"]["contents"][0]["text"]
            .as_str()
            .is_some_and(|text| text.contains("Hello, Alice!")));
    }

    #[tokio::test]
    async fn invalid_utf8_line_is_a_parse_error_and_reading_continues() {
        let mut input = vec![0xff, 0xfe, b'\n'];
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":3,"method":"ping"}"#);
        input.push(b'\n');

        let responses = run_bytes(&input).await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["error"]["code"], -32700);
        assert_eq!(responses[0]["id"], Value::Null);
        assert_eq!(responses[1]["id"], 3);
        assert!(responses[1]["result"].is_object());
    }

    #[tokio::test]
    async fn empty_input_produces_no_output() {
        assert!(run("").await.is_empty());
    }
}
