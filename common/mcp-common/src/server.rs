//! Line-oriented JSON-RPC dispatcher
//!
//! Reads one JSON-RPC message per line, routes it by method and writes at
//! most one response line. Messages are handled strictly one at a time; a
//! slow tool call holds up the next line. Per-message failures are answered
//! and the loop keeps going until the input ends.

use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, instrument, warn};

use crate::error::{internal_error, invalid_params_with, McpError, McpResult};
use crate::handler::McpHandler;
use crate::protocol::{CallToolParams, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION};

/// Protocol front end wrapping a [`McpHandler`]
pub struct McpServer<H> {
    handler: H,
}

impl<H: McpHandler> McpServer<H> {
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    /// Run the dispatch loop until `reader` reaches end of input
    ///
    /// Returns `Err` only on I/O failure of the underlying stream.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("MCP server started");

        let mut lines = reader.split(b'\n');
        while let Some(line) = lines.next_segment().await? {
            if let Some(response) = self.handle_line(&line).await {
                write_response(&mut writer, &response).await?;
            }
        }

        info!("MCP server stopped (input closed)");
        Ok(())
    }

    /// Handle one raw line. Blank lines and notifications yield `None`.
    ///
    /// The line is not required to be UTF-8; invalid bytes are a parse error.
    pub async fn handle_line(&self, line: impl AsRef<[u8]>) -> Option<JsonRpcResponse> {
        let line = line.as_ref().trim_ascii();
        if line.is_empty() {
            return None;
        }

        debug!("MCP request: {}", String::from_utf8_lossy(line));

        let request: JsonRpcRequest = match serde_json::from_slice(line) {
            Ok(request) => request,
            Err(e) => {
                warn!("Failed to parse JSON-RPC message: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    McpError::parse_error(e.to_string()),
                ));
            }
        };

        self.handle_request(request).await
    }

    /// Route a decoded request
    ///
    /// A request without an identifier is still executed, but its outcome is
    /// dropped.
    #[instrument(skip(self, request), fields(method = %request.method))]
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.initialize_result()),
            "initialized" | "notifications/initialized" => return None,
            "tools/list" => Ok(self.tools_list_result()),
            "tools/call" => self.tools_call_result(request.params).await,
            other => {
                warn!("Unknown MCP method: {}", other);
                Err(McpError::method_not_found())
            }
        };

        let Some(id) = request.id else {
            debug!("Notification handled, no response");
            return None;
        };

        let response = match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => {
                debug!(code = error.code, "Request failed: {}", error.message);
                JsonRpcResponse::error(id, error)
            }
        };
        Some(response)
    }

    fn initialize_result(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": self.handler.server_info(),
            "capabilities": {
                "tools": {}
            }
        })
    }

    fn tools_list_result(&self) -> Value {
        json!({ "tools": self.handler.list_tools() })
    }

    async fn tools_call_result(&self, params: Option<Value>) -> McpResult<Value> {
        let params = params.ok_or_else(|| invalid_params_with("Invalid params", "missing params"))?;
        let call: CallToolParams =
            serde_json::from_value(params).map_err(|e| invalid_params_with("Invalid params", e))?;

        let arguments = call
            .arguments
            .unwrap_or_else(|| Value::Object(Map::new()));

        debug!(tool = %call.name, "Calling tool");
        let result = self.handler.call_tool(&call.name, arguments).await?;

        serde_json::to_value(result)
            .map_err(|e| internal_error(format!("Failed to serialize tool result: {}", e)))
    }
}

/// Serve `handler` over this process's stdin/stdout
pub async fn serve_stdio<H: McpHandler>(handler: H) -> anyhow::Result<()> {
    let server = McpServer::new(handler);
    let reader = BufReader::new(tokio::io::stdin());
    server.serve(reader, tokio::io::stdout()).await
}

/// Write one response as a single line
async fn write_response<W>(writer: &mut W, response: &JsonRpcResponse) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let json = serde_json::to_string(response)?;
    debug!("MCP response: {}", json);
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
