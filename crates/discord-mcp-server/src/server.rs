//! MCP server over newline-delimited JSON-RPC on stdio.

use log::{debug, error, info, warn};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::catalog;
use crate::dispatch::Dispatcher;
use crate::platform::DiscordOperations;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse};

/// MCP Protocol version
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name
pub const SERVER_NAME: &str = "discord-mcp-server";

/// Server version
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const INSTRUCTIONS: &str = "Discord MCP Server - Inspect and administer Discord servers through a bot account.\n\n\
Tools cover server and member info, channels, roles, threads, reactions, messages, moderation and application commands. \
IDs are Discord snowflakes passed as strings. Calls made before the bot has connected return a not-ready error; retry shortly.";

#[derive(Error, Debug)]
pub enum McpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub struct McpServer<P> {
    dispatcher: Dispatcher<P>,
}

impl<P: DiscordOperations> McpServer<P> {
    pub fn new(dispatcher: Dispatcher<P>) -> Self {
        Self { dispatcher }
    }

    /// Handle initialize request
    fn handle_initialize(&self, _params: Value) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION
            },
            "instructions": INSTRUCTIONS
        })
    }

    /// Handle tools/list request
    fn handle_tools_list(&self) -> Value {
        json!({
            "tools": catalog::tools()
        })
    }

    /// Handle tools/call request. Tool failures come back as an `isError`
    /// result; only a malformed call is a protocol error.
    async fn handle_tools_call(&self, params: Value) -> Result<Value, McpError> {
        let name = params
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| McpError::InvalidRequest("Missing tool name".to_string()))?;
        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        let result = self.dispatcher.dispatch(name, arguments).await;
        Ok(serde_json::to_value(result)?)
    }

    /// Handle one request. Notifications get no response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!("Handling request: {}", request.method);

        if request.jsonrpc != "2.0" {
            warn!("Unexpected jsonrpc version: {}", request.jsonrpc);
        }
        let id = request.id?;

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, self.handle_initialize(request.params)),
            "tools/list" => JsonRpcResponse::success(id, self.handle_tools_list()),
            "tools/call" => match self.handle_tools_call(request.params).await {
                Ok(result) => JsonRpcResponse::success(id, result),
                Err(e) => JsonRpcResponse::invalid_params(id, e),
            },
            "ping" => JsonRpcResponse::success(id, json!({})),
            _ => {
                warn!("Unknown method: {}", request.method);
                JsonRpcResponse::method_not_found(id, &request.method)
            }
        };
        Some(response)
    }

    /// Serve requests from `reader` until EOF.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> Result<(), McpError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            debug!("Received: {}", line);

            let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
                Ok(request) => self.handle_request(request).await,
                Err(e) => {
                    error!("Failed to parse request: {}", e);
                    Some(JsonRpcResponse::parse_error())
                }
            };

            if let Some(response) = response {
                let response_json = serde_json::to_string(&response)?;
                debug!("Sending: {}", response_json);
                writer.write_all(response_json.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }

        info!("Input closed, shutting down");
        Ok(())
    }

    /// Run the MCP server over stdio
    pub async fn run_stdio(&self) -> Result<(), McpError> {
        info!("MCP server ready, listening on stdio...");
        self.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::gate::ReadinessGate;
    use crate::platform::mock::MockPlatform;
    use crate::protocol::{INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR};

    fn server() -> McpServer<MockPlatform> {
        let gate = Arc::new(ReadinessGate::ready(Arc::new(MockPlatform::new())));
        McpServer::new(Dispatcher::new(gate))
    }

    fn request(raw: Value) -> JsonRpcRequest {
        serde_json::from_value(raw).unwrap()
    }

    #[tokio::test]
    async fn test_initialize_advertises_tools() {
        let resp = server()
            .handle_request(request(json!({
                "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}
            })))
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let s = server();
        let note = request(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}));
        assert!(s.handle_request(note).await.is_none());
        let note = request(json!({"jsonrpc": "2.0", "method": "tools/list"}));
        assert!(s.handle_request(note).await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let resp = server()
            .handle_request(request(json!({"jsonrpc": "2.0", "id": 7, "method": "resources/list"})))
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, METHOD_NOT_FOUND);
        assert_eq!(resp.id, json!(7));
    }

    #[tokio::test]
    async fn test_tools_call_without_name_is_invalid_params() {
        let resp = server()
            .handle_request(request(json!({
                "jsonrpc": "2.0", "id": 2, "method": "tools/call", "params": {"arguments": {}}
            })))
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_tool_failure_is_result_not_protocol_error() {
        let resp = server()
            .handle_request(request(json!({
                "jsonrpc": "2.0", "id": 3, "method": "tools/call",
                "params": {"name": "no_such_tool", "arguments": {}}
            })))
            .await
            .unwrap();
        assert!(resp.error.is_none());
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["content"][0]["text"], "Unknown tool: no_such_tool");
    }

    #[tokio::test]
    async fn test_run_loop_handles_garbage_and_blank_lines() {
        let input = b"not json\n\n{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n".to_vec();
        let mut output = Vec::new();
        server().run(&input[..], &mut output).await.unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["error"]["code"], PARSE_ERROR);
        assert!(lines[0].as_object().unwrap().contains_key("id"));
        assert!(lines[0]["id"].is_null());
        assert_eq!(lines[1]["id"], 1);
        assert!(lines[1]["result"].is_object());
    }
}
