//! Integration tests for the MCP server.
//!
//! Uses `MockPlatform` behind the real stdio loop on an in-process duplex
//! pipe to exercise framing, tool routing, the readiness gate and result
//! formatting end-to-end.
//!
//! Run with: `cargo test --features test-harness --test integration_mcp`
#![cfg(feature = "test-harness")]

use std::sync::Arc;

use discord_mcp_server::platform::mock::{
    self, MockPlatform, MEMBER_MESSAGE_ID, MEMBER_USER_ID, MODERATOR_ROLE_ID, TEXT_CHANNEL_ID,
};
use discord_mcp_server::{Dispatcher, McpServer, ReadinessGate};

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines, ReadHalf, WriteHalf};

// ── Test harness ─────────────────────────────────────────────────────

/// Runs `McpServer<MockPlatform>` on one end of a duplex pipe and talks
/// JSON-RPC lines over the other.
struct TestHarness {
    gate: Arc<ReadinessGate<MockPlatform>>,
    writer: WriteHalf<DuplexStream>,
    lines: Lines<BufReader<ReadHalf<DuplexStream>>>,
    next_id: u64,
    _server_handle: tokio::task::JoinHandle<()>,
}

impl TestHarness {
    /// Harness whose Discord session is already connected.
    fn new() -> (Self, Arc<MockPlatform>) {
        let platform = Arc::new(MockPlatform::new());
        let harness = Self::with_gate(Arc::new(ReadinessGate::ready(Arc::clone(&platform))));
        (harness, platform)
    }

    /// Harness whose Discord session has not connected yet.
    fn not_ready() -> Self {
        Self::with_gate(Arc::new(ReadinessGate::new()))
    }

    fn with_gate(gate: Arc<ReadinessGate<MockPlatform>>) -> Self {
        let server = McpServer::new(Dispatcher::new(Arc::clone(&gate)));
        let (server_io, client_io) = tokio::io::duplex(65536);

        let server_handle = tokio::spawn(async move {
            let (read, write) = tokio::io::split(server_io);
            server.run(BufReader::new(read), write).await.unwrap();
        });

        let (read, writer) = tokio::io::split(client_io);
        Self {
            gate,
            writer,
            lines: BufReader::new(read).lines(),
            next_id: 0,
            _server_handle: server_handle,
        }
    }

    async fn send_line(&mut self, line: &str) {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
        self.writer.flush().await.unwrap();
    }

    async fn recv(&mut self) -> Value {
        let line = self.lines.next_line().await.unwrap().expect("server closed");
        serde_json::from_str(&line).unwrap()
    }

    async fn request(&mut self, method: &str, params: Value) -> Value {
        self.next_id += 1;
        let msg = json!({"jsonrpc": "2.0", "id": self.next_id, "method": method, "params": params});
        self.send_line(&msg.to_string()).await;
        let resp = self.recv().await;
        assert_eq!(resp["id"], self.next_id);
        resp
    }

    /// Call a tool and return the `tools/call` result object.
    async fn call(&mut self, tool: &str, arguments: Value) -> Value {
        let resp = self
            .request("tools/call", json!({"name": tool, "arguments": arguments}))
            .await;
        assert!(resp.get("error").is_none(), "protocol error: {}", resp);
        resp["result"].clone()
    }
}

fn text(result: &Value) -> &str {
    result["content"][0]["text"].as_str().unwrap()
}

// ── Protocol ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_handshake_and_tool_list() {
    let (mut h, _) = TestHarness::new();

    let init = h
        .request("initialize", json!({"protocolVersion": "2024-11-05", "capabilities": {}}))
        .await;
    assert_eq!(init["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(init["result"]["serverInfo"]["name"], "discord-mcp-server");

    // Notification: no reply. The next line read must answer the list call.
    h.send_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .await;

    let list = h.request("tools/list", json!({})).await;
    let tools = list["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 26);
    for tool in tools {
        assert!(tool["name"].is_string());
        assert_eq!(tool["inputSchema"]["type"], "object");
    }
}

#[tokio::test]
async fn test_parse_error_keeps_connection_alive() {
    let (mut h, _) = TestHarness::new();
    h.send_line("{ this is not json").await;
    let resp = h.recv().await;
    assert_eq!(resp["error"]["code"], -32700);

    let ping = h.request("ping", Value::Null).await;
    assert!(ping["result"].is_object());
}

#[tokio::test]
async fn test_unknown_method() {
    let (mut h, _) = TestHarness::new();
    let resp = h.request("prompts/list", json!({})).await;
    assert_eq!(resp["error"]["code"], -32601);
}

// ── Readiness ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_calls_before_connect_are_refused_then_served() {
    let mut h = TestHarness::not_ready();

    // Listing works before the session exists.
    let list = h.request("tools/list", json!({})).await;
    assert_eq!(list["result"]["tools"].as_array().unwrap().len(), 26);

    let result = h
        .call("list_roles", json!({"server_id": mock::GUILD_ID.to_string()}))
        .await;
    assert_eq!(result["isError"], true);
    assert!(text(&result).contains("not ready"));

    let platform = Arc::new(MockPlatform::new());
    assert!(h.gate.open(Arc::clone(&platform)));

    let result = h
        .call("list_roles", json!({"server_id": mock::GUILD_ID.to_string()}))
        .await;
    assert_eq!(result["isError"], false);
    assert!(text(&result).contains("Moderators"));
    assert_eq!(platform.calls().len(), 2);
}

// ── Tools end-to-end ─────────────────────────────────────────────────

#[tokio::test]
async fn test_send_then_read_messages() {
    let (mut h, _) = TestHarness::new();
    let channel = TEXT_CHANNEL_ID.to_string();

    let sent = h
        .call("send_message", json!({"channel_id": channel, "content": "ship it"}))
        .await;
    assert_eq!(sent["isError"], false);
    assert!(text(&sent).starts_with("Message sent successfully"));

    let read = h
        .call("read_messages", json!({"channel_id": channel, "limit": 3}))
        .await;
    assert!(text(&read).contains("ship it"));
}

#[tokio::test]
async fn test_role_assignment_round_trip() {
    let (mut h, platform) = TestHarness::new();
    let args = json!({
        "server_id": mock::GUILD_ID.to_string(),
        "user_id": MEMBER_USER_ID.to_string(),
        "role_id": MODERATOR_ROLE_ID.to_string(),
    });

    let removed = h.call("remove_role", args.clone()).await;
    assert_eq!(removed["isError"], false);
    assert!(!platform.member_roles(MEMBER_USER_ID).contains(&MODERATOR_ROLE_ID));

    let added = h.call("add_role", args).await;
    assert_eq!(added["isError"], false);
    assert!(platform.member_roles(MEMBER_USER_ID).contains(&MODERATOR_ROLE_ID));
}

#[tokio::test]
async fn test_moderation_deletes_and_times_out() {
    let (mut h, platform) = TestHarness::new();
    let result = h
        .call(
            "moderate_message",
            json!({
                "channel_id": TEXT_CHANNEL_ID.to_string(),
                "message_id": MEMBER_MESSAGE_ID.to_string(),
                "reason": "spam",
                "timeout_minutes": 10
            }),
        )
        .await;
    assert_eq!(text(&result), "Message deleted and user timed out for 10 minutes.");
    assert!(!platform.has_message(MEMBER_MESSAGE_ID));
}

#[tokio::test]
async fn test_faults_are_tool_results() {
    let (mut h, platform) = TestHarness::new();

    let bad = h.call("get_channel_info", json!({"channel_id": "general"})).await;
    assert_eq!(bad["isError"], true);
    assert!(text(&bad).starts_with("Value error:"));

    let missing = h.call("get_user_info", json!({"user_id": "999999"})).await;
    assert_eq!(missing["isError"], true);
    assert!(text(&missing).starts_with("Resource not found"));

    *platform.deny_mutations.lock().unwrap() = true;
    let denied = h
        .call("delete_channel", json!({"channel_id": TEXT_CHANNEL_ID.to_string()}))
        .await;
    assert_eq!(denied["isError"], true);
    assert!(text(&denied).starts_with("Bot lacks permission"));
    assert!(platform.channel(TEXT_CHANNEL_ID).is_some());
}
