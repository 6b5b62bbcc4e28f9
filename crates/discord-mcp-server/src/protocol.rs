//! MCP JSON-RPC wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC error codes used by the server.
pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;

/// JSON-RPC Request
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

/// Response to a request that carried an id. `id` is always written;
/// it is `null` only when the request could not be parsed.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError { code, message }),
        }
    }

    /// The line was not valid JSON-RPC, so there is no id to echo.
    pub fn parse_error() -> Self {
        Self::failure(Value::Null, PARSE_ERROR, "Parse error".to_string())
    }

    pub fn method_not_found(id: Value, method: &str) -> Self {
        Self::failure(id, METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    pub fn invalid_params(id: Value, detail: impl std::fmt::Display) -> Self {
        Self::failure(id, INVALID_PARAMS, detail.to_string())
    }
}

/// Tool definition advertised through `tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Content in tool result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

impl ToolContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content_type: "text".to_string(),
            text: text.into(),
        }
    }
}

/// Result of one `tools/call`. Always carries at least one text block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::text(text)],
            is_error: false,
        }
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::text(text)],
            is_error: true,
        }
    }

    /// Text of the first block.
    pub fn text(&self) -> &str {
        self.content.first().map(|c| c.text.as_str()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_skips_empty_fields() {
        let resp = JsonRpcResponse::success(json!(1), json!({}));
        let text = serde_json::to_string(&resp).unwrap();
        assert!(!text.contains("error"));
        assert!(text.contains("\"jsonrpc\":\"2.0\""));
    }

    #[test]
    fn test_parse_error_carries_null_id() {
        let value = serde_json::to_value(JsonRpcResponse::parse_error()).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("id"));
        assert!(obj["id"].is_null());
        assert_eq!(obj["error"]["code"], PARSE_ERROR);
        assert!(!obj.contains_key("result"));
    }

    #[test]
    fn test_tool_result_wire_shape() {
        let result = ToolResult::failure("boom");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["isError"], true);
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][0]["text"], "boom");
    }

    #[test]
    fn test_request_params_default_to_null() {
        let req: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":3,"method":"ping"}"#).unwrap();
        assert!(req.params.is_null());
        assert_eq!(req.id, Some(json!(3)));
    }
}
