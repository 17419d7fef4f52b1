//! Wire types for MCP over JSON-RPC 2.0.

use crate::error::Result;
use crate::tools::{ToolOutput, ToolSpec};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

pub const PROTOCOL_VERSION: &str = "2024-11-05";
const JSONRPC_VERSION: &str = "2.0";

/// Incoming call. Requests without an `id` are notifications.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(rename = "jsonrpc")]
    _version: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Outgoing reply carrying either a result or an error. A missing id is
/// written as `null`.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    jsonrpc: &'static str,
    pub id: Option<Value>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(RpcFault),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RpcFault {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            outcome: Outcome::Result(result),
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            outcome: Outcome::Error(RpcFault {
                code,
                message: message.into(),
            }),
        }
    }

    /// Serialize `result` into a success reply, or an internal error if that fails.
    pub fn from_serializable<T: Serialize>(id: Option<Value>, result: &T) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Self::success(id, value),
            Err(e) => Self::error(id, INTERNAL_ERROR, format!("Internal error: {}", e)),
        }
    }
}

/// Reply to `initialize`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: &'static str,
    pub capabilities: Capabilities,
    pub server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
pub struct Capabilities {
    pub tools: ToolCapabilities,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCapabilities {
    pub list_changed: bool,
}

#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: &'static str,
    pub version: &'static str,
}

/// A tool as advertised by `tools/list`.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct McpTool {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub input_schema: Value,
}

impl From<&ToolSpec> for McpTool {
    fn from(spec: &ToolSpec) -> Self {
        Self {
            name: spec.name.clone(),
            description: spec.description.clone(),
            input_schema: spec.input_schema(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToolList {
    pub tools: Vec<McpTool>,
}

/// Params of `tools/call`.
#[derive(Debug, Deserialize)]
pub struct CallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Reply to `tools/call`. Tool failures are reported here, not as RPC errors.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallResult {
    pub content: Vec<TextContent>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

#[derive(Debug, Serialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    kind: &'static str,
    pub text: String,
}

impl TextContent {
    fn new(text: String) -> Self {
        Self { kind: "text", text }
    }
}

/// Outgoing call made by the client side.
#[derive(Debug, Serialize)]
pub struct ClientRequest<'a> {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl<'a> ClientRequest<'a> {
    pub fn call(id: u64, method: &'a str, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: Some(id),
            method,
            params,
        }
    }

    pub fn notification(method: &'a str) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: None,
            method,
            params: None,
        }
    }
}

/// Any message read by the client. Server-initiated notifications have no id.
#[derive(Debug, Deserialize)]
pub struct ServerMessage {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcFault>,
}

/// `tools/call` result as read by the client.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCallResult {
    #[serde(default)]
    pub content: Vec<RemoteContent>,
    #[serde(default)]
    pub is_error: bool,
}

/// One content item. Only text items carry `text`.
#[derive(Debug, Deserialize)]
pub struct RemoteContent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl From<Result<ToolOutput>> for CallResult {
    fn from(result: Result<ToolOutput>) -> Self {
        let (text, is_error) = match result {
            Ok(output) => (output.to_string(), false),
            Err(e) => (e.to_string(), true),
        };
        Self {
            content: vec![TextContent::new(text)],
            is_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AlfredError;
    use serde_json::json;

    #[test]
    fn test_response_shapes() {
        let ok = JsonRpcResponse::success(Some(json!(1)), json!({}));
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"jsonrpc": "2.0", "id": 1, "result": {}})
        );

        let err = JsonRpcResponse::error(None, PARSE_ERROR, "Parse error");
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"jsonrpc": "2.0", "id": null, "error": {"code": -32700, "message": "Parse error"}})
        );
    }

    #[test]
    fn test_call_result_flags_errors_only() {
        let ok = CallResult::from(Ok(ToolOutput::Number(1.5)));
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"content": [{"type": "text", "text": "1.5"}]})
        );

        let failed = CallResult::from(Err(AlfredError::UnknownTool("x".into())));
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["isError"], true);
        assert_eq!(value["content"][0]["text"], "Unknown tool: x");
    }

    #[test]
    fn test_client_messages() {
        let call = ClientRequest::call(3, "tools/list", None);
        assert_eq!(
            serde_json::to_value(&call).unwrap(),
            json!({"jsonrpc": "2.0", "id": 3, "method": "tools/list"})
        );
        let note = ClientRequest::notification("notifications/initialized");
        assert_eq!(
            serde_json::to_value(&note).unwrap(),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"})
        );

        let reply: ServerMessage = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":3,"error":{"code":-32601,"message":"Method not found"}}"#,
        )
        .unwrap();
        assert_eq!(reply.id, Some(json!(3)));
        assert_eq!(reply.error.unwrap().code, METHOD_NOT_FOUND);

        let result: RemoteCallResult = serde_json::from_value(json!({
            "content": [{"type": "image", "data": "..."}, {"type": "text", "text": "ok"}]
        }))
        .unwrap();
        assert!(!result.is_error);
        assert_eq!(result.content[1].text.as_deref(), Some("ok"));
    }

    #[test]
    fn test_notification_has_no_id() {
        let req: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
                .unwrap();
        assert!(req.is_notification());
    }
}
