//! JSON-RPC 2.0 message types
//!
//! One message per line on the wire. A request without an `id` is a
//! notification and never receives a response.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::McpError;

/// JSON-RPC protocol tag carried on every message
pub const JSONRPC_VERSION: &str = "2.0";

/// The single MCP protocol revision this server speaks
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Incoming JSON-RPC message
///
/// `id` is kept as raw JSON: it is echoed back unchanged and never
/// interpreted. An explicit `"id": null` counts as present.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: String,

    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Value>,

    #[serde(default)]
    pub method: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Wraps whatever value is present (including `null`) in `Some`, so that
/// only a missing key maps to `None`.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: Some(id.into()),
            method: method.into(),
            params,
        }
    }

    pub fn notification(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: None,
            method: method.into(),
            params: None,
        }
    }

    /// A message without an identifier expects no answer
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Outgoing JSON-RPC response
///
/// # Success Example
///
/// ```json
/// {"jsonrpc": "2.0", "id": 7, "result": {"tools": []}}
/// ```
///
/// # Error Example
///
/// ```json
/// {"jsonrpc": "2.0", "id": 7, "error": {"code": -32601, "message": "Method not found"}}
/// ```
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,

    /// Echo of the request identifier, `null` when none could be read
    pub id: Value,

    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Exactly one of `result` or `error`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(McpError),
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            outcome: Outcome::Result(result),
        }
    }

    pub fn error(id: Value, error: McpError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            outcome: Outcome::Error(error),
        }
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Result(value) => Some(value),
            Outcome::Error(_) => None,
        }
    }

    pub fn error_ref(&self) -> Option<&McpError> {
        match &self.outcome {
            Outcome::Error(error) => Some(error),
            Outcome::Result(_) => None,
        }
    }
}

/// Server identity advertised by `initialize`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl ServerInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Envelope of a `tools/call` request
#[derive(Debug, Clone, Deserialize)]
pub struct CallToolParams {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub arguments: Option<Value>,
}
