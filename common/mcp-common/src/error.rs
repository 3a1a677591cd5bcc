//! Error handling utilities for MCP servers
//!
//! Protocol faults (the call itself was malformed) are reported as JSON-RPC
//! error objects built from [`McpError`]. Failures of a well-formed tool call
//! are not errors at this layer: see [`crate::result::text_error`].

use serde::Serialize;
use serde_json::Value;

// JSON-RPC 2.0 reserved error codes
pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

/// Type alias for MCP handler results
pub type McpResult<T> = Result<T, McpError>;

/// JSON-RPC error object
#[derive(Debug, Clone, Serialize, PartialEq, thiserror::Error)]
#[error("{message} (code {code})")]
pub struct McpError {
    pub code: i32,
    pub message: String,

    /// Structured detail, e.g. the underlying decoder message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl McpError {
    pub fn new(code: i32, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            code,
            message: message.into(),
            data,
        }
    }

    /// The line could not be decoded as JSON
    pub fn parse_error(detail: impl Into<String>) -> Self {
        Self::new(PARSE_ERROR, "Parse error", Some(Value::String(detail.into())))
    }

    pub fn method_not_found() -> Self {
        Self::new(METHOD_NOT_FOUND, "Method not found", None)
    }

    pub fn invalid_params(message: impl Into<String>, data: Option<Value>) -> Self {
        Self::new(INVALID_PARAMS, message, data)
    }

    pub fn internal_error(message: impl Into<String>, data: Option<Value>) -> Self {
        Self::new(INTERNAL_ERROR, message, data)
    }
}

/// Create an invalid params error with a message
///
/// Use this when a tool receives missing or unusable parameters.
///
/// # Example
///
/// ```rust,ignore
/// use mcp_common::invalid_params;
///
/// if args.task_id.is_empty() {
///     return Err(invalid_params("task_id is required"));
/// }
/// ```
pub fn invalid_params(message: impl Into<String>) -> McpError {
    McpError::invalid_params(message, None)
}

/// Create an invalid params error carrying the decoder's message as detail
pub fn invalid_params_with(message: impl Into<String>, detail: impl ToString) -> McpError {
    McpError::invalid_params(message, Some(Value::String(detail.to_string())))
}

/// Create an internal error with a message
pub fn internal_error(message: impl Into<String>) -> McpError {
    McpError::internal_error(message, None)
}
