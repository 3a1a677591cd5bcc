//! Result helpers for MCP tool responses
//!
//! A tool call that was well-formed always answers with a successful
//! JSON-RPC envelope. Whether the operation itself worked is signalled by
//! the `isError` flag inside the result, not by a JSON-RPC error.

use serde::{Deserialize, Serialize};

/// A single content block of a tool result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text { text } => Some(text),
        }
    }
}

/// Result payload of `tools/call`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallToolResult {
    pub content: Vec<Content>,

    #[serde(rename = "isError", default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl CallToolResult {
    pub fn success(content: Vec<Content>) -> Self {
        Self {
            content,
            is_error: None,
        }
    }

    pub fn error(content: Vec<Content>) -> Self {
        Self {
            content,
            is_error: Some(true),
        }
    }

    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// Text of the first content block, if any
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().and_then(Content::as_text)
    }
}

/// Create a successful plain text response
///
/// # Example
///
/// ```rust,ignore
/// use mcp_common::text_success;
///
/// Ok(text_success("Task deleted successfully!"))
/// ```
pub fn text_success(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

/// Create a failed tool result from an operation error
///
/// Renders as `Error: <message>` with `isError` set. The JSON-RPC envelope
/// carrying it is still a success.
pub fn text_error(err: impl std::fmt::Display) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("Error: {}", err))])
}
