//! Capability trait implemented by a concrete MCP server
//!
//! The dispatcher in [`crate::server`] owns the protocol; a server only
//! describes itself, lists its tools and executes calls by name.
//!
//! # Example
//!
//! ```rust,ignore
//! use mcp_common::{async_trait, invalid_params, text_success, McpHandler};
//!
//! #[async_trait]
//! impl McpHandler for EchoServer {
//!     fn server_info(&self) -> ServerInfo {
//!         ServerInfo::new("echo", "0.1.0")
//!     }
//!
//!     fn list_tools(&self) -> Vec<Tool> {
//!         vec![Tool::new("echo", "Echo the input", json!({"type": "object"}))]
//!     }
//!
//!     async fn call_tool(&self, name: &str, arguments: Value) -> McpResult<CallToolResult> {
//!         match name {
//!             "echo" => Ok(text_success(arguments.to_string())),
//!             other => Err(invalid_params(format!("Unknown tool: {}", other))),
//!         }
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde_json::Value;

use crate::error::McpResult;
use crate::protocol::ServerInfo;
use crate::result::CallToolResult;
use crate::tool::Tool;

/// Trait for MCP servers driven by [`crate::McpServer`]
///
/// Implementations must be `Send + Sync`; the dispatcher holds them for the
/// lifetime of the process.
#[async_trait]
pub trait McpHandler: Send + Sync {
    /// Name and version reported by `initialize`
    fn server_info(&self) -> ServerInfo;

    /// All tools, in the order clients should display them
    fn list_tools(&self) -> Vec<Tool>;

    /// Execute a tool by name
    ///
    /// `arguments` is an empty object when the caller sent none.
    ///
    /// Return `Err` only for protocol faults (unknown tool, missing or
    /// malformed arguments). Operation failures belong in an `Ok` result
    /// with the error flag set.
    async fn call_tool(&self, name: &str, arguments: Value) -> McpResult<CallToolResult>;
}
