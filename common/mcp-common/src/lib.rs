//! MCP Common - Shared plumbing for MCP servers
//!
//! This crate provides the protocol side of an MCP server so that a
//! concrete server only implements [`McpHandler`]:
//!
//! - **Protocol**: JSON-RPC 2.0 request/response types, one message per line
//! - **Dispatch**: [`McpServer`] routes `initialize`, `tools/list` and
//!   `tools/call`, and drops notifications
//! - **Errors**: [`McpError`] and the reserved JSON-RPC codes
//! - **Results**: helpers for `CallToolResult` text responses
//! - **Initialization**: [`init_tracing`] for stderr logging
//!
//! # Example
//!
//! ```rust,ignore
//! use mcp_common::{init_tracing, serve_stdio};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     init_tracing("my_mcp")?;
//!     serve_stdio(MyServer::new()).await
//! }
//! ```

pub mod error;
pub mod handler;
pub mod init;
pub mod protocol;
pub mod result;
pub mod server;
pub mod tool;

// Re-export commonly used items at crate root
pub use error::{
    internal_error, invalid_params, invalid_params_with, McpError, McpResult, INTERNAL_ERROR,
    INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR,
};
pub use handler::McpHandler;
pub use init::init_tracing;
pub use protocol::{
    JsonRpcRequest, JsonRpcResponse, Outcome, ServerInfo, JSONRPC_VERSION, PROTOCOL_VERSION,
};
pub use result::{text_error, text_success, CallToolResult, Content};
pub use server::{serve_stdio, McpServer};
pub use tool::Tool;

// Re-export async_trait for implementing McpHandler
pub use async_trait::async_trait;
