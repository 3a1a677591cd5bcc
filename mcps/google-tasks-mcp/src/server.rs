//! MCP server implementation for Google Tasks
//!
//! Binds the tool catalog to a [`TasksBackend`] and a display zone. The
//! JSON-RPC loop itself lives in `mcp_common::McpServer`.

use mcp_common::{async_trait, invalid_params, CallToolResult, McpHandler, McpResult, ServerInfo, Tool};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::backend::TasksBackend;
use crate::due::DisplayZone;
use crate::handlers;
use crate::tools::{catalog, ToolKind};

/// Name reported in the `initialize` handshake
pub const SERVER_NAME: &str = "google-tasks";

/// The Google Tasks MCP server
#[derive(Clone)]
pub struct GoogleTasksServer {
    backend: Arc<dyn TasksBackend>,
    zone: DisplayZone,
}

impl GoogleTasksServer {
    pub fn new(backend: Arc<dyn TasksBackend>, zone: DisplayZone) -> Self {
        Self { backend, zone }
    }
}

#[async_trait]
impl McpHandler for GoogleTasksServer {
    fn server_info(&self) -> ServerInfo {
        ServerInfo::new(SERVER_NAME, env!("CARGO_PKG_VERSION"))
    }

    fn list_tools(&self) -> Vec<Tool> {
        catalog()
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> McpResult<CallToolResult> {
        let kind = ToolKind::from_name(name)
            .ok_or_else(|| invalid_params(format!("Unknown tool: {}", name)))?;
        info!("Calling tool {}", kind.name());

        let backend = self.backend.as_ref();
        match kind {
            ToolKind::ListTaskLists => handlers::list_task_lists(backend).await,
            ToolKind::ListTasks => handlers::list_tasks(backend, &self.zone, arguments).await,
            ToolKind::CreateTask => handlers::create_task(backend, &self.zone, arguments).await,
            ToolKind::UpdateTask => handlers::update_task(backend, &self.zone, arguments).await,
            ToolKind::CompleteTask => handlers::complete_task(backend, arguments).await,
            ToolKind::DeleteTask => handlers::delete_task(backend, arguments).await,
        }
    }
}
