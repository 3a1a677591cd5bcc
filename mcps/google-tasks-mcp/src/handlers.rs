//! Handler implementations for google-tasks-mcp tools
//!
//! Each handler decodes its arguments, calls the backend and renders the
//! outcome. Argument problems are returned as `Err` (invalid params); backend
//! and due-date failures become error-flagged tool results.

use mcp_common::{text_error, text_success, CallToolResult, McpResult};
use serde_json::Value;
use std::fmt::Display;
use tracing::{debug, error};

use crate::backend::TasksBackend;
use crate::due::{encode_due, DisplayZone};
use crate::format;
use crate::params::{CreateTaskParams, ListTasksParams, TaskRefParams, UpdateTaskParams};
use crate::types::{NewTask, TaskUpdates};

fn failure(operation: &str, err: impl Display) -> CallToolResult {
    error!("{} failed: {}", operation, err);
    text_error(err)
}

// ============================================================================
// Listing
// ============================================================================

pub async fn list_task_lists(backend: &dyn TasksBackend) -> McpResult<CallToolResult> {
    match backend.list_task_lists().await {
        Ok(lists) => Ok(text_success(format::task_lists(&lists))),
        Err(e) => Ok(failure("list_task_lists", e)),
    }
}

pub async fn list_tasks(
    backend: &dyn TasksBackend,
    zone: &DisplayZone,
    args: Value,
) -> McpResult<CallToolResult> {
    let params = ListTasksParams::decode(args)?;
    debug!(
        "Listing tasks in {} (show_completed={})",
        params.tasklist_id, params.show_completed
    );

    match backend
        .list_tasks(&params.tasklist_id, params.show_completed)
        .await
    {
        Ok(tasks) => Ok(text_success(format::tasks(&tasks, zone))),
        Err(e) => Ok(failure("list_tasks", e)),
    }
}

// ============================================================================
// Mutations
// ============================================================================

pub async fn create_task(
    backend: &dyn TasksBackend,
    zone: &DisplayZone,
    args: Value,
) -> McpResult<CallToolResult> {
    let params = CreateTaskParams::decode(args)?;

    let due = match params.due.as_deref().map(|d| encode_due(d, zone)).transpose() {
        Ok(due) => due,
        Err(e) => return Ok(failure("create_task", e)),
    };

    let new_task = NewTask {
        title: params.title,
        notes: params.notes,
        due,
    };

    match backend.create_task(&params.tasklist_id, new_task).await {
        Ok(task) => Ok(text_success(format::task_created(&task, zone))),
        Err(e) => Ok(failure("create_task", e)),
    }
}

pub async fn update_task(
    backend: &dyn TasksBackend,
    zone: &DisplayZone,
    args: Value,
) -> McpResult<CallToolResult> {
    let params = UpdateTaskParams::decode(args)?;

    let due = match params.due.try_map(|d| encode_due(&d, zone)) {
        Ok(due) => due,
        Err(e) => return Ok(failure("update_task", e)),
    };

    let updates = TaskUpdates {
        title: params.title,
        notes: params.notes,
        due,
        status: None,
    };

    match backend
        .update_task(&params.tasklist_id, &params.task_id, updates)
        .await
    {
        Ok(task) => Ok(text_success(format::task_updated(&task))),
        Err(e) => Ok(failure("update_task", e)),
    }
}

pub async fn complete_task(backend: &dyn TasksBackend, args: Value) -> McpResult<CallToolResult> {
    let params = TaskRefParams::decode(args)?;

    match backend
        .complete_task(&params.tasklist_id, &params.task_id)
        .await
    {
        Ok(task) => Ok(text_success(format::task_completed(&task))),
        Err(e) => Ok(failure("complete_task", e)),
    }
}

pub async fn delete_task(backend: &dyn TasksBackend, args: Value) -> McpResult<CallToolResult> {
    let params = TaskRefParams::decode(args)?;

    match backend
        .delete_task(&params.tasklist_id, &params.task_id)
        .await
    {
        Ok(()) => Ok(text_success(format::TASK_DELETED)),
        Err(e) => Ok(failure("delete_task", e)),
    }
}
