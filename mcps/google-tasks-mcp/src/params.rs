//! Parameter definitions for google-tasks-mcp tools
//!
//! Each `decode` turns the loose JSON argument bag of a `tools/call` into a
//! typed input: the task-list default is applied first, then required fields
//! are checked. Failures are JSON-RPC invalid-params errors.

use mcp_common::{invalid_params, invalid_params_with, McpResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::types::FieldUpdate;

/// Backend alias for the user's default task list
pub const DEFAULT_TASKLIST_ID: &str = "@default";

const MISSING_TASK_ID: &str = "task_id is required (use list_tasks to find task IDs)";

fn tasklist_or_default(tasklist_id: Option<String>) -> String {
    tasklist_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| DEFAULT_TASKLIST_ID.to_string())
}

fn require_task_id(task_id: Option<String>) -> McpResult<String> {
    task_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| invalid_params(MISSING_TASK_ID))
}

fn parse_args<T: DeserializeOwned>(args: Value) -> McpResult<T> {
    serde_json::from_value(args).map_err(|e| invalid_params_with("Invalid arguments", e))
}

// ============================================================================
// Listing
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ListTasksParams {
    pub tasklist_id: String,
    pub show_completed: bool,
}

#[derive(Debug, Deserialize)]
struct RawListTasks {
    #[serde(default)]
    tasklist_id: Option<String>,
    #[serde(default)]
    show_completed: Option<bool>,
}

impl ListTasksParams {
    pub fn decode(args: Value) -> McpResult<Self> {
        let raw: RawListTasks = parse_args(args)?;
        Ok(Self {
            tasklist_id: tasklist_or_default(raw.tasklist_id),
            show_completed: raw.show_completed.unwrap_or(false),
        })
    }
}

// ============================================================================
// CRUD Operations
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTaskParams {
    pub tasklist_id: String,
    pub title: String,
    pub notes: Option<String>,
    /// Due date as typed by the user, not yet encoded
    pub due: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCreateTask {
    #[serde(default)]
    tasklist_id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    due: Option<String>,
}

impl CreateTaskParams {
    pub fn decode(args: Value) -> McpResult<Self> {
        let raw: RawCreateTask = parse_args(args)?;
        let tasklist_id = tasklist_or_default(raw.tasklist_id);
        let title = raw
            .title
            .filter(|t| !t.is_empty())
            .ok_or_else(|| invalid_params("title is required"))?;

        Ok(Self {
            tasklist_id,
            title,
            notes: raw.notes.filter(|n| !n.is_empty()),
            due: raw.due.filter(|d| !d.is_empty()),
        })
    }
}

/// `update_task` input
///
/// Every optional field keeps the difference between "not sent" and "sent
/// empty" so that clearing a value is possible.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateTaskParams {
    pub tasklist_id: String,
    pub task_id: String,
    pub title: FieldUpdate<String>,
    pub notes: FieldUpdate<String>,
    /// Due date as typed by the user, not yet encoded
    pub due: FieldUpdate<String>,
}

#[derive(Debug, Deserialize)]
struct RawUpdateTask {
    #[serde(default)]
    tasklist_id: Option<String>,
    #[serde(default)]
    task_id: Option<String>,
    #[serde(default)]
    title: FieldUpdate<String>,
    #[serde(default)]
    notes: FieldUpdate<String>,
    #[serde(default)]
    due: FieldUpdate<String>,
}

impl UpdateTaskParams {
    pub fn decode(args: Value) -> McpResult<Self> {
        let raw: RawUpdateTask = parse_args(args)?;
        Ok(Self {
            tasklist_id: tasklist_or_default(raw.tasklist_id),
            task_id: require_task_id(raw.task_id)?,
            title: raw.title,
            notes: raw.notes,
            due: raw.due,
        })
    }
}

/// Input shared by tools that address one task: `complete_task`, `delete_task`
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRefParams {
    pub tasklist_id: String,
    pub task_id: String,
}

#[derive(Debug, Deserialize)]
struct RawTaskRef {
    #[serde(default)]
    tasklist_id: Option<String>,
    #[serde(default)]
    task_id: Option<String>,
}

impl TaskRefParams {
    pub fn decode(args: Value) -> McpResult<Self> {
        let raw: RawTaskRef = parse_args(args)?;
        Ok(Self {
            tasklist_id: tasklist_or_default(raw.tasklist_id),
            task_id: require_task_id(raw.task_id)?,
        })
    }
}
