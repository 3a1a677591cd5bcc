//! Tool registry
//!
//! The fixed, ordered catalog of tools. [`ToolKind::ALL`] drives both the
//! `tools/list` answer and `tools/call` dispatch, so the two cannot drift.

use mcp_common::Tool;
use serde_json::{json, Value};

use crate::params::DEFAULT_TASKLIST_ID;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    ListTaskLists,
    ListTasks,
    CreateTask,
    UpdateTask,
    CompleteTask,
    DeleteTask,
}

impl ToolKind {
    /// Catalog order, as advertised to clients
    pub const ALL: [ToolKind; 6] = [
        ToolKind::ListTaskLists,
        ToolKind::ListTasks,
        ToolKind::CreateTask,
        ToolKind::UpdateTask,
        ToolKind::CompleteTask,
        ToolKind::DeleteTask,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::ListTaskLists => "list_task_lists",
            ToolKind::ListTasks => "list_tasks",
            ToolKind::CreateTask => "create_task",
            ToolKind::UpdateTask => "update_task",
            ToolKind::CompleteTask => "complete_task",
            ToolKind::DeleteTask => "delete_task",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolKind::ListTaskLists => "List all task lists",
            ToolKind::ListTasks => "List tasks from a task list",
            ToolKind::CreateTask => "Create a new task",
            ToolKind::UpdateTask => "Update an existing task",
            ToolKind::CompleteTask => "Mark a task as completed",
            ToolKind::DeleteTask => "Delete a task",
        }
    }

    pub fn input_schema(&self) -> Value {
        match self {
            ToolKind::ListTaskLists => json!({
                "type": "object",
                "properties": {}
            }),
            ToolKind::ListTasks => json!({
                "type": "object",
                "properties": {
                    "tasklist_id": discoverable_tasklist_property(),
                    "show_completed": {
                        "type": "boolean",
                        "description": "Include completed tasks (default: false)",
                        "default": false
                    }
                }
            }),
            ToolKind::CreateTask => json!({
                "type": "object",
                "properties": {
                    "tasklist_id": discoverable_tasklist_property(),
                    "title": string_property("Task title"),
                    "notes": string_property("Task notes/description (optional)"),
                    "due": string_property(
                        "Due date in YYYY-MM-DD or YYYY-MM-DDTHH:MM format (optional)"
                    )
                },
                "required": ["title"]
            }),
            ToolKind::UpdateTask => json!({
                "type": "object",
                "properties": {
                    "tasklist_id": tasklist_property(),
                    "task_id": string_property("Task ID to update (use list_tasks to find IDs)"),
                    "title": string_property("New task title (optional)"),
                    "notes": string_property("New task notes (optional, empty string clears)"),
                    "due": string_property(
                        "New due date in YYYY-MM-DD or YYYY-MM-DDTHH:MM format (optional, empty string clears)"
                    )
                },
                "required": ["task_id"]
            }),
            ToolKind::CompleteTask => json!({
                "type": "object",
                "properties": {
                    "tasklist_id": tasklist_property(),
                    "task_id": string_property("Task ID to complete (use list_tasks to find IDs)")
                },
                "required": ["task_id"]
            }),
            ToolKind::DeleteTask => json!({
                "type": "object",
                "properties": {
                    "tasklist_id": tasklist_property(),
                    "task_id": string_property("Task ID to delete (use list_tasks to find IDs)")
                },
                "required": ["task_id"]
            }),
        }
    }

    pub fn descriptor(&self) -> Tool {
        Tool::new(self.name(), self.description(), self.input_schema())
    }
}

/// Descriptors of every tool, in catalog order
pub fn catalog() -> Vec<Tool> {
    ToolKind::ALL.iter().map(ToolKind::descriptor).collect()
}

fn string_property(description: &str) -> Value {
    json!({
        "type": "string",
        "description": description
    })
}

fn tasklist_property() -> Value {
    json!({
        "type": "string",
        "description": "Task list ID",
        "default": DEFAULT_TASKLIST_ID
    })
}

fn discoverable_tasklist_property() -> Value {
    json!({
        "type": "string",
        "description": format!(
            "Task list ID (use list_task_lists to find IDs, or '{}' for the default list)",
            DEFAULT_TASKLIST_ID
        ),
        "default": DEFAULT_TASKLIST_ID
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order() {
        let names: Vec<_> = catalog().into_iter().map(|tool| tool.name).collect();
        assert_eq!(
            names,
            vec![
                "list_task_lists",
                "list_tasks",
                "create_task",
                "update_task",
                "complete_task",
                "delete_task"
            ]
        );
    }

    #[test]
    fn test_from_name_round_trip() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ToolKind::from_name("nonexistent"), None);
        assert_eq!(ToolKind::from_name(""), None);
    }

    #[test]
    fn test_required_fields() {
        let required = |kind: ToolKind| kind.input_schema().get("required").cloned();

        assert_eq!(required(ToolKind::ListTaskLists), None);
        assert_eq!(required(ToolKind::ListTasks), None);
        assert_eq!(required(ToolKind::CreateTask), Some(json!(["title"])));
        assert_eq!(required(ToolKind::UpdateTask), Some(json!(["task_id"])));
        assert_eq!(required(ToolKind::CompleteTask), Some(json!(["task_id"])));
        assert_eq!(required(ToolKind::DeleteTask), Some(json!(["task_id"])));
    }

    #[test]
    fn test_defaults_advertised() {
        let schema = ToolKind::ListTasks.input_schema();
        assert_eq!(schema["properties"]["tasklist_id"]["default"], "@default");
        assert_eq!(schema["properties"]["show_completed"]["default"], false);

        for kind in ToolKind::ALL.into_iter().skip(1) {
            assert_eq!(
                kind.input_schema()["properties"]["tasklist_id"]["default"],
                "@default",
                "{} should default tasklist_id",
                kind.name()
            );
        }
    }

    #[test]
    fn test_descriptor_serializes_input_schema_key() {
        let value = serde_json::to_value(ToolKind::DeleteTask.descriptor()).unwrap();
        assert_eq!(value["name"], "delete_task");
        assert_eq!(value["description"], "Delete a task");
        assert_eq!(value["inputSchema"]["type"], "object");
    }
}
