//! Human-readable tool result texts

use std::fmt::Write;

use crate::due::{decode_due, DisplayZone};
use crate::types::{Task, TaskList};

pub const NO_TASK_LISTS: &str = "No task lists found.";
pub const NO_TASKS: &str = "No tasks found.";
pub const TASK_DELETED: &str = "Task deleted successfully!";

pub fn task_lists(lists: &[TaskList]) -> String {
    if lists.is_empty() {
        return NO_TASK_LISTS.to_string();
    }

    let mut out = format!("Found {} task list(s):\n\n", lists.len());
    for list in lists {
        let _ = write!(out, "- {}\n  ID: {}\n\n", list.title, list.id);
    }
    out
}

pub fn tasks(tasks: &[Task], zone: &DisplayZone) -> String {
    if tasks.is_empty() {
        return NO_TASKS.to_string();
    }

    let mut out = format!("Found {} task(s):\n\n", tasks.len());
    for task in tasks {
        let checkbox = if task.status.is_completed() { "[x]" } else { "[ ]" };
        let _ = writeln!(out, "{} {}", checkbox, task.title);
        if let Some(notes) = task.notes.as_deref().filter(|n| !n.is_empty()) {
            let _ = writeln!(out, "  Notes: {}", notes);
        }
        if let Some(due) = task.due.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "  Due: {}", decode_due(due, zone));
        }
        let _ = write!(out, "  ID: {}\n\n", task.id);
    }
    out
}

pub fn task_created(task: &Task, zone: &DisplayZone) -> String {
    let mut out = format!(
        "Task created successfully!\nID: {}\nTitle: {}",
        task.id, task.title
    );
    if let Some(due) = task.due.as_deref().filter(|d| !d.is_empty()) {
        let _ = write!(out, "\nDue: {}", decode_due(due, zone));
    }
    out
}

pub fn task_updated(task: &Task) -> String {
    format!("Task updated successfully!\nID: {}\nTitle: {}", task.id, task.title)
}

pub fn task_completed(task: &Task) -> String {
    format!("Task completed!\nID: {}\nTitle: {}", task.id, task.title)
}
