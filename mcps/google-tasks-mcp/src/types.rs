//! Type definitions for google-tasks-mcp

use serde::{Deserialize, Deserializer, Serialize};

/// Task status as stored by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    NeedsAction,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NeedsAction => "needsAction",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }
}

/// Task list projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    pub id: String,
    pub title: String,
}

/// Task projection as seen by the tool layer
///
/// `due` and `completed` are backend timestamps (RFC 3339), not display
/// strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub notes: Option<String>,
    pub due: Option<String>,
    pub status: TaskStatus,
    pub completed: Option<String>,
}

/// New task input
///
/// `due` is already encoded as a backend timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub notes: Option<String>,
    pub due: Option<String>,
}

/// Change to a single optional field of an existing task
///
/// Decoded from a tool argument: a missing key leaves the field alone, an
/// empty string clears it, anything else replaces it. A JSON `null` counts as
/// missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    #[default]
    Unchanged,
    Clear,
    Set(T),
}

impl<T> FieldUpdate<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, FieldUpdate::Unchanged)
    }

    /// Transform the replacement value, keeping `Unchanged` and `Clear`
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<FieldUpdate<U>, E> {
        Ok(match self {
            FieldUpdate::Unchanged => FieldUpdate::Unchanged,
            FieldUpdate::Clear => FieldUpdate::Clear,
            FieldUpdate::Set(value) => FieldUpdate::Set(f(value)?),
        })
    }
}

impl<T: Clone> FieldUpdate<T> {
    /// Apply this change to an optional slot
    pub fn apply_to(&self, slot: &mut Option<T>) {
        match self {
            FieldUpdate::Unchanged => {}
            FieldUpdate::Clear => *slot = None,
            FieldUpdate::Set(value) => *slot = Some(value.clone()),
        }
    }
}

impl<'de> Deserialize<'de> for FieldUpdate<String> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<String>::deserialize(deserializer)? {
            None => FieldUpdate::Unchanged,
            Some(value) if value.is_empty() => FieldUpdate::Clear,
            Some(value) => FieldUpdate::Set(value),
        })
    }
}

/// Optional fields to change on an existing task
///
/// `due` carries an encoded backend timestamp. Setting `status` to completed
/// stamps a completion time; any other status clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdates {
    pub title: FieldUpdate<String>,
    pub notes: FieldUpdate<String>,
    pub due: FieldUpdate<String>,
    pub status: Option<TaskStatus>,
}

impl TaskUpdates {
    /// Updates that only mark the task as completed
    pub fn complete() -> Self {
        Self {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct NotesArg {
        #[serde(default)]
        notes: FieldUpdate<String>,
    }

    fn decode_notes(value: serde_json::Value) -> FieldUpdate<String> {
        serde_json::from_value::<NotesArg>(value).unwrap().notes
    }

    #[test]
    fn test_field_update_tri_state() {
        assert_eq!(decode_notes(json!({})), FieldUpdate::Unchanged);
        assert_eq!(decode_notes(json!({"notes": null})), FieldUpdate::Unchanged);
        assert_eq!(decode_notes(json!({"notes": ""})), FieldUpdate::Clear);
        assert_eq!(
            decode_notes(json!({"notes": "buy oat milk"})),
            FieldUpdate::Set("buy oat milk".to_string())
        );
    }

    #[test]
    fn test_field_update_rejects_non_string() {
        assert!(serde_json::from_value::<NotesArg>(json!({"notes": 12})).is_err());
    }

    #[test]
    fn test_field_update_apply_to() {
        let mut slot = Some("old".to_string());
        FieldUpdate::Unchanged.apply_to(&mut slot);
        assert_eq!(slot.as_deref(), Some("old"));

        FieldUpdate::Set("new".to_string()).apply_to(&mut slot);
        assert_eq!(slot.as_deref(), Some("new"));

        FieldUpdate::Clear.apply_to(&mut slot);
        assert_eq!(slot, None);
    }

    #[test]
    fn test_field_update_try_map_keeps_clear() {
        let clear: FieldUpdate<String> = FieldUpdate::Clear;
        let mapped: Result<FieldUpdate<usize>, ()> = clear.try_map(|s| Ok(s.len()));
        assert_eq!(mapped, Ok(FieldUpdate::Clear));

        let set = FieldUpdate::Set("abc".to_string());
        assert_eq!(set.try_map(|s| Ok::<_, ()>(s.len())), Ok(FieldUpdate::Set(3)));
    }

    #[test]
    fn test_task_status_wire_names() {
        assert_eq!(TaskStatus::Completed.as_str(), "completed");
        assert_eq!(
            serde_json::from_value::<TaskStatus>(json!("completed")).unwrap(),
            TaskStatus::Completed
        );
        assert!(serde_json::from_value::<TaskStatus>(json!("done")).is_err());
        assert_eq!(serde_json::to_value(TaskStatus::NeedsAction).unwrap(), json!("needsAction"));
    }

    #[test]
    fn test_complete_updates() {
        let updates = TaskUpdates::complete();
        assert_eq!(updates.status, Some(TaskStatus::Completed));
        assert!(updates.title.is_unchanged());
        assert!(updates.due.is_unchanged());
    }
}
