//! Task storage backends
//!
//! The tool layer only sees [`TasksBackend`]; the Google Tasks REST client in
//! [`google`] is the production implementation and tests substitute fakes.
//! Backend failures are opaque to the tool layer: they are shown to the
//! user, never retried or classified.

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::AuthError;
use crate::types::{NewTask, Task, TaskList, TaskUpdates};

pub mod google;

pub use google::GoogleTasksBackend;

/// Errors that can occur when talking to the task backend
#[derive(Error, Debug)]
pub enum BackendError {
    /// The API answered with a non-success status
    #[error("Google Tasks API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The request could not be sent or the response not read
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// No usable credential for the request
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Any other failure, carried as text
    #[error("{0}")]
    Other(String),
}

/// Result type alias for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Capability set the tool layer needs from a task store
#[async_trait]
pub trait TasksBackend: Send + Sync {
    async fn list_task_lists(&self) -> BackendResult<Vec<TaskList>>;

    async fn list_tasks(&self, tasklist_id: &str, show_completed: bool) -> BackendResult<Vec<Task>>;

    async fn create_task(&self, tasklist_id: &str, task: NewTask) -> BackendResult<Task>;

    /// Apply `updates` to an existing task and return the stored result
    ///
    /// Moving the status to completed must stamp a completion time; moving it
    /// anywhere else must clear it.
    async fn update_task(
        &self,
        tasklist_id: &str,
        task_id: &str,
        updates: TaskUpdates,
    ) -> BackendResult<Task>;

    /// Mark a task completed: an update that only forces the status
    async fn complete_task(&self, tasklist_id: &str, task_id: &str) -> BackendResult<Task> {
        self.update_task(tasklist_id, task_id, TaskUpdates::complete())
            .await
    }

    async fn delete_task(&self, tasklist_id: &str, task_id: &str) -> BackendResult<()>;
}
