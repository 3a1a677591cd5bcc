//! Google Tasks REST backend

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

use super::{BackendError, BackendResult, TasksBackend};
use crate::auth::TokenSource;
use crate::types::{FieldUpdate, NewTask, Task, TaskList, TaskStatus, TaskUpdates};

pub const DEFAULT_BASE_URL: &str = "https://tasks.googleapis.com/tasks/v1";

/// Page size for task listings; a single page is fetched
const MAX_RESULTS: &str = "100";

/// Task resource as exchanged with the API
///
/// Fields the tool layer does not model are kept in `extra` so a
/// read-modify-write update sends them back untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct RemoteTask {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    due: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RemoteTask> for Task {
    fn from(remote: RemoteTask) -> Self {
        let status = match remote.status.as_deref() {
            Some("completed") => TaskStatus::Completed,
            _ => TaskStatus::NeedsAction,
        };
        Task {
            id: remote.id,
            title: remote.title,
            notes: remote.notes.filter(|n| !n.is_empty()),
            due: remote.due.filter(|d| !d.is_empty()),
            status,
            completed: remote.completed,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RemoteTaskList {
    id: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct Collection<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

/// Apply tool-level updates to a fetched task
///
/// A title cannot be removed, so clearing it leaves an empty title.
pub(crate) fn apply_updates(task: &mut RemoteTask, updates: &TaskUpdates, now: DateTime<Utc>) {
    match &updates.title {
        FieldUpdate::Unchanged => {}
        FieldUpdate::Clear => task.title.clear(),
        FieldUpdate::Set(title) => task.title = title.clone(),
    }
    updates.notes.apply_to(&mut task.notes);
    updates.due.apply_to(&mut task.due);

    if let Some(status) = updates.status {
        task.status = Some(status.as_str().to_string());
        task.completed = match status {
            TaskStatus::Completed => Some(now.to_rfc3339_opts(SecondsFormat::Secs, true)),
            TaskStatus::NeedsAction => None,
        };
    }
}

/// Client for the Google Tasks v1 API
pub struct GoogleTasksBackend {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl GoogleTasksBackend {
    /// `base_url` is the API root, normally [`DEFAULT_BASE_URL`]
    pub fn with_base_url(tokens: Arc<dyn TokenSource>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    fn url(&self, segments: &[&str]) -> BackendResult<url::Url> {
        let mut url = url::Url::parse(&self.base_url)
            .map_err(|e| BackendError::Other(format!("invalid base URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| BackendError::Other(format!("invalid base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> BackendResult<Response> {
        let token = self.tokens.access_token().await?;
        let response = request.bearer_auth(token).send().await?;
        check_status(response).await
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> BackendResult<T> {
        Ok(self.send(request).await?.json().await?)
    }

    async fn get_task(&self, tasklist_id: &str, task_id: &str) -> BackendResult<RemoteTask> {
        let url = self.url(&["lists", tasklist_id, "tasks", task_id])?;
        self.send_json(self.client.get(url)).await
    }
}

async fn check_status(response: Response) -> BackendResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|b| b.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or(body)
        });

    Err(BackendError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl TasksBackend for GoogleTasksBackend {
    async fn list_task_lists(&self) -> BackendResult<Vec<TaskList>> {
        let url = self.url(&["users", "@me", "lists"])?;
        let lists: Collection<RemoteTaskList> = self.send_json(self.client.get(url)).await?;
        debug!("Fetched {} task lists", lists.items.len());

        Ok(lists
            .items
            .into_iter()
            .map(|l| TaskList {
                id: l.id,
                title: l.title,
            })
            .collect())
    }

    async fn list_tasks(&self, tasklist_id: &str, show_completed: bool) -> BackendResult<Vec<Task>> {
        let mut url = self.url(&["lists", tasklist_id, "tasks"])?;
        url.query_pairs_mut()
            .append_pair("maxResults", MAX_RESULTS)
            .append_pair("showCompleted", if show_completed { "true" } else { "false" })
            .append_pair("showHidden", "false");

        let tasks: Collection<RemoteTask> = self.send_json(self.client.get(url)).await?;
        debug!("Fetched {} tasks from {}", tasks.items.len(), tasklist_id);

        Ok(tasks.items.into_iter().map(Task::from).collect())
    }

    async fn create_task(&self, tasklist_id: &str, task: NewTask) -> BackendResult<Task> {
        let url = self.url(&["lists", tasklist_id, "tasks"])?;
        let body = RemoteTask {
            title: task.title,
            notes: task.notes,
            due: task.due,
            ..Default::default()
        };

        let created: RemoteTask = self.send_json(self.client.post(url).json(&body)).await?;
        Ok(created.into())
    }

    async fn update_task(
        &self,
        tasklist_id: &str,
        task_id: &str,
        updates: TaskUpdates,
    ) -> BackendResult<Task> {
        let mut task = self.get_task(tasklist_id, task_id).await?;
        apply_updates(&mut task, &updates, Utc::now());

        let url = self.url(&["lists", tasklist_id, "tasks", task_id])?;
        let updated: RemoteTask = self.send_json(self.client.put(url).json(&task)).await?;
        Ok(updated.into())
    }

    async fn delete_task(&self, tasklist_id: &str, task_id: &str) -> BackendResult<()> {
        let url = self.url(&["lists", tasklist_id, "tasks", task_id])?;
        self.send(self.client.delete(url)).await?;
        Ok(())
    }
}
